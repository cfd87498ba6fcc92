//! Daily digest email for subscribers.
//!
//! Renders the first word of the day into a self-contained HTML message and
//! resolves who should receive it. Sending is in [`crate::mailer`].

use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

use crate::feed::{WordDetails, WordRecord};
use crate::storage::Database;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("The feed contained no words")]
    NoWords,
    #[error("No description found for '{0}'")]
    NoDescription(String),
}

/// A rendered digest message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html: String,
}

const STYLE: &str = r#"
      body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #1a202c; background-color: #f7fafc; margin: 0; padding: 0; }
      .container { max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; overflow: hidden; }
      .header { background-color: #4299e1; color: white; padding: 20px; text-align: center; }
      .header h1 { margin: 0; font-size: 24px; font-weight: 600; }
      .content { padding: 25px; }
      .word-section { margin-bottom: 25px; text-align: center; }
      .word { font-size: 32px; font-weight: 700; color: #2b6cb0; margin: 0; }
      .syllables { font-size: 20px; color: #4a5568; margin: 5px 0 0; }
      .word-classes { display: inline-block; margin-top: 8px; font-style: italic; color: #718096; }
      .section-title { font-size: 18px; font-weight: 600; color: #4a5568; border-bottom: 1px solid #e2e8f0; }
      .meaning-item { margin-bottom: 18px; padding-left: 10px; border-left: 3px solid #bee3f8; }
      .meaning-number { font-weight: 600; color: #2b6cb0; margin-right: 8px; }
      .meaning-class { font-style: italic; color: #718096; font-size: 14px; }
      .etymology-section p { margin: 0; font-style: italic; color: #718096; }
      .link-section { margin-top: 25px; text-align: center; }
      .footer { background-color: #edf2f7; padding: 15px; text-align: center; font-size: 13px; color: #718096; }
"#;

impl Digest {
    /// Renders the digest for the first word of a feed response.
    pub fn for_first(words: &[WordRecord]) -> Result<Self, DigestError> {
        let record = words.first().ok_or(DigestError::NoWords)?;
        Self::render(record)
    }

    /// Renders one word. Records without a description cannot be rendered.
    pub fn render(record: &WordRecord) -> Result<Self, DigestError> {
        let WordDetails { description, .. } = record
            .details
            .as_ref()
            .ok_or_else(|| DigestError::NoDescription(record.word.clone()))?;

        let subject = format!("Palavra do Dia Priberam: {} - {}", record.word, record.date);

        let mut meanings = String::new();
        for meaning in &description.meanings {
            // Writing to a String cannot fail.
            let _ = write!(
                meanings,
                r#"
        <div class="meaning-item">
          <div class="meaning-header">
            <span class="meaning-number">{}</span>
            <span class="meaning-class">{}</span>
          </div>
          <div class="meaning-content"><p>{}</p></div>
        </div>"#,
                escape_html(&meaning.number),
                escape_html(&meaning.word_class),
                escape_html(&meaning.text),
            );
        }

        let etymology = if description.etymology.is_empty() {
            "Não disponível".to_string()
        } else {
            escape_html(&description.etymology)
        };

        let html = format!(
            r#"<html>
  <head>
    <meta charset="utf-8">
    <style>{style}</style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>Palavra do Dia</h1>
        <p>{date}</p>
      </div>
      <div class="content">
        <div class="word-section">
          <h2 class="word">{word}</h2>
          <p class="syllables">{syllables}</p>
          <div class="word-classes">{classes}</div>
        </div>
        <h3 class="section-title">Significados</h3>
        <div class="meanings-section">{meanings}
        </div>
        <div class="etymology-section">
          <h3 class="section-title">Etimologia</h3>
          <p>{etymology}</p>
        </div>
        <div class="link-section">
          <a href="{link}" target="_blank">Ver no Dicionário Priberam</a>
        </div>
      </div>
      <div class="footer">
        <p>Este email é enviado automaticamente.</p>
      </div>
    </div>
  </body>
</html>
"#,
            style = STYLE,
            date = escape_html(&record.date),
            word = escape_html(&record.word),
            syllables = escape_html(&description.syllables),
            classes = escape_html(&description.word_classes.join(", ")),
            meanings = meanings,
            etymology = etymology,
            link = escape_html(&record.link),
        );

        Ok(Self { subject, html })
    }
}

/// Escapes text for interpolation into HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reads one address per line, skipping blank lines.
///
/// A missing file is logged and treated as an empty list.
pub fn load_recipients_file(path: &Path) -> std::io::Result<Vec<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!(path = %path.display(), "Recipients file not found");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Subscribers from the database, or the fallback file when there are none.
pub async fn recipients(db: &Database, fallback: &Path) -> anyhow::Result<Vec<String>> {
    let emails = match db.subscriber_emails().await {
        Ok(emails) => emails,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load subscribers from database");
            Vec::new()
        }
    };

    if !emails.is_empty() {
        tracing::info!(count = emails.len(), "Loaded subscribers from database");
        return Ok(emails);
    }

    tracing::warn!(path = %fallback.display(), "No subscribers in database, falling back to file");
    Ok(load_recipients_file(fallback)?)
}
