//! SMTP delivery of the daily digest.
//!
//! One message is sent per recipient over an implicit-TLS relay. A failure
//! for one recipient is logged and the rest still go out.

use lettre::address::AddressError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::Config;
use crate::digest::Digest;

/// Sender address, used when `sender_address` is not configured.
pub const SENDER_VAR: &str = "EMAIL_ADDRESS";
/// SMTP password. Only ever read from the environment.
pub const PASSWORD_VAR: &str = "EMAIL_PASSWORD";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),

    #[error("Invalid sender address: {0}")]
    InvalidSender(#[from] AddressError),

    #[error("SMTP setup failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Error)]
enum SendError {
    #[error("invalid recipient address: {0}")]
    Recipient(#[from] AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(String),
}

/// Login for the SMTP relay. The login name is the sender address.
pub struct SmtpCredentials {
    pub sender: Mailbox,
    username: String,
    password: SecretString,
}

impl SmtpCredentials {
    pub fn new(address: &str, password: SecretString) -> Result<Self, MailerError> {
        Ok(Self {
            sender: address.parse()?,
            username: address.to_string(),
            password,
        })
    }

    /// Sender from config (falling back to `EMAIL_ADDRESS`), password from
    /// `EMAIL_PASSWORD`.
    pub fn from_env(config: &Config) -> Result<Self, MailerError> {
        let address = match &config.sender_address {
            Some(address) => address.clone(),
            None => std::env::var(SENDER_VAR)
                .map_err(|_| MailerError::MissingCredential(SENDER_VAR))?,
        };
        let password = std::env::var(PASSWORD_VAR)
            .map(SecretString::from)
            .map_err(|_| MailerError::MissingCredential(PASSWORD_VAR))?;

        Self::new(&address, password)
    }
}

/// Builds the relay transport for `smtp_host:smtp_port`.
pub fn smtp_transport(
    config: &Config,
    credentials: &SmtpCredentials,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        .port(config.smtp_port)
        .credentials(Credentials::new(
            credentials.username.clone(),
            credentials.password.expose_secret().to_string(),
        ))
        .build();

    tracing::debug!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport ready");
    Ok(transport)
}

/// Outcome of one delivery run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: Vec<String>,
    pub failed: Vec<String>,
}

/// Sends `digest` to every recipient, one message each, in order.
pub async fn send<T>(
    transport: &T,
    sender: &Mailbox,
    digest: &Digest,
    recipients: &[String],
) -> DeliveryReport
where
    T: AsyncTransport + Sync,
    T::Error: std::fmt::Display,
{
    let mut report = DeliveryReport::default();

    for recipient in recipients {
        match deliver(transport, sender, digest, recipient).await {
            Ok(()) => {
                tracing::debug!(recipient = %recipient, "Digest sent");
                report.sent.push(recipient.clone());
            }
            Err(e) => {
                tracing::error!(recipient = %recipient, error = %e, "Failed to send digest");
                report.failed.push(recipient.clone());
            }
        }
    }

    tracing::info!(
        sent = report.sent.len(),
        failed = report.failed.len(),
        "Digest delivery finished"
    );
    report
}

async fn deliver<T>(
    transport: &T,
    sender: &Mailbox,
    digest: &Digest,
    recipient: &str,
) -> Result<(), SendError>
where
    T: AsyncTransport + Sync,
    T::Error: std::fmt::Display,
{
    let message = Message::builder()
        .from(sender.clone())
        .to(recipient.trim().parse()?)
        .subject(digest.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(digest.html.clone())?;

    transport
        .send(message)
        .await
        .map_err(|e| SendError::Transport(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::transport::stub::AsyncStubTransport;
    use pretty_assertions::assert_eq;

    fn digest() -> Digest {
        Digest {
            subject: "Palavra do Dia Priberam: ablução - 05/05/2025".into(),
            html: "<html><body><h2>ablução</h2></body></html>".into(),
        }
    }

    fn sender() -> Mailbox {
        "palavra@example.pt".parse().unwrap()
    }

    fn recipients(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_one_message_per_recipient() {
        let transport = AsyncStubTransport::new_ok();
        let to = recipients(&["ana@example.pt", "rui@example.pt"]);

        let report = send(&transport, &sender(), &digest(), &to).await;

        assert_eq!(report.sent, to);
        assert!(report.failed.is_empty());

        let messages = transport.messages().await;
        assert_eq!(messages.len(), 2);
        let envelope_to: Vec<String> = messages
            .iter()
            .map(|(envelope, _)| envelope.to()[0].to_string())
            .collect();
        assert_eq!(envelope_to, to);
        assert_eq!(
            messages[0].0.from().map(|a| a.to_string()),
            Some("palavra@example.pt".to_string())
        );
        assert!(messages[0].1.contains("text/html"));
    }

    #[tokio::test]
    async fn test_bad_address_does_not_stop_the_run() {
        let transport = AsyncStubTransport::new_ok();
        let to = recipients(&["ana@example.pt", "not an address", "rui@example.pt"]);

        let report = send(&transport, &sender(), &digest(), &to).await;

        assert_eq!(report.sent, recipients(&["ana@example.pt", "rui@example.pt"]));
        assert_eq!(report.failed, recipients(&["not an address"]));
        assert_eq!(transport.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failures_are_collected() {
        let transport = AsyncStubTransport::new_error();
        let to = recipients(&["ana@example.pt", "rui@example.pt"]);

        let report = send(&transport, &sender(), &digest(), &to).await;

        assert!(report.sent.is_empty());
        assert_eq!(report.failed, to);
    }

    #[tokio::test]
    async fn test_no_recipients_sends_nothing() {
        let transport = AsyncStubTransport::new_ok();
        let report = send(&transport, &sender(), &digest(), &[]).await;

        assert_eq!(report, DeliveryReport::default());
        assert!(transport.messages().await.is_empty());
    }

    #[test]
    fn test_credentials_reject_bad_sender() {
        let result = SmtpCredentials::new("nope", SecretString::from("pw".to_string()));
        assert!(matches!(result, Err(MailerError::InvalidSender(_))));
    }

    #[test]
    fn test_configured_sender_takes_precedence() {
        let config = Config {
            sender_address: Some("palavra@example.pt".into()),
            ..Config::default()
        };
        // The password still has to come from the environment.
        match SmtpCredentials::from_env(&config) {
            Ok(credentials) => {
                assert_eq!(credentials.sender.to_string(), "palavra@example.pt")
            }
            Err(e) => assert!(matches!(e, MailerError::MissingCredential(PASSWORD_VAR))),
        }
    }
}
