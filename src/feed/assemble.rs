use super::description::parse_description;
use super::entities::decode_entities;
use super::model::{WordDetails, WordRecord, WordsResponse};
use super::parser::{display_date, items, FeedItem};

/// Runs the scraping pipeline over a whole feed document.
///
/// A document with no `<item>` blocks yields an empty word list.
pub fn assemble(document: &str) -> WordsResponse {
    let words: Vec<WordRecord> = items(document)
        .map(FeedItem::extract)
        .map(word_record)
        .collect();

    tracing::debug!(count = words.len(), "Assembled words of the day");
    WordsResponse { words }
}

/// Builds the output record for one feed item.
pub fn word_record(item: FeedItem) -> WordRecord {
    let date = display_date(&item.pub_date);

    let details = if item.description.is_empty() {
        None
    } else {
        let decoded = decode_entities(&item.description);
        Some(WordDetails {
            description: parse_description(&decoded),
            full_description: item.description,
        })
    };

    WordRecord {
        word: item.word,
        link: item.link,
        date,
        details,
    }
}
