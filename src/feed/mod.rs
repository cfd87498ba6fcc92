//! Word-of-the-day feed fetching and scraping.
//!
//! The Priberam feed is RSS whose `<description>` carries entity-encoded
//! dictionary markup. The pipeline is:
//!
//! ```text
//! items → FeedItem::extract → decode_entities → parse_description → assemble
//! ```
//!
//! - [`parser`] - Regex item splitting, field extraction and date rendering
//! - [`entities`] - Single-pass decoding of the five basic HTML references
//! - [`description`] - DOM scraping of syllables, classes, meanings, etymology
//! - [`assemble`] - Builds the `{ words: [...] }` payload
//! - [`fetcher`] - One-shot HTTP fetch of the upstream document
//!
//! # Example
//!
//! ```ignore
//! use palavra::feed::{fetch_words, FEED_URL};
//!
//! let client = reqwest::Client::new();
//! let response = fetch_words(&client, FEED_URL).await?;
//! ```

mod assemble;
mod description;
mod entities;
mod fetcher;
mod model;
mod parser;

pub use assemble::{assemble, word_record};
pub use description::{
    description_nodes, group_meanings, is_ordinal_marker, parse_description, DescriptionNode,
};
pub use entities::decode_entities;
pub use fetcher::{fetch_feed, fetch_words, FetchError};
pub use model::{Description, Meaning, WordDetails, WordRecord, WordsResponse};
pub use parser::{display_date, items, FeedItem};

/// Priberam's word-of-the-day RSS feed.
pub const FEED_URL: &str = "https://dicionario.priberam.org/DoDiaRSS.aspx";
