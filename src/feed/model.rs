use serde::Serialize;

/// One numbered definition, tagged with the grammatical class it sits under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub number: String,
    pub text: String,
    pub word_class: String,
}

/// Linguistic data scraped out of an item description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub syllables: String,
    pub word_classes: Vec<String>,
    pub meanings: Vec<Meaning>,
    pub etymology: String,
}

/// Extraction fields, present only when the item carried a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetails {
    #[serde(flatten)]
    pub description: Description,
    /// Raw (still entity-encoded) description, kept for fallback rendering.
    pub full_description: String,
}

/// A word of the day as served to the front end.
///
/// `details` is `None` when the feed item had no description; the record
/// then serializes to exactly `{word, link, date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordRecord {
    pub word: String,
    pub link: String,
    pub date: String,
    #[serde(flatten)]
    pub details: Option<WordDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordsResponse {
    pub words: Vec<WordRecord>,
}
