//! Scraping of the dictionary markup embedded in an item description.
//!
//! Grammatical-class headers and definition lines are siblings with no
//! shared container, and the dictionary reuses the `--pequeno` ("small")
//! style class both for class headers and for the `1.`, `2.` markers inside
//! definition lines. The parser therefore flattens the fragment into an
//! ordered list of [`DescriptionNode`]s and folds over it, carrying the most
//! recent header along.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::model::{Description, Meaning};

const SMALL_LABEL: &str = "--pequeno";
const DEFINITION_LINE: &str = "dp-definicao-linha";

static SYLLABLES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".dp-divisao-silabica .titpalavra").expect("syllables selector is valid")
});
static ETYMOLOGY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".dp-seccao-icon .def.p").expect("etymology selector is valid")
});
static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("ordinal pattern is valid"));

/// A structurally meaningful element of the description, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionNode {
    /// Grammatical class label, e.g. `nome masculino`. A blank label is
    /// still a header: it clears the current class but is not listed.
    Header(String),
    /// Small label that is really a definition number.
    Ordinal,
    /// One numbered definition.
    Definition { number: String, text: String },
}

/// Returns true if `label` starts with a definition number such as `1.` or `12.`.
pub fn is_ordinal_marker(label: &str) -> bool {
    ORDINAL.is_match(label.trim())
}

/// Parses a decoded description fragment.
///
/// Every lookup degrades to an empty value; this never fails.
pub fn parse_description(markup: &str) -> Description {
    let fragment = Html::parse_fragment(markup);
    let nodes = description_nodes(&fragment);

    let word_classes = nodes
        .iter()
        .filter_map(|node| match node {
            DescriptionNode::Header(label) if !label.is_empty() => Some(label.clone()),
            _ => None,
        })
        .collect();

    Description {
        syllables: joined_text(fragment.select(&SYLLABLES)),
        word_classes,
        meanings: group_meanings(&nodes),
        etymology: fragment
            .select(&ETYMOLOGY)
            .next()
            .map(text_of)
            .unwrap_or_default(),
    }
}

/// Classifies every small label and definition line of the fragment.
pub fn description_nodes(fragment: &Html) -> Vec<DescriptionNode> {
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(classify)
        .collect()
}

fn classify(el: ElementRef<'_>) -> Option<DescriptionNode> {
    if has_class(el, DEFINITION_LINE) {
        let number = joined_text(
            nested(el).filter(|e| has_class(*e, "h6") && has_class(*e, SMALL_LABEL)),
        );
        let text = joined_text(nested(el).filter(|e| has_class(*e, "p")));
        return Some(DescriptionNode::Definition { number, text });
    }

    if has_class(el, SMALL_LABEL) {
        let label = text_of(el);
        if is_ordinal_marker(&label) {
            return Some(DescriptionNode::Ordinal);
        }
        return Some(DescriptionNode::Header(label));
    }

    None
}

/// Folds the node sequence into meanings, tagging each definition with the
/// nearest preceding header. Definitions with empty text are dropped.
pub fn group_meanings(nodes: &[DescriptionNode]) -> Vec<Meaning> {
    let (_, meanings) = nodes.iter().fold(
        (String::new(), Vec::new()),
        |(current_class, mut meanings), node| match node {
            DescriptionNode::Header(label) => (label.clone(), meanings),
            DescriptionNode::Ordinal => (current_class, meanings),
            DescriptionNode::Definition { number, text } => {
                if !text.is_empty() {
                    meanings.push(Meaning {
                        number: number.clone(),
                        text: text.clone(),
                        word_class: current_class.clone(),
                    });
                }
                (current_class, meanings)
            }
        },
    );
    meanings
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Descendant elements, excluding `el` itself.
fn nested(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}
