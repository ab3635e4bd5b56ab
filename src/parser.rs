use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One enumerated reply line: a number (ASCII or full-width digits), a period
/// (`.` or `．`), the gift name, a dash (`-`, `–` or `—`) and the feature.
///
/// `name` is greedy so the last dash on the line separates it from `feature`.
/// A run of dashes such as `——` counts as one separator.
static GIFT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<number>[0-9０-９]+)[.．]\s*(?P<name>.*[^-–—\s])\s*[-–—][-–—\s]*(?P<feature>[^-–—\s].*)$",
    )
    .expect("Invalid gift line regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftSuggestion {
    pub name: String,
    pub feature: String,
}

impl GiftSuggestion {
    pub fn new(name: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature: feature.into(),
        }
    }
}

/// Extract suggestions from the model's reply in source line order.
///
/// Lines that don't look like `1. name - feature` are skipped. The number itself
/// is discarded. An empty result means nothing in the reply was usable.
pub fn parse_gifts(reply: &str) -> Vec<GiftSuggestion> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                trace!("skipping reply line: {line}");
            }
            parsed
        })
        .collect()
}

fn parse_line(line: &str) -> Option<GiftSuggestion> {
    let caps = GIFT_LINE_REGEX.captures(line)?;
    let name = caps.name("name")?.as_str().trim();
    let feature = caps.name("feature")?.as_str().trim();
    if name.is_empty() || feature.is_empty() {
        return None;
    }
    Some(GiftSuggestion::new(name, feature))
}
