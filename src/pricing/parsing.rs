use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::pricing::query::PriceRange;

lazy_static! {
    static ref LABELED_MIN: Regex = Regex::new(r#""min_price":\s*(\d+(?:\.\d+)?)"#).unwrap();
    static ref LABELED_MAX: Regex = Regex::new(r#""max_price":\s*(\d+(?:\.\d+)?)"#).unwrap();
    static ref LABELED_WORDS: Regex =
        Regex::new(r"Min:\s*(\d+(?:\.\d+)?)\s*Max:\s*(\d+(?:\.\d+)?)").unwrap();
    static ref RANGE_DASH: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)").unwrap();
    static ref NUMBER: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
}

/// One rule for turning raw model text into a candidate `(min, max)` pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Object between the first `{` and the last `}`, code fences removed.
    BoundedJson,
    /// `"min_price": X` and `"max_price": Y` anywhere in the text.
    LabeledKey,
    /// `Min: X Max: Y`.
    LabeledWord,
    /// `X - Y`.
    RangeDash,
    /// First two numbers in order of appearance, swapped if descending.
    ///
    /// Last resort: it can pick two unrelated numbers out of prose and still
    /// satisfy the range invariant. No plausibility bound is applied.
    BareNumbers,
}

impl ExtractionStrategy {
    /// Strategies in the order they are attempted.
    pub const CHAIN: [ExtractionStrategy; 5] = [
        ExtractionStrategy::BoundedJson,
        ExtractionStrategy::LabeledKey,
        ExtractionStrategy::LabeledWord,
        ExtractionStrategy::RangeDash,
        ExtractionStrategy::BareNumbers,
    ];

    pub fn candidate(self, text: &str) -> Option<(f64, f64)> {
        match self {
            ExtractionStrategy::BoundedJson => bounded_json(text),
            ExtractionStrategy::LabeledKey => labeled_key(text),
            ExtractionStrategy::LabeledWord => capture_pair(&LABELED_WORDS, text),
            ExtractionStrategy::RangeDash => capture_pair(&RANGE_DASH, text),
            ExtractionStrategy::BareNumbers => bare_numbers(text),
        }
    }
}

impl Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::BoundedJson => write!(f, "bounded-json"),
            ExtractionStrategy::LabeledKey => write!(f, "labeled-key"),
            ExtractionStrategy::LabeledWord => write!(f, "labeled-word"),
            ExtractionStrategy::RangeDash => write!(f, "range-dash"),
            ExtractionStrategy::BareNumbers => write!(f, "bare-numbers"),
        }
    }
}

/// Runs the strategy chain and returns the first candidate that forms a valid
/// [`PriceRange`], together with the strategy that produced it.
pub fn parse_price_range(text: &str) -> Option<(PriceRange, ExtractionStrategy)> {
    ExtractionStrategy::CHAIN.into_iter().find_map(|strategy| {
        let Some((min, max)) = strategy.candidate(text) else {
            debug!(%strategy, "No candidate found");
            return None;
        };
        match PriceRange::new(min, max) {
            Some(range) => Some((range, strategy)),
            None => {
                debug!(%strategy, min, max, "Candidate violates price range invariant");
                None
            }
        }
    })
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn bounded_json(text: &str) -> Option<(f64, f64)> {
    let text = strip_code_fence(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    let object: Map<String, Value> = match serde_json::from_str(&text[start..=end]) {
        Ok(object) => object,
        Err(err) => {
            debug!("JSON parsing failed: {}", err);
            return None;
        }
    };
    Some((
        price_field(&object, "min_price")?,
        price_field(&object, "max_price")?,
    ))
}

fn price_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn labeled_key(text: &str) -> Option<(f64, f64)> {
    let min = LABELED_MIN.captures(text)?.get(1)?.as_str().parse().ok()?;
    let max = LABELED_MAX.captures(text)?.get(1)?.as_str().parse().ok()?;
    Some((min, max))
}

fn capture_pair(pattern: &Regex, text: &str) -> Option<(f64, f64)> {
    let captures = pattern.captures(text)?;
    let min = captures.get(1)?.as_str().parse().ok()?;
    let max = captures.get(2)?.as_str().parse().ok()?;
    Some((min, max))
}

fn bare_numbers(text: &str) -> Option<(f64, f64)> {
    let mut numbers = NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok());
    let first = numbers.next()?;
    let second = numbers.next()?;
    Some(if second < first {
        (second, first)
    } else {
        (first, second)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<(f64, f64, ExtractionStrategy)> {
        parse_price_range(text).map(|(range, s)| (range.min_price(), range.max_price(), s))
    }

    #[test]
    fn clean_json_object() {
        let text = r#"{"min_price": 18, "max_price": 26.5, "currency": "₹", "unit": "per kg", "location": "Pune", "crop": "Tomato"}"#;
        assert_eq!(parse(text), Some((18.0, 26.5, ExtractionStrategy::BoundedJson)));
    }

    #[test]
    fn fenced_json_object() {
        let text = "```json\n{\"min_price\": 20, \"max_price\": 30}\n```";
        assert_eq!(parse(text), Some((20.0, 30.0, ExtractionStrategy::BoundedJson)));

        let text = "```\n{\"min_price\": 21, \"max_price\": 31}\n```";
        assert_eq!(parse(text), Some((21.0, 31.0, ExtractionStrategy::BoundedJson)));
    }

    #[test]
    fn json_surrounded_by_prose() {
        let text = "Here is the range you asked for: {\"min_price\": 40, \"max_price\": 55} Hope it helps.";
        assert_eq!(parse(text), Some((40.0, 55.0, ExtractionStrategy::BoundedJson)));
    }

    #[test]
    fn json_with_numeric_strings() {
        let text = r#"{"min_price": "12.5", "max_price": "19"}"#;
        assert_eq!(parse(text), Some((12.5, 19.0, ExtractionStrategy::BoundedJson)));
    }

    #[test]
    fn malformed_json_falls_back_to_labeled_keys() {
        let text = r#"{"min_price": 20, "max_price": 35, "currency": "₹",}"#;
        assert_eq!(parse(text), Some((20.0, 35.0, ExtractionStrategy::LabeledKey)));

        let text = r#"min/max: "min_price": 8.25 and then "max_price":9.75 (truncated"#;
        assert_eq!(parse(text), Some((8.25, 9.75, ExtractionStrategy::LabeledKey)));
    }

    #[test]
    fn labeled_words() {
        assert_eq!(
            parse("Min: 12.5 Max: 30"),
            Some((12.5, 30.0, ExtractionStrategy::LabeledWord))
        );
    }

    #[test]
    fn range_dash() {
        assert_eq!(parse("15 - 40"), Some((15.0, 40.0, ExtractionStrategy::RangeDash)));
        assert_eq!(
            parse("Expect roughly ₹22.5-28 per kg"),
            Some((22.5, 28.0, ExtractionStrategy::RangeDash))
        );
    }

    #[test]
    fn bare_numbers_are_swapped() {
        assert_eq!(
            parse("Prices vary, typically about 50 and 20 rupees depending on quality"),
            Some((20.0, 50.0, ExtractionStrategy::BareNumbers))
        );
    }

    #[test]
    fn descending_dash_range_is_rescued_by_bare_numbers() {
        assert_eq!(
            parse("40 - 15"),
            Some((15.0, 40.0, ExtractionStrategy::BareNumbers))
        );
    }

    #[test]
    fn inverted_json_is_rescued_by_bare_numbers() {
        // Both JSON strategies see min > max; the last resort swaps the pair.
        let text = r#"{"min_price": 10, "max_price": 5}"#;
        assert_eq!(parse(text), Some((5.0, 10.0, ExtractionStrategy::BareNumbers)));
    }

    #[test]
    fn zero_prices_exhaust_the_chain() {
        assert_eq!(parse(r#"{"min_price": 0, "max_price": 0}"#), None);
        assert_eq!(parse(r#"{"min_price": 0, "max_price": 30}"#), None);
    }

    #[test]
    fn fewer_than_two_numbers_exhausts_the_chain() {
        assert_eq!(parse("I cannot provide current market prices."), None);
        assert_eq!(parse("About 25 rupees."), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("   \n  "), None);
    }

    #[test]
    fn json_without_price_keys_falls_through() {
        assert_eq!(
            ExtractionStrategy::BoundedJson.candidate(r#"{"price": 10}"#),
            None
        );
        assert_eq!(ExtractionStrategy::BoundedJson.candidate("} {"), None);
    }

    #[test]
    fn strategies_only_report_their_own_shape() {
        assert_eq!(ExtractionStrategy::LabeledKey.candidate("Min: 1 Max: 2"), None);
        assert_eq!(ExtractionStrategy::LabeledWord.candidate("1 - 2"), None);
        assert_eq!(ExtractionStrategy::RangeDash.candidate("1 and 2"), None);
        assert_eq!(ExtractionStrategy::BareNumbers.candidate("only 1"), None);
    }

    #[test]
    fn strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
