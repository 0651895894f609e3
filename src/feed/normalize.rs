//! Markup stripping for feed and article text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A single `<...>` span. Never crosses another `<` or `>`.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("static pattern"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("static pattern")
});

/// Strip markup from a text fragment and trim it.
///
/// Tags are removed, the common HTML entities are decoded, tags revealed by
/// decoding (double-escaped feed text) are removed too, and surrounding
/// whitespace is trimmed. Malformed markup is left as text; this never fails.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    if raw.is_empty() {
        return String::new();
    }

    let stripped = TAG.replace_all(raw, "");
    let decoded = decode_entities(&stripped);
    TAG.replace_all(&decoded, "").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => parse_numeric_entity(entity).and_then(char::from_u32),
            };
            match decoded {
                Some(c) => c.to_string(),
                // Unknown entity, keep as-is
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Parse a numeric HTML entity (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        entity.strip_prefix('#')?.parse().ok()
    }
}
