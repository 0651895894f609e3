//! Publication date handling.
//!
//! feed-rs parses dates but drops the original text, so the raw value of each
//! item's date element is recovered with a lightweight XML scan.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Formats carrying an explicit offset.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%d/%m/%Y %H:%M:%S %z"];

/// Formats without an offset, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a feed date string.
///
/// Tries RFC 2822, RFC 3339, then a few formats common in the wild.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Rank of a date element inside an item; lower wins.
fn date_rank(local_name: &[u8]) -> Option<u8> {
    match local_name {
        b"pubDate" | b"published" | b"issued" => Some(0),
        // dc:date
        b"date" => Some(1),
        b"updated" | b"modified" => Some(2),
        _ => None,
    }
}

fn is_item(local_name: &[u8]) -> bool {
    matches!(local_name, b"item" | b"entry")
}

/// Collect the raw date text of every item/entry, in document order.
///
/// Items without a date element yield an empty string. Documents that are not
/// XML (e.g. JSON Feed) yield an empty list; a scan error keeps what was
/// collected so far.
pub fn scan_raw_dates(document: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(document);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut dates = Vec::new();
    let mut depth = 0usize;
    let mut item_depth: Option<usize> = None;
    let mut capture: Option<(u8, String)> = None;
    let mut best: Option<(u8, String)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = e.local_name();
                match item_depth {
                    None if is_item(name.as_ref()) => {
                        item_depth = Some(depth);
                        best = None;
                    }
                    Some(d) if depth == d + 1 => {
                        capture = date_rank(name.as_ref()).map(|rank| (rank, String::new()));
                    }
                    _ => {}
                }
            }
            // <item/> is still an entry to the feed parser
            Ok(Event::Empty(e)) if item_depth.is_none() && is_item(e.local_name().as_ref()) => {
                dates.push(String::new());
            }
            Ok(Event::Text(t)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::CData(t)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(d) = item_depth {
                    if depth == d + 1 {
                        if let Some((rank, text)) = capture.take() {
                            let text = text.trim();
                            let better = best.as_ref().map_or(true, |(b, _)| rank < *b);
                            if !text.is_empty() && better {
                                best = Some((rank, text.to_string()));
                            }
                        }
                    } else if depth == d {
                        dates.push(best.take().map(|(_, text)| text).unwrap_or_default());
                        item_depth = None;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(error = %e, "stopped scanning feed dates");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    dates
}
