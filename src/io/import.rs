use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Read;

use crate::application::TouchEvent;
use crate::domain::parse_pence;

/// Result of reading an event file. Bad lines are reported, good lines are
/// kept, so one typo does not throw away a whole tap log.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub events: Vec<TouchEvent>,
    pub errors: Vec<ImportError>,
}

/// Error that occurred while reading one line.
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Read touch events from CSV.
///
/// Expected columns: `event,amount,station,zone,timestamp` where `event` is
/// `top_up`, `touch_in` or `touch_out`. `amount` applies to top-ups,
/// `station`/`zone` to touches; `timestamp` is optional (RFC 3339 or
/// YYYY-MM-DD).
pub fn read_events_csv<R: Read>(reader: R) -> Result<ImportResult> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };

        let kind = record.get(0).unwrap_or("").trim();
        match kind {
            "top_up" => {
                let amount_str = record.get(1).unwrap_or("");
                match parse_pence(amount_str) {
                    Ok(amount) => events.push(TouchEvent::TopUp { amount }),
                    Err(e) => errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount '{}': {}", amount_str, e),
                    }),
                }
            }
            "touch_in" | "touch_out" => {
                let station = record.get(2).unwrap_or("").trim();
                if station.is_empty() {
                    errors.push(ImportError {
                        line,
                        field: Some("station".to_string()),
                        error: "Missing station name".to_string(),
                    });
                    continue;
                }

                let zone_str = record.get(3).unwrap_or("");
                let zone: u32 = match zone_str.trim().parse() {
                    Ok(z) => z,
                    Err(_) => {
                        errors.push(ImportError {
                            line,
                            field: Some("zone".to_string()),
                            error: format!("Invalid zone '{}'", zone_str),
                        });
                        continue;
                    }
                };

                let timestamp_str = record.get(4).unwrap_or("").trim();
                let at = if timestamp_str.is_empty() {
                    None
                } else {
                    match parse_timestamp(timestamp_str) {
                        Ok(ts) => Some(ts),
                        Err(e) => {
                            errors.push(ImportError {
                                line,
                                field: Some("timestamp".to_string()),
                                error: format!("Invalid timestamp: {}", e),
                            });
                            continue;
                        }
                    }
                };

                let station = station.to_string();
                events.push(if kind == "touch_in" {
                    TouchEvent::TouchIn { station, zone, at }
                } else {
                    TouchEvent::TouchOut { station, zone, at }
                });
            }
            other => {
                errors.push(ImportError {
                    line,
                    field: Some("event".to_string()),
                    error: format!(
                        "Unknown event '{}'. Valid: top_up, touch_in, touch_out",
                        other
                    ),
                });
            }
        }
    }

    Ok(ImportResult { events, errors })
}

/// Read touch events from a JSON array.
pub fn read_events_json<R: Read>(reader: R) -> Result<Vec<TouchEvent>> {
    let events: Vec<TouchEvent> = serde_json::from_reader(reader)?;
    Ok(events)
}

// Helper function to parse timestamp
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try YYYY-MM-DD format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    anyhow::bail!("Invalid timestamp format: {}", s)
}
