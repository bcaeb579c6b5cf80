use chrono::NaiveTime;

/// Parses a strict 24-hour `HH:MM` string. `9:00` and `09:00:00` are rejected.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let bytes = raw.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

pub fn format_clock_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter keeping `NaiveTime` fields in `HH:MM` form on the wire.
pub mod hhmm {
    use super::{format_clock_time, parse_clock_time};
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_clock_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_clock_time(&raw).ok_or_else(|| D::Error::custom(format!("expected HH:MM, got '{}'", raw)))
    }
}
