use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as an RFC 3339 string with millisecond precision
///
/// Used for the `timestamp` field of error bodies.
pub fn now_rfc3339() -> String {
    now_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_rfc3339_is_parseable_utc() {
        let s = now_rfc3339();
        assert!(s.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&s).is_ok());
    }
}
