use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Hex SHA-256 of a run transcript; equal transcripts mean identical runs.
pub fn digest_hex(transcript: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(transcript.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

pub fn report_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,story-walk,  all ");
        assert_eq!(parts, vec!["smoke", "story-walk", "all"]);
    }

    #[test]
    fn digest_is_stable_hex() {
        let a = digest_hex("start>bar");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, digest_hex("start>bar"));
        assert_ne!(a, digest_hex("start>home"));
    }

    #[test]
    fn timestamp_is_utc() {
        assert!(report_timestamp().ends_with('Z'));
    }
}
