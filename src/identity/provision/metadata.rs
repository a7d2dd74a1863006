//! Record id and token metadata derivation.
//!
//! Record ids are time-derived (Unix milliseconds as a decimal string) and
//! assigned once at creation. The token metadata URI is a pure function of the
//! record id, so record and token can be re-linked from either side.

/// Base URL under which token metadata documents are served
pub const METADATA_BASE_URL: &str = "https://metadata.soulbound.id/api/token";

/// Generate a fresh time-derived record id.
pub fn generate_record_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Derive the metadata URI for the token referencing `record_id`.
pub fn metadata_uri(record_id: &str) -> String {
    format!("{}/{}.json", METADATA_BASE_URL, record_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_uri_is_deterministic() {
        assert_eq!(metadata_uri("1700000000000"), metadata_uri("1700000000000"));
        assert_eq!(
            metadata_uri("1700000000000"),
            "https://metadata.soulbound.id/api/token/1700000000000.json"
        );
    }

    #[test]
    fn record_ids_are_decimal_millis() {
        let id = generate_record_id();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_digit()));
        // 2001-09-09 in millis has 13 digits; anything shorter means seconds
        assert!(id.len() >= 13);
    }
}
