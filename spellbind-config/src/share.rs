//! Share strings: base64 of a configuration's JSON.
//!
//! No compression is applied, so a share string decodes with any standard
//! base64 tool.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::configuration::Configuration;
use crate::error::StoreError;

/// Encode a configuration for out-of-band sharing.
pub fn encode_share_string(configuration: &Configuration) -> Result<String, StoreError> {
    let json = serde_json::to_string(configuration)
        .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Decode a share string back into a configuration.
///
/// Surrounding whitespace (and line breaks inserted by chat clients) is ignored.
pub fn decode_share_string(share: &str) -> Result<Configuration, StoreError> {
    let compact: String = share.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(StoreError::InvalidShareString("share string is empty".to_string()));
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::InvalidShareString(format!("not valid base64: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| StoreError::InvalidShareString(format!("not valid UTF-8: {e}")))?;

    Configuration::from_json(&json).map_err(|e| match e {
        StoreError::InvalidFormat(msg) => StoreError::InvalidShareString(msg),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_base64() {
        let result = decode_share_string("this is *not* base64!");
        assert!(matches!(result, Err(StoreError::InvalidShareString(_))));
    }

    #[test]
    fn test_rejects_base64_of_non_json() {
        let share = STANDARD.encode("hello world");
        let result = decode_share_string(&share);
        assert!(matches!(result, Err(StoreError::InvalidShareString(_))));
    }

    #[test]
    fn test_rejects_json_without_required_fields() {
        let share = STANDARD.encode(r#"{"description":"x"}"#);
        let result = decode_share_string(&share);
        assert!(matches!(result, Err(StoreError::InvalidShareString(_))));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            decode_share_string("   "),
            Err(StoreError::InvalidShareString(_))
        ));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let configuration = Configuration::builder("Raid")
            .expansion("Classic")
            .class_name("Mage")
            .build();
        let share = encode_share_string(&configuration).unwrap();
        let wrapped = format!("  {}\n{}  ", &share[..10], &share[10..]);

        let decoded = decode_share_string(&wrapped).unwrap();
        assert_eq!(decoded, configuration);
    }
}
