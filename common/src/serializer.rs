//! URL-safe encoding of filter configs.
//!
//! Two stages, each usable on its own: config <-> canonical JSON, and
//! JSON <-> URL-safe base64. [`encode`] and [`decode`] are the boundary
//! functions: they never fail, degrading to `""` and the empty config.

use crate::errors::FilterError;
use crate::model::FilterConfig;
use crate::operator::OperatorRegistry;
use crate::MAX_ENCODED_FILTER_BYTES;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

pub const FILTERS_QUERY_PARAM: &str = "filters";

/// URL-safe alphabet, no padding on output, padding tolerated on input
const URL_SAFE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Canonical JSON of the config with incomplete conditions dropped
pub fn to_canonical_json(config: &FilterConfig) -> Result<String, FilterError> {
    Ok(serde_json::to_string(&config.complete_only())?)
}

/// Parse a JSON document into a config, resolving value shapes and
/// rejecting duplicate ids
pub fn from_json(json: &[u8], operators: &OperatorRegistry) -> Result<FilterConfig, FilterError> {
    let config: FilterConfig = serde_json::from_slice(json)?;
    let config = config.resolve_values(operators);
    config.check_unique_ids()?;
    Ok(config)
}

pub fn encode_base64(json: &str) -> String {
    URL_SAFE_ENGINE.encode(json.as_bytes())
}

pub fn decode_base64(input: &str) -> Result<Vec<u8>, FilterError> {
    if input.len() > MAX_ENCODED_FILTER_BYTES {
        return Err(FilterError::InputTooLarge(input.len()));
    }
    Ok(URL_SAFE_ENGINE.decode(input.as_bytes())?)
}

pub fn try_encode(config: &FilterConfig) -> Result<String, FilterError> {
    Ok(encode_base64(&to_canonical_json(config)?))
}

pub fn try_decode(input: &str, operators: &OperatorRegistry) -> Result<FilterConfig, FilterError> {
    if input.is_empty() {
        return Ok(FilterConfig::empty());
    }
    let json = decode_base64(input)?;
    from_json(&json, operators)
}

/// Encode for sharing. Returns `""` when the config cannot be serialized.
pub fn encode(config: &FilterConfig) -> String {
    match try_encode(config) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!("Failed to encode filter config: {}", e);
            String::new()
        }
    }
}

/// Decode a shared filter string. Corrupt, truncated or foreign input yields
/// the empty config.
pub fn decode(input: &str, operators: &OperatorRegistry) -> FilterConfig {
    match try_decode(input, operators) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "Failed to decode filter string ({} bytes), using empty filter: {}",
                input.len(),
                e
            );
            FilterConfig::empty()
        }
    }
}

/// `filters=<encoded>` query fragment, or `""` when there is nothing to persist.
/// A config without complete conditions leaves the URL clean, so opening the
/// link gives back the empty config.
pub fn to_url_query(config: &FilterConfig) -> String {
    if !config.has_complete_conditions() {
        return String::new();
    }
    let encoded = encode(config);
    if encoded.is_empty() {
        return String::new();
    }
    format!(
        "{}={}",
        FILTERS_QUERY_PARAM,
        urlencoding::encode(&encoded)
    )
}

/// Find the `filters` parameter in a query string (leading `?` optional) and
/// decode it. A missing parameter means the empty config.
pub fn from_url_query(query: &str, operators: &OperatorRegistry) -> FilterConfig {
    let query = query.strip_prefix('?').unwrap_or(query);
    let raw = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == FILTERS_QUERY_PARAM)
        .map(|(_, value)| value);

    let Some(raw) = raw else {
        return FilterConfig::empty();
    };
    match urlencoding::decode(raw) {
        Ok(value) => decode(&value, operators),
        Err(e) => {
            tracing::warn!("Invalid percent-encoding in filters parameter: {}", e);
            FilterConfig::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, FilterGroup, FilterValue, LogicalOperator};

    fn sample() -> FilterConfig {
        FilterConfig::new(vec![
            FilterGroup::new(vec![
                Condition::new("name", "contains", FilterValue::single("Acme")).with_id("c1"),
                Condition::new("revenue", "between", FilterValue::pair(1000i64, 5000i64))
                    .with_id("c2")
                    .with_logic(LogicalOperator::Or),
            ])
            .with_id("g1")
            .with_logic(LogicalOperator::Or),
            FilterGroup::new(vec![
                Condition::new("industry", "in", FilterValue::list(["Technology", "Healthcare"]))
                    .with_id("c3"),
                Condition::new("active", "is_true", FilterValue::None).with_id("c4"),
            ])
            .with_id("g2"),
        ])
        .with_name("Big tech")
        .with_public(true)
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let operators = OperatorRegistry::standard();
        let config = sample();
        let encoded = encode(&config);
        assert!(!encoded.is_empty());
        assert_eq!(decode(&encoded, &operators), config);
    }

    #[test]
    fn test_encoded_is_url_safe() {
        let encoded = encode(&sample());
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_encode_drops_incomplete_conditions_keeps_groups() {
        let operators = OperatorRegistry::standard();
        let config = FilterConfig::new(vec![
            FilterGroup::new(vec![
                Condition::new("name", "contains", FilterValue::single("Acme")),
                Condition::new("name", "", FilterValue::None),
            ]),
            FilterGroup::new(vec![Condition::blank()]),
        ]);
        let decoded = decode(&encode(&config), &operators);
        assert_eq!(decoded.groups.len(), 2);
        assert_eq!(decoded.groups[0].conditions.len(), 1);
        assert!(decoded.groups[1].conditions.is_empty());
        assert_eq!(decoded, config.complete_only());
    }

    #[test]
    fn test_reencoding_is_a_fixed_point() {
        let operators = OperatorRegistry::standard();
        let mut config = sample();
        config.groups[0].conditions.push(Condition::blank());
        let once = encode(&config);
        let twice = encode(&decode(&once, &operators));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_decode_empty_string() {
        assert_eq!(decode("", &OperatorRegistry::standard()), FilterConfig::empty());
    }

    #[test]
    fn test_decode_garbage_is_fail_soft() {
        let operators = OperatorRegistry::standard();
        assert_eq!(decode("not-base64!!!", &operators), FilterConfig::empty());
        assert_eq!(
            decode(&encode_base64("{invalid json"), &operators),
            FilterConfig::empty()
        );
        assert_eq!(
            decode(&encode_base64(r#"{"groups": "nope"}"#), &operators),
            FilterConfig::empty()
        );
        assert_eq!(
            decode(&encode_base64(r#"[1, 2, 3]"#), &operators),
            FilterConfig::empty()
        );
    }

    #[test]
    fn test_try_decode_reports_cause() {
        let operators = OperatorRegistry::standard();
        assert!(matches!(
            try_decode("not-base64!!!", &operators),
            Err(FilterError::InvalidBase64(_))
        ));
        assert!(matches!(
            try_decode(&encode_base64("{invalid json"), &operators),
            Err(FilterError::InvalidJson(_))
        ));
        let oversized = "A".repeat(MAX_ENCODED_FILTER_BYTES + 1);
        assert!(matches!(
            try_decode(&oversized, &operators),
            Err(FilterError::InputTooLarge(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let json = r#"{"groups": [
            {"id": "g", "conditions": [], "logicalOperator": "AND"},
            {"id": "g", "conditions": [], "logicalOperator": "AND"}
        ]}"#;
        let operators = OperatorRegistry::standard();
        assert!(matches!(
            try_decode(&encode_base64(json), &operators),
            Err(FilterError::InvalidShape(_))
        ));
        assert_eq!(decode(&encode_base64(json), &operators), FilterConfig::empty());
    }

    #[test]
    fn test_decode_accepts_padded_input() {
        let operators = OperatorRegistry::standard();
        let json = to_canonical_json(&sample()).unwrap();
        let padded = base64::engine::general_purpose::URL_SAFE.encode(json.as_bytes());
        assert_eq!(decode(&padded, &operators), sample());
    }

    #[test]
    fn test_decode_defaults_optional_keys() {
        let json = r#"{"groups": [{"id": "g", "conditions": [
            {"id": "c", "field": "name", "operator": "contains", "value": "x"}
        ]}]}"#;
        let config = decode(&encode_base64(json), &OperatorRegistry::standard());
        assert_eq!(config.name, "");
        assert!(!config.is_public);
        assert_eq!(config.groups[0].logical_operator, LogicalOperator::And);
        assert_eq!(config.groups[0].conditions[0].value, FilterValue::single("x"));
    }

    #[test]
    fn test_url_query_round_trip() {
        let operators = OperatorRegistry::standard();
        let query = to_url_query(&sample());
        assert!(query.starts_with("filters="));
        let url_query = format!("?page=2&{}&sort=name", query);
        assert_eq!(from_url_query(&url_query, &operators), sample());
    }

    #[test]
    fn test_round_trip_when_shape_disagrees_with_operator() {
        let operators = OperatorRegistry::standard();
        let cases = [
            Condition::new("revenue", "between", FilterValue::list([1i64, 5])),
            Condition::new("revenue", "within", FilterValue::pair(1i64, 5i64)),
            Condition::new("industry", "in", FilterValue::List(vec![])),
            Condition::new("revenue", "between", FilterValue::List(vec![])),
            Condition::new("industry", "in", FilterValue::single("Technology")),
            Condition::new("industry", "in", FilterValue::pair("Retail", "Energy")),
        ];
        for condition in cases {
            let config =
                FilterConfig::new(vec![FilterGroup::new(vec![condition.with_id("c")]).with_id("g")]);
            let encoded = encode(&config);
            let decoded = decode(&encoded, &operators);
            assert_eq!(decoded, config, "round trip of {}", encoded);
            assert_eq!(encode(&decoded), encoded);
        }
    }

    #[test]
    fn test_url_query_empty_when_nothing_to_persist() {
        let operators = OperatorRegistry::standard();
        assert_eq!(to_url_query(&FilterConfig::empty()), "");
        assert_eq!(to_url_query(&FilterConfig::new(vec![])), "");

        let drafts = FilterConfig::new(vec![
            FilterGroup::new(vec![Condition::new("name", "", FilterValue::None)]),
            FilterGroup::new(vec![Condition::blank()]),
        ])
        .with_name("Draft");
        assert_eq!(to_url_query(&drafts), "");
        assert_eq!(from_url_query(&to_url_query(&drafts), &operators), FilterConfig::empty());
    }

    #[test]
    fn test_url_query_missing_or_broken() {
        let operators = OperatorRegistry::standard();
        assert_eq!(from_url_query("?page=2", &operators), FilterConfig::empty());
        assert_eq!(from_url_query("", &operators), FilterConfig::empty());
        assert_eq!(from_url_query("filters=", &operators), FilterConfig::empty());
        assert_eq!(from_url_query("filters=%FF%FE", &operators), FilterConfig::empty());
        assert_eq!(from_url_query("filters=@@@", &operators), FilterConfig::empty());
    }
}
