use crate::errors::FilterError;
use crate::model::FilterConfig;
use crate::serializer::to_canonical_json;
use crate::validation::has_valid_conditions;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest
pub const FILTER_HASH_LEN: usize = 16;

/// Transport parameters for the remote search/preview endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_filters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_hash: Option<String>,
}

impl QueryParams {
    pub fn is_empty(&self) -> bool {
        self.advanced_filters.is_none() && self.filter_hash.is_none()
    }

    /// Request parameter pairs, in a fixed order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(filters) = &self.advanced_filters {
            pairs.push(("advancedFilters", filters.clone()));
        }
        if let Some(hash) = &self.filter_hash {
            pairs.push(("filterHash", hash.clone()));
        }
        pairs
    }
}

/// Deterministic, process-independent fingerprint of a serialized filter
pub fn filter_hash(canonical_json: &str) -> String {
    let digest = Sha256::digest(canonical_json.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(FILTER_HASH_LEN);
    hash
}

pub fn try_convert_filters_to_query_params(
    config: &FilterConfig,
) -> Result<QueryParams, FilterError> {
    if !has_valid_conditions(config) {
        return Ok(QueryParams::default());
    }
    let json = to_canonical_json(config)?;
    let hash = filter_hash(&json);
    Ok(QueryParams {
        advanced_filters: Some(json),
        filter_hash: Some(hash),
    })
}

/// Emits nothing unless at least one condition is complete
pub fn convert_filters_to_query_params(config: &FilterConfig) -> QueryParams {
    try_convert_filters_to_query_params(config).unwrap_or_else(|e| {
        tracing::warn!("Failed to convert filters to query params: {}", e);
        QueryParams::default()
    })
}

/// Hash the caller should compare preview responses against, `None` when
/// the config would send no filters
pub fn current_filter_hash(config: &FilterConfig) -> Option<String> {
    convert_filters_to_query_params(config).filter_hash
}
