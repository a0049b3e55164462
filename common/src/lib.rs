pub mod debounce;
pub mod description;
pub mod editor;
pub mod errors;
pub mod field;
pub mod model;
pub mod operator;
pub mod preview;
pub mod query_params;
pub mod serializer;
pub mod validation;

pub use debounce::{debounce, Debouncer};
pub use description::{create_filter_description, describe_condition, NO_FILTERS_DESCRIPTION};
pub use errors::FilterError;
pub use field::{FieldCatalog, FieldDescriptor, FieldType};
pub use model::{Condition, FilterConfig, FilterGroup, FilterValue, LogicalOperator, Scalar};
pub use operator::{OperatorDescriptor, OperatorRegistry, ValueType};
pub use preview::{PreviewScheduler, DEFAULT_PREVIEW_DEBOUNCE};
pub use query_params::{convert_filters_to_query_params, filter_hash, QueryParams};
pub use serializer::{decode, encode, from_url_query, to_url_query, FILTERS_QUERY_PARAM};
pub use validation::{has_valid_conditions, validate, validate_against, ValidationResult};

/// Longest encoded filter string `decode` will look at. Shared links are
/// small; anything past this is treated as corrupt.
pub const MAX_ENCODED_FILTER_BYTES: usize = 64 * 1024;
