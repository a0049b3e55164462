//! Filter expression value objects.
//!
//! A [`FilterConfig`] is an ordered list of [`FilterGroup`]s, each an ordered
//! list of [`Condition`]s. Values are never mutated in place by this crate;
//! every edit produces a new config (see [`crate::editor`]).

use crate::errors::FilterError;
use crate::operator::{OperatorRegistry, ValueType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use strum::{Display, EnumString};

pub const EMPTY_GROUP_ID: &str = "group-1";
pub const EMPTY_CONDITION_ID: &str = "condition-1";

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND")]
    #[strum(serialize = "AND")]
    And,
    #[serde(rename = "OR")]
    #[strum(serialize = "OR")]
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Scalar {
    /// `None` for NaN and infinities, which have no JSON representation
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Scalar::Number)
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Condition value, shaped by the operator's [`ValueType`]
#[derive(Debug, Clone, Default, Eq)]
pub enum FilterValue {
    #[default]
    None,
    Single(Scalar),
    Pair(Scalar, Scalar),
    List(Vec<Scalar>),
}

/// `Pair(a, b)` and `List([a, b])` share one JSON form, so they compare equal.
impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FilterValue::None, FilterValue::None) => true,
            (FilterValue::Single(a), FilterValue::Single(b)) => a == b,
            (FilterValue::Pair(a1, a2), FilterValue::Pair(b1, b2)) => a1 == b1 && a2 == b2,
            (FilterValue::List(a), FilterValue::List(b)) => a == b,
            (FilterValue::Pair(from, to), FilterValue::List(items))
            | (FilterValue::List(items), FilterValue::Pair(from, to)) => {
                matches!(items.as_slice(), [a, b] if a == from && b == to)
            }
            _ => false,
        }
    }
}

impl FilterValue {
    pub fn single(value: impl Into<Scalar>) -> Self {
        FilterValue::Single(value.into())
    }

    pub fn pair(from: impl Into<Scalar>, to: impl Into<Scalar>) -> Self {
        FilterValue::Pair(from.into(), to.into())
    }

    pub fn list<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FilterValue::None)
    }

    /// Whether this value has the shape an operator of `value_type` expects.
    /// A two-element list counts as a range.
    pub fn fits(&self, value_type: ValueType) -> bool {
        match (self, value_type) {
            (FilterValue::List(items), ValueType::Double) => items.len() == 2,
            _ => matches!(
                (self, value_type),
                (FilterValue::None, ValueType::None)
                    | (FilterValue::Single(_), ValueType::Single)
                    | (FilterValue::Pair(_, _), ValueType::Double)
                    | (FilterValue::List(_), ValueType::Multiple)
                    | (FilterValue::Pair(_, _), ValueType::Multiple)
            ),
        }
    }

    /// Reshape a value for an operator of `value_type`, keeping what can be kept
    pub fn coerce(self, value_type: ValueType) -> Self {
        match (self, value_type) {
            (_, ValueType::None) => FilterValue::None,
            (FilterValue::List(mut items), ValueType::Double) if items.len() == 2 => {
                let to = items.pop();
                let from = items.pop();
                match (from, to) {
                    (Some(from), Some(to)) => FilterValue::Pair(from, to),
                    _ => FilterValue::None,
                }
            }
            (FilterValue::Pair(from, to), ValueType::Multiple) => FilterValue::List(vec![from, to]),
            (FilterValue::Single(s), ValueType::Multiple) => FilterValue::List(vec![s]),
            (FilterValue::List(mut items), ValueType::Single) if items.len() == 1 => {
                items.pop().map(FilterValue::Single).unwrap_or_default()
            }
            (value, value_type) if value.fits(value_type) => value,
            _ => FilterValue::None,
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::None => serializer.serialize_none(),
            FilterValue::Single(scalar) => scalar.serialize(serializer),
            FilterValue::Pair(from, to) => [from, to].serialize(serializer),
            FilterValue::List(items) => items.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// Structural decode: arrays always come back as `List`; `resolve_values`
/// turns them into `Pair`s where the operator asks for a range.
impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<ValueRepr>::deserialize(deserializer)? {
            None => FilterValue::None,
            Some(ValueRepr::Scalar(scalar)) => FilterValue::Single(scalar),
            Some(ValueRepr::List(items)) => FilterValue::List(items),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: FilterValue,
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl Condition {
    pub fn new(field: &str, operator: &str, value: FilterValue) -> Self {
        Self {
            id: new_id(),
            field: field.to_string(),
            operator: operator.to_string(),
            value,
            logical_operator: LogicalOperator::And,
        }
    }

    pub fn blank() -> Self {
        Self::new("", "", FilterValue::None)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_logic(mut self, logical_operator: LogicalOperator) -> Self {
        self.logical_operator = logical_operator;
        self
    }

    /// Both field and operator chosen; only complete conditions are persisted or sent
    pub fn is_complete(&self) -> bool {
        !self.field.is_empty() && !self.operator.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    pub id: String,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterGroup {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self {
            id: new_id(),
            conditions,
            logical_operator: LogicalOperator::And,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_logic(mut self, logical_operator: LogicalOperator) -> Self {
        self.logical_operator = logical_operator;
        self
    }

    pub fn complete_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().filter(|c| c.is_complete())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub groups: Vec<FilterGroup>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl FilterConfig {
    /// One group holding one blank condition. Ids are fixed so that two empty
    /// configs compare equal.
    pub fn empty() -> Self {
        Self {
            groups: vec![FilterGroup {
                id: EMPTY_GROUP_ID.to_string(),
                conditions: vec![Condition::blank().with_id(EMPTY_CONDITION_ID)],
                logical_operator: LogicalOperator::And,
            }],
            name: String::new(),
            is_public: false,
        }
    }

    pub fn new(groups: Vec<FilterGroup>) -> Self {
        Self {
            groups,
            name: String::new(),
            is_public: false,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Copy keeping only complete conditions. Groups are kept even if they end up empty.
    pub fn complete_only(&self) -> Self {
        Self {
            groups: self
                .groups
                .iter()
                .map(|group| FilterGroup {
                    id: group.id.clone(),
                    conditions: group.complete_conditions().cloned().collect(),
                    logical_operator: group.logical_operator,
                })
                .collect(),
            name: self.name.clone(),
            is_public: self.is_public,
        }
    }

    pub fn has_complete_conditions(&self) -> bool {
        self.groups
            .iter()
            .any(|group| group.conditions.iter().any(Condition::is_complete))
    }

    pub fn condition_count(&self) -> usize {
        self.groups.iter().map(|g| g.conditions.len()).sum()
    }

    /// Reshape structurally decoded values according to each condition's
    /// operator. Unknown operators keep the structural shape.
    pub fn resolve_values(self, operators: &OperatorRegistry) -> Self {
        let groups = self
            .groups
            .into_iter()
            .map(|group| FilterGroup {
                conditions: group
                    .conditions
                    .into_iter()
                    .map(|condition| match operators.lookup(&condition.operator) {
                        Ok(op) => {
                            let value_type = op.value_type;
                            Condition {
                                value: resolve_value(condition.value, value_type),
                                ..condition
                            }
                        }
                        Err(_) => {
                            if condition.is_complete() {
                                tracing::debug!(
                                    "Keeping structural value for unknown operator {}",
                                    condition.operator
                                );
                            }
                            condition
                        }
                    })
                    .collect(),
                ..group
            })
            .collect();
        Self { groups, ..self }
    }

    /// Group ids unique within the config, condition ids unique within their group
    pub fn check_unique_ids(&self) -> Result<(), FilterError> {
        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(FilterError::InvalidShape(format!(
                    "duplicate group id: {}",
                    group.id
                )));
            }
            let mut condition_ids = HashSet::new();
            for condition in &group.conditions {
                if !condition_ids.insert(condition.id.as_str()) {
                    return Err(FilterError::InvalidShape(format!(
                        "duplicate condition id: {}",
                        condition.id
                    )));
                }
            }
        }
        Ok(())
    }
}

// Only arrays are reinterpreted; a scalar stays a scalar even when the
// operator expects something else, so strict validation can still report it.
fn resolve_value(value: FilterValue, value_type: ValueType) -> FilterValue {
    match (&value, value_type) {
        (FilterValue::List(items), ValueType::Double) if items.len() == 2 => {
            value.coerce(ValueType::Double)
        }
        _ => value,
    }
}
