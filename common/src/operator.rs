use crate::errors::FilterError;
use crate::field::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// Value arity expected by an operator
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueType {
    None,
    Single,
    /// `[from, to]` pair, range semantics
    Double,
    /// Any number of scalars, set-membership semantics
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    pub key: String,
    pub requires_value: bool,
    pub value_type: ValueType,
}

impl OperatorDescriptor {
    pub fn new(key: &str, value_type: ValueType) -> Self {
        Self {
            key: key.to_string(),
            requires_value: value_type != ValueType::None,
            value_type,
        }
    }

    /// Human words for the operator, e.g. "greater than"
    pub fn words(&self) -> String {
        operator_words(&self.key)
    }
}

pub fn operator_words(key: &str) -> String {
    key.replace('_', " ")
}

fn ops(entries: &[(&str, ValueType)]) -> Vec<OperatorDescriptor> {
    entries
        .iter()
        .map(|(key, value_type)| OperatorDescriptor::new(key, *value_type))
        .collect()
}

/// Per-type operator lists. The first entry of each list is the type's default operator.
fn standard_table() -> Vec<(FieldType, Vec<OperatorDescriptor>)> {
    use ValueType::*;
    vec![
        (
            FieldType::Text,
            ops(&[
                ("contains", Single),
                ("not_contains", Single),
                ("equals", Single),
                ("not_equals", Single),
                ("starts_with", Single),
                ("ends_with", Single),
                ("is_empty", None),
                ("is_not_empty", None),
            ]),
        ),
        (
            FieldType::Number,
            ops(&[
                ("equals", Single),
                ("not_equals", Single),
                ("greater_than", Single),
                ("greater_than_or_equal", Single),
                ("less_than", Single),
                ("less_than_or_equal", Single),
                ("between", Double),
                ("is_empty", None),
                ("is_not_empty", None),
            ]),
        ),
        (
            FieldType::Date,
            ops(&[
                ("equals", Single),
                ("before", Single),
                ("after", Single),
                ("between", Double),
                ("in_last_days", Single),
                ("is_empty", None),
                ("is_not_empty", None),
            ]),
        ),
        (
            FieldType::Boolean,
            ops(&[("is_true", None), ("is_false", None)]),
        ),
        (
            FieldType::Select,
            ops(&[
                ("equals", Single),
                ("not_equals", Single),
                ("in", Multiple),
                ("not_in", Multiple),
                ("is_empty", None),
                ("is_not_empty", None),
            ]),
        ),
        (
            FieldType::Relationship,
            ops(&[
                ("equals", Single),
                ("not_equals", Single),
                ("in", Multiple),
                ("not_in", Multiple),
                ("is_empty", None),
                ("is_not_empty", None),
            ]),
        ),
    ]
}

/// Immutable operator lookup tables, passed by reference into the pure functions
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    by_type: HashMap<FieldType, Vec<OperatorDescriptor>>,
    by_key: HashMap<String, OperatorDescriptor>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl OperatorRegistry {
    pub fn standard() -> Self {
        // The built-in table is consistent by construction
        Self::build(standard_table()).unwrap_or_else(|_| Self::empty())
    }

    fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            by_key: HashMap::new(),
        }
    }

    /// Build a registry from caller tables. An operator key shared between
    /// field types must carry the same descriptor everywhere.
    pub fn build(table: Vec<(FieldType, Vec<OperatorDescriptor>)>) -> Result<Self, FilterError> {
        let mut registry = Self::empty();
        for (field_type, operators) in table {
            for op in &operators {
                match registry.by_key.get(&op.key) {
                    Some(existing) if existing != op => {
                        return Err(FilterError::InvalidShape(format!(
                            "operator {} declared with conflicting arity",
                            op.key
                        )));
                    }
                    Some(_) => {}
                    None => {
                        registry.by_key.insert(op.key.clone(), op.clone());
                    }
                }
            }
            registry.by_type.insert(field_type, operators);
        }
        Ok(registry)
    }

    /// Ordered operators valid for a field type; empty if the type has no table
    pub fn operators_for(&self, field_type: FieldType) -> &[OperatorDescriptor] {
        self.by_type
            .get(&field_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn default_operator(&self, field_type: FieldType) -> Option<&OperatorDescriptor> {
        self.operators_for(field_type).first()
    }

    pub fn lookup(&self, key: &str) -> Result<&OperatorDescriptor, FilterError> {
        self.by_key
            .get(key)
            .ok_or_else(|| FilterError::UnknownOperator(key.to_string()))
    }

    pub fn is_valid_for(&self, field_type: FieldType, key: &str) -> bool {
        self.operators_for(field_type).iter().any(|op| op.key == key)
    }
}
