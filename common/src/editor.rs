//! Edits on a filter config. Every operation takes the current config and
//! returns a whole new one; callers swap it in, so nobody observes a half
//! applied edit.

use crate::errors::FilterError;
use crate::field::FieldCatalog;
use crate::model::{Condition, FilterConfig, FilterGroup, FilterValue, LogicalOperator};
use crate::operator::OperatorRegistry;

fn group_index(config: &FilterConfig, group_id: &str) -> Result<usize, FilterError> {
    config
        .groups
        .iter()
        .position(|g| g.id == group_id)
        .ok_or_else(|| FilterError::GroupNotFound(group_id.to_string()))
}

fn condition_index(group: &FilterGroup, condition_id: &str) -> Result<usize, FilterError> {
    group
        .conditions
        .iter()
        .position(|c| c.id == condition_id)
        .ok_or_else(|| FilterError::ConditionNotFound(condition_id.to_string()))
}

fn replace_condition<F>(
    config: &FilterConfig,
    group_id: &str,
    condition_id: &str,
    edit: F,
) -> Result<FilterConfig, FilterError>
where
    F: FnOnce(&Condition) -> Result<Condition, FilterError>,
{
    let gi = group_index(config, group_id)?;
    let ci = condition_index(&config.groups[gi], condition_id)?;
    let replacement = edit(&config.groups[gi].conditions[ci])?;

    let mut next = config.clone();
    next.groups[gi].conditions[ci] = replacement;
    Ok(next)
}

pub fn reset() -> FilterConfig {
    FilterConfig::empty()
}

/// Append a group holding one blank condition
pub fn add_group(config: &FilterConfig) -> FilterConfig {
    let mut next = config.clone();
    next.groups.push(FilterGroup::new(vec![Condition::blank()]));
    next
}

/// Removing the last group leaves the empty config
pub fn remove_group(config: &FilterConfig, group_id: &str) -> Result<FilterConfig, FilterError> {
    let gi = group_index(config, group_id)?;
    let mut next = config.clone();
    next.groups.remove(gi);
    if next.groups.is_empty() {
        return Ok(FilterConfig {
            name: next.name,
            is_public: next.is_public,
            ..FilterConfig::empty()
        });
    }
    Ok(next)
}

pub fn add_condition(config: &FilterConfig, group_id: &str) -> Result<FilterConfig, FilterError> {
    let gi = group_index(config, group_id)?;
    let mut next = config.clone();
    next.groups[gi].conditions.push(Condition::blank());
    Ok(next)
}

/// Removing the last condition of a group removes the group
pub fn remove_condition(
    config: &FilterConfig,
    group_id: &str,
    condition_id: &str,
) -> Result<FilterConfig, FilterError> {
    let gi = group_index(config, group_id)?;
    let ci = condition_index(&config.groups[gi], condition_id)?;
    if config.groups[gi].conditions.len() == 1 {
        return remove_group(config, group_id);
    }
    let mut next = config.clone();
    next.groups[gi].conditions.remove(ci);
    Ok(next)
}

/// Select a field. The operator survives only if it is valid for the new
/// field's type; otherwise it becomes the type's default and the value is cleared.
pub fn set_field(
    config: &FilterConfig,
    group_id: &str,
    condition_id: &str,
    field_key: &str,
    catalog: &FieldCatalog,
    operators: &OperatorRegistry,
) -> Result<FilterConfig, FilterError> {
    replace_condition(config, group_id, condition_id, |current| {
        if field_key.is_empty() {
            return Ok(Condition {
                field: String::new(),
                operator: String::new(),
                value: FilterValue::None,
                ..current.clone()
            });
        }

        let field_type = catalog
            .field_type(field_key)
            .ok_or_else(|| FilterError::UnknownField(field_key.to_string()))?;

        if !current.operator.is_empty() && operators.is_valid_for(field_type, &current.operator) {
            return Ok(Condition {
                field: field_key.to_string(),
                ..current.clone()
            });
        }

        let operator = operators
            .default_operator(field_type)
            .map(|op| op.key.clone())
            .unwrap_or_default();
        tracing::debug!(
            "Field {} selected, operator reset from {:?} to {:?}",
            field_key,
            current.operator,
            operator
        );
        Ok(Condition {
            field: field_key.to_string(),
            operator,
            value: FilterValue::None,
            ..current.clone()
        })
    })
}

/// Select an operator, reshaping the current value to its arity
pub fn set_operator(
    config: &FilterConfig,
    group_id: &str,
    condition_id: &str,
    operator_key: &str,
    catalog: &FieldCatalog,
    operators: &OperatorRegistry,
) -> Result<FilterConfig, FilterError> {
    let op = operators.lookup(operator_key)?;
    replace_condition(config, group_id, condition_id, |current| {
        if let Some(field_type) = catalog.field_type(&current.field) {
            if !operators.is_valid_for(field_type, operator_key) {
                return Err(FilterError::OperatorNotAllowed(
                    operator_key.to_string(),
                    field_type,
                ));
            }
        }
        Ok(Condition {
            operator: op.key.clone(),
            value: current.value.clone().coerce(op.value_type),
            ..current.clone()
        })
    })
}

pub fn set_value(
    config: &FilterConfig,
    group_id: &str,
    condition_id: &str,
    value: FilterValue,
) -> Result<FilterConfig, FilterError> {
    replace_condition(config, group_id, condition_id, |current| {
        Ok(Condition {
            value,
            ..current.clone()
        })
    })
}

pub fn set_condition_logic(
    config: &FilterConfig,
    group_id: &str,
    condition_id: &str,
    logical_operator: LogicalOperator,
) -> Result<FilterConfig, FilterError> {
    replace_condition(config, group_id, condition_id, |current| {
        Ok(current.clone().with_logic(logical_operator))
    })
}

pub fn set_group_logic(
    config: &FilterConfig,
    group_id: &str,
    logical_operator: LogicalOperator,
) -> Result<FilterConfig, FilterError> {
    let gi = group_index(config, group_id)?;
    let mut next = config.clone();
    next.groups[gi].logical_operator = logical_operator;
    Ok(next)
}

pub fn rename(config: &FilterConfig, name: &str) -> FilterConfig {
    config.clone().with_name(name)
}

pub fn set_public(config: &FilterConfig, is_public: bool) -> FilterConfig {
    config.clone().with_public(is_public)
}
