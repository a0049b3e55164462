use crate::field::FieldCatalog;
use crate::model::{FilterConfig, FilterValue};
use crate::operator::{OperatorRegistry, ValueType};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Structural checks. All rules run; errors accumulate in rule order.
/// Values are not checked, an in-progress condition may have none yet.
pub fn validate(config: &FilterConfig) -> ValidationResult {
    ValidationResult::from_errors(structural_errors(config))
}

fn structural_errors(config: &FilterConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.groups.is_empty() {
        errors.push("At least one filter group is required".to_string());
    }

    for (gi, group) in config.groups.iter().enumerate() {
        let group_no = gi + 1;
        if group.conditions.is_empty() {
            errors.push(format!(
                "Group {} must have at least one condition",
                group_no
            ));
        }
        for (ci, condition) in group.conditions.iter().enumerate() {
            let condition_no = ci + 1;
            if condition.field.is_empty() {
                errors.push(format!(
                    "Group {}, Condition {}: Field is required",
                    group_no, condition_no
                ));
            }
            if condition.operator.is_empty() {
                errors.push(format!(
                    "Group {}, Condition {}: Operator is required",
                    group_no, condition_no
                ));
            }
        }
    }

    errors
}

/// Gates apply/save: true when at least one condition is complete
pub fn has_valid_conditions(config: &FilterConfig) -> bool {
    config.has_complete_conditions()
}

/// Structural checks plus the model invariants that need the catalogs:
/// known fields, operators valid for the field type, value arity and id uniqueness.
pub fn validate_against(
    config: &FilterConfig,
    catalog: &FieldCatalog,
    operators: &OperatorRegistry,
) -> ValidationResult {
    let mut errors = structural_errors(config);

    let mut group_ids = HashSet::new();
    for (gi, group) in config.groups.iter().enumerate() {
        let group_no = gi + 1;
        if !group_ids.insert(group.id.as_str()) {
            errors.push(format!("Group {}: Duplicate group id {}", group_no, group.id));
        }

        let mut condition_ids = HashSet::new();
        for (ci, condition) in group.conditions.iter().enumerate() {
            let prefix = format!("Group {}, Condition {}", group_no, ci + 1);
            if !condition_ids.insert(condition.id.as_str()) {
                errors.push(format!("{}: Duplicate condition id {}", prefix, condition.id));
            }
            if !condition.is_complete() {
                continue;
            }

            let Some(field_type) = catalog.field_type(&condition.field) else {
                errors.push(format!("{}: Unknown field {}", prefix, condition.field));
                continue;
            };
            if !operators.is_valid_for(field_type, &condition.operator) {
                errors.push(format!(
                    "{}: Operator {} is not valid for {} fields",
                    prefix, condition.operator, field_type
                ));
                continue;
            }
            let op = match operators.lookup(&condition.operator) {
                Ok(op) => op,
                Err(e) => {
                    errors.push(format!("{}: {}", prefix, e));
                    continue;
                }
            };

            match (op.value_type, &condition.value) {
                (ValueType::None, FilterValue::None) => {}
                (ValueType::None, _) => errors.push(format!(
                    "{}: Operator {} does not take a value",
                    prefix, op.key
                )),
                // Missing values are allowed while editing
                (_, FilterValue::None) => {}
                (ValueType::Double, value) if !value.fits(ValueType::Double) => {
                    errors.push(format!(
                        "{}: Operator {} requires a [from, to] range",
                        prefix, op.key
                    ))
                }
                (value_type, value) if !value.fits(value_type) => errors.push(format!(
                    "{}: Value does not match operator {}",
                    prefix, op.key
                )),
                _ => {}
            }
        }
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, FieldType};
    use crate::model::{Condition, FilterGroup};

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDescriptor::new("name", "Company Name", FieldType::Text),
            FieldDescriptor::new("revenue", "Revenue", FieldType::Number),
            FieldDescriptor::new("industry", "Industry", FieldType::Select),
        ])
        .unwrap()
    }

    #[test]
    fn test_zero_groups() {
        let result = validate(&FilterConfig::new(vec![]));
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["At least one filter group is required"]);
    }

    #[test]
    fn test_empty_config_reports_condition_errors() {
        let result = validate(&FilterConfig::empty());
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                "Group 1, Condition 1: Field is required",
                "Group 1, Condition 1: Operator is required",
            ]
        );
    }

    #[test]
    fn test_errors_accumulate_in_order() {
        let config = FilterConfig::new(vec![
            FilterGroup::new(vec![
                Condition::new("name", "contains", FilterValue::single("Acme")),
                Condition::new("name", "", FilterValue::None),
            ]),
            FilterGroup::new(vec![]),
            FilterGroup::new(vec![Condition::new("", "equals", FilterValue::None)]),
        ]);
        let result = validate(&config);
        assert_eq!(
            result.errors,
            vec![
                "Group 1, Condition 2: Operator is required",
                "Group 2 must have at least one condition",
                "Group 3, Condition 1: Field is required",
            ]
        );
    }

    #[test]
    fn test_missing_value_is_not_an_error() {
        let config = FilterConfig::new(vec![FilterGroup::new(vec![Condition::new(
            "name",
            "contains",
            FilterValue::None,
        )])]);
        assert!(validate(&config).is_valid);
    }

    #[test]
    fn test_has_valid_conditions() {
        assert!(!has_valid_conditions(&FilterConfig::empty()));
        assert!(!has_valid_conditions(&FilterConfig::new(vec![])));
        let config = FilterConfig::new(vec![
            FilterGroup::new(vec![Condition::blank()]),
            FilterGroup::new(vec![
                Condition::blank(),
                Condition::new("name", "is_empty", FilterValue::None),
            ]),
        ]);
        assert!(has_valid_conditions(&config));
        // Drafts with incomplete rows still enable apply
        assert!(!validate(&config).is_valid);
    }

    #[test]
    fn test_strict_validation_checks_invariants() {
        let config = FilterConfig::new(vec![FilterGroup::new(vec![
            Condition::new("name", "between", FilterValue::pair(1i64, 2i64)),
            Condition::new("revenue", "between", FilterValue::single(5i64)),
            Condition::new("revenue", "is_empty", FilterValue::single(5i64)),
            Condition::new("owner", "equals", FilterValue::single("me")),
            Condition::new("industry", "in", FilterValue::list(["Tech"])),
            Condition::new("revenue", "between", FilterValue::None),
        ])]);
        let result = validate_against(&config, &catalog(), &OperatorRegistry::standard());
        assert_eq!(
            result.errors,
            vec![
                "Group 1, Condition 1: Operator between is not valid for text fields",
                "Group 1, Condition 2: Operator between requires a [from, to] range",
                "Group 1, Condition 3: Operator is_empty does not take a value",
                "Group 1, Condition 4: Unknown field owner",
            ]
        );
    }

    #[test]
    fn test_strict_validation_reports_duplicate_ids() {
        let config = FilterConfig::new(vec![FilterGroup::new(vec![
            Condition::new("name", "contains", FilterValue::single("a")).with_id("dup"),
            Condition::new("name", "contains", FilterValue::single("b")).with_id("dup"),
        ])]);
        let result = validate_against(&config, &catalog(), &OperatorRegistry::standard());
        assert_eq!(
            result.errors,
            vec!["Group 1, Condition 2: Duplicate condition id dup"]
        );
    }

    #[test]
    fn test_strict_validation_accepts_well_formed_config() {
        let config = FilterConfig::new(vec![FilterGroup::new(vec![
            Condition::new("name", "contains", FilterValue::single("Acme")),
            Condition::new("revenue", "between", FilterValue::pair(1i64, 10i64)),
            Condition::new("industry", "not_in", FilterValue::list(["Retail", "Energy"])),
        ])]);
        let result = validate_against(&config, &catalog(), &OperatorRegistry::standard());
        assert!(result.is_valid, "{:?}", result.errors);
    }
}
