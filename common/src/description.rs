use crate::field::FieldCatalog;
use crate::model::{Condition, FilterConfig, FilterValue, LogicalOperator, Scalar};
use crate::operator::operator_words;

pub const NO_FILTERS_DESCRIPTION: &str = "No filters applied";

fn join_scalars<'a>(items: impl IntoIterator<Item = &'a Scalar>) -> String {
    items
        .into_iter()
        .map(Scalar::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Scalars are quoted; ranges and lists are joined with "and" and left unquoted
fn describe_value(value: &FilterValue) -> Option<String> {
    match value {
        FilterValue::None => None,
        FilterValue::Single(scalar) => Some(format!("\"{}\"", scalar)),
        FilterValue::Pair(from, to) => Some(join_scalars([from, to])),
        FilterValue::List(items) if items.is_empty() => None,
        FilterValue::List(items) => Some(join_scalars(items)),
    }
}

pub fn describe_condition(condition: &Condition, catalog: &FieldCatalog) -> String {
    let label = catalog.label_for(&condition.field);
    let words = operator_words(&condition.operator);
    match describe_value(&condition.value) {
        Some(value) => format!("{} {} {}", label, words, value),
        None => format!("{} {}", label, words),
    }
}

/// Human-readable summary in storage order. Conditions after the first carry
/// their own logical operator; groups after the first carry the previous
/// group's. Unknown fields are shown by key.
pub fn create_filter_description(config: &FilterConfig, catalog: &FieldCatalog) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut previous_group_logic: Option<LogicalOperator> = None;

    for group in &config.groups {
        let mut rendered_in_group = false;
        for condition in group.complete_conditions() {
            if rendered_in_group {
                parts.push(condition.logical_operator.to_string());
            } else if let Some(logic) = previous_group_logic {
                parts.push(logic.to_string());
            }
            parts.push(describe_condition(condition, catalog));
            rendered_in_group = true;
        }
        if rendered_in_group {
            previous_group_logic = Some(group.logical_operator);
        }
    }

    if parts.is_empty() {
        NO_FILTERS_DESCRIPTION.to_string()
    } else {
        parts.join(" ")
    }
}
