use crate::errors::FilterError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use strum::{Display, EnumIter, EnumString};

/// Declared type of a filterable field. Selects the operator set.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Relationship,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Related entity for relationship fields, e.g. "contact"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(key: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            entity: None,
            options: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: &str) -> Self {
        self.entity = Some(entity.to_string());
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    fields: Vec<FieldDescriptor>,
}

/// Caller-supplied field metadata, indexed by key. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<FieldDescriptor>,
    by_key: HashMap<String, usize>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, FilterError> {
        let mut by_key = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            if field.key.is_empty() {
                return Err(FilterError::InvalidShape(format!(
                    "field #{} has an empty key",
                    idx + 1
                )));
            }
            if by_key.insert(field.key.clone(), idx).is_some() {
                return Err(FilterError::InvalidShape(format!(
                    "duplicate field key: {}",
                    field.key
                )));
            }
        }
        Ok(Self { fields, by_key })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, FilterError> {
        let file: CatalogFile = serde_yaml_ng::from_str(yaml)?;
        Self::new(file.fields)
    }

    pub fn from_json_str(json: &str) -> Result<Self, FilterError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.fields)
    }

    /// Load a catalog file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        let content = fs_err::read_to_string(path)?;
        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        tracing::debug!(
            "Loaded {} fields from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.by_key.get(key).map(|idx| &self.fields[*idx])
    }

    /// Display label for a field key, falling back to the key itself
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|f| f.label.as_str()).unwrap_or(key)
    }

    pub fn field_type(&self, key: &str) -> Option<FieldType> {
        self.get(key).map(|f| f.field_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
