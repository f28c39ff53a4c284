use crate::error::{CatalogError, SchemaError};
use crate::params::operation::Operator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    #[serde(alias = "numeric")]
    Number,
    Date,
    Enum,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Block {
    pub name: String,
    pub dimensions: Vec<Dimension>,
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Dimension {
    pub name: String,
    pub sql: String,
    pub data_type: DataType,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Measure {
    pub name: String,
    pub sql: String,
}

/// Declares that `field` may be filtered with any of `operators`, with
/// arguments coerced according to `data_type`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub field: String,
    pub operators: Vec<Operator>,
    pub data_type: DataType,
}

impl Constraint {
    pub fn allows(&self, field: &str, operator: Operator) -> bool {
        self.field == field && self.operators.contains(&operator)
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Measure,
    Dimension,
}

/// A selectable field as seen by the parameter parser.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn measure(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Measure,
        }
    }

    pub fn dimension(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Dimension,
        }
    }
}

/// Source of measures, dimensions and filter constraints per block.
pub trait Catalog {
    fn measures(&self, block: &str) -> Result<Vec<Field>, CatalogError>;
    fn dimensions(&self, block: &str) -> Result<Vec<Field>, CatalogError>;
    fn constraints(&self, block: &str) -> Result<Vec<Constraint>, CatalogError>;
}

/// Every block declared in a schema file, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Blocks(HashMap<String, Block>);

impl Blocks {
    pub fn new(blocks: impl IntoIterator<Item = Block>) -> Result<Self, SchemaError> {
        let mut map = HashMap::new();
        for block in blocks {
            if map.contains_key(&block.name) {
                return Err(SchemaError::DuplicateBlock(block.name));
            }
            map.insert(block.name.clone(), block);
        }
        Ok(Self(map))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        let parsed_schema: toml::Value = toml::from_str(content)?;

        let mut blocks = Vec::new();
        if let Some(block_array) = parsed_schema.get("block").and_then(|v| v.as_array()) {
            for block_value in block_array {
                let block: Block = block_value.clone().try_into()?;
                blocks.push(block);
            }
        }
        Self::new(blocks)
    }

    pub fn get(&self, name: &str) -> Option<&Block> {
        self.0.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn as_map(&self) -> &HashMap<String, Block> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn block(&self, name: &str) -> Result<&Block, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownBlock(name.to_owned()))
    }
}

impl Catalog for Blocks {
    fn measures(&self, block: &str) -> Result<Vec<Field>, CatalogError> {
        Ok(self
            .block(block)?
            .measures
            .iter()
            .map(|m| Field::measure(&m.name))
            .collect())
    }

    fn dimensions(&self, block: &str) -> Result<Vec<Field>, CatalogError> {
        Ok(self
            .block(block)?
            .dimensions
            .iter()
            .map(|d| Field::dimension(&d.name))
            .collect())
    }

    fn constraints(&self, block: &str) -> Result<Vec<Constraint>, CatalogError> {
        Ok(self.block(block)?.constraints.clone())
    }
}

/// Reads `[[block]]` definitions from a TOML schema file.
pub fn load_blocks(path: impl AsRef<Path>) -> Result<Blocks, SchemaError> {
    let path = path.as_ref();
    let schema_content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let blocks = Blocks::from_toml_str(&schema_content)?;
    info!(path = %path.display(), blocks = blocks.len(), "loaded schema");
    Ok(blocks)
}
