use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use survey_model::{QuestionRule, Schema};
use tracing::{debug, info};

use crate::error::{Result, SchemaError};

/// Accepted document roots.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Rules(Vec<QuestionRule>),
    Wrapped { survey_responses: Vec<QuestionRule> },
}

impl SchemaDocument {
    fn into_schema(self) -> Schema {
        match self {
            SchemaDocument::Rules(rules) | SchemaDocument::Wrapped {
                survey_responses: rules,
            } => Schema::new(rules),
        }
    }
}

/// Loads a schema from a YAML file.
///
/// Fails only when the file is missing or unreadable, or when the document
/// is not a sequence of mappings. Rule contents are not validated.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let file = File::open(path).map_err(|e| SchemaError::io(path, e))?;
    let document: SchemaDocument =
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| SchemaError::Parse {
            origin: path.display().to_string(),
            source,
        })?;
    let schema = document.into_schema();
    info!(
        path = %path.display(),
        rule_count = schema.len(),
        "loaded encoding schema"
    );
    Ok(schema)
}

/// Parses a schema from YAML text.
pub fn parse_schema(text: &str) -> Result<Schema> {
    let document: SchemaDocument =
        serde_yaml::from_str(text).map_err(|source| SchemaError::Parse {
            origin: "<inline>".to_string(),
            source,
        })?;
    let schema = document.into_schema();
    debug!(rule_count = schema.len(), "parsed encoding schema");
    Ok(schema)
}
