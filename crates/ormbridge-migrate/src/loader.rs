//! Blueprint files.
//!
//! A blueprint file holds either one blueprint object or an array of them,
//! applied in order.

use std::path::Path;

use ormbridge_contracts::Blueprint;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

#[derive(Deserialize)]
#[serde(untagged)]
enum BlueprintFile {
    Many(Vec<Blueprint>),
    One(Blueprint),
}

/// Parses blueprints from JSON text.
///
/// # Errors
///
/// Returns [`MigrateError::Serialization`](crate::MigrateError::Serialization)
/// when the text is neither a blueprint nor an array of blueprints.
pub fn parse_blueprints(json: &str) -> Result<Vec<Blueprint>> {
    Ok(match serde_json::from_str(json)? {
        BlueprintFile::Many(blueprints) => blueprints,
        BlueprintFile::One(blueprint) => vec![blueprint],
    })
}

/// Reads blueprints from a JSON file.
///
/// # Errors
///
/// Returns an IO error when the file cannot be read, or a serialization
/// error when it does not hold blueprints.
pub fn load_blueprints(path: &Path) -> Result<Vec<Blueprint>> {
    debug!(path = %path.display(), "Loading blueprints");
    parse_blueprints(&std::fs::read_to_string(path)?)
}
