//! Loading badge definitions from a directory of JSON files.

use std::path::Path;

use tracing::warn;

use crate::EngineError;
use laurel_events::{validate_identifier, BadgeDefinition};

/// Load every `*.json` badge definition under `dir`, sorted by identifier.
///
/// Files that fail to parse are skipped with a warning so one bad file
/// does not hide the rest. An absent directory, or one with no usable
/// definitions, is an error.
pub fn load_definitions(dir: &Path) -> Result<Vec<BadgeDefinition>, EngineError> {
    let entries = std::fs::read_dir(dir).map_err(|_| EngineError::NoDefinitions {
        dir: dir.to_path_buf(),
    })?;

    let mut definitions = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_definition(&path) {
            Ok(def) => definitions.push(def),
            Err(reason) => warn!(file = %path.display(), "skipping definition: {reason}"),
        }
    }

    if definitions.is_empty() {
        return Err(EngineError::NoDefinitions {
            dir: dir.to_path_buf(),
        });
    }
    definitions.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    Ok(definitions)
}

fn read_definition(path: &Path) -> Result<BadgeDefinition, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let def: BadgeDefinition = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
    validate_identifier(&def.identifier).map_err(|e| e.to_string())?;
    Ok(def)
}
