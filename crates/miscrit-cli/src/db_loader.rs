//! Entity database loading.
//!
//! Reads the JSON database file and builds the base roster from it.

use std::fs;
use std::path::Path;

use miscrit_calc::Roster;
use miscrit_common::{LoadError, LoadResult};
use serde_json::Value;
use tracing::{debug, info};

/// Build a roster from database JSON text.
///
/// Well-formed JSON of an unrecognized shape is rejected, so a wrong file
/// is reported instead of producing an empty calculator.
pub fn parse_database(contents: &str) -> LoadResult<Roster> {
    let payload: Value = serde_json::from_str(contents)?;
    let recognized = payload.is_array()
        || payload
            .get(miscrit_calc::roster::PAYLOAD_LIST_KEY)
            .is_some_and(Value::is_array);
    if !recognized {
        return Err(LoadError::InvalidPayload(
            "expected a list or an object with a \"miscrits\" list".to_string(),
        ));
    }

    let roster = Roster::from_payload(&payload);
    debug!("Parsed {} miscrits", roster.len());
    Ok(roster)
}

/// Load the base roster from a database file.
pub fn load_database<P: AsRef<Path>>(path: P) -> LoadResult<Roster> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let roster = parse_database(&contents)?;
    info!("Loaded {} miscrits from {}", roster.len(), path.display());
    Ok(roster)
}
