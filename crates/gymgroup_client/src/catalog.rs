//! Static gym-name → branch-id catalog.

use crate::GymClientError;
use std::collections::BTreeMap;
use std::path::Path;

/// Load the catalog from a JSON object file: `{"Gym name": "branch-id", ...}`.
///
/// The path is supplied by the caller rather than derived from a process-wide
/// root directory. Missing or malformed files propagate the underlying
/// I/O or parse failure.
pub fn load_catalog(path: &Path) -> Result<BTreeMap<String, String>, GymClientError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
