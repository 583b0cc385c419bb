//! JSON export of scraped speeches.
//!
//! The document has a `speeches` array in date order and, when diagnostics
//! are requested, a `failures` object keyed by the listing entry's display
//! text:
//!
//! ```text
//! {
//!   "speeches": [{ "id": 1, "speaker": "George Washington", "date": "1790-01-08", ... }],
//!   "failures": { "James Madison (November 29, 1809)": { "reason": "...", ... } }
//! }
//! ```

use crate::models::{PartialFailure, ResultSet, SpeechRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

pub const FILE_NAME: &str = "speeches.json";

#[derive(Debug, Serialize)]
struct Export<'a> {
    speeches: &'a [SpeechRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    failures: Option<&'a BTreeMap<String, PartialFailure>>,
}

/// Serialize a result set to pretty-printed JSON.
pub fn to_json(results: &ResultSet, include_failures: bool) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Export {
        speeches: results.records(),
        failures: include_failures.then(|| results.failures()),
    })
}

/// Write `{json_output_dir}/speeches.json`, creating the directory if needed.
///
/// Returns the path written.
#[instrument(level = "info", skip(results), fields(records = results.len()))]
pub async fn write_result_set(
    results: &ResultSet,
    json_output_dir: &str,
    include_failures: bool,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = to_json(results, include_failures)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(%json_output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(json_output_dir).join(FILE_NAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON export");
    Ok(path)
}
