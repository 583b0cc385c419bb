//! Plain-text dump of everything scraped.

use crate::models::ResultSet;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write [`ResultSet::dump`] to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_dump(results: &ResultSet, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let dump = results.dump();
    fs::write(path, &dump).await?;
    info!(bytes = dump.len(), "Wrote text dump");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_empty_dump() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dumps/all.txt");
        write_dump(&ResultSet::new(), &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }
}
