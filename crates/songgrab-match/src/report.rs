use std::path::{Path, PathBuf};

use songgrab_core::{BatchRecord, MatchTarget, SonggrabError, SonggrabResult};
use tracing::info;

/// Accumulated outcome of a batch run. Lists hold data rows only; the header is
/// added when a list is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub ok: Vec<BatchRecord>,
    pub skip: Vec<BatchRecord>,
    pub failed: Vec<BatchRecord>,
}

impl BatchReport {
    /// Writes each non-empty list to its own file and returns the paths written.
    pub fn write(&self, paths: &ReportPaths) -> SonggrabResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (records, path) in [
            (&self.ok, &paths.ok),
            (&self.skip, &paths.skip),
            (&self.failed, &paths.failed),
        ] {
            if records.is_empty() {
                continue;
            }
            write_records(path, records)?;
            info!(path = %path.display(), rows = records.len(), "wrote report");
            written.push(path.clone());
        }
        Ok(written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub ok: PathBuf,
    pub skip: PathBuf,
    pub failed: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self {
            ok: PathBuf::from("ok.csv"),
            skip: PathBuf::from("skip.csv"),
            failed: PathBuf::from("failed.csv"),
        }
    }
}

/// Reads (singer, title) targets from columns 0 and 1. The first row is a header.
pub fn read_targets(path: &Path) -> SonggrabResult<Vec<MatchTarget>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| SonggrabError::Csv(format!("failed to open {}: {err}", path.display())))?;

    let mut targets = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record
            .map_err(|err| SonggrabError::Csv(format!("failed to read {}: {err}", path.display())))?;
        match (record.get(0), record.get(1)) {
            (Some(singer), Some(title)) => targets.push(MatchTarget::new(singer, title)),
            _ => {
                return Err(SonggrabError::InvalidInput(format!(
                    "{} row {}: expected singer and title columns",
                    path.display(),
                    row + 2
                )));
            }
        }
    }
    Ok(targets)
}

/// Writes the `singer,title,source` header followed by `records`.
pub fn write_records(path: &Path, records: &[BatchRecord]) -> SonggrabResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| SonggrabError::Csv(format!("failed to create {}: {err}", path.display())))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|err| SonggrabError::Csv(format!("failed to write {}: {err}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|err| SonggrabError::Io(format!("failed to flush {}: {err}", path.display())))?;
    Ok(())
}
