use std::fs;
use std::path::{Path, PathBuf};

use songgrab_core::{CandidateSong, MatchOutcome, MusicProvider, SonggrabResult};
use tracing::{info, warn};

/// Runs the provider download for a matched set and saves lyric sidecars.
#[derive(Debug, Clone)]
pub struct DownloadCoordinator {
    save_dir: PathBuf,
    dry_run: bool,
}

impl DownloadCoordinator {
    pub fn new(save_dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            save_dir: save_dir.into(),
            dry_run,
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    pub async fn download<P: MusicProvider>(
        &self,
        provider: &P,
        matched: Vec<CandidateSong>,
    ) -> SonggrabResult<MatchOutcome> {
        if self.dry_run || matched.is_empty() {
            return Ok(MatchOutcome::dry(matched));
        }

        let success_list = provider.download(&matched, &self.save_dir).await?;
        info!(
            requested = matched.len(),
            succeeded = success_list.len(),
            "download finished"
        );
        for song in &success_list {
            save_lyric(&self.save_dir, song);
        }

        Ok(MatchOutcome {
            success_list,
            matched_list: matched,
        })
    }
}

/// Best effort: a failed sidecar write is logged and never reaches the caller.
fn save_lyric(save_dir: &Path, song: &CandidateSong) {
    match write_lyric_sidecar(save_dir, song) {
        Ok(Some(path)) => info!(path = %path.display(), "saved lyric"),
        Ok(None) => {}
        Err(err) => warn!(song = %song.display_name(), "failed to save lyric: {err}"),
    }
}

/// Writes `<save_dir>/<singers> - <songname>.lrc` when the song carries a non-empty lyric.
pub fn write_lyric_sidecar(save_dir: &Path, song: &CandidateSong) -> std::io::Result<Option<PathBuf>> {
    let Some(text) = song.lyric_text() else {
        return Ok(None);
    };
    let path = save_dir.join(format!("{}.lrc", song.display_name()));
    fs::write(&path, text)?;
    Ok(Some(path))
}
