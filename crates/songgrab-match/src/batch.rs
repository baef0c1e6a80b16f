use std::path::{Path, PathBuf};

use songgrab_core::{BatchRecord, MatchTarget, MusicProvider, SonggrabResult};
use tracing::info;

use crate::fetcher::{FetchObserver, SongFetcher};
use crate::picker::ManualPicker;
use crate::report::BatchReport;

/// Extensions that count as an already downloaded track.
pub const AUDIO_EXTENSIONS: [&str; 3] = ["flac", "mp3", "m4a"];

/// Returns the first `<save_dir>/<singer> - <title>.<ext>` that exists.
pub fn existing_download(save_dir: &Path, target: &MatchTarget) -> Option<PathBuf> {
    let stem = target.file_stem();
    AUDIO_EXTENSIONS
        .iter()
        .map(|ext| save_dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

/// Drives a list of targets through the fetcher, one at a time, and sorts each
/// into exactly one of ok/skip/failed.
pub struct BatchRunner<'a, P> {
    fetcher: &'a SongFetcher<P>,
}

impl<'a, P: MusicProvider> BatchRunner<'a, P> {
    pub fn new(fetcher: &'a SongFetcher<P>) -> Self {
        Self { fetcher }
    }

    /// A provider error stops the run at that target and is returned as-is.
    pub async fn run(
        &self,
        targets: &[MatchTarget],
        picker: &mut dyn ManualPicker,
        observer: &mut dyn FetchObserver,
    ) -> SonggrabResult<BatchReport> {
        let save_dir = self.fetcher.coordinator().save_dir();
        let total = targets.len();
        let mut report = BatchReport::default();

        for (index, target) in targets.iter().enumerate() {
            observer.progress(index + 1, total, target);

            if let Some(path) = existing_download(save_dir, target) {
                info!(path = %path.display(), "already downloaded, skipping");
                observer.skipped(target);
                report.skip.push(BatchRecord::from_target(target));
                continue;
            }

            let outcome = self.fetcher.fetch(target, picker, observer).await?;
            if outcome.is_success() {
                report
                    .ok
                    .extend(outcome.success_list.iter().map(BatchRecord::from_song));
            } else {
                report.failed.push(BatchRecord::from_target(target));
            }
        }

        info!(
            ok = report.ok.len(),
            skip = report.skip.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }
}
