//! Match-and-classify pipeline: turn provider search results for a
//! (singer, title) target into a matched set, download it, and sort batch
//! targets into ok/skip/failed reports.

pub mod batch;
pub mod candidates;
pub mod download;
pub mod fetcher;
pub mod matcher;
pub mod picker;
pub mod report;
pub mod similarity;

#[cfg(test)]
mod testing;

pub use batch::{AUDIO_EXTENSIONS, BatchRunner, existing_download};
pub use candidates::CandidateStore;
pub use download::{DownloadCoordinator, write_lyric_sidecar};
pub use fetcher::{FetchObserver, SilentObserver, SongFetcher};
pub use matcher::{MatchMethod, MatchPolicy, MatchReport, Matcher};
pub use picker::{ManualPicker, ScriptedPicker, parse_selection};
pub use report::{BatchReport, ReportPaths, read_targets, write_records};
pub use similarity::{is_exact, is_similar, similar_singer, similar_title};
