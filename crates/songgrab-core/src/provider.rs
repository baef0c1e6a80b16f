use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use crate::error::SonggrabResult;
use crate::song::CandidateSong;

/// Search results keyed by source identifier.
pub type SearchResults = HashMap<String, Vec<CandidateSong>>;

/// A music search/download backend.
pub trait MusicProvider {
    /// Searches every source in `sources` for `query`.
    fn search(
        &self,
        query: &str,
        sources: &[String],
    ) -> impl Future<Output = SonggrabResult<SearchResults>>;

    /// Downloads `songs` into `save_dir` and returns the ones that succeeded.
    fn download(
        &self,
        songs: &[CandidateSong],
        save_dir: &Path,
    ) -> impl Future<Output = SonggrabResult<Vec<CandidateSong>>>;
}
