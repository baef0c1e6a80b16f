use songgrab_core::{MatchOutcome, MatchTarget, MusicProvider, SonggrabResult};
use tracing::info;

use crate::candidates::CandidateStore;
use crate::download::DownloadCoordinator;
use crate::matcher::{MatchReport, Matcher};
use crate::picker::ManualPicker;

/// Hooks for presenting a run as it happens. All methods default to no-ops.
pub trait FetchObserver {
    /// Called before each batch item is resolved; `index` starts at 1.
    fn progress(&mut self, _index: usize, _total: usize, _target: &MatchTarget) {}

    /// Called once matching has finished, before anything is downloaded.
    fn matched(&mut self, _target: &MatchTarget, _store: &CandidateStore, _report: &MatchReport) {}

    /// Called when a batch item is skipped because it already exists.
    fn skipped(&mut self, _target: &MatchTarget) {}
}

/// Observer that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl FetchObserver for SilentObserver {}

/// Resolves one target: search, match, then download.
#[derive(Debug)]
pub struct SongFetcher<P> {
    provider: P,
    sources: Vec<String>,
    matcher: Matcher,
    coordinator: DownloadCoordinator,
}

impl<P: MusicProvider> SongFetcher<P> {
    pub fn new(
        provider: P,
        sources: Vec<String>,
        matcher: Matcher,
        coordinator: DownloadCoordinator,
    ) -> Self {
        Self {
            provider,
            sources,
            matcher,
            coordinator,
        }
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    pub fn coordinator(&self) -> &DownloadCoordinator {
        &self.coordinator
    }

    pub async fn search(&self, target: &MatchTarget) -> SonggrabResult<CandidateStore> {
        let query = target.query();
        let results = self.provider.search(&query, &self.sources).await?;
        let store = CandidateStore::from_search(results, &self.sources);
        info!(query = %query, candidates = store.len(), "search finished");
        Ok(store)
    }

    /// Search and provider errors propagate; matching itself never fails.
    pub async fn fetch(
        &self,
        target: &MatchTarget,
        picker: &mut dyn ManualPicker,
        observer: &mut dyn FetchObserver,
    ) -> SonggrabResult<MatchOutcome> {
        let store = self.search(target).await?;
        let report = self.matcher.match_candidates(&store, target, picker);
        info!(
            query = %target.query(),
            method = report.method.label(),
            matched = report.matched.len(),
            "match finished"
        );
        observer.matched(target, &store, &report);
        self.coordinator
            .download(&self.provider, report.matched)
            .await
    }
}
