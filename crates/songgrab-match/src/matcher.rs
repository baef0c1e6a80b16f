use songgrab_core::{CandidateSong, MatchTarget};
use tracing::{debug, info};

use crate::candidates::CandidateStore;
use crate::picker::ManualPicker;
use crate::similarity::{is_exact, is_similar};

/// Which rule produced the matched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Exact,
    Fuzzy,
    Manual,
    Unmatched,
}

impl MatchMethod {
    pub fn label(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Fuzzy => "fuzzy",
            MatchMethod::Manual => "manual",
            MatchMethod::Unmatched => "unmatched",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// More fuzzy hits than this are treated as ambiguous and dropped.
    pub max_fuzzy_matches: usize,
    pub allow_manual: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            max_fuzzy_matches: 2,
            allow_manual: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    /// Selected candidates, each with `savename` set.
    pub matched: Vec<CandidateSong>,
    /// Store indices of `matched`, in the same order.
    pub indices: Vec<usize>,
    pub method: MatchMethod,
    pub manual_index: Option<usize>,
    /// Fuzzy hits discarded as ambiguous; zero when the fuzzy rule was not rejected.
    pub rejected: usize,
}

impl MatchReport {
    fn unmatched(rejected: usize) -> Self {
        Self {
            matched: Vec::new(),
            indices: Vec::new(),
            method: MatchMethod::Unmatched,
            manual_index: None,
            rejected,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// Exact, then fuzzy, then manual: the first rule with a non-empty result wins.
    /// Never fails; the worst case is an empty report.
    pub fn match_candidates(
        &self,
        store: &CandidateStore,
        target: &MatchTarget,
        picker: &mut dyn ManualPicker,
    ) -> MatchReport {
        let exact = select(store, |song| {
            is_exact(&song.singers, &song.songname, &target.singer, &target.title)
        });
        if !exact.is_empty() {
            debug!(count = exact.len(), query = %target.query(), "exact match");
            return build_report(store, exact, MatchMethod::Exact, None);
        }

        let fuzzy = select(store, |song| {
            is_similar(&song.singers, &song.songname, &target.singer, &target.title)
        });
        let mut rejected = 0;
        if fuzzy.len() > self.policy.max_fuzzy_matches {
            info!(
                count = fuzzy.len(),
                limit = self.policy.max_fuzzy_matches,
                query = %target.query(),
                "too many fuzzy matches, discarding"
            );
            rejected = fuzzy.len();
        } else if !fuzzy.is_empty() {
            debug!(count = fuzzy.len(), query = %target.query(), "fuzzy match");
            return build_report(store, fuzzy, MatchMethod::Fuzzy, None);
        }

        if !self.policy.allow_manual {
            return MatchReport::unmatched(rejected);
        }

        match picker.pick(store.as_slice()) {
            Some(index) if index < store.len() => {
                info!(index, query = %target.query(), "manual pick");
                let mut report = build_report(store, vec![index], MatchMethod::Manual, Some(index));
                report.rejected = rejected;
                report
            }
            _ => {
                info!(query = %target.query(), "manual pick cancelled");
                MatchReport::unmatched(rejected)
            }
        }
    }
}

fn select(store: &CandidateStore, predicate: impl Fn(&CandidateSong) -> bool) -> Vec<usize> {
    store
        .iter()
        .filter(|(_, song)| predicate(*song))
        .map(|(index, _)| index)
        .collect()
}

fn build_report(
    store: &CandidateStore,
    indices: Vec<usize>,
    method: MatchMethod,
    manual_index: Option<usize>,
) -> MatchReport {
    let matched = indices
        .iter()
        .filter_map(|&index| store.get(index))
        .map(|song| {
            let mut song = song.clone();
            song.savename = Some(song.display_name());
            song
        })
        .collect();
    MatchReport {
        matched,
        indices,
        method,
        manual_index,
        rejected: 0,
    }
}
