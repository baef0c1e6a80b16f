use songgrab_core::{CandidateSong, SearchResults};

/// Flat list of candidates returned for one query. A candidate's index is its
/// position in the list and stays stable for display and manual selection.
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    candidates: Vec<CandidateSong>,
}

impl CandidateStore {
    pub fn new(candidates: Vec<CandidateSong>) -> Self {
        Self { candidates }
    }

    /// Flattens per-source results in `sources` order, keeping each source's own ordering.
    /// Sources absent from `results` contribute nothing.
    pub fn from_search(mut results: SearchResults, sources: &[String]) -> Self {
        let candidates = sources
            .iter()
            .filter_map(|source| results.remove(source))
            .flatten()
            .collect();
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CandidateSong> {
        self.candidates.get(index)
    }

    pub fn as_slice(&self) -> &[CandidateSong] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &CandidateSong)> {
        self.candidates.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::song;

    #[test]
    fn flattens_in_source_list_order() {
        let mut results = SearchResults::new();
        results.insert(
            "migu".to_string(),
            vec![song("migu", "A", "One"), song("migu", "A", "Two")],
        );
        results.insert("qqmusic".to_string(), vec![song("qqmusic", "B", "Three")]);
        results.insert("unlisted".to_string(), vec![song("unlisted", "C", "Four")]);

        let sources = vec!["qqmusic".to_string(), "netease".to_string(), "migu".to_string()];
        let store = CandidateStore::from_search(results, &sources);

        let names: Vec<_> = store.iter().map(|(i, s)| (i, s.songname.as_str())).collect();
        assert_eq!(names, vec![(0, "Three"), (1, "One"), (2, "Two")]);
    }

    #[test]
    fn empty_search_gives_empty_store() {
        let store = CandidateStore::from_search(SearchResults::new(), &["migu".to_string()]);
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
    }
}
