use std::cell::RefCell;
use std::path::Path;

use songgrab_core::{
    CandidateSong, MusicProvider, SearchResults, SonggrabError, SonggrabResult,
};

pub fn song(source: &str, singers: &str, songname: &str) -> CandidateSong {
    CandidateSong {
        source: source.to_string(),
        songid: format!("{source}-{songname}"),
        singers: singers.to_string(),
        album: "Album".to_string(),
        songname: songname.to_string(),
        download_url: format!("http://{source}.test/{songname}"),
        lyric: None,
        filesize: "4.2MB".to_string(),
        ext: "mp3".to_string(),
        duration: "03:45".to_string(),
        savename: None,
    }
}

/// In-memory provider that answers every search with the same results and
/// records what it was asked for.
#[derive(Default)]
pub struct StubProvider {
    results: SearchResults,
    failing_sources: Vec<String>,
    fail_search: bool,
    pub queries: RefCell<Vec<String>>,
    pub downloads: RefCell<Vec<Vec<CandidateSong>>>,
}

impl StubProvider {
    pub fn new(results: SearchResults) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn with_songs(songs: Vec<CandidateSong>) -> Self {
        let mut results = SearchResults::new();
        for song in songs {
            results.entry(song.source.clone()).or_default().push(song);
        }
        Self::new(results)
    }

    /// Downloads from `source` report failure.
    pub fn failing_source(mut self, source: &str) -> Self {
        self.failing_sources.push(source.to_string());
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn search_count(&self) -> usize {
        self.queries.borrow().len()
    }

    pub fn download_count(&self) -> usize {
        self.downloads.borrow().len()
    }
}

impl MusicProvider for StubProvider {
    async fn search(&self, query: &str, sources: &[String]) -> SonggrabResult<SearchResults> {
        self.queries.borrow_mut().push(query.to_string());
        if self.fail_search {
            return Err(SonggrabError::Network("stub search failed".to_string()));
        }
        Ok(self
            .results
            .iter()
            .filter(|(source, _)| sources.contains(source))
            .map(|(source, songs)| (source.clone(), songs.clone()))
            .collect())
    }

    async fn download(
        &self,
        songs: &[CandidateSong],
        _save_dir: &Path,
    ) -> SonggrabResult<Vec<CandidateSong>> {
        self.downloads.borrow_mut().push(songs.to_vec());
        Ok(songs
            .iter()
            .filter(|song| !self.failing_sources.contains(&song.source))
            .cloned()
            .collect())
    }
}

pub fn sources() -> Vec<String> {
    ["qqmusic", "netease", "migu"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(future)
}
