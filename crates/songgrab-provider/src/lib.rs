//! HTTP adapter for a musicdl-compatible search bridge.
//!
//! Searching goes through the bridge; audio is fetched straight from each
//! candidate's `download_url`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use songgrab_core::{
    CandidateSong, MusicProvider, SearchResults, SonggrabError, SonggrabResult, validate_url,
};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const USER_AGENT: &str = "songgrab/0.1";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap());

#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
    search_size: usize,
}

impl BridgeClient {
    pub fn new(base_url: &str, search_size: usize) -> SonggrabResult<Self> {
        validate_url(base_url)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SonggrabError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            search_size,
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    async fn download_one(&self, song: &CandidateSong, save_dir: &Path) -> SonggrabResult<PathBuf> {
        if song.download_url.trim().is_empty() {
            return Err(SonggrabError::InvalidInput(
                "candidate has no download url".to_string(),
            ));
        }

        let mut response = self
            .client
            .get(&song.download_url)
            .send()
            .await
            .map_err(|err| SonggrabError::Network(format!("download request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(SonggrabError::Api(format!(
                "download error: status={}",
                response.status()
            )));
        }

        let path = save_dir.join(audio_file_name(song));
        let mut file = File::create(&path).await.map_err(|err| {
            SonggrabError::Io(format!("failed to create {}: {err}", path.display()))
        })?;
        if let Err(err) = stream_body(&mut response, &mut file).await {
            drop(file);
            // A partial file would pass the skip check on the next batch run.
            let _ = fs::remove_file(&path).await;
            return Err(err);
        }
        Ok(path)
    }
}

async fn stream_body(response: &mut reqwest::Response, file: &mut File) -> SonggrabResult<()> {
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|err| SonggrabError::Network(format!("download body failed: {err}")))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|err| SonggrabError::Io(format!("download write failed: {err}")))?;
    }
    file.flush()
        .await
        .map_err(|err| SonggrabError::Io(format!("download write failed: {err}")))
}

impl MusicProvider for BridgeClient {
    async fn search(&self, query: &str, sources: &[String]) -> SonggrabResult<SearchResults> {
        let params = [
            ("keyword", query.to_string()),
            ("sources", sources.join(",")),
            ("size", self.search_size.to_string()),
        ];

        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| SonggrabError::Network(format!("search request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SonggrabError::Api(format!(
                "search error: status={status} body={body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| SonggrabError::Network(format!("search body failed: {err}")))?;
        parse_search_response(&body)
    }

    async fn download(
        &self,
        songs: &[CandidateSong],
        save_dir: &Path,
    ) -> SonggrabResult<Vec<CandidateSong>> {
        let mut succeeded = Vec::with_capacity(songs.len());
        for song in songs {
            match self.download_one(song, save_dir).await {
                Ok(path) => {
                    debug!(path = %path.display(), source = %song.source, "downloaded");
                    succeeded.push(song.clone());
                }
                Err(err) => warn!(song = %song.display_name(), source = %song.source, "{err}"),
            }
        }
        Ok(succeeded)
    }
}

pub fn parse_search_response(body: &str) -> SonggrabResult<SearchResults> {
    serde_json::from_str(body)
        .map_err(|err| SonggrabError::Parse(format!("search response parse failed: {err}")))
}

/// `<savename>.<ext>` with characters that are unsafe in file names removed.
pub fn audio_file_name(song: &CandidateSong) -> String {
    let stem = song
        .savename
        .clone()
        .unwrap_or_else(|| song.display_name());
    let stem = UNSAFE_FILENAME_CHARS.replace_all(&stem, "");
    let ext = if song.ext.is_empty() { "mp3" } else { &song.ext };
    format!("{}.{ext}", stem.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use songgrab_core::Lyric;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn candidate(singers: &str, songname: &str, ext: &str) -> CandidateSong {
        CandidateSong {
            source: "migu".to_string(),
            singers: singers.to_string(),
            songname: songname.to_string(),
            ext: ext.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn audio_file_name_strips_unsafe_chars() {
        let song = candidate("A/B", "What?", "flac");
        assert_eq!(audio_file_name(&song), "AB - What.flac");
    }

    #[test]
    fn audio_file_name_prefers_savename() {
        let mut song = candidate("Jay", "Title", "m4a");
        song.savename = Some("Jay - Title".to_string());
        assert_eq!(audio_file_name(&song), "Jay - Title.m4a");

        song.ext.clear();
        assert_eq!(audio_file_name(&song), "Jay - Title.mp3");
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = BridgeClient::new("not-a-url", 5);
        assert!(matches!(result, Err(SonggrabError::InvalidInput(_))));
    }

    #[test]
    fn search_url_ignores_trailing_slash() {
        let client = BridgeClient::new("http://127.0.0.1:5000/", 5).unwrap();
        assert_eq!(client.search_url(), "http://127.0.0.1:5000/search");
    }

    #[test]
    fn parses_search_response_per_source() {
        let body = r#"{
            "migu": [{"source":"migu","songid":"1","singers":"Jay","songname":"Title",
                      "ext":"flac","lyric":"[00:01]a"}],
            "qqmusic": []
        }"#;
        let results = parse_search_response(body).unwrap();
        assert_eq!(results["migu"].len(), 1);
        assert_eq!(
            results["migu"][0].lyric,
            Some(Lyric::Text("[00:01]a".to_string()))
        );
        assert!(results["qqmusic"].is_empty());
    }

    #[test]
    fn search_response_tolerates_loose_field_types() {
        let body = r#"{
            "qqmusic": [{"source":"qqmusic","songid":123,"singers":"Jay","songname":"Title",
                         "album":null,"duration":245,"lyric":{"lrc":"x"},
                         "savename":"../evil"}]
        }"#;
        let results = parse_search_response(body).unwrap();
        let song = &results["qqmusic"][0];
        assert_eq!(song.songid, "123");
        assert_eq!(song.album, "");
        assert_eq!(song.duration, "245");
        assert_eq!(song.lyric, None);
        assert_eq!(song.savename, None);
    }

    #[test]
    fn malformed_search_response_is_parse_error() {
        let result = parse_search_response("<html>");
        assert!(matches!(result, Err(SonggrabError::Parse(_))));
    }

    /// Serves a single canned HTTP response on a loopback port.
    fn serve_once(status: &str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{addr}/track.flac")
    }

    #[test]
    fn download_streams_body_to_file() {
        let temp = TempDir::new().unwrap();
        let client = BridgeClient::new("http://127.0.0.1:5000", 5).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();

        let mut song = candidate("Jay", "Title", "flac");
        song.download_url = serve_once("200 OK", b"fLaC audio bytes");
        let songs = vec![song];
        let result = rt.block_on(async { client.download(&songs, temp.path()).await });

        assert_eq!(result.unwrap(), songs);
        let written = std::fs::read(temp.path().join("Jay - Title.flac")).unwrap();
        assert_eq!(written, b"fLaC audio bytes");
    }

    #[test]
    fn download_error_status_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let client = BridgeClient::new("http://127.0.0.1:5000", 5).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();

        let mut song = candidate("Jay", "Title", "flac");
        song.download_url = serve_once("404 Not Found", b"gone");
        let songs = vec![song];
        let result = rt.block_on(async { client.download(&songs, temp.path()).await });

        assert!(result.unwrap().is_empty());
        assert!(!temp.path().join("Jay - Title.flac").exists());
    }

    #[test]
    fn download_without_url_is_left_out() {
        let temp = TempDir::new().unwrap();
        let client = BridgeClient::new("http://127.0.0.1:5000", 5).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();

        let songs = vec![candidate("Jay", "Title", "mp3")];
        let result = rt.block_on(async { client.download(&songs, temp.path()).await });

        assert!(result.unwrap().is_empty());
        assert!(!temp.path().join("Jay - Title.mp3").exists());
    }
}
