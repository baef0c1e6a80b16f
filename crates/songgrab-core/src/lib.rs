mod error;
mod provider;
mod song;

pub use error::{SonggrabError, SonggrabResult};
pub use provider::{MusicProvider, SearchResults};
pub use song::{BatchRecord, CandidateSong, Lyric, MatchOutcome, MatchTarget};

pub fn validate_url(url: &str) -> SonggrabResult<()> {
    url::Url::parse(url)
        .map_err(|err| SonggrabError::InvalidInput(format!("invalid url: {err}")))?;
    Ok(())
}
