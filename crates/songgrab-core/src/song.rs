use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Lyric payload attached to a search result. Providers hand back either a
/// single blob or the lines of an LRC file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lyric {
    Text(String),
    Lines(Vec<String>),
}

impl Lyric {
    pub fn is_empty(&self) -> bool {
        match self {
            Lyric::Text(text) => text.is_empty(),
            Lyric::Lines(lines) => lines.is_empty(),
        }
    }

    /// Single text blob as written to a sidecar file. Lines are joined with `\r`.
    pub fn to_text(&self) -> String {
        match self {
            Lyric::Text(text) => text.clone(),
            Lyric::Lines(lines) => lines.join("\r"),
        }
    }
}

/// One search result returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateSong {
    #[serde(deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(deserialize_with = "lenient_string")]
    pub songid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub singers: String,
    #[serde(deserialize_with = "lenient_string")]
    pub album: String,
    #[serde(deserialize_with = "lenient_string")]
    pub songname: String,
    #[serde(deserialize_with = "lenient_string")]
    pub download_url: String,
    #[serde(deserialize_with = "lenient_lyric")]
    pub lyric: Option<Lyric>,
    #[serde(deserialize_with = "lenient_string")]
    pub filesize: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ext: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: String,
    /// Set by the matcher once the candidate is selected; never taken from provider data.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub savename: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

/// Display fields: numbers and booleans become text, `null` or any other shape becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawScalar::Text(text)) => text,
        Some(RawScalar::Integer(n)) => n.to_string(),
        Some(RawScalar::Unsigned(n)) => n.to_string(),
        Some(RawScalar::Float(n)) => n.to_string(),
        Some(RawScalar::Bool(b)) => b.to_string(),
        Some(RawScalar::Other(_)) | None => String::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLyric {
    Text(String),
    Lines(Vec<String>),
    Other(IgnoredAny),
}

/// A lyric that is neither text nor a list of lines is dropped.
fn lenient_lyric<'de, D>(deserializer: D) -> Result<Option<Lyric>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawLyric>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawLyric::Text(text)) => Some(Lyric::Text(text)),
        Some(RawLyric::Lines(lines)) => Some(Lyric::Lines(lines)),
        Some(RawLyric::Other(_)) | None => None,
    })
}

impl CandidateSong {
    /// `"<singers> - <songname>"`, built from the candidate's own fields.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.singers, self.songname)
    }

    pub fn is_lossless(&self) -> bool {
        self.ext.eq_ignore_ascii_case("flac")
    }

    pub fn lyric_text(&self) -> Option<String> {
        self.lyric
            .as_ref()
            .filter(|lyric| !lyric.is_empty())
            .map(Lyric::to_text)
    }
}

/// The (singer, title) pair a single match attempt is driven by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchTarget {
    pub singer: String,
    pub title: String,
}

impl MatchTarget {
    pub fn new(singer: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            singer: singer.into(),
            title: title.into(),
        }
    }

    pub fn query(&self) -> String {
        format!("{} {}", self.singer, self.title)
    }

    pub fn file_stem(&self) -> String {
        format!("{} - {}", self.singer, self.title)
    }
}

/// Result of one match-and-download attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Items the provider confirmed as downloaded, carrying the provider's metadata.
    pub success_list: Vec<CandidateSong>,
    /// Items selected by the matcher, downloaded or not.
    pub matched_list: Vec<CandidateSong>,
}

impl MatchOutcome {
    pub fn dry(matched_list: Vec<CandidateSong>) -> Self {
        Self {
            success_list: Vec::new(),
            matched_list,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.success_list.is_empty()
    }
}

/// One row of a batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub singer: String,
    pub title: String,
    pub source: String,
}

impl BatchRecord {
    /// Record for an input target that never reached a provider result.
    pub fn from_target(target: &MatchTarget) -> Self {
        Self {
            singer: target.singer.clone(),
            title: target.title.clone(),
            source: String::new(),
        }
    }

    /// Record for a downloaded item, using the names the provider actually returned.
    pub fn from_song(song: &CandidateSong) -> Self {
        Self {
            singer: song.singers.clone(),
            title: song.songname.clone(),
            source: song.source.clone(),
        }
    }
}
