//! String predicates used by the matcher.
//!
//! All comparisons here are heuristics: they decide whether a search result
//! plausibly names the same recording as the requested (singer, title) pair.

const ARTIST_DELIMITERS: [char; 2] = [',', '/'];

/// Verbatim, case-sensitive equality on both singer and title.
pub fn is_exact(singers: &str, songname: &str, singer: &str, title: &str) -> bool {
    singers == singer && songname == title
}

pub fn is_similar(singers: &str, songname: &str, singer: &str, title: &str) -> bool {
    similar_singer(singers, singer) && similar_title(songname, title)
}

/// Case-insensitive containment in either direction, or the same set of
/// artists regardless of order and of which delimiter joins them.
pub fn similar_singer(candidate: &str, target: &str) -> bool {
    let candidate = candidate.to_uppercase();
    let target = target.to_uppercase();
    if contains_either(&candidate, &target) {
        return true;
    }

    ARTIST_DELIMITERS.iter().any(|&left| {
        let left_artists = sorted_artists(&candidate, left);
        ARTIST_DELIMITERS
            .iter()
            .any(|&right| left_artists == sorted_artists(&target, right))
    })
}

/// Case-insensitive containment in either direction, so decorated titles such
/// as `"Love (Remix)"` still match `"Love"`.
pub fn similar_title(candidate: &str, target: &str) -> bool {
    contains_either(&candidate.to_uppercase(), &target.to_uppercase())
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn sorted_artists(singers: &str, delimiter: char) -> Vec<&str> {
    let mut artists: Vec<&str> = singers.split(delimiter).map(str::trim).collect();
    artists.sort_unstable();
    artists
}
