use console::{Alignment, measure_text_width, pad_str, style};
use songgrab_core::{CandidateSong, MatchTarget};
use songgrab_match::{CandidateStore, FetchObserver, MatchReport, is_exact, is_similar};

const CANDIDATE_HEADERS: [&str; 7] = ["#", "Singer", "Title", "Size", "Duration", "Album", "Source"];
const REVIEW_HEADERS: [&str; 4] = ["Exact", "Fuzzy", "Manual", "Selected"];

/// Plain text table; cell widths are measured without ANSI codes so styled
/// and wide (CJK) text still lines up.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = measure_text_width(cell);
                match widths.get_mut(i) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }

        let mut out = String::new();
        out.push_str(&render_row(&self.headers, &widths));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&render_row(&rule, &widths));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&render_row(row, &widths));
        }
        out
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn candidate_cells(index: usize, song: &CandidateSong) -> Vec<String> {
    let size = if song.is_lossless() {
        style(&song.filesize).green().bold().to_string()
    } else {
        song.filesize.clone()
    };
    vec![
        style(index).cyan().to_string(),
        style(&song.singers).yellow().to_string(),
        song.songname.clone(),
        size,
        song.duration.clone(),
        song.album.clone(),
        style(song.source.to_uppercase()).magenta().to_string(),
    ]
}

fn flag(value: bool) -> String {
    if value {
        style("yes").green().to_string()
    } else {
        style("-").dim().to_string()
    }
}

pub fn candidate_table(candidates: &[CandidateSong]) -> Table {
    let mut table = Table::new(CANDIDATE_HEADERS);
    for (index, song) in candidates.iter().enumerate() {
        table.push(candidate_cells(index, song));
    }
    table
}

/// Candidate table with a column per matching rule.
pub fn review_table(target: &MatchTarget, store: &CandidateStore, report: &MatchReport) -> Table {
    let mut table = Table::new(CANDIDATE_HEADERS.iter().chain(REVIEW_HEADERS.iter()).copied());
    for (index, song) in store.iter() {
        let mut cells = candidate_cells(index, song);
        cells.push(flag(is_exact(
            &song.singers,
            &song.songname,
            &target.singer,
            &target.title,
        )));
        cells.push(flag(is_similar(
            &song.singers,
            &song.songname,
            &target.singer,
            &target.title,
        )));
        cells.push(flag(report.manual_index == Some(index)));
        cells.push(flag(report.indices.contains(&index)));
        table.push(cells);
    }
    table
}

/// Prints progress and match reviews to the terminal.
#[derive(Debug, Default)]
pub struct TerminalObserver;

impl FetchObserver for TerminalObserver {
    fn progress(&mut self, index: usize, total: usize, target: &MatchTarget) {
        println!(
            "{} {}",
            style(format!("{index}/{total}")).bold(),
            target.file_stem()
        );
    }

    fn matched(&mut self, target: &MatchTarget, store: &CandidateStore, report: &MatchReport) {
        if report.rejected > 0 {
            println!(
                "{} {} fuzzy matches, too ambiguous to pick one",
                style("Warning:").yellow(),
                report.rejected
            );
        }
        if store.is_empty() {
            println!("{} no candidates found", style("Info:").cyan());
            return;
        }
        println!("{}", review_table(target, store, report).render());
        println!(
            "{} {} ({} selected)",
            style("Match:").cyan(),
            report.method.label(),
            report.matched.len()
        );
    }

    fn skipped(&mut self, target: &MatchTarget) {
        println!("{} {} already exists", style("Skip:").dim(), target.file_stem());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songgrab_match::MatchMethod;

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let mut table = Table::new(["#", "Title"]);
        table.push(vec!["0".to_string(), "Love".to_string()]);
        table.push(vec!["10".to_string(), "Hi".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["#   Title", "--  -----", "0   Love", "10  Hi"]);
    }

    #[test]
    fn table_measures_wide_characters() {
        let mut table = Table::new(["Singer", "Src"]);
        table.push(vec!["周杰伦".to_string(), "migu".to_string()]);

        let rendered = table.render();
        let row = rendered.lines().nth(2).unwrap();
        assert_eq!(row, "周杰伦  migu");
    }

    #[test]
    fn review_table_marks_only_selected_rows() {
        let song = |singers: &str, songname: &str| CandidateSong {
            singers: singers.into(),
            songname: songname.into(),
            source: "migu".into(),
            ..Default::default()
        };
        let store = CandidateStore::new(vec![song("Jay", "Love (Live)"), song("Jay", "Love")]);
        let report = MatchReport {
            matched: Vec::new(),
            indices: vec![1],
            method: MatchMethod::Exact,
            manual_index: None,
            rejected: 0,
        };

        let rendered = review_table(&MatchTarget::new("Jay", "Love"), &store, &report).render();
        let plain = console::strip_ansi_codes(&rendered).into_owned();
        let rows: Vec<&str> = plain.lines().skip(2).collect();
        assert!(plain.lines().next().unwrap().ends_with("Selected"));
        assert!(rows[0].ends_with('-'));
        assert!(rows[1].ends_with("yes"));
    }

    #[test]
    fn candidate_table_has_one_row_per_song() {
        let songs = vec![
            CandidateSong {
                singers: "Jay".into(),
                songname: "Title".into(),
                source: "migu".into(),
                ext: "flac".into(),
                filesize: "30MB".into(),
                ..Default::default()
            },
            CandidateSong::default(),
        ];
        let rendered = candidate_table(&songs).render();
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.contains("MIGU"));
        assert!(rendered.contains("30MB"));
    }
}
