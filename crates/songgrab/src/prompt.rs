use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use songgrab_core::CandidateSong;
use songgrab_match::{ManualPicker, parse_selection};
use tracing::debug;

use crate::display::candidate_table;

/// Shows every candidate and asks once for an index.
#[derive(Debug, Default)]
pub struct TerminalPicker;

impl ManualPicker for TerminalPicker {
    fn pick(&mut self, candidates: &[CandidateSong]) -> Option<usize> {
        if candidates.is_empty() {
            println!("{} nothing to pick from", style("Info:").cyan());
            return None;
        }

        println!("{}", candidate_table(candidates).render());
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Pick number (q to quit)")
            .allow_empty(true)
            .interact_text()
            .unwrap_or_else(|err| {
                debug!("manual pick prompt failed: {err}");
                String::new()
            });

        parse_selection(&input, candidates.len())
    }
}
