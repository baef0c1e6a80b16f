use std::collections::VecDeque;

use songgrab_core::CandidateSong;

/// Last-resort human selection when neither exact nor fuzzy matching finds anything.
pub trait ManualPicker {
    /// Returns the chosen index into `candidates`, or `None` when the operator cancels.
    /// Implementations prompt exactly once.
    fn pick(&mut self, candidates: &[CandidateSong]) -> Option<usize>;
}

/// Reads one line of operator input as a candidate index.
/// Anything other than an integer in `[0, len)` is a cancellation.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&index| index < len)
}

/// Replays canned input lines, one per prompt, through the same parsing rule as a
/// terminal prompt. An exhausted script cancels.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    answers: VecDeque<String>,
    prompts: usize,
}

impl ScriptedPicker {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: 0,
        }
    }

    /// A picker that cancels every prompt.
    pub fn cancel() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> usize {
        self.prompts
    }
}

impl ManualPicker for ScriptedPicker {
    fn pick(&mut self, candidates: &[CandidateSong]) -> Option<usize> {
        self.prompts += 1;
        let answer = self.answers.pop_front()?;
        parse_selection(&answer, candidates.len())
    }
}
