use vthistory::HistoryKind;

/// Construction-time settings for an [`crate::Emulation`], replacing the
/// mutable globals (`ANSWER_BACK` read directly from the environment,
/// history kind baked into the session) a straight port would reach for.
/// The host reads the environment and passes the result in.
#[derive(Debug, Clone)]
pub struct EmulationConfig {
    pub lines: usize,
    pub columns: usize,
    pub history: HistoryKind,
    /// Value reported for `ENQ` (answerback), sourced by the host from
    /// the `ANSWER_BACK` environment variable.
    pub answerback: String,
}

impl Default for EmulationConfig {
    fn default() -> Self {
        Self { lines: 24, columns: 80, history: HistoryKind::None, answerback: String::new() }
    }
}
