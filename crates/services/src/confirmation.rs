/// Proof that the learner explicitly agreed to wipe their progress.
///
/// [`ProgressService::reset`](crate::ProgressService::reset) cannot be called
/// without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfirmation(());

impl ResetConfirmation {
    /// Prompt shown before a reset.
    pub const PROMPT: &'static str =
        "Are you sure you want to reset all progress? This cannot be undone.";

    /// Interpret a typed answer. Only `y` or `yes` (any case) confirms.
    #[must_use]
    pub fn from_answer(answer: &str) -> Option<Self> {
        let answer = answer.trim();
        (answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")).then_some(Self(()))
    }

    /// Confirmation given up front, e.g. by a `--yes` flag.
    #[must_use]
    pub fn assume_yes() -> Self {
        Self(())
    }
}
