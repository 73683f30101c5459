//! Engine configuration. `wexec` has no persisted configuration file (spec.md
//! §6: "Persisted state: none") — everything here is either a compiled-in
//! default or a CLI flag for the current invocation.

/// Tunables for a single symbolic-execution run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Iteration cap for non-invariant `while` loops (spec.md §4.5, §9 —
    /// the constant 10 is part of the observable contract; exposing it as a
    /// flag is the natural extension the design notes call out).
    pub unroll_limit: u32,
}

/// The contractual bound from spec.md §4.5's unrolled loop rule.
pub const DEFAULT_UNROLL_LIMIT: u32 = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            unroll_limit: DEFAULT_UNROLL_LIMIT,
        }
    }
}
