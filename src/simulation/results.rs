// src/simulation/results.rs

//! Output containers for the strong and weak simulators.

use std::collections::HashMap;
use std::fmt;

/// One nonzero entry of an enumerated statevector.
///
/// `state` is a binary string of register width with qubit 0 as the
/// rightmost character; `re`/`im` are the amplitude rounded to the
/// precision the enumeration was requested with.
#[derive(Debug, Clone, PartialEq)]
pub struct Amplitude {
    /// Basis state, qubit 0 rightmost.
    pub state: String,
    /// Real part of the amplitude.
    pub re: f64,
    /// Imaginary part of the amplitude.
    pub im: f64,
}

impl fmt::Display for Amplitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}⟩: {}{:+}i", self.state, self.re, self.im)
    }
}

/// What weak simulation observed for one basis state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutcome {
    /// Number of shots that measured this state.
    pub occurrences: u64,
    /// Real part of the state's exact amplitude.
    pub re: f64,
    /// Imaginary part of the state's exact amplitude.
    pub im: f64,
}

/// Holds the results of a weak-simulation run.
///
/// Maps each observed basis state to its occurrence count and amplitude;
/// states that were never sampled are absent. The seed that drove the run is
/// recorded so any run can be replayed exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingResult {
    outcomes: HashMap<String, SampleOutcome>,
    seed: u64,
    shots: u64,
}

impl SamplingResult {
    /// Creates an empty result set. (Internal visibility)
    pub(crate) fn new(seed: u64, shots: u64) -> Self {
        Self { outcomes: HashMap::new(), seed, shots }
    }

    /// Records one measured state. (Internal visibility)
    pub(crate) fn record(&mut self, state: String, re: f64, im: f64) {
        self.outcomes
            .entry(state)
            .and_modify(|outcome| outcome.occurrences += 1)
            .or_insert(SampleOutcome { occurrences: 1, re, im });
    }

    /// The outcome for a specific basis state, if it was ever sampled.
    pub fn get(&self, state: &str) -> Option<&SampleOutcome> {
        self.outcomes.get(state)
    }

    /// All observed outcomes.
    pub fn outcomes(&self) -> &HashMap<String, SampleOutcome> {
        &self.outcomes
    }

    /// The seed that drove this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of shots taken.
    pub fn shots(&self) -> u64 {
        self.shots
    }
}

impl fmt::Display for SamplingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sampling Results ({} shots, seed {}):", self.shots, self.seed)?;
        // Sort by state for consistent and readable output
        let mut sorted: Vec<_> = self.outcomes.iter().collect();
        sorted.sort_by_key(|(state, _)| (*state).clone());
        for (state, outcome) in sorted {
            writeln!(
                f,
                "  |{}⟩: {} ({}{:+}i)",
                state, outcome.occurrences, outcome.re, outcome.im
            )?;
        }
        Ok(())
    }
}
