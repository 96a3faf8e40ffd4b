// src/simulation/mod.rs

//! Compiles circuits into decision diagrams and simulates the result.
//!
//! This module contains the `Simulator` entry point, which translates each
//! circuit step into an operator diagram and multiplies it into the running
//! state (matrix × vector, never a dense statevector), and `SimulationRun`,
//! the finished session exposing strong enumeration and weak sampling.

mod results;
pub(crate) mod strong;
pub(crate) mod weak;

// Re-export the main public interface types
pub use results::{Amplitude, SampleOutcome, SamplingResult};
pub use strong::StatevectorIter;

use crate::circuits::{Circuit, InitialState, Step};
use crate::core::QmddError;
use crate::graph::engine::{NormalizationRule, QmddEngine};
use crate::graph::node::Edge;

/// The main simulator orchestrating the execution of circuits.
///
/// A simulator is pure configuration; every [`Simulator::run`] opens a fresh
/// session with its own tables, so runs are independent and a failed run
/// leaves nothing behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator {
    rule: NormalizationRule,
}

impl Simulator {
    /// Creates a simulator with the default normalization rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator normalizing under the given rule.
    pub fn with_rule(rule: NormalizationRule) -> Self {
        Self { rule }
    }

    /// Runs a circuit from the ground state `|0…0⟩`.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationRun, QmddError> {
        self.run_with_initial(circuit, &InitialState::Ground)
    }

    /// Runs a circuit from the given initial state.
    ///
    /// The initial-state specification is validated against the register
    /// before any engine table is created.
    ///
    /// # Returns
    /// * `Ok(SimulationRun)` owning the finished session.
    /// * `Err(QmddError)` if the specification is invalid or an arithmetic
    ///   error surfaces during compilation.
    pub fn run_with_initial(
        &self,
        circuit: &Circuit,
        initial: &InitialState,
    ) -> Result<SimulationRun, QmddError> {
        let num_qubits = circuit.num_qubits();
        initial.validate(num_qubits)?;

        let mut engine = QmddEngine::new(num_qubits, self.rule)?;
        let mut state = match initial {
            InitialState::Ground => engine.ground_state()?,
            InitialState::Basis(bits) => engine.basis_state(*bits)?,
            InitialState::Pattern(pattern) => {
                let mut state = engine.ground_state()?;
                for (position, c) in pattern.chars().enumerate() {
                    // The first pattern character prepares the deepest qubit.
                    let qubit = num_qubits - 1 - position as u32;
                    for gate in InitialState::preparation(c) {
                        let op = engine.gate(gate.matrix(), qubit, &[])?;
                        state = engine.multiply_vector(op, state)?;
                    }
                }
                state
            }
        };

        for step in circuit.steps() {
            let op = match step {
                Step::Gate { gate, target, controls } => {
                    engine.gate(gate.matrix(), *target, controls)?
                }
                Step::Parallel { gates } => {
                    let parts: Vec<_> =
                        gates.iter().map(|(gate, qubit)| (gate.matrix(), *qubit)).collect();
                    engine.parallel(&parts)?
                }
            };
            state = engine.multiply_vector(op, state)?;
        }

        Ok(SimulationRun { engine, root: state })
    }
}

/// A finished simulation session: the engine with all its tables, plus the
/// edge of the final state.
pub struct SimulationRun {
    engine: QmddEngine,
    root: Edge,
}

impl SimulationRun {
    /// The edge of the simulated state.
    pub fn root(&self) -> Edge {
        self.root
    }

    /// The session's engine, for inspection.
    pub fn engine(&self) -> &QmddEngine {
        &self.engine
    }

    /// Lazily enumerates every nonzero amplitude of the state, rounded to
    /// `decimals` places.
    ///
    /// Fails with `InvalidPrecision` for `decimals > 10`, `ZeroEdge` for a
    /// zero state, and `TerminalEdge` when every level of the state has been
    /// elided (a uniform state carries no per-qubit structure to walk).
    pub fn statevector(&self, decimals: u32) -> Result<StatevectorIter<'_>, QmddError> {
        StatevectorIter::new(&self.engine, self.root, decimals)
    }

    /// Samples `shots` measurements from the state.
    ///
    /// Pass a seed for reproducible sampling; without one, a seed is drawn
    /// and recorded in the result. Fails with `InvalidShots` for zero shots
    /// and with the same edge errors as [`SimulationRun::statevector`].
    pub fn sample(&mut self, shots: u64, seed: Option<u64>) -> Result<SamplingResult, QmddError> {
        weak::sample(&mut self.engine, self.root, shots, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;

    #[test]
    fn a_fixed_seed_reproduces_the_sample_exactly() -> Result<(), QmddError> {
        let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build()?;
        let simulator = Simulator::new();
        let mut first = simulator.run(&circuit)?;
        let mut second = simulator.run(&circuit)?;
        let a = first.sample(200, Some(0xfeed))?;
        let b = second.sample(200, Some(0xfeed))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn a_derived_seed_is_recorded_for_replay() -> Result<(), QmddError> {
        let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build()?;
        let simulator = Simulator::new();
        let mut run = simulator.run(&circuit)?;
        let unseeded = run.sample(50, None)?;
        let replay = run.sample(50, Some(unseeded.seed()))?;
        assert_eq!(unseeded, replay);
        Ok(())
    }

    #[test]
    fn preparation_characters_produce_their_states() -> Result<(), QmddError> {
        // |1⟩ then |+⟩: pattern "1+" puts qubit 1 in |1⟩ and qubit 0 in |+⟩.
        let circuit = CircuitBuilder::new(2).build()?;
        let run = Simulator::new()
            .run_with_initial(&circuit, &InitialState::Pattern("1+".to_string()))?;
        let amplitudes: Vec<_> = run.statevector(4)?.collect();
        let expected = 0.7071;
        assert_eq!(amplitudes.len(), 2);
        for amplitude in &amplitudes {
            assert!(amplitude.state.starts_with('1'), "state {}", amplitude.state);
            assert_eq!(amplitude.re, expected);
            assert_eq!(amplitude.im, 0.0);
        }
        Ok(())
    }

    #[test]
    fn rejected_runs_leave_no_partial_session() {
        let circuit = CircuitBuilder::new(2).h(0).build().unwrap();
        let result = Simulator::new()
            .run_with_initial(&circuit, &InitialState::Pattern("++q".to_string()));
        assert!(matches!(result, Err(QmddError::InvalidInitialState { .. })));
    }
}
