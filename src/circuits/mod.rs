// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! gate applications.
//!
//! This module provides the `Circuit` structure, an immutable, validated
//! program over a fixed-width qubit register, and `CircuitBuilder` for
//! constructing one by method chaining. All shape validation (bounds,
//! duplicates, control arity, activation alphabets) happens in
//! [`CircuitBuilder::build`], before any simulation table exists, so a
//! rejected circuit has no observable effect on later runs.

use std::collections::HashSet;
use std::fmt;

use crate::core::QmddError;
use crate::operations::{Control, Gate};

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A single gate on `target`, conditioned on zero or more controls.
    Gate {
        /// The gate applied to the target qubit.
        gate: Gate,
        /// The target qubit.
        target: u32,
        /// Controls with their activation qualities.
        controls: Vec<Control>,
    },
    /// An uncontrolled layer of gates on distinct qubits, applied as one
    /// tensored operator.
    Parallel {
        /// The gates of the layer with their targets.
        gates: Vec<(Gate, u32)>,
    },
}

/// An ordered, validated sequence of steps on an `n`-qubit register.
///
/// Circuits are immutable after construction; depth counts logical steps
/// (a parallel layer is one step).
#[derive(Clone, PartialEq, Eq)]
pub struct Circuit {
    num_qubits: u32,
    steps: Vec<Step>,
}

impl Circuit {
    /// Width of the register this circuit runs on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The ordered steps of the circuit.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps in the circuit.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the circuit contains no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing [`Circuit`] instances
/// using method chaining.
///
/// Recording methods never fail; every check runs in [`CircuitBuilder::build`].
pub struct CircuitBuilder {
    num_qubits: u32,
    pending: Vec<PendingStep>,
}

/// A recorded step awaiting validation.
enum PendingStep {
    Controlled {
        gate: Gate,
        target: u32,
        controls: Vec<u32>,
        activation: String,
    },
    Parallel(Vec<(Gate, u32)>),
}

impl CircuitBuilder {
    /// Creates a builder for an `num_qubits`-wide register.
    pub fn new(num_qubits: u32) -> Self {
        Self { num_qubits, pending: Vec::new() }
    }

    /// Records an uncontrolled gate on `target`.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn gate(mut self, gate: Gate, target: u32) -> Self {
        self.pending.push(PendingStep::Controlled {
            gate,
            target,
            controls: Vec::new(),
            activation: String::new(),
        });
        self
    }

    /// Records a controlled gate on `target`.
    ///
    /// `activation` holds one character per control, in control order:
    /// `'1'` activates on |1⟩, `'0'` on |0⟩.
    pub fn controlled(
        mut self,
        gate: Gate,
        target: u32,
        controls: &[u32],
        activation: &str,
    ) -> Self {
        self.pending.push(PendingStep::Controlled {
            gate,
            target,
            controls: controls.to_vec(),
            activation: activation.to_string(),
        });
        self
    }

    /// Records an uncontrolled parallel layer of gates on distinct qubits.
    pub fn parallel(mut self, gates: &[(Gate, u32)]) -> Self {
        self.pending.push(PendingStep::Parallel(gates.to_vec()));
        self
    }

    /// Pauli X on `target`.
    pub fn x(self, target: u32) -> Self {
        self.gate(Gate::X, target)
    }

    /// Pauli Y on `target`.
    pub fn y(self, target: u32) -> Self {
        self.gate(Gate::Y, target)
    }

    /// Pauli Z on `target`.
    pub fn z(self, target: u32) -> Self {
        self.gate(Gate::Z, target)
    }

    /// Hadamard on `target`.
    pub fn h(self, target: u32) -> Self {
        self.gate(Gate::H, target)
    }

    /// Phase gate on `target`.
    pub fn s(self, target: u32) -> Self {
        self.gate(Gate::S, target)
    }

    /// Inverse phase gate on `target`.
    pub fn sdg(self, target: u32) -> Self {
        self.gate(Gate::Sdg, target)
    }

    /// T gate on `target`.
    pub fn t(self, target: u32) -> Self {
        self.gate(Gate::T, target)
    }

    /// Inverse T gate on `target`.
    pub fn tdg(self, target: u32) -> Self {
        self.gate(Gate::Tdg, target)
    }

    /// Controlled-X with a |1⟩-control.
    pub fn cx(self, control: u32, target: u32) -> Self {
        self.controlled(Gate::X, target, &[control], "1")
    }

    /// Controlled-Z with a |1⟩-control.
    pub fn cz(self, control: u32, target: u32) -> Self {
        self.controlled(Gate::Z, target, &[control], "1")
    }

    /// Multi-controlled X with |1⟩-controls.
    pub fn mcx(self, controls: &[u32], target: u32) -> Self {
        let activation = "1".repeat(controls.len());
        self.controlled(Gate::X, target, controls, &activation)
    }

    /// Validates every recorded step and finalizes the circuit.
    pub fn build(self) -> Result<Circuit, QmddError> {
        let n = self.num_qubits;
        if n == 0 || n > 63 {
            return Err(QmddError::InvalidQubitCount { count: n as u64 });
        }
        let mut steps = Vec::with_capacity(self.pending.len());
        for pending in self.pending {
            steps.push(match pending {
                PendingStep::Controlled { gate, target, controls, activation } => {
                    check_qubit(target, n)?;
                    if controls.len() != activation.chars().count() {
                        return Err(QmddError::UnequalControls {
                            controls: controls.len(),
                            bits: activation.chars().count(),
                        });
                    }
                    if activation.chars().any(|c| c != '0' && c != '1') {
                        return Err(QmddError::InvalidCtrlState { state: activation });
                    }
                    let mut seen = HashSet::from([target]);
                    let mut parsed = Vec::with_capacity(controls.len());
                    for (&qubit, bit) in controls.iter().zip(activation.chars()) {
                        check_qubit(qubit, n)?;
                        if !seen.insert(qubit) {
                            return Err(QmddError::DuplicateQubit { qubit });
                        }
                        parsed.push(Control::new(qubit, bit == '1'));
                    }
                    Step::Gate { gate, target, controls: parsed }
                }
                PendingStep::Parallel(gates) => {
                    if gates.is_empty() {
                        return Err(QmddError::ArityMismatch {
                            message: "a parallel layer needs at least one gate".to_string(),
                        });
                    }
                    let mut seen = HashSet::new();
                    for &(_, qubit) in &gates {
                        check_qubit(qubit, n)?;
                        if !seen.insert(qubit) {
                            return Err(QmddError::DuplicateQubit { qubit });
                        }
                    }
                    Step::Parallel { gates }
                }
            });
        }
        Ok(Circuit { num_qubits: n, steps })
    }
}

fn check_qubit(qubit: u32, count: u32) -> Result<(), QmddError> {
    if qubit >= count {
        return Err(QmddError::OutOfBoundsQubit { qubit, count });
    }
    Ok(())
}

//-------------------------------------------------------------------------
// Initial states
//-------------------------------------------------------------------------

/// The state a simulation starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialState {
    /// The all-zeros state `|0…0⟩`.
    Ground,
    /// A per-qubit preparation string over `{'0','1','+','-','r','l'}`.
    /// The first character prepares qubit `n−1`, the last qubit 0.
    Pattern(String),
    /// A computational basis state, as the integer whose bit `q` gives
    /// qubit `q`.
    Basis(u64),
}

impl InitialState {
    /// Checks the specification against a register of `n` qubits.
    pub(crate) fn validate(&self, n: u32) -> Result<(), QmddError> {
        match self {
            InitialState::Ground => Ok(()),
            InitialState::Pattern(pattern) => {
                let len = pattern.chars().count();
                if len != n as usize {
                    return Err(QmddError::InvalidInitialState {
                        message: format!("pattern {:?} has {} characters for {} qubits", pattern, len, n),
                    });
                }
                for c in pattern.chars() {
                    if !matches!(c, '0' | '1' | '+' | '-' | 'r' | 'l') {
                        return Err(QmddError::InvalidInitialState {
                            message: format!("unrecognized preparation character {:?}", c),
                        });
                    }
                }
                Ok(())
            }
            InitialState::Basis(bits) => {
                if n < 64 && *bits >= (1u64 << n) {
                    return Err(QmddError::InvalidInitialState {
                        message: format!("basis index {} does not fit in {} qubits", bits, n),
                    });
                }
                Ok(())
            }
        }
    }

    /// The gate sequence preparing one qubit from |0⟩ for a pattern
    /// character. Only called on validated patterns.
    pub(crate) fn preparation(c: char) -> &'static [Gate] {
        match c {
            '0' => &[],
            '1' => &[Gate::X],
            '+' => &[Gate::H],
            '-' => &[Gate::X, Gate::H],
            'r' => &[Gate::H, Gate::S],
            'l' => &[Gate::X, Gate::H, Gate::S],
            _ => unreachable!("unvalidated preparation character"),
        }
    }
}

//-------------------------------------------------------------------------
// Display
//-------------------------------------------------------------------------

const GATE_WIDTH: usize = 7; // e.g. "───H───"
const WIRE: &str = "───────"; // GATE_WIDTH dashes
const V_WIRE: char = '│';
const H_WIRE: char = '─';

/// Centers a symbol inside a wire segment.
fn format_gate(symbol: &str) -> String {
    let len = symbol.chars().count();
    if len >= GATE_WIDTH {
        symbol.chars().take(GATE_WIDTH).collect()
    } else {
        let dashes = GATE_WIDTH - len;
        let pre = dashes / 2;
        let post = dashes - pre;
        format!(
            "{}{}{}",
            H_WIRE.to_string().repeat(pre),
            symbol,
            H_WIRE.to_string().repeat(post)
        )
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_qubits = self.num_qubits as usize;
        let num_steps = self.steps.len();
        writeln!(f, "qmdd::Circuit[{} steps on {} qubits]", num_steps, num_qubits)?;
        if num_steps == 0 {
            return Ok(());
        }

        // op_grid[row][t] holds the gate/wire cell; v_connect[row][t] the
        // connector drawn below that row.
        let mut op_grid = vec![vec![WIRE.to_string(); num_steps]; num_qubits];
        let mut v_connect = vec![vec![' '; num_steps]; num_qubits];

        for (t, step) in self.steps.iter().enumerate() {
            match step {
                Step::Gate { gate, target, controls } => {
                    op_grid[*target as usize][t] = format_gate(gate.symbol());
                    for control in controls {
                        // '@' marks a |1⟩-control, 'o' a |0⟩-control.
                        op_grid[control.qubit as usize][t] =
                            format_gate(if control.bit { "@" } else { "o" });
                    }
                    if let Some(top) = controls.iter().map(|c| c.qubit).min().map(|q| q.min(*target)) {
                        let bottom = controls
                            .iter()
                            .map(|c| c.qubit)
                            .max()
                            .map_or(*target, |q| q.max(*target));
                        for row_vec in v_connect.iter_mut().take(bottom as usize).skip(top as usize) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
                Step::Parallel { gates } => {
                    for (gate, qubit) in gates {
                        op_grid[*qubit as usize][t] = format_gate(gate.symbol());
                    }
                }
            }
        }

        let label_width = format!("q{}: ", num_qubits - 1).len();
        for row in 0..num_qubits {
            let label = format!("q{}: ", row);
            write!(f, "{:<width$}", label, width = label_width)?;
            writeln!(f, "{}", op_grid[row].join(""))?;

            if row < num_qubits - 1 {
                write!(f, "{}", " ".repeat(label_width))?;
                for t in 0..num_steps {
                    let pad = GATE_WIDTH - 1;
                    let pre = pad / 2;
                    write!(f, "{}{}{}", " ".repeat(pre), v_connect[row][t], " ".repeat(pad - pre))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_records_steps_in_order() -> Result<(), QmddError> {
        let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build()?;
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 2);
        assert!(matches!(
            &circuit.steps()[0],
            Step::Gate { gate: Gate::H, target: 0, controls } if controls.is_empty()
        ));
        assert!(matches!(
            &circuit.steps()[1],
            Step::Gate { gate: Gate::X, target: 1, controls } if controls == &[Control::new(0, true)]
        ));
        Ok(())
    }

    #[test]
    fn invalid_register_widths_are_rejected() {
        assert!(matches!(
            CircuitBuilder::new(0).build(),
            Err(QmddError::InvalidQubitCount { count: 0 })
        ));
        assert!(matches!(
            CircuitBuilder::new(77).build(),
            Err(QmddError::InvalidQubitCount { count: 77 })
        ));
    }

    #[test]
    fn out_of_bounds_and_duplicate_qubits_are_rejected() {
        assert!(matches!(
            CircuitBuilder::new(2).x(2).build(),
            Err(QmddError::OutOfBoundsQubit { qubit: 2, count: 2 })
        ));
        assert!(matches!(
            CircuitBuilder::new(2).cx(1, 1).build(),
            Err(QmddError::DuplicateQubit { qubit: 1 })
        ));
        assert!(matches!(
            CircuitBuilder::new(3).parallel(&[(Gate::H, 1), (Gate::X, 1)]).build(),
            Err(QmddError::DuplicateQubit { qubit: 1 })
        ));
    }

    #[test]
    fn activation_strings_must_match_their_controls() {
        assert!(matches!(
            CircuitBuilder::new(3).controlled(Gate::X, 2, &[0, 1], "1").build(),
            Err(QmddError::UnequalControls { controls: 2, bits: 1 })
        ));
        assert!(matches!(
            CircuitBuilder::new(3).controlled(Gate::X, 2, &[0, 1], "1x").build(),
            Err(QmddError::InvalidCtrlState { .. })
        ));
    }

    #[test]
    fn empty_parallel_layers_are_rejected() {
        assert!(matches!(
            CircuitBuilder::new(2).parallel(&[]).build(),
            Err(QmddError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn initial_state_validation() {
        assert!(InitialState::Ground.validate(3).is_ok());
        assert!(InitialState::Pattern("1+r".to_string()).validate(3).is_ok());
        assert!(matches!(
            InitialState::Pattern("1+".to_string()).validate(3),
            Err(QmddError::InvalidInitialState { .. })
        ));
        assert!(matches!(
            InitialState::Pattern("1q+".to_string()).validate(3),
            Err(QmddError::InvalidInitialState { .. })
        ));
        assert!(InitialState::Basis(7).validate(3).is_ok());
        assert!(matches!(
            InitialState::Basis(8).validate(3),
            Err(QmddError::InvalidInitialState { .. })
        ));
    }

    #[test]
    fn display_draws_controls_between_rows() -> Result<(), QmddError> {
        let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build()?;
        let drawing = format!("{}", circuit);
        assert!(drawing.contains("H"));
        assert!(drawing.contains("@"));
        assert!(drawing.contains(V_WIRE));
        Ok(())
    }
}
