// src/lib.rs

#![warn(missing_docs)] // Enforce documentation warnings during build

//! `qmdd`: Quantum circuit simulation on multiple-valued decision diagrams
//!
//! This library simulates quantum circuits without ever materializing a
//! dense statevector. States and operators are held as reduced, canonical,
//! weighted DAGs (quantum multiple-valued decision diagrams) whose edge
//! weights are exact complex numbers over the ring generated by
//! `{1, 1/√2, i}`, represented with integer tuples and interned so that
//! equality of values is equality of indices.
//!
//! ## Key Components
//!
//! * **Core Types (`qmdd::core`):** Exact complex values (`ComplexValue`),
//!   their interned indices (`ComplexId`), the memoizing `ComplexTable`, and
//!   the `QmddError` surface.
//! * **Graph (`qmdd::graph`):** The diagram engine: hash-consed nodes,
//!   normalized edges, memoized addition and multiplication, and the
//!   ground-state and gate constructors.
//! * **Operations (`qmdd::operations`):** The gate catalog
//!   (X, Y, Z, H, S, S†, T, T†) and control descriptors.
//! * **Circuits (`qmdd::circuits`):** `Circuit` to represent ordered
//!   sequences of gate applications and `CircuitBuilder` for easy
//!   construction, plus initial-state specifications.
//! * **Simulation (`qmdd::simulation`):** `Simulator` compiles a circuit
//!   into the diagram of its final state; `SimulationRun` then enumerates
//!   every nonzero amplitude lazily (strong simulation) or samples
//!   measurements shot by shot (weak simulation).
//!
//! ## Conventions
//!
//! Qubit 0 is the least-significant qubit: the rightmost character of every
//! basis-state string and the shallowest level of the diagram. Amplitudes
//! are exact inside the engine; floating point appears only in enumeration
//! and sampling output.

pub mod circuits;
pub mod core;
pub mod graph;
pub mod operations;
pub mod simulation;

// Re-export the most common types for easier top-level use
pub use circuits::{Circuit, CircuitBuilder, InitialState, Step};
pub use core::{ComplexId, ComplexTable, ComplexValue, QmddError};
pub use graph::{Edge, NodeId, NormalizationRule, QmddEngine};
pub use operations::{Control, Gate};
pub use simulation::{
    Amplitude, SampleOutcome, SamplingResult, SimulationRun, Simulator, StatevectorIter,
};

// Example: Bell pair
// Entangles two qubits and enumerates the two surviving amplitudes.
/// ```
/// use qmdd::{CircuitBuilder, QmddError, Simulator};
///
/// # fn main() -> Result<(), QmddError> {
/// let circuit = CircuitBuilder::new(2)
///     .h(0)
///     .cx(0, 1)
///     .build()?;
///
/// let run = Simulator::new().run(&circuit)?;
/// let amplitudes: Vec<_> = run.statevector(4)?.collect();
///
/// // Only |00⟩ and |11⟩ survive, each at 1/√2.
/// assert_eq!(amplitudes.len(), 2);
/// for amplitude in &amplitudes {
///     assert!(amplitude.state == "00" || amplitude.state == "11");
///     assert_eq!(amplitude.re, 0.7071);
///     assert_eq!(amplitude.im, 0.0);
/// }
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example: weak simulation
// Samples the Bell pair; only the two entangled outcomes ever occur.
/// ```
/// use qmdd::{CircuitBuilder, QmddError, Simulator};
///
/// # fn main() -> Result<(), QmddError> {
/// let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build()?;
/// let mut run = Simulator::new().run(&circuit)?;
///
/// let shots = 1_000;
/// let result = run.sample(shots, Some(42))?;
///
/// let zeros = result.get("00").map_or(0, |o| o.occurrences);
/// let ones = result.get("11").map_or(0, |o| o.occurrences);
/// assert_eq!(zeros + ones, shots);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
