// demos/grover.rs

//! Two-qubit Grover search for the marked state |11⟩.
//!
//! With two qubits a single Grover iteration is exact: the oracle is a CZ,
//! the diffuser is H·X on both qubits around another CZ, and the marked
//! state comes out with probability 1.

use qmdd::{Gate, CircuitBuilder, QmddError, Simulator};

fn main() -> Result<(), QmddError> {
    let circuit = CircuitBuilder::new(2)
        // Uniform superposition
        .parallel(&[(Gate::H, 0), (Gate::H, 1)])
        // Oracle: flip the phase of |11⟩
        .cz(0, 1)
        // Diffuser
        .parallel(&[(Gate::H, 0), (Gate::H, 1)])
        .parallel(&[(Gate::X, 0), (Gate::X, 1)])
        .cz(0, 1)
        .parallel(&[(Gate::X, 0), (Gate::X, 1)])
        .parallel(&[(Gate::H, 0), (Gate::H, 1)])
        .build()?;
    println!("{}", circuit);

    let mut run = Simulator::new().run(&circuit)?;
    let result = run.sample(100, Some(2024))?;
    println!("{}", result);

    let hits = result.get("11").map_or(0, |outcome| outcome.occurrences);
    println!("found |11⟩ in {}/100 shots", hits);
    Ok(())
}
