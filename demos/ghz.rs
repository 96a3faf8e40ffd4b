// demos/ghz.rs

//! Builds a GHZ state across a register whose width is given on the command
//! line (default 8) and shows that only the two extreme basis states ever
//! appear, however wide the register gets.

use qmdd::{CircuitBuilder, QmddError, Simulator};

fn main() -> Result<(), QmddError> {
    let width: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(8);

    let mut builder = CircuitBuilder::new(width).h(0);
    for qubit in 0..width - 1 {
        builder = builder.cx(qubit, qubit + 1);
    }
    let circuit = builder.build()?;

    let run = Simulator::new().run(&circuit)?;
    println!("GHZ over {} qubits:", width);
    for amplitude in run.statevector(4)? {
        println!("  {}", amplitude);
    }
    println!(
        "diagram nodes: {} (vs 2^{} = {} dense amplitudes)",
        run.engine().node_count(),
        width,
        1u64 << width
    );
    Ok(())
}
