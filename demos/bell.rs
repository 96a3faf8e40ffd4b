// demos/bell.rs

//! Prepares a Bell pair and prints both views of it: the exact enumerated
//! amplitudes and a 1000-shot sample.

use qmdd::{CircuitBuilder, QmddError, Simulator};

fn main() -> Result<(), QmddError> {
    let circuit = CircuitBuilder::new(2).h(0).cx(0, 1).build()?;
    println!("{}", circuit);

    let mut run = Simulator::new().run(&circuit)?;

    println!("Statevector:");
    for amplitude in run.statevector(4)? {
        println!("  {}", amplitude);
    }

    let result = run.sample(1000, None)?;
    println!("{}", result);
    println!("(replay with seed {})", result.seed());
    Ok(())
}
