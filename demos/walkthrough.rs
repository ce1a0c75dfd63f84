//! Walkthrough of All Four Algorithms
//!
//! This demo runs each algorithm from reset to done and prints every step.
//!
//! Key concepts:
//! - Pure `reset` / `advance` over a serializable snapshot
//! - Stateful `Stepper` with transition history
//! - Editing a search target before the first step
//!
//! Run with: cargo run --example walkthrough

use algostep::core::{AlgorithmKind, SearchTarget, SearchTargets};
use algostep::machine::{trace, StepResult, Stepper};

fn main() {
    println!("=== Algorithm Walkthrough ===\n");

    let targets = SearchTargets::default();
    for kind in AlgorithmKind::ALL {
        let snapshots = trace(kind, &targets);
        println!("--- {kind} ({} snapshots) ---", snapshots.len());
        for (step, snapshot) in snapshots.iter().enumerate() {
            println!(
                "{step:>3}  {:<10} {}",
                snapshot.phase_name(),
                snapshot.message
            );
        }
        println!();
    }

    println!("--- binary_search for 75 via Stepper ---");
    let mut stepper = Stepper::new(AlgorithmKind::BinarySearch, targets);
    stepper.edit_target(SearchTarget::Number(75));
    while let StepResult::Transitioned { from, to } = stepper.advance() {
        println!("  {from} -> {to}: {}", stepper.snapshot().message);
    }

    println!("\nPhases visited: {}", stepper.history().path().join(" → "));
    println!("Transitions taken: {}", stepper.history().len());

    println!("\n=== Walkthrough Complete ===");
}
