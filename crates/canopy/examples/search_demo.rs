//! Run one stub-backed search end to end and print the outcome.
//!
//! ```sh
//! cargo run -p canopy --example search_demo
//! ```

use canopy::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let engine = Engine::builder()
        .backend("stub:tiny")
        .token_budget(8000)
        .verify(true)
        .build()?;

    let outcome = engine.run("What is 6 * 7?", Some("42"))?;

    match &outcome.final_text {
        Some(text) => println!("leaf:\n{text}\n"),
        None => println!("no terminal leaf found\n"),
    }
    println!(
        "tokens: {}  expansions: {}  correct: {:?}  verified: {:?}",
        outcome.tokens_total, outcome.expansions, outcome.correct, outcome.verified
    );
    Ok(())
}
