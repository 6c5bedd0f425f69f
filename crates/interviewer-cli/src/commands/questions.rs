//! The `interviewer questions` command.

use std::path::PathBuf;

use anyhow::Result;

use interviewer_core::QUESTIONS_PER_SESSION;
use interviewer_providers::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = config.question_bank()?;

    for (i, question) in bank.iter().enumerate() {
        println!("{:>2}. {question}", i + 1);
    }
    println!(
        "\n{} questions ({QUESTIONS_PER_SESSION} asked per session)",
        bank.len()
    );

    if bank.len() < QUESTIONS_PER_SESSION {
        println!("WARNING: the bank is too small to run an interview.");
    }

    Ok(())
}
