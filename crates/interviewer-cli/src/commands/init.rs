//! The `interviewer init` command.

use std::path::Path;

use anyhow::Result;

use interviewer_providers::config::LOCAL_CONFIG_FILE;

const SECRETS_FILE: &str = "secrets.toml";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(LOCAL_CONFIG_FILE), SAMPLE_CONFIG)?;
    write_if_missing(Path::new(SECRETS_FILE), SAMPLE_SECRETS)?;

    println!("\nNext steps:");
    println!("  1. Put your Groq API key in {SECRETS_FILE} (or export GROQ_API_KEY)");
    println!("  2. Run: interviewer questions");
    println!("  3. Run: interviewer");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# interviewer configuration

# Where completed transcripts are written.
output_dir = "."

# Transcript formats: "text", "json"
formats = ["text"]

# Checked for GROQ_API_KEY before the environment.
secrets_file = "secrets.toml"

# Replace the built-in Excel questions with your own:
# questions_file = "questions.toml"

[evaluator]
# base_url = "https://api.groq.com/openai"
model = "llama3-8b-8192"
timeout_secs = 60
"#;

const SAMPLE_SECRETS: &str = r#"# Keep this file out of version control.
GROQ_API_KEY = ""
"#;
