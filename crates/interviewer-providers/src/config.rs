//! Interviewer configuration, credential resolution and evaluator factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use interviewer_core::bank::{Question, QuestionBank};
use interviewer_core::traits::Evaluator;

use crate::error::ConfigError;
use crate::groq::{GroqEvaluator, DEFAULT_TIMEOUT_SECS};

/// Name of the evaluator credential, both in the secrets file and the environment.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Local config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "interviewer.toml";

/// Evaluation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Override for the API base URL (defaults to Groq).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Override for the model id.
    #[serde(default)]
    pub model: Option<String>,
    /// HTTP timeout for one evaluation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Transcript file formats written on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    Text,
    Json,
}

/// Top-level interviewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewerConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Directory transcripts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Formats written for each completed session.
    #[serde(default = "default_formats")]
    pub formats: Vec<TranscriptFormat>,
    /// TOML secrets file checked for the credential before the environment.
    #[serde(default = "default_secrets_file")]
    pub secrets_file: PathBuf,
    /// Optional TOML file (`questions = [...]`) replacing the built-in bank.
    #[serde(default)]
    pub questions_file: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_formats() -> Vec<TranscriptFormat> {
    vec![TranscriptFormat::Text]
}
fn default_secrets_file() -> PathBuf {
    PathBuf::from("secrets.toml")
}

impl Default for InterviewerConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            output_dir: default_output_dir(),
            formats: default_formats(),
            secrets_file: default_secrets_file(),
            questions_file: None,
        }
    }
}

impl InterviewerConfig {
    /// The question bank this config selects: a custom file or the built-in one.
    pub fn question_bank(&self) -> Result<QuestionBank> {
        match &self.questions_file {
            Some(path) => load_question_file(path),
            None => Ok(QuestionBank::excel()),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_config_env(config: &mut InterviewerConfig) {
    let evaluator = &mut config.evaluator;
    evaluator.base_url = evaluator.base_url.as_deref().map(resolve_env_vars);
    evaluator.model = evaluator.model.as_deref().map(resolve_env_vars);
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `interviewer.toml` in the current directory
/// 2. `~/.config/interviewer/config.toml`
///
/// Missing default files are not an error; defaults apply. An explicit path
/// that does not exist is.
pub fn load_config_from(path: Option<&Path>) -> Result<InterviewerConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => return Err(ConfigError::NotFound(p.to_path_buf()).into()),
        None => {
            let home = std::env::var_os("HOME").map(PathBuf::from);
            find_config(Path::new("."), home.as_deref())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<InterviewerConfig>(&content).map_err(|e| {
                ConfigError::Invalid {
                    kind: "config",
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => InterviewerConfig::default(),
    };

    resolve_config_env(&mut config);
    Ok(config)
}

fn find_config(local_dir: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let local = local_dir.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    home.map(|h| h.join(".config").join("interviewer").join("config.toml"))
        .filter(|global| global.exists())
}

/// Resolve the evaluator credential: secrets file first, then `GROQ_API_KEY`
/// from the environment.
pub fn resolve_api_key(secrets_file: &Path) -> Result<String> {
    resolve_api_key_with(secrets_file, std::env::var(API_KEY_VAR).ok())
}

/// As [`resolve_api_key`], with the environment value passed in.
pub fn resolve_api_key_with(secrets_file: &Path, env_value: Option<String>) -> Result<String> {
    if secrets_file.exists() {
        let content = std::fs::read_to_string(secrets_file)
            .with_context(|| format!("failed to read secrets: {}", secrets_file.display()))?;
        let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            kind: "secrets",
            path: secrets_file.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(key) = table
            .get(API_KEY_VAR)
            .and_then(|v| v.as_str())
            .filter(|k| !k.trim().is_empty())
        {
            tracing::debug!(source = %secrets_file.display(), "evaluator credential resolved");
            return Ok(key.trim().to_string());
        }
    }

    match env_value.filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            tracing::debug!(source = "environment", "evaluator credential resolved");
            Ok(key.trim().to_string())
        }
        None => Err(ConfigError::MissingCredential {
            name: API_KEY_VAR.to_string(),
            secrets_file: secrets_file.to_path_buf(),
        }
        .into()),
    }
}

#[derive(Deserialize)]
struct QuestionFile {
    questions: Vec<String>,
}

/// Load a custom question bank from a TOML file with a `questions` array.
pub fn load_question_file(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read questions: {}", path.display()))?;
    let file: QuestionFile = toml::from_str(&content).map_err(|e| ConfigError::Invalid {
        kind: "questions",
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let questions = file
        .questions
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .map(Question::from)
        .collect();
    Ok(QuestionBank::new(questions))
}

/// Create the evaluator described by `config`.
pub fn create_evaluator(config: &EvaluatorConfig, api_key: &str) -> Result<Box<dyn Evaluator>> {
    let evaluator = GroqEvaluator::new(
        api_key,
        config.base_url.clone(),
        config.model.clone(),
        config.timeout_secs,
    )?;
    tracing::debug!(
        model = evaluator.model(),
        timeout_secs = config.timeout_secs,
        "evaluator created"
    );
    Ok(Box::new(evaluator))
}
