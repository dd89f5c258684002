// src/infra/prompt.rs — System prompt loading

use std::path::Path;

use crate::infra::config::Config;
use crate::infra::errors::ProfessorError;
use crate::infra::paths;

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../../prompts/system.txt");

/// Resolve the system prompt once at startup.
///
/// An explicitly configured file must be readable. The default location is
/// optional and falls back to the built-in prompt.
pub fn load_system_prompt(config: &Config) -> Result<String, ProfessorError> {
    if let Some(ref path) = config.prompt.system_prompt_file {
        return read_prompt(path);
    }

    let default_path = paths::system_prompt_path()?;
    if default_path.exists() {
        read_prompt(&default_path)
    } else {
        tracing::debug!("Using built-in system prompt");
        Ok(DEFAULT_SYSTEM_PROMPT.trim().to_string())
    }
}

fn read_prompt(path: &Path) -> Result<String, ProfessorError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ProfessorError::Config(format!("cannot read system prompt {}: {}", path.display(), e))
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ProfessorError::Config(format!(
            "system prompt {} is empty",
            path.display()
        )));
    }
    Ok(text.to_string())
}
