// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the PROFESSOR_HOME environment variable for isolation.
// When PROFESSOR_HOME is set, config and data live under that directory.
// When unset, config uses ~/.professor/ and data uses XDG_DATA_HOME/professor.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

use crate::infra::errors::ProfessorError;

/// Returns the PROFESSOR_HOME override, if set.
fn professor_home() -> Option<PathBuf> {
    std::env::var_os("PROFESSOR_HOME").map(PathBuf::from)
}

fn home_dir() -> Result<PathBuf, ProfessorError> {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or_else(|| ProfessorError::Config("Could not determine home directory".into()))
}

/// Configuration directory: $PROFESSOR_HOME/ or ~/.professor/
pub fn config_dir() -> Result<PathBuf, ProfessorError> {
    if let Some(home) = professor_home() {
        return Ok(home);
    }
    Ok(home_dir()?.join(".professor"))
}

/// Data directory: $PROFESSOR_HOME/data/ or ~/.local/share/professor/
pub fn data_dir() -> Result<PathBuf, ProfessorError> {
    if let Some(home) = professor_home() {
        return Ok(home.join("data"));
    }
    ProjectDirs::from("", "", "professor")
        .map(|p| p.data_local_dir().to_path_buf())
        .ok_or_else(|| ProfessorError::Config("Could not determine data directory".into()))
}

/// Default sessions directory
pub fn sessions_dir() -> Result<PathBuf, ProfessorError> {
    Ok(data_dir()?.join("sessions"))
}

/// Config file path
pub fn config_file_path() -> Result<PathBuf, ProfessorError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default system prompt file
pub fn system_prompt_path() -> Result<PathBuf, ProfessorError> {
    Ok(config_dir()?.join("prompts").join("system.txt"))
}
