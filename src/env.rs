use std::path::Path;

use tracing::{info, warn};

/// Which env files were applied. Loading happens before tracing is installed,
/// so the outcome is kept and logged afterwards.
#[derive(Debug, Default)]
pub struct EnvFiles {
    pub loaded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

impl EnvFiles {
    pub fn log(&self) {
        for path in &self.loaded {
            info!("Loaded environment from: {}", path);
        }
        for path in &self.skipped {
            warn!("Environment file {} not found, skipping", path);
        }
    }
}

pub fn load_environment() -> Result<EnvFiles, Box<dyn std::error::Error>> {
    let is_production =
        dotenvy::var("ROCKET_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        ["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        ["config/common.env", "config/dev.env", ".secrets.env"]
    };

    load_env_files(&env_files)
}

pub fn load_env_files(paths: &[&'static str]) -> Result<EnvFiles, Box<dyn std::error::Error>> {
    let mut files = EnvFiles::default();
    for &path in paths {
        if Path::new(path).exists() {
            dotenvy::from_filename_override(path)?;
            files.loaded.push(path);
        } else {
            files.skipped.push(path);
        }
    }
    Ok(files)
}
