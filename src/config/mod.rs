//! Configuration system (layered: defaults > config file > env > code).

use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::{MemoryError, Result};
use crate::memory::transcript::DEFAULT_MAX_MESSAGES;

/// Overrides the directory holding the memory files.
pub const ENV_MEMORY_DIR: &str = "PENTEST_MEMORY_DIR";
/// Overrides the full memory file path.
pub const ENV_MEMORY_FILE: &str = "PENTEST_MEMORY_FILE";
/// Overrides the retained message count.
pub const ENV_MAX_MESSAGES: &str = "PENTEST_MEMORY_MAX_MESSAGES";

/// Penetration-test phase owning a memory file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Phase {
    #[strum(to_string = "enumeration", serialize = "enum")]
    Enumeration,
    #[strum(to_string = "recon", serialize = "reconnaissance")]
    Recon,
}

impl Phase {
    /// File name used when no override is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Enumeration => "enumeration_memory.json",
            Self::Recon => "recon_memory.json",
        }
    }
}

/// Storage location and retention bound for one conversation store.
///
/// # Example
/// ```
/// use pentest_memory::config::MemoryConfig;
///
/// let config = MemoryConfig::builder()
///     .path("recon_memory.json")
///     .max_messages(50)
///     .build();
/// assert_eq!(config.max_messages, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct MemoryConfig {
    #[builder(into)]
    pub path: PathBuf,
    #[builder(default = DEFAULT_MAX_MESSAGES)]
    pub max_messages: usize,
}

impl MemoryConfig {
    /// Default config for a phase, relative to the working directory.
    pub fn for_phase(phase: Phase) -> Self {
        Self {
            path: PathBuf::from(phase.default_file_name()),
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }

    /// Phase defaults overlaid with environment variables (and `.env`).
    pub fn from_env(phase: Phase) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::for_phase(phase);
        config.apply_env(phase, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Full resolution: phase defaults, then the config file, then env.
    ///
    /// A missing config file is skipped.
    pub fn resolve(phase: Phase, config_file: Option<&Path>) -> Result<Self> {
        let config = Self::resolve_layers(phase, config_file)?;
        config.validate()?;
        Ok(config)
    }

    /// Phase defaults, the config file and env, without validation.
    ///
    /// Callers layering further overrides on top validate once they are done.
    pub fn resolve_layers(phase: Phase, config_file: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::for_phase(phase);
        let file = config_file
            .map(Path::to_path_buf)
            .or_else(default_config_path);
        if let Some(path) = file.filter(|p| p.exists()) {
            tracing::debug!(path = %path.display(), "loading memory config file");
            config.apply_file(phase, &ConfigFile::read(&path)?);
        }
        config.apply_env(phase, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Phase defaults overlaid with a TOML document.
    pub fn from_toml_str(phase: Phase, raw: &str) -> Result<Self> {
        let mut config = Self::for_phase(phase);
        config.apply_file(phase, &toml::from_str(raw)?);
        config.validate()?;
        Ok(config)
    }

    /// Phase defaults overlaid with a TOML file.
    pub fn from_file(phase: Phase, path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::for_phase(phase);
        config.apply_file(phase, &ConfigFile::read(path.as_ref())?);
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from a variable lookup.
    ///
    /// `PENTEST_MEMORY_FILE` wins over `PENTEST_MEMORY_DIR`. Values are not
    /// validated here since a later layer may still replace them.
    pub fn apply_env<F>(&mut self, phase: Phase, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_MEMORY_DIR).filter(|v| !v.trim().is_empty()) {
            self.path = PathBuf::from(dir).join(phase.default_file_name());
        }
        if let Some(file) = lookup(ENV_MEMORY_FILE).filter(|v| !v.trim().is_empty()) {
            self.path = PathBuf::from(file);
        }
        if let Some(raw) = lookup(ENV_MAX_MESSAGES) {
            self.max_messages = raw.trim().parse().map_err(|_| {
                MemoryError::Configuration(format!(
                    "{ENV_MAX_MESSAGES} must be a positive integer, got '{raw}'"
                ))
            })?;
        }
        Ok(())
    }

    fn apply_file(&mut self, phase: Phase, file: &ConfigFile) {
        let section = &file.memory;
        if let Some(max) = section.max_messages {
            self.max_messages = max;
        }
        let file_name = section
            .phase(phase)
            .and_then(|p| p.file.clone())
            .unwrap_or_else(|| PathBuf::from(phase.default_file_name()));
        self.path = match &section.dir {
            Some(dir) => dir.join(file_name),
            None => file_name,
        };
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_messages == 0 {
            return Err(MemoryError::Configuration(
                "max_messages must be at least 1".into(),
            ));
        }
        if self.path.file_name().is_none() {
            return Err(MemoryError::Configuration(format!(
                "memory path {} has no file name",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Default location of the optional TOML config file.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pentest-memory")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    memory: MemorySection,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MemorySection {
    dir: Option<PathBuf>,
    max_messages: Option<usize>,
    enumeration: Option<PhaseSection>,
    recon: Option<PhaseSection>,
}

impl MemorySection {
    fn phase(&self, phase: Phase) -> Option<&PhaseSection> {
        match phase {
            Phase::Enumeration => self.enumeration.as_ref(),
            Phase::Recon => self.recon.as_ref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhaseSection {
    file: Option<PathBuf>,
}
