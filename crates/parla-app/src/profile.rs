use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parla_config::Config;
use serde::{Deserialize, Serialize};

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Directory holding `<name>.json` profiles
pub struct ProfileDir {
    root: PathBuf,
}

impl ProfileDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<config dir>/parla/profiles`
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("parla").join("profiles")))
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Create the profiles folder and a main profile if missing
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let main_profile = self.profile_path("main");

        if !main_profile.exists() {
            // Defaults only; secrets from the environment never hit disk
            let profile = Profile {
                name: "main".into(),
                value: Config::default(),
            };
            fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
            tracing::info!("Created main profile at {}", main_profile.display());
        }

        Ok(())
    }

    /// Load a profile by name, falling back to main and then to defaults.
    /// Environment overrides are applied on top.
    pub fn load(&self, name: &str) -> anyhow::Result<Config> {
        let profile_file = self.profile_path(name);
        let main_file = self.profile_path("main");

        let mut config = if profile_file.exists() {
            read_profile(&profile_file)?
        } else {
            tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
            if main_file.exists() {
                read_profile(&main_file)?
            } else {
                Config::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Add a new profile cloned from main
    pub fn add_from_main(&self, new_name: &str) -> anyhow::Result<PathBuf> {
        let main_file = self.profile_path("main");
        let value = if main_file.exists() {
            read_profile(&main_file)?
        } else {
            Config::default()
        };

        let profile = Profile {
            name: new_name.into(),
            value,
        };
        let file = self.profile_path(new_name);
        fs::write(&file, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created new profile: {new_name}");
        Ok(file)
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Malformed profile {}", path.display()))?;
    Ok(profile.value)
}
