use anyhow::{Context, Result};
use biofloc_core::store::StoreConfig;
use biofloc_schemas::{file_formats::SettingsFile, tank::TankConfig};
use std::{fs, path::Path};
use tracing::{debug, info};

pub const DEFAULT_SETTINGS_PATH: &str = "biofloc.yaml";

/// Per-session overrides of the stocking configuration, taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct TankOverrides {
    pub tank_id: Option<String>,
    pub water_volume_m3: Option<f64>,
    pub stocking_density: Option<f64>,
}

/// Everything a command needs that does not come from its own arguments.
pub struct Settings {
    pub file: SettingsFile,
    pub tank: TankConfig,
}

impl Settings {
    /// Loads the settings file. A missing file at the default location means
    /// "use defaults"; a missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>, overrides: TankOverrides) -> Result<Self> {
        let file = match path {
            Some(path) => load_settings_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_PATH).is_file() => {
                load_settings_file(Path::new(DEFAULT_SETTINGS_PATH))?
            }
            None => {
                debug!("no settings file found, using defaults");
                SettingsFile::default()
            }
        };
        let tank = apply_overrides(&file.tank, overrides);
        Ok(Self { file, tank })
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::from_settings(&self.file)
    }
}

fn load_settings_file(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {:?}", path))?;
    let settings: SettingsFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

fn apply_overrides(base: &TankConfig, overrides: TankOverrides) -> TankConfig {
    TankConfig {
        tank_id: overrides.tank_id.unwrap_or_else(|| base.tank_id.clone()),
        water_volume_m3: overrides.water_volume_m3.unwrap_or(base.water_volume_m3),
        stocking_density: overrides.stocking_density.unwrap_or(base.stocking_density),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_file_is_loaded_and_overridden() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(
            &path,
            "data_dir: ./records\nwrite_bom: false\ntank:\n  tank_id: Exp-07\n  water_volume_m3: 9.0\n  stocking_density: 80.0\n",
        )
        .unwrap();

        let settings = Settings::load(
            Some(&path),
            TankOverrides {
                stocking_density: Some(120.0),
                ..TankOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(settings.tank.tank_id, "Exp-07");
        assert_eq!(settings.tank.water_volume_m3, 9.0);
        assert_eq!(settings.tank.stocking_density, 120.0);
        let store_config = settings.store_config();
        assert!(!store_config.write_bom);
        assert_eq!(store_config.data_dir, std::path::PathBuf::from("./records"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(Settings::load(Some(&missing), TankOverrides::default()).is_err());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "tank: [this is not a tank").unwrap();
        assert!(Settings::load(Some(&path), TankOverrides::default()).is_err());
    }
}
