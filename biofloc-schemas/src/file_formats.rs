use crate::tank::TankConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// File names of the three tables, relative to `data_dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub measurements: String,
    pub mortality: String,
    pub expenses: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            measurements: "biofloc_research.csv".to_string(),
            mortality: "mortality.csv".to_string(),
            expenses: "finance.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntryDefaults {
    pub feed_rate_pct: f64,
    pub protein_pct: f64,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            feed_rate_pct: 2.0,
            protein_pct: 30.0,
        }
    }
}

/// The optional `biofloc.yaml` settings file. Every field may be omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub schema_version: String,
    pub data_dir: PathBuf,
    pub tables: TableFiles,
    pub write_bom: bool,
    pub plots_dir: PathBuf,
    pub tank: TankConfig,
    pub entry_defaults: EntryDefaults,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            schema_version: "1".to_string(),
            data_dir: PathBuf::from("."),
            tables: TableFiles::default(),
            write_bom: true,
            plots_dir: PathBuf::from("plots"),
            tank: TankConfig::default(),
            entry_defaults: EntryDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let yaml = "data_dir: ./data\ntank:\n  tank_id: Exp-02\n  water_volume_m3: 8.0\n";
        let settings: SettingsFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("./data"));
        assert_eq!(settings.tank.tank_id, "Exp-02");
        assert_eq!(settings.tank.water_volume_m3, 8.0);
        assert_eq!(settings.tank.stocking_density, 100.0);
        assert_eq!(settings.tables.mortality, "mortality.csv");
        assert!(settings.write_bom);
        assert_eq!(settings.entry_defaults.protein_pct, 30.0);
    }
}
