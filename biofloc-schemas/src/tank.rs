use serde::{Deserialize, Serialize};

/// Stocking parameters for the tank being worked on this session.
///
/// Never persisted: population is always derived from whatever configuration is
/// currently entered, even if it differs from earlier sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    pub tank_id: String,
    pub water_volume_m3: f64,
    pub stocking_density: f64, // fish per m³
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            tank_id: "Exp-01".to_string(),
            water_volume_m3: 15.0,
            stocking_density: 100.0,
        }
    }
}
