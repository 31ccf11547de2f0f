use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};

use crate::{notice::DEFAULT_NOTICE_MS, parking::SpotGeneration};

pub const SETTINGS_PATH_VAR: &str = "MAUQIFI_SETTINGS";
pub const SEED_VAR: &str = "MAUQIFI_SEED";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkingSettings {
    pub spot_count: u32,
    /// Share of spots that start out free.
    pub free_ratio: f64,
    pub min_distance_m: u32,
    pub max_distance_m: u32,
    pub tick_interval_ms: u64,
    pub notice_duration_ms: u64,
    /// Fixed seed for spot generation; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ParkingSettings {
    fn default() -> Self {
        let generation = SpotGeneration::default();
        Self {
            spot_count: generation.count,
            free_ratio: generation.free_ratio,
            min_distance_m: generation.min_distance_m,
            max_distance_m: generation.max_distance_m,
            tick_interval_ms: 1000,
            notice_duration_ms: DEFAULT_NOTICE_MS,
            seed: None,
        }
    }
}

impl ParkingSettings {
    /// Reads settings from `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            Self::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, overlaid with the file named by `MAUQIFI_SETTINGS` and the
    /// seed in `MAUQIFI_SEED`.
    pub fn from_env() -> Result<Self> {
        let mut settings = match env::var(SETTINGS_PATH_VAR) {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(seed) = env::var(SEED_VAR) {
            let seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got '{seed}'"))?;
            settings.seed = Some(seed);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.spot_count == 0 {
            bail!("spotCount must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.free_ratio) {
            bail!("freeRatio must be between 0 and 1, got {}", self.free_ratio);
        }
        if self.min_distance_m > self.max_distance_m {
            bail!(
                "minDistanceM ({}) exceeds maxDistanceM ({})",
                self.min_distance_m,
                self.max_distance_m
            );
        }
        if self.tick_interval_ms == 0 {
            bail!("tickIntervalMs must be greater than zero");
        }
        Ok(())
    }

    pub fn spot_generation(&self) -> SpotGeneration {
        SpotGeneration {
            count: self.spot_count,
            free_ratio: self.free_ratio,
            min_distance_m: self.min_distance_m,
            max_distance_m: self.max_distance_m,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_file(contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("mauqifi-settings-{}.json", Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_means_defaults() {
        let path = env::temp_dir().join(format!("mauqifi-absent-{}.json", Uuid::new_v4()));
        let settings = ParkingSettings::load(&path).unwrap();
        assert_eq!(settings, ParkingSettings::default());
        assert_eq!(settings.spot_count, 18);
        assert_eq!(settings.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = scratch_file(r#"{ "spotCount": 40, "seed": 7 }"#);
        let settings = ParkingSettings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.spot_count, 40);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.free_ratio, 0.65);
        assert_eq!(settings.spot_generation().count, 40);
    }

    #[test]
    fn rejects_bad_values() {
        let path = scratch_file(r#"{ "freeRatio": 1.5 }"#);
        let err = ParkingSettings::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("freeRatio"));

        let inverted = ParkingSettings {
            min_distance_m: 300,
            ..ParkingSettings::default()
        };
        assert!(inverted.validate().is_err());

        let no_spots = ParkingSettings {
            spot_count: 0,
            ..ParkingSettings::default()
        };
        assert!(no_spots.validate().is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let path = scratch_file("{ not json");
        let err = ParkingSettings::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("Failed to parse settings"));
    }
}
