//! Runner settings read from the environment.

use std::path::PathBuf;

use gate_teleport::{TeleportConfig, Tick};
use gate_world::RealmId;

/// Name of the single world this runner hosts.
pub const WORLD_NAME: &str = "world";

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Root of the LMDB environments. `None` keeps gates in memory only.
    pub data_dir: Option<PathBuf>,
    pub target_tps: f32,
    pub pocket_realm: RealmId,
    pub teleport: TeleportConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            target_tps: 20.0,
            pocket_realm: RealmId::new("gate:pocket"),
            teleport: TeleportConfig::default(),
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let target_tps = lookup("TARGET_TPS")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|tps| *tps > 0.0)
            .unwrap_or(defaults.target_tps);

        let cooldown_ticks = lookup("GATE_COOLDOWN_TICKS")
            .and_then(|v| v.parse::<Tick>().ok())
            .unwrap_or(defaults.teleport.cooldown_ticks);

        let revalidate_frame = lookup("GATE_REVALIDATE")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.teleport.revalidate_frame);

        Self {
            data_dir: lookup("GATE_DATA_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            target_tps,
            pocket_realm: lookup("GATE_POCKET_REALM")
                .filter(|v| !v.is_empty())
                .map_or(defaults.pocket_realm, RealmId::new),
            teleport: TeleportConfig {
                cooldown_ticks,
                revalidate_frame,
                ..defaults.teleport
            },
        }
    }

    /// LMDB directory for this runner's world.
    pub fn gate_db_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(WORLD_NAME).join("gates"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> RunnerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RunnerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert!(config.data_dir.is_none());
        assert!(config.gate_db_path().is_none());
        assert_eq!(config.pocket_realm, RealmId::new("gate:pocket"));
        assert_eq!(config.teleport, TeleportConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("GATE_DATA_DIR", "/tmp/gates"),
            ("TARGET_TPS", "40"),
            ("GATE_COOLDOWN_TICKS", "5"),
            ("GATE_REVALIDATE", "off"),
            ("GATE_POCKET_REALM", "gate:elsewhere"),
        ]);
        assert_eq!(
            config.gate_db_path(),
            Some(PathBuf::from("/tmp/gates/world/gates"))
        );
        assert!((config.target_tps - 40.0).abs() < f32::EPSILON);
        assert_eq!(config.teleport.cooldown_ticks, 5);
        assert!(!config.teleport.revalidate_frame);
        assert_eq!(config.pocket_realm, RealmId::new("gate:elsewhere"));
    }

    #[test]
    fn test_garbage_falls_back() {
        let config = config(&[
            ("TARGET_TPS", "-3"),
            ("GATE_COOLDOWN_TICKS", "soon"),
            ("GATE_REVALIDATE", "maybe"),
        ]);
        assert!((config.target_tps - 20.0).abs() < f32::EPSILON);
        assert_eq!(config.teleport, TeleportConfig::default());
    }
}
