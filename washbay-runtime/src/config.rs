use std::{path::Path, time::Duration};

use washbay_core::Channel;

use crate::runtime::{self, Error};

/// Wash cycle timing.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Length of one countdown tick in milliseconds.
    pub time_unit_ms: u64,
    /// Interval between distance samples in milliseconds.
    pub sample_interval_ms: u64,
    /// Time a barrier is held open in milliseconds.
    pub barrier_dwell_ms: u64,
    /// Time the vehicle is given to settle before washing in milliseconds.
    pub wash_settle_ms: u64,
    /// Time the bay is held after the exit barrier closed in milliseconds.
    pub exit_hold_ms: u64,
    /// Maximum number of distance samples while aligning.
    ///
    /// Alignment is unbounded when not set.
    pub max_alignment_samples: Option<u32>,
}

impl CycleConfig {
    #[inline]
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    #[inline]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    #[inline]
    pub fn barrier_dwell(&self) -> Duration {
        Duration::from_millis(self.barrier_dwell_ms)
    }

    #[inline]
    pub fn wash_settle(&self) -> Duration {
        Duration::from_millis(self.wash_settle_ms)
    }

    #[inline]
    pub fn exit_hold(&self) -> Duration {
        Duration::from_millis(self.exit_hold_ms)
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            time_unit_ms: 1_000,
            sample_interval_ms: 100,
            barrier_dwell_ms: 10_000,
            wash_settle_ms: 3_000,
            exit_hold_ms: 10_000,
            max_alignment_samples: None,
        }
    }
}

/// Remote telemetry endpoint.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Whether values are sent to the remote host.
    pub enabled: bool,
    /// Telemetry host.
    pub host: String,
    /// Device authentication token.
    pub token: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Virtual pin of the vehicle status channel.
    pub vehicle_status: String,
    /// Virtual pin of the wash state channel.
    pub wash_state: String,
    /// Virtual pin of the exit flag.
    pub exit_flag: String,
    /// Virtual pin of the wash flag.
    pub wash_flag: String,
}

impl TelemetryConfig {
    /// Virtual pin for the channel.
    pub fn pin(&self, channel: Channel) -> &str {
        match channel {
            Channel::VehicleStatus => &self.vehicle_status,
            Channel::WashState => &self.wash_state,
            Channel::ExitFlag => &self.exit_flag,
            Channel::WashFlag => &self.wash_flag,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "https://blynk.cloud".to_owned(),
            token: String::new(),
            timeout_ms: 5_000,
            vehicle_status: "v1".to_owned(),
            wash_state: "v4".to_owned(),
            exit_flag: "v2".to_owned(),
            wash_flag: "v3".to_owned(),
        }
    }
}

/// Simulated bay hardware.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay before a vehicle arrives in milliseconds.
    pub detect_delay_ms: u64,
    /// Initial distance of the vehicle in centimeters.
    pub start_distance_cm: f32,
    /// Distance the vehicle moves per sample in centimeters.
    pub approach_cm: f32,
    /// Maximum sensor noise in centimeters.
    pub jitter_cm: f32,
    /// Seed of the sensor noise.
    pub seed: u64,
    /// Time per servo degree in milliseconds.
    pub servo_step_ms: u64,
}

impl SimulationConfig {
    /// Distances must be finite for the distance model to stay defined.
    fn validate(&self) -> runtime::Result {
        let distances = [
            ("start_distance_cm", self.start_distance_cm),
            ("approach_cm", self.approach_cm),
            ("jitter_cm", self.jitter_cm),
        ];

        for (name, value) in distances {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be a finite number", name)));
            }
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            detect_delay_ms: 2_000,
            start_distance_cm: 40.0,
            approach_cm: 3.0,
            jitter_cm: 0.3,
            seed: 0x5eed,
            servo_step_ms: 1,
        }
    }
}

/// Washbay configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wash cycle timing.
    pub cycle: CycleConfig,
    /// Telemetry configuration.
    pub telemetry: TelemetryConfig,
    /// Simulation configuration.
    pub simulation: SimulationConfig,
}

impl Config {
    /// Read the configuration from the first existing file.
    ///
    /// The default configuration is returned if none of the files exist.
    pub fn try_from_file<P: AsRef<Path>>(paths: Vec<P>) -> runtime::Result<Self> {
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }

            let contents = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

            let config = Self::try_from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

            debug!("Configuration read from {}", path.display());

            return Ok(config);
        }

        warn!("No configuration file found, using defaults");

        Ok(Self::default())
    }

    fn try_from_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Check the configuration for conflicting settings.
    pub fn validate(&self) -> runtime::Result {
        if self.telemetry.enabled && self.telemetry.token.is_empty() {
            return Err(Error::Config("telemetry is enabled but no token is set".to_owned()));
        }

        if self.cycle.max_alignment_samples == Some(0) {
            return Err(Error::Config("max_alignment_samples must be at least 1".to_owned()));
        }

        self.simulation.validate()
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Cycle: time unit {}ms, sample interval {}ms, barrier dwell {}ms",
            self.cycle.time_unit_ms,
            self.cycle.sample_interval_ms,
            self.cycle.barrier_dwell_ms
        )?;
        match self.cycle.max_alignment_samples {
            Some(max) => writeln!(f, "Alignment: at most {} samples", max)?,
            None => writeln!(f, "Alignment: unbounded")?,
        }
        if self.telemetry.enabled {
            write!(f, "Telemetry: {}", self.telemetry.host)
        } else {
            write!(f, "Telemetry: disabled")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.cycle.time_unit(), Duration::from_secs(1));
        assert_eq!(config.cycle.sample_interval(), Duration::from_millis(100));
        assert_eq!(config.cycle.max_alignment_samples, None);
        assert!(!config.telemetry.enabled);
        assert_eq!(config.telemetry.pin(Channel::VehicleStatus), "v1");
        assert_eq!(config.telemetry.pin(Channel::ExitFlag), "v2");
        assert_eq!(config.telemetry.pin(Channel::WashFlag), "v3");
        assert_eq!(config.telemetry.pin(Channel::WashState), "v4");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::try_from_str(
            r#"
            [cycle]
            time_unit_ms = 500
            max_alignment_samples = 600

            [telemetry]
            enabled = true
            token = "secret"
            wash_state = "v9"
            "#,
        )
        .unwrap();

        assert_eq!(config.cycle.time_unit_ms, 500);
        assert_eq!(config.cycle.sample_interval_ms, 100);
        assert_eq!(config.cycle.max_alignment_samples, Some(600));
        assert_eq!(config.telemetry.host, "https://blynk.cloud");
        assert_eq!(config.telemetry.pin(Channel::WashState), "v9");
        assert_eq!(config.simulation, SimulationConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_file() {
        assert!(Config::try_from_str("[cycle]\ntime_unit_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        config.telemetry.enabled = true;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.cycle.max_alignment_samples = Some(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_non_finite_simulation() {
        let config = Config::try_from_str("[simulation]\njitter_cm = inf").unwrap();
        assert!(config.simulation.jitter_cm.is_infinite());
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = Config::try_from_str("[simulation]\nstart_distance_cm = nan").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.simulation.approach_cm = f32::NEG_INFINITY;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_files() {
        let config = Config::try_from_file(vec!["/nonexistent/washbayd.toml"]).unwrap();
        assert_eq!(config, Config::default());
    }
}
