use std::{collections::HashMap, time::Duration};

use rand::{rngs::StdRng, Rng, SeedableRng};
use washbay_core::{Barrier, Level, Output};

use crate::{
    device::{BayPort, Device, DeviceError, Result},
    driver::{servo::SERVO_FREQUENCY, Servo},
    SimulationConfig,
};

/// Distance the simulated driver aims for, in centimeters.
const PARKING_DISTANCE_CM: f32 = 4.5;

/// Simulated bay hardware.
///
/// The vehicle creeps towards the parking position on every distance
/// reading. Sensor noise is drawn from a seeded generator so a run is
/// reproducible for a given configuration.
pub struct SimulatedBay {
    outputs: HashMap<Output, Level>,
    barriers: HashMap<Barrier, Servo>,
    distance: f32,
    approach: f32,
    jitter: f32,
    servo_step: Duration,
    rng: StdRng,
}

impl SimulatedBay {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            outputs: Output::ALL.iter().map(|o| (*o, Level::Low)).collect(),
            barriers: [Barrier::Entry, Barrier::Exit]
                .into_iter()
                .map(|b| (b, Servo::barrier()))
                .collect(),
            distance: config.start_distance_cm,
            approach: config.approach_cm.abs(),
            jitter: config.jitter_cm.abs(),
            servo_step: Duration::from_millis(config.servo_step_ms),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Current level of an output.
    pub fn level(&self, output: Output) -> Level {
        self.outputs.get(&output).copied().unwrap_or_default()
    }

    /// Current barrier servo.
    pub fn barrier(&self, barrier: Barrier) -> Option<&Servo> {
        self.barriers.get(&barrier)
    }

    async fn sweep(&mut self, barrier: Barrier, open: bool) -> Result<()> {
        let step = self.servo_step;

        let servo = match self.barriers.get_mut(&barrier) {
            Some(servo) => servo,
            None => return Err(DeviceError::invalid_input(barrier.to_string())),
        };

        let angles = if open {
            servo.open_sweep()
        } else {
            servo.close_sweep()
        };

        if angles.is_empty() {
            trace!("The {} is already in position", barrier);
            return Ok(());
        }

        for angle in angles {
            let duty = servo.write(angle);
            trace!(
                "The {} servo at {}° ({:.2}% @ {}Hz)",
                barrier,
                angle,
                duty,
                SERVO_FREQUENCY
            );

            if !step.is_zero() {
                tokio::time::sleep(step).await;
            }
        }

        debug!("The {} is {}", barrier, if open { "open" } else { "closed" });

        Ok(())
    }
}

#[async_trait::async_trait]
impl Device for SimulatedBay {
    fn name(&self) -> String {
        "simulated bay".to_owned()
    }
}

#[async_trait::async_trait]
impl BayPort for SimulatedBay {
    async fn open_barrier(&mut self, barrier: Barrier) -> Result<()> {
        self.sweep(barrier, true).await
    }

    async fn close_barrier(&mut self, barrier: Barrier) -> Result<()> {
        self.sweep(barrier, false).await
    }

    async fn set_output(&mut self, output: Output, level: Level) -> Result<()> {
        trace!("Output {} (pin {}) {}", output, output.pin(), level);

        self.outputs.insert(output, level);

        Ok(())
    }

    async fn read_distance(&mut self) -> Result<f32> {
        if self.distance > PARKING_DISTANCE_CM {
            self.distance = (self.distance - self.approach).max(PARKING_DISTANCE_CM);
        }

        let noise = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };

        Ok(self.distance + noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig {
            servo_step_ms: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_vehicle_reaches_parking_distance() {
        let mut bay = SimulatedBay::new(&SimulationConfig {
            jitter_cm: 0.0,
            ..config()
        });

        let mut last = f32::MAX;
        for _ in 0..100 {
            last = bay.read_distance().await.unwrap();
        }

        assert_eq!(last, PARKING_DISTANCE_CM);
    }

    #[tokio::test]
    async fn test_seeded_noise_is_reproducible() {
        let mut a = SimulatedBay::new(&config());
        let mut b = SimulatedBay::new(&config());

        for _ in 0..20 {
            assert_eq!(a.read_distance().await.unwrap(), b.read_distance().await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_barrier_cycle() {
        let mut bay = SimulatedBay::new(&config());

        bay.open_barrier(Barrier::Entry).await.unwrap();
        assert!(bay.barrier(Barrier::Entry).unwrap().is_open());
        assert!(bay.barrier(Barrier::Exit).unwrap().is_closed());

        bay.open_barrier(Barrier::Entry).await.unwrap();
        assert!(bay.barrier(Barrier::Entry).unwrap().is_open());

        bay.close_barrier(Barrier::Entry).await.unwrap();
        assert!(bay.barrier(Barrier::Entry).unwrap().is_closed());
    }

    #[tokio::test]
    async fn test_outputs() {
        let mut bay = SimulatedBay::new(&config());

        assert_eq!(bay.level(Output::Pump), Level::Low);
        bay.set_output(Output::Pump, Level::High).await.unwrap();
        assert_eq!(bay.level(Output::Pump), Level::High);
    }
}
