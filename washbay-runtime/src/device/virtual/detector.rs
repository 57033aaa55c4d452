use std::time::Duration;

use crate::{
    device::{Device, Result, VehicleDetector},
    SimulationConfig,
};

/// Simulated vehicle detector.
///
/// Reports a vehicle after a fixed delay.
pub struct SimulatedDetector {
    delay: Duration,
    captures: usize,
}

impl SimulatedDetector {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.detect_delay_ms),
            captures: 0,
        }
    }

    /// Number of images captured so far.
    pub fn captures(&self) -> usize {
        self.captures
    }
}

#[async_trait::async_trait]
impl Device for SimulatedDetector {
    fn name(&self) -> String {
        "simulated detector".to_owned()
    }
}

#[async_trait::async_trait]
impl VehicleDetector for SimulatedDetector {
    async fn wait_for_vehicle(&mut self) -> Result<()> {
        tokio::time::sleep(self.delay).await;

        Ok(())
    }

    async fn capture(&mut self) -> Result<()> {
        self.captures += 1;

        debug!("Captured vehicle image #{}", self.captures);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detect_and_capture() {
        let mut detector = SimulatedDetector::new(&SimulationConfig {
            detect_delay_ms: 0,
            ..Default::default()
        });

        assert!(detector.wait_for_vehicle().await.is_ok());
        assert_eq!(detector.captures(), 0);

        detector.capture().await.unwrap();
        detector.capture().await.unwrap();
        assert_eq!(detector.captures(), 2);
    }
}
