use washbay_core::Channel;

use super::{Device, Result, StatusSink};

/// Status sink writing to the log.
///
/// Used when no telemetry endpoint is configured.
#[derive(Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Device for ConsoleSink {
    fn name(&self) -> String {
        "console".to_owned()
    }
}

#[async_trait::async_trait]
impl StatusSink for ConsoleSink {
    async fn display_text(&mut self, line1: &str, line2: &str) -> Result<()> {
        if line2.is_empty() {
            info!("Display: {}", line1);
        } else {
            info!("Display: {} / {}", line1, line2);
        }

        Ok(())
    }

    async fn report(&mut self, channel: Channel, value: &str) -> Result<()> {
        debug!("Telemetry {}: {}", channel, value);

        Ok(())
    }
}
