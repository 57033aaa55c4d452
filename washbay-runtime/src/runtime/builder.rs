use washbay_core::CycleResult;

use crate::{
    device::{BlynkSink, ConsoleSink, Device, SimulatedBay, SimulatedDetector, StatusSink},
    runtime::{self, RuntimeContext, Sequencer},
    Config,
};

/// Runtime builder.
///
/// The runtime builder creates the bay devices from the configuration and
/// presents the caller with a simple method to run a wash cycle.
///
/// The runtime builder *must* be used to construct a runtime.
pub struct Builder<'a> {
    /// Current application configuration.
    config: &'a Config,
    /// Runtime context.
    context: RuntimeContext,
    /// Whether remote telemetry may be used.
    telemetry: bool,
}

impl<'a> Builder<'a> {
    /// Construct runtime from configuration.
    ///
    /// The configuration is validated before anything is created.
    pub fn from_config(config: &'a Config) -> runtime::Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            context: RuntimeContext::new(),
            telemetry: true,
        })
    }

    /// Report status to the log only.
    pub fn disable_telemetry(mut self) -> Self {
        self.telemetry = false;
        self
    }

    /// Cancel the cycle on a termination signal.
    ///
    /// Must be called from within the async runtime.
    pub fn enable_term_shutdown(self) -> Self {
        info!("Enable signals shutdown");

        let trigger = self.context.shutdown_trigger();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for termination signal: {}", e);
                return;
            }

            info!("Termination requested");

            if trigger.send(()).is_err() {
                debug!("No cycle is running");
            }
        });

        self
    }

    fn status_sink(&self) -> runtime::Result<Box<dyn StatusSink>> {
        if self.telemetry && self.config.telemetry.enabled {
            Ok(Box::new(BlynkSink::new(&self.config.telemetry)?))
        } else {
            Ok(Box::new(ConsoleSink::new()))
        }
    }

    /// Run a single wash cycle.
    ///
    /// Errors are limited to device setup. Faults during the cycle are part
    /// of the cycle result.
    pub async fn spawn(self) -> runtime::Result<CycleResult> {
        let mut port = SimulatedBay::new(&self.config.simulation);
        let mut detector = SimulatedDetector::new(&self.config.simulation);
        let mut sink = self.status_sink()?;

        port.setup().await?;
        detector.setup().await?;
        sink.setup().await?;

        info!(
            "Bay port: {}, vehicle detector: {}, status sink: {}",
            port.name(),
            detector.name(),
            sink.name()
        );

        let mut sequencer = Sequencer::new(
            port,
            sink,
            detector,
            self.config.cycle.clone(),
            self.context.shutdown_signal(),
        );

        let result = sequencer.run().await;

        debug!("Vehicle images captured: {}", sequencer.detector().captures());

        Ok(result)
    }
}
