use std::time::Duration;

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use washbay_core::{
    decide, AlignmentState, Barrier, Channel, CycleResult, Level, Output, Stage,
};

use crate::{
    consts,
    device::{BayPort, DeviceError, StatusSink, VehicleDetector},
    runtime::{self, Error},
    CycleConfig,
};

/// Resolves when a shutdown is requested.
///
/// A closed channel can never deliver a shutdown, so the future never
/// resolves in that case.
async fn cancelled(shutdown: &mut broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        Err(RecvError::Closed) => std::future::pending::<()>().await,
    }
}

/// Wash cycle sequencer.
///
/// The sequencer owns the bay devices for the duration of a single cycle and
/// runs the stages in order. Every exit path releases the outputs and sends a
/// final status message.
pub struct Sequencer<P, S, D> {
    port: P,
    sink: S,
    detector: D,
    config: CycleConfig,
    shutdown: broadcast::Receiver<()>,
    stage: Stage,
    history: Vec<Stage>,
}

impl<P: BayPort, S: StatusSink, D: VehicleDetector> Sequencer<P, S, D> {
    pub fn new(
        port: P,
        sink: S,
        detector: D,
        config: CycleConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            port,
            sink,
            detector,
            config,
            shutdown,
            stage: Stage::AwaitingVehicle,
            history: vec![Stage::AwaitingVehicle],
        }
    }

    #[inline]
    pub fn port(&self) -> &P {
        &self.port
    }

    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Current stage.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every stage entered during the cycle, in order.
    #[inline]
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Run a single wash cycle.
    pub async fn run(&mut self) -> CycleResult {
        info!("Wash cycle started");

        let result = match self.cycle().await {
            Ok(()) => CycleResult::Success,
            Err(Error::Cancelled) => {
                warn!("Wash cycle in stage '{}' cancelled by operator", self.stage);
                CycleResult::Aborted
            }
            Err(e) => {
                error!("Wash cycle in stage '{}' failed: {}", self.stage, e);
                CycleResult::Failed(e.to_string())
            }
        };

        if !result.is_success() {
            self.transition(Stage::Aborted);
        }

        self.release().await;
        self.final_message(&result).await;

        info!("Wash cycle finished: {}", result);

        result
    }

    async fn cycle(&mut self) -> runtime::Result {
        self.setup().await?;

        self.await_vehicle().await?;
        self.advance(Stage::EntryOpen)?;

        self.admit_vehicle().await?;
        self.advance(Stage::Aligning)?;

        self.align().await?;
        self.advance(Stage::Washing)?;

        self.wash().await?;
        self.advance(Stage::Drying)?;

        self.dry().await?;
        self.release_vehicle().await?;
        self.advance(Stage::Complete)?;

        Ok(())
    }

    /// Drive the idle indicator state.
    async fn setup(&mut self) -> runtime::Result {
        self.output(Output::EntryStop, Level::High).await?;
        self.output(Output::BayWarning, Level::High).await?;
        self.output(Output::EntryGo, Level::Low).await?;
        self.output(Output::ExitGo, Level::Low).await?;
        self.output(Output::Pump, Level::Low).await?;

        self.report(Channel::ExitFlag, "0").await;
        self.report(Channel::WashFlag, "0").await;

        Ok(())
    }

    async fn await_vehicle(&mut self) -> runtime::Result {
        self.report(Channel::VehicleStatus, self.stage.label()).await;

        info!("Waiting for vehicle");

        tokio::select! {
            detected = self.detector.wait_for_vehicle() => detected?,
            _ = cancelled(&mut self.shutdown) => return Err(Error::Cancelled),
        };

        info!("Vehicle detected");

        if let Err(e) = self.detector.capture().await {
            warn!("Vehicle image capture failed: {}", e);
        }

        self.display("Car Detected", "").await;
        self.report(Channel::VehicleStatus, "Car Detected").await;

        Ok(())
    }

    /// Let the vehicle pass the entry barrier.
    async fn admit_vehicle(&mut self) -> runtime::Result {
        self.output(Output::EntryStop, Level::Low).await?;
        self.output(Output::BayWarning, Level::Low).await?;
        self.output(Output::EntryGo, Level::High).await?;

        self.port.open_barrier(Barrier::Entry).await?;
        self.display("Barricade Opened", "").await;
        self.report(Channel::VehicleStatus, "Barricade Opened").await;

        self.pause(self.config.barrier_dwell()).await?;

        self.port.close_barrier(Barrier::Entry).await?;
        self.display("Barricade Closed", "").await;
        self.report(Channel::VehicleStatus, "Barricade Closed").await;

        self.output(Output::EntryGo, Level::Low).await?;
        self.output(Output::EntryStop, Level::High).await?;

        Ok(())
    }

    /// Guide the vehicle into the wash position.
    async fn align(&mut self) -> runtime::Result {
        let mut state = AlignmentState::default();
        let mut samples = 0;

        loop {
            self.checkpoint()?;

            if let Some(max) = self.config.max_alignment_samples {
                if samples >= max {
                    return Err(Error::AlignmentTimeout(max));
                }
            }

            let sample = self.port.read_distance().await?;
            samples += 1;

            let decision = decide(sample, state);

            trace!(
                "Distance sample {}: {:.2}cm, {:?} ({}/{})",
                samples,
                sample,
                decision.instruction,
                decision.state.stable_count,
                washbay_core::alignment::STABLE_SAMPLE_COUNT
            );

            if decision.instruction != state.last_instruction {
                self.output(Output::BayWarning, decision.instruction.is_warning().into())
                    .await?;
                self.display(decision.instruction.as_display_str(), "").await;

                if decision.instruction.is_too_close() {
                    debug!("Vehicle too close at {:.2}cm", sample);
                }
            }

            state = decision.state;

            if decision.done {
                break;
            }

            self.pause(self.config.sample_interval()).await?;
        }

        info!("Vehicle aligned after {} samples", samples);

        self.display("Begin Washing", "").await;
        self.report(Channel::VehicleStatus, "Begin Washing").await;

        self.pause(self.config.wash_settle()).await
    }

    async fn wash(&mut self) -> runtime::Result {
        self.report(Channel::ExitFlag, "0").await;
        self.report(Channel::WashFlag, "1").await;

        self.output(Output::Pump, Level::High).await?;
        self.countdown("Washing.").await?;
        self.output(Output::Pump, Level::Low).await
    }

    async fn dry(&mut self) -> runtime::Result {
        self.countdown("Drying.").await
    }

    /// Let the vehicle pass the exit barrier.
    async fn release_vehicle(&mut self) -> runtime::Result {
        self.display("Process Complete.", "Thank You.").await;
        self.report(Channel::VehicleStatus, "Car is done washing").await;

        self.output(Output::BayWarning, Level::Low).await?;
        self.output(Output::ExitGo, Level::High).await?;

        self.report(Channel::ExitFlag, "1").await;
        self.report(Channel::WashFlag, "0").await;

        self.port.open_barrier(Barrier::Exit).await?;

        self.pause(self.config.barrier_dwell()).await?;

        self.port.close_barrier(Barrier::Exit).await?;

        self.output(Output::ExitGo, Level::Low).await?;
        self.output(Output::BayWarning, Level::High).await?;

        self.pause(self.config.exit_hold()).await
    }

    /// Count down the current stage.
    ///
    /// Every value from the start of the countdown to zero is reported.
    async fn countdown(&mut self, text: &str) -> runtime::Result {
        for remaining in (0..=consts::COUNTDOWN_TICKS).rev() {
            self.checkpoint()?;

            self.display(text, &format!("Time Left:{}", remaining)).await;
            self.report(Channel::VehicleStatus, self.stage.label()).await;
            self.report(Channel::WashState, &remaining.to_string()).await;

            if remaining > 0 {
                self.pause(self.config.time_unit()).await?;
            }
        }

        Ok(())
    }

    /// Force all outputs into the safe state.
    ///
    /// Every output is attempted, failures are only logged.
    async fn release(&mut self) {
        for output in Output::ALL {
            if let Err(e) = self.port.set_output(output, Level::Low).await {
                error!("Failed to release {}: {}", output, e);
            }
        }

        debug!("All outputs released");
    }

    async fn final_message(&mut self, result: &CycleResult) {
        match result {
            CycleResult::Success => {
                self.report(Channel::VehicleStatus, "Car is done washing").await;
            }
            CycleResult::Aborted => {
                self.display("Process Aborted.", "Please Wait.").await;
                self.report(Channel::VehicleStatus, "Aborted").await;
            }
            CycleResult::Failed(reason) => {
                self.display("Out Of Order.", "Call Attendant.").await;
                let status = format!("Failed: {}", reason);
                self.report(Channel::VehicleStatus, &status).await;
            }
        }
    }

    fn advance(&mut self, stage: Stage) -> runtime::Result {
        self.checkpoint()?;
        self.transition(stage);

        Ok(())
    }

    fn transition(&mut self, stage: Stage) {
        if !self.stage.can_transition(stage) {
            warn!("Ignored stage transition '{}' -> '{}'", self.stage, stage);
            return;
        }

        debug!("Stage '{}' -> '{}'", self.stage, stage);

        self.stage = stage;
        self.history.push(stage);
    }

    /// Check for a pending shutdown without waiting.
    fn checkpoint(&mut self) -> runtime::Result {
        match self.shutdown.try_recv() {
            Ok(()) | Err(TryRecvError::Lagged(_)) => Err(Error::Cancelled),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => Ok(()),
        }
    }

    /// Wait for the duration unless a shutdown is requested.
    async fn pause(&mut self, duration: Duration) -> runtime::Result {
        self.checkpoint()?;

        if duration.is_zero() {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = cancelled(&mut self.shutdown) => Err(Error::Cancelled),
        }
    }

    async fn output(&mut self, output: Output, level: Level) -> runtime::Result {
        if output == Output::Pump && level == Level::High && !self.stage.pump_allowed() {
            return Err(DeviceError::invalid_input(output.to_string()).into());
        }

        self.port.set_output(output, level).await?;

        Ok(())
    }

    async fn display(&mut self, line1: &str, line2: &str) {
        if let Err(e) = self.sink.display_text(line1, line2).await {
            warn!("Display update failed: {}", e);
        }
    }

    async fn report(&mut self, channel: Channel, value: &str) {
        if let Err(e) = self.sink.report(channel, value).await {
            warn!("Telemetry update of {} failed: {}", channel, e);
        }
    }
}
