use washbay_core::{Barrier, Channel, Level, Output};

mod console;
mod error;
pub mod net;
mod r#virtual;

pub use console::ConsoleSink;
pub use error::{DeviceError, ErrorKind, Result};
pub use net::blynk::BlynkSink;
pub use r#virtual::bay::SimulatedBay;
pub use r#virtual::detector::SimulatedDetector;

/// Device trait.
#[async_trait::async_trait]
pub trait Device: Send {
    /// Return the device name.
    fn name(&self) -> String;

    /// Prepare the device for use.
    ///
    /// Can be used to signal that the device is ready.
    /// Implementation is optional.
    async fn setup(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Actuator and sensor port of the bay.
///
/// Every call blocks until the hardware has completed the request. Errors
/// are hardware faults and are never retried by the caller.
#[async_trait::async_trait]
pub trait BayPort: Device {
    /// Open a barrier.
    ///
    /// Opening an open barrier is a no-op.
    async fn open_barrier(&mut self, barrier: Barrier) -> Result<()>;

    /// Close a barrier.
    ///
    /// Closing a closed barrier is a no-op.
    async fn close_barrier(&mut self, barrier: Barrier) -> Result<()>;

    /// Drive a discrete output.
    async fn set_output(&mut self, output: Output, level: Level) -> Result<()>;

    /// Read the distance to the vehicle in centimeters.
    ///
    /// The sensor may return an out of range value on fault.
    async fn read_distance(&mut self) -> Result<f32>;
}

/// Status display and telemetry endpoint.
///
/// Status reporting is best effort, the caller logs and ignores errors.
#[async_trait::async_trait]
pub trait StatusSink: Device {
    /// Replace the display contents with two lines of text.
    async fn display_text(&mut self, line1: &str, line2: &str) -> Result<()>;

    /// Report a value on a telemetry channel.
    async fn report(&mut self, channel: Channel, value: &str) -> Result<()>;
}

/// Vehicle detector at the bay entry.
#[async_trait::async_trait]
pub trait VehicleDetector: Device {
    /// Wait until a vehicle is detected.
    async fn wait_for_vehicle(&mut self) -> Result<()>;

    /// Capture an image of the detected vehicle.
    ///
    /// Implementation is optional.
    async fn capture(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T: Device + ?Sized> Device for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    async fn setup(&mut self) -> Result<()> {
        (**self).setup().await
    }
}

#[async_trait::async_trait]
impl<T: StatusSink + ?Sized> StatusSink for Box<T> {
    async fn display_text(&mut self, line1: &str, line2: &str) -> Result<()> {
        (**self).display_text(line1, line2).await
    }

    async fn report(&mut self, channel: Channel, value: &str) -> Result<()> {
        (**self).report(channel, value).await
    }
}
