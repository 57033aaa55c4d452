use std::time::Duration;

use reqwest::Url;
use washbay_core::Channel;

use crate::{
    consts,
    device::{ConsoleSink, Device, DeviceError, ErrorKind, Result, StatusSink},
    TelemetryConfig,
};

const DEVICE_NAME: &str = "blynk";

/// Blynk cloud telemetry sink.
///
/// Every report is a single fire-and-forget HTTP update of one virtual pin.
/// Display text has no remote counterpart and is written to the log.
pub struct BlynkSink {
    client: reqwest::Client,
    url: Url,
    token: String,
    config: TelemetryConfig,
    console: ConsoleSink,
}

impl BlynkSink {
    /// Construct the sink from the telemetry configuration.
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        let url = Url::parse(&config.host)
            .and_then(|host| host.join("external/api/update"))
            .map_err(|_| DeviceError::no_such_device(DEVICE_NAME.to_owned(), &config.host))?;

        if config.token.is_empty() {
            return Err(DeviceError::invalid_input(DEVICE_NAME.to_owned()));
        }

        let client = reqwest::Client::builder()
            .user_agent(format!("washbayd/{}", consts::VERSION))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DeviceError::from_http(DEVICE_NAME.to_owned(), e))?;

        Ok(Self {
            client,
            url,
            token: config.token.clone(),
            config: config.clone(),
            console: ConsoleSink::new(),
        })
    }

    /// Update endpoint of the telemetry host.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl Device for BlynkSink {
    fn name(&self) -> String {
        DEVICE_NAME.to_owned()
    }
}

#[async_trait::async_trait]
impl StatusSink for BlynkSink {
    async fn display_text(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.console.display_text(line1, line2).await
    }

    async fn report(&mut self, channel: Channel, value: &str) -> Result<()> {
        let pin = self.config.pin(channel);

        let response = self
            .client
            .get(self.url.clone())
            .query(&[("token", self.token.as_str()), (pin, value)])
            .send()
            .await
            .map_err(|e| DeviceError::from_http(self.name(), e))?;

        if response.status().is_success() {
            trace!("Value of {} ({}) updated to '{}'", channel, pin, value);
            Ok(())
        } else {
            Err(DeviceError {
                device: self.name(),
                kind: ErrorKind::Http(response.status().as_u16()),
            })
        }
    }
}
