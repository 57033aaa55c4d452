// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `washbay` library provides the runtime of the automated car wash.
///
/// The `device` module defines the hardware seams of the bay: the actuator
/// and sensor port, the status sink and the vehicle detector, together with
/// a simulated bay and the Blynk telemetry sink. The `driver` module contains
/// the barrier servo model.
///
/// The `runtime` module contains the `Sequencer` which runs a single wash
/// cycle, the `RuntimeContext` which carries the shutdown signal and the
/// `Builder` which wires devices from the configuration.
pub mod device;
pub mod driver;
pub mod logger;
pub mod runtime;

#[macro_use]
extern crate log;

mod config;

pub use self::config::*;

pub use washbay_core as core;

pub use self::runtime::Error;

/// Washbay runtime module containing various constants.
pub mod consts {
    /// Washbay runtime version.
    ///
    /// # Example
    ///
    /// ```
    /// use washbay::consts::VERSION;
    ///
    /// println!("Washbay runtime version: {}", VERSION);
    /// ```
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Number of time units in a wash or dry countdown.
    ///
    /// A countdown reports every value from this number down to and
    /// including zero.
    pub const COUNTDOWN_TICKS: u32 = 10;

    /// Default system configuration file.
    pub const DEFAULT_CONFIG_PATH: &str = "/etc/washbay/washbayd.toml";

    /// Default configuration file in the working directory.
    pub const LOCAL_CONFIG_FILE: &str = "washbayd.toml";
}

/// The wash bay controller.
pub struct Washbay;

impl washbay_core::Identity for Washbay {
    /// The introduction message makes it easier to spot the current running
    /// configuration.
    fn intro() -> String {
        format!(
            "Hello, I'm a {} 🚗. Bring me your dirty cars! 🫧",
            ansi_term::Color::Cyan.paint("car wash")
        )
    }
}
