/// Discrete output on the bay.
///
/// The numeric value is the physical board pin the output is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Output {
    /// Wash pump relay.
    Pump = 7,
    /// Red lamp at the entry barrier.
    EntryStop = 33,
    /// Red lamp inside the bay, lit while the vehicle is positioned.
    BayWarning = 38,
    /// Green lamp at the entry barrier.
    EntryGo = 35,
    /// Green lamp at the exit barrier.
    ExitGo = 40,
}

impl Output {
    /// All outputs on the bay.
    pub const ALL: [Output; 5] = [
        Output::Pump,
        Output::EntryStop,
        Output::BayWarning,
        Output::EntryGo,
        Output::ExitGo,
    ];

    /// Physical board pin.
    #[inline]
    pub fn pin(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Pump => write!(f, "pump"),
            Output::EntryStop => write!(f, "entry stop lamp"),
            Output::BayWarning => write!(f, "bay warning lamp"),
            Output::EntryGo => write!(f, "entry go lamp"),
            Output::ExitGo => write!(f, "exit go lamp"),
        }
    }
}

/// Output level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Low => write!(f, "off"),
            Level::High => write!(f, "on"),
        }
    }
}

/// Bay barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Barrier {
    Entry,
    Exit,
}

impl std::fmt::Display for Barrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Barrier::Entry => write!(f, "entry barrier"),
            Barrier::Exit => write!(f, "exit barrier"),
        }
    }
}

/// Telemetry channel.
///
/// Channels are opaque slots on the telemetry endpoint. The runtime maps
/// each channel onto a configured key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Channel {
    /// Free text status of the vehicle.
    VehicleStatus,
    /// Remaining time of the active countdown.
    WashState,
    /// Set when the vehicle may leave the bay.
    ExitFlag,
    /// Set while the wash is running.
    WashFlag,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::VehicleStatus => write!(f, "vehicle status"),
            Channel::WashState => write!(f, "wash state"),
            Channel::ExitFlag => write!(f, "exit flag"),
            Channel::WashFlag => write!(f, "wash flag"),
        }
    }
}
