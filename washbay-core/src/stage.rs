/// Wash cycle stage.
///
/// Stages run strictly in declaration order. The only way out of the
/// forward order is an abort, which is allowed from any stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    /// Waiting for the detector to report a vehicle.
    AwaitingVehicle,
    /// Entry barrier cycle in progress.
    EntryOpen,
    /// Guiding the vehicle onto the wash position.
    Aligning,
    /// Pump running.
    Washing,
    /// Pump stopped, vehicle drying.
    Drying,
    /// Cycle finished, vehicle released.
    Complete,
    /// Cycle aborted or failed.
    Aborted,
}

impl Stage {
    /// The stage that follows this stage in a regular cycle.
    ///
    /// Terminal stages have no successor.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::AwaitingVehicle => Some(Stage::EntryOpen),
            Stage::EntryOpen => Some(Stage::Aligning),
            Stage::Aligning => Some(Stage::Washing),
            Stage::Washing => Some(Stage::Drying),
            Stage::Drying => Some(Stage::Complete),
            Stage::Complete | Stage::Aborted => None,
        }
    }

    /// Check if this is a terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Aborted)
    }

    /// Check if the stage can move into `other`.
    pub fn can_transition(&self, other: Stage) -> bool {
        match other {
            Stage::Aborted => !self.is_terminal(),
            _ => self.next() == Some(other),
        }
    }

    /// Check if the pump may run in this stage.
    pub fn pump_allowed(&self) -> bool {
        matches!(self, Stage::Washing)
    }

    /// Short label for status reporting.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::AwaitingVehicle => "Waiting",
            Stage::EntryOpen => "Entering",
            Stage::Aligning => "Aligning",
            Stage::Washing => "Washing",
            Stage::Drying => "Drying",
            Stage::Complete => "Complete",
            Stage::Aborted => "Aborted",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::AwaitingVehicle => write!(f, "awaiting vehicle"),
            Stage::EntryOpen => write!(f, "entry open"),
            Stage::Aligning => write!(f, "aligning"),
            Stage::Washing => write!(f, "washing"),
            Stage::Drying => write!(f, "drying"),
            Stage::Complete => write!(f, "complete"),
            Stage::Aborted => write!(f, "aborted"),
        }
    }
}

/// Outcome of a single wash cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleResult {
    /// Vehicle washed and released.
    Success,
    /// Operator cancelled the cycle.
    Aborted,
    /// Hardware fault stopped the cycle.
    Failed(String),
}

impl CycleResult {
    /// Process exit code for this result.
    ///
    /// Startup errors exit with 1, so the cycle codes never collide with it.
    pub fn exit_code(&self) -> u8 {
        match self {
            CycleResult::Success => 0,
            CycleResult::Failed(_) => 2,
            CycleResult::Aborted => 130,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        *self == CycleResult::Success
    }
}

impl std::fmt::Display for CycleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleResult::Success => write!(f, "success"),
            CycleResult::Aborted => write!(f, "aborted"),
            CycleResult::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
