//! Alignment decision engine.
//!
//! Converts a stream of distance samples into a motion instruction for the
//! driver. A sample inside the hold band counts towards the debounce, any
//! sample outside the band resets it.

/// Samples above this distance instruct the vehicle to move forward.
pub const FORWARD_THRESHOLD_CM: f32 = 5.0;

/// Samples below this distance instruct the vehicle to back up.
pub const BACK_THRESHOLD_CM: f32 = 4.0;

/// Consecutive in-band samples required to finish alignment.
pub const STABLE_SAMPLE_COUNT: u32 = 5;

/// Motion instruction for the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Instruction {
    /// Vehicle is too far from the stop position.
    Forward,
    /// No instruction issued yet, vehicle stands still.
    #[default]
    Stop,
    /// Vehicle is too close to the stop position.
    Back,
    /// Vehicle is inside the hold band.
    Hold,
}

impl Instruction {
    /// Whether the bay warning lamp should be lit for this instruction.
    pub fn is_warning(&self) -> bool {
        matches!(self, Instruction::Back | Instruction::Hold)
    }

    /// Whether the vehicle is closer than the hold band allows.
    #[inline]
    pub fn is_too_close(&self) -> bool {
        *self == Instruction::Back
    }

    /// Text shown to the driver.
    pub fn as_display_str(&self) -> &'static str {
        match self {
            Instruction::Forward => "Move Forward",
            Instruction::Back => "Move Back",
            Instruction::Stop | Instruction::Hold => "Stop",
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Forward => write!(f, "forward"),
            Instruction::Stop => write!(f, "stop"),
            Instruction::Back => write!(f, "back"),
            Instruction::Hold => write!(f, "hold"),
        }
    }
}

/// Debounce state carried between samples.
///
/// A fresh state must be used on every entry into the aligning stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AlignmentState {
    /// Consecutive samples inside the hold band.
    pub stable_count: u32,
    /// Instruction issued for the last sample.
    pub last_instruction: Instruction,
}

/// Outcome of a single alignment decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Instruction for the driver.
    pub instruction: Instruction,
    /// Alignment finished with this sample.
    pub done: bool,
    /// State to feed into the next decision.
    pub state: AlignmentState,
}

/// Decide on the next instruction from a distance sample.
///
/// Implausible samples (NaN, negative or infinite) are treated as if the
/// vehicle is too far away. This function is pure, the same sequence of
/// samples always yields the same sequence of decisions.
pub fn decide(sample: f32, state: AlignmentState) -> Decision {
    let instruction = if !sample.is_finite() || sample < 0.0 || sample > FORWARD_THRESHOLD_CM {
        Instruction::Forward
    } else if sample < BACK_THRESHOLD_CM {
        Instruction::Back
    } else {
        Instruction::Hold
    };

    let stable_count = match instruction {
        Instruction::Hold => state.stable_count.saturating_add(1),
        _ => 0,
    };

    Decision {
        instruction,
        done: stable_count == STABLE_SAMPLE_COUNT,
        state: AlignmentState {
            stable_count,
            last_instruction: instruction,
        },
    }
}
