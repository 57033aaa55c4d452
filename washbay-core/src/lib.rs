// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Core types for the washbay controller.
//!
//! Everything in this crate is synchronous and free of side effects. The
//! runtime drives these types against real (or simulated) hardware.

pub mod alignment;
pub mod io;
pub mod stage;

pub use alignment::{decide, AlignmentState, Decision, Instruction};
pub use io::{Barrier, Channel, Level, Output};
pub use stage::{CycleResult, Stage};

pub trait Identity {
    /// Introduction message.
    ///
    /// Returns a string to introduce the object for the first time and
    /// should only be called once.
    fn intro() -> String;
}
