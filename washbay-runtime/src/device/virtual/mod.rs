pub mod bay;
pub mod detector;
