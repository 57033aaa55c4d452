pub use servo::Servo;

pub mod servo;
