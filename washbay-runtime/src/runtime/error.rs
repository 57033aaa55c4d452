use std::{error, fmt};

use crate::device::DeviceError;

#[derive(Debug)]
pub enum Error {
    /// A device failed.
    Device(DeviceError),
    /// The cycle was cancelled by the operator.
    Cancelled,
    /// The vehicle did not align within the given number of samples.
    AlignmentTimeout(u32),
    /// The configuration is invalid.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Device(e) => write!(f, "{}", e),
            Error::Cancelled => write!(f, "cancelled by operator"),
            Error::AlignmentTimeout(samples) => {
                write!(f, "vehicle not aligned after {} samples", samples)
            }
            Error::Config(reason) => write!(f, "configuration: {}", reason),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for Error {
    fn from(value: DeviceError) -> Self {
        Error::Device(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error: Error = DeviceError::fault("entry barrier".to_owned(), "servo stalled").into();
        assert_eq!(error.to_string(), "entry barrier: servo stalled");

        assert_eq!(Error::Cancelled.to_string(), "cancelled by operator");
        assert_eq!(
            Error::AlignmentTimeout(600).to_string(),
            "vehicle not aligned after 600 samples"
        );
    }
}
