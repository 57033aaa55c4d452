use std::error;

pub type Result<T> = std::result::Result<T, DeviceError>;

#[derive(Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The device is not available.
    ///
    /// This could indicate that the device is in use by another process or is
    /// not connected to the host.
    NoSuchDevice(String),

    /// The device did not communicate within the given time limit.
    ///
    /// This does not indicate any error on the device side per se. The timeout
    /// duration may have been lower than nominal communication.
    Timeout,

    /// One or multiple parameters were incorrect.
    InvalidInput,

    /// The remote endpoint answered with an unexpected status code.
    Http(u16),

    /// The device reported a hardware fault.
    Fault(String),

    /// An I/O error occured.
    ///
    /// The type of I/O error is determined by the inner `io::ErrorKind`.
    Io(std::io::ErrorKind),
}

#[derive(Debug)]
pub struct DeviceError {
    /// Device name.
    pub device: String,
    /// Error kind.
    pub kind: ErrorKind,
}

impl DeviceError {
    pub fn no_such_device(device: String, resource: &str) -> Self {
        Self {
            device,
            kind: ErrorKind::NoSuchDevice(resource.to_owned()),
        }
    }

    pub fn timeout(device: String) -> Self {
        Self {
            device,
            kind: ErrorKind::Timeout,
        }
    }

    pub fn fault<T: ToString>(device: String, reason: T) -> Self {
        Self {
            device,
            kind: ErrorKind::Fault(reason.to_string()),
        }
    }

    pub fn invalid_input(device: String) -> Self {
        Self {
            device,
            kind: ErrorKind::InvalidInput,
        }
    }
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        match &self.kind {
            ErrorKind::NoSuchDevice(resource) => {
                write!(f, "{}: no such device: {}", self.device, resource)
            }
            ErrorKind::Timeout => write!(f, "{}: communication timeout", self.device),
            ErrorKind::InvalidInput => write!(f, "{}: invalid device parameters", self.device),
            ErrorKind::Http(status) => {
                write!(f, "{}: unexpected response status {}", self.device, status)
            }
            ErrorKind::Fault(reason) => write!(f, "{}: {}", self.device, reason),
            ErrorKind::Io(e) => write!(f, "{}: io error: {:?}", self.device, e),
        }
    }
}

impl error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

impl DeviceError {
    /// Map error from `reqwest::Error` onto device error.
    pub(super) fn from_http(device: String, error: reqwest::Error) -> Self {
        Self {
            device,
            kind: if error.is_timeout() {
                ErrorKind::Timeout
            } else if let Some(status) = error.status() {
                ErrorKind::Http(status.as_u16())
            } else if error.is_builder() {
                ErrorKind::InvalidInput
            } else {
                ErrorKind::Io(std::io::ErrorKind::Other)
            },
        }
    }
}
