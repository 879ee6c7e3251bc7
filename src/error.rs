use thiserror::Error;

/// Failure kinds surfaced by the controller.
///
/// Every variant is recovered at the call site. A failed [`send`] deliberately
/// leaves the connection open so the user can retry or disconnect; the link is
/// torn down only by an explicit disconnect or a failed connect.
///
/// [`send`]: crate::SerialDeviceController::send_command
#[derive(Debug, Error)]
pub enum Error {
    #[error("No ports found!")]
    NoPortsFound,

    #[error("No port selected")]
    NoPortSelected,

    #[error("Failed to open port {port}: {source}")]
    ConnectFailed {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Not connected")]
    NotConnected,

    #[error("Error sending command: {0}")]
    SendFailed(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
