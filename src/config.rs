use std::time::Duration;

/// Baud rate expected by the reference firmware.
pub const BAUD_RATE: u32 = 9600;

/// Per-read timeout on the open connection.
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Wait after opening the port. Opening the port resets the Arduino, and the
/// sketch needs this long to come back up. There is no ready byte to wait for.
pub const CONNECT_SETTLE: Duration = Duration::from_secs(2);

/// Wait between writing a command and draining the reply. Empirical; the
/// firmware gives no response-ready signal.
pub const COMMAND_SETTLE: Duration = Duration::from_millis(150);

/// Connection parameters of the controller.
///
/// The defaults match the reference firmware and should be kept for real
/// hardware. Tests shrink the settle delays to run against a pty pair.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub connect_settle: Duration,
    pub command_settle: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            baud_rate: BAUD_RATE,
            read_timeout: READ_TIMEOUT,
            connect_settle: CONNECT_SETTLE,
            command_settle: COMMAND_SETTLE,
        }
    }
}
