//! Serial control panel driver for Arduino actuator firmware.
//!
//! Owns zero-or-one connection to an Arduino driving an LED (PWM) and a DC
//! motor (direction/speed/brake) and mediates the line-oriented ASCII command
//! protocol: each command is framed with `\r\n`, written, and followed by a
//! short settle wait and a non-blocking drain of whatever the firmware echoed
//! back. Human-readable trace lines are handed to the consumer over a channel
//! so a UI can render the console output.
//!
//! The protocol has no acknowledgement signalling, so absence of a reply is
//! not an error and the two settle delays are empirical rather than computed
//! from any handshake.

mod command;
mod config;
mod error;
mod serial;

pub use command::{DeviceCommand, SPEED_PRESETS};
pub use config::ControllerConfig;
pub use error::{Error, Result};

use std::io::Write;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serialport::SerialPort;

/// Terminator appended to every outgoing command.
pub const LINE_TERMINATOR: &str = "\r\n";

struct Connection {
    port_name: String,
    port: Box<dyn SerialPort>,
}

/// Controller for one serial link to the actuator firmware.
///
/// Every operation is synchronous and blocking; commands are serialized by
/// the caller issuing one at a time. The connection handle is exclusively
/// owned here and is never shared.
pub struct SerialDeviceController {
    config: ControllerConfig,
    log_tx: Sender<String>,
    connection: Option<Connection>,
}

impl SerialDeviceController {
    /// Creates a controller with the reference firmware defaults, together
    /// with the receiving end of its log line channel.
    pub fn new() -> (SerialDeviceController, Receiver<String>) {
        SerialDeviceController::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> (SerialDeviceController, Receiver<String>) {
        let (log_tx, log_rx) = unbounded();
        let controller = SerialDeviceController {
            config,
            log_tx,
            connection: None,
        };
        (controller, log_rx)
    }

    fn log(&self, message: impl Into<String>) {
        // The receiver may already be gone during shutdown.
        let _ = self.log_tx.send(message.into());
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Name of the currently open port, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.port_name.as_str())
    }

    /// Snapshot of the serial devices currently available on the host.
    ///
    /// An empty result is informational, not an error; the summary is logged
    /// either way, matching the panel's refresh button.
    pub fn list_ports(&self) -> Vec<String> {
        let ports = serial::available_port_names();
        if ports.is_empty() {
            self.log("No ports found!");
        } else {
            self.log(format!("Available ports: {}", ports.join(", ")));
        }
        ports
    }

    /// Opens the named device, or closes the current connection if one is
    /// already open (toggle semantics, mirroring a single connect button).
    ///
    /// After a successful open the call blocks for the connect settle delay:
    /// opening the port resets the Arduino and the sketch needs time to boot.
    /// Whatever the firmware printed during boot is then drained and logged.
    /// On failure the state stays closed and no handle is kept.
    pub fn connect(&mut self, port_name: &str) -> Result<()> {
        if self.connection.is_some() {
            self.disconnect();
            return Ok(());
        }
        if port_name.is_empty() {
            self.log("ERROR: No port selected");
            return Err(Error::NoPortSelected);
        }

        self.log(format!(">>> Connecting to {}...", port_name));
        let mut port = match serial::open_port(port_name, &self.config) {
            Ok(port) => port,
            Err(source) => {
                self.log(format!("ERROR: {}", source));
                tracing::warn!("Failed to open serial port {}: {}", port_name, source);
                return Err(Error::ConnectFailed {
                    port: port_name.to_string(),
                    source,
                });
            }
        };

        thread::sleep(self.config.connect_settle);
        for line in serial::drain_lines(&mut port) {
            self.log(format!("Arduino: {}", line));
        }

        self.connection = Some(Connection {
            port_name: port_name.to_string(),
            port,
        });
        self.log(">>> Successfully connected!");
        tracing::info!("Connected to {}", port_name);
        Ok(())
    }

    /// Closes the open connection if any. Idempotent; dropping the handle
    /// closes the device, so there is no close error to report.
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            tracing::info!("Disconnecting from {}", connection.port_name);
            drop(connection);
            self.log(">>> Disconnected");
        }
    }

    /// Writes `command` followed by [`LINE_TERMINATOR`], waits the command
    /// settle delay, then drains and logs any reply lines.
    ///
    /// The protocol is fire-and-forget with best-effort echo: the call
    /// succeeds once the write completed and the drain went idle, whether or
    /// not the firmware said anything back. A write failure is reported as
    /// [`Error::SendFailed`] and leaves the connection open for a retry or an
    /// explicit disconnect.
    pub fn send_command(&mut self, command: &str) -> Result<()> {
        let framed = format!("{}{}", command, LINE_TERMINATOR);
        let write_result = match self.connection.as_mut() {
            None => {
                self.log("ERROR: Not connected");
                return Err(Error::NotConnected);
            }
            Some(connection) => connection.port.write_all(framed.as_bytes()),
        };
        if let Err(e) = write_result {
            self.log(format!("ERROR sending command: {}", e));
            tracing::warn!("Write failed: {}", e);
            return Err(Error::SendFailed(e));
        }
        self.log(format!(">>> Sent: {}", command));

        thread::sleep(self.config.command_settle);
        let replies = match self.connection.as_mut() {
            Some(connection) => serial::drain_lines(&mut connection.port),
            None => Vec::new(),
        };
        for line in replies {
            self.log(format!("Arduino: {}", line));
        }
        Ok(())
    }

    /// [`send_command`] with a typed vocabulary token.
    ///
    /// [`send_command`]: SerialDeviceController::send_command
    pub fn send(&mut self, command: DeviceCommand) -> Result<()> {
        self.send_command(&command.to_string())
    }
}
