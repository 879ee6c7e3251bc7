use std::io::{self, Read};

use serialport::SerialPort;

use crate::config::ControllerConfig;

/// Names of the serial devices currently present on the host.
///
/// A fresh snapshot each call; hot-plugged devices only show up on re-query.
/// An enumeration failure is logged and reported as an empty list.
pub fn available_port_names() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            tracing::warn!("Failed to enumerate serial ports: {}", e);
            Vec::new()
        }
    }
}

/// Opens the named device with 8N1 framing at the configured baud rate.
pub fn open_port(
    port_name: &str,
    config: &ControllerConfig,
) -> Result<Box<dyn SerialPort>, serialport::Error> {
    serialport::new(port_name, config.baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(config.read_timeout)
        .open()
}

fn bytes_available(port: &mut Box<dyn SerialPort>) -> usize {
    match port.bytes_to_read() {
        Ok(n) => n as usize,
        Err(e) => {
            tracing::warn!("Failed to query unread byte count: {}", e);
            0
        }
    }
}

/// Consumes every byte the device has buffered so far and splits the result
/// into non-empty lines.
///
/// This is a poll-until-idle drain, not a blocking read: once the port reports
/// no unread data the drain ends, even mid-line. A silent device yields an
/// empty vector immediately. Read errors end the drain without failing the
/// surrounding call.
pub fn drain_lines(port: &mut Box<dyn SerialPort>) -> Vec<String> {
    let mut pending: Vec<u8> = Vec::new();
    loop {
        let n_read = bytes_available(port);
        if n_read == 0 {
            break;
        }
        let mut buf: Vec<u8> = vec![0; n_read];
        match port.read(buf.as_mut_slice()) {
            Ok(0) => break,
            Ok(n) => pending.extend_from_slice(&buf[..n]),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) => {
                tracing::warn!("Read error while draining reply: {}", e);
                break;
            }
        }
    }
    split_lines(&decode_permissive(&pending))
}

/// Decodes UTF-8, dropping malformed sequences instead of failing.
///
/// A truncated sequence at the end of the buffer is dropped as well; reply
/// text is opaque log content, so lost bytes are acceptable.
pub fn decode_permissive(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    let mut rest = data;
    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.push_str(s);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                if let Ok(s) = std::str::from_utf8(valid) {
                    out.push_str(s);
                }
                match e.error_len() {
                    Some(len) => rest = &after[len..],
                    None => break,
                }
            }
        }
    }
    out
}

/// Splits on line terminators, trims each fragment, discards empty lines.
/// A trailing fragment without a terminator still counts as a line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn sleep_ms(duration: u64) {
    std::thread::sleep(std::time::Duration::from_millis(duration));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::TTYPort;
    use std::io::Write;

    #[test]
    fn test_drain_lines() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        master.write(b"LED ON\r\nPWM set to 128\r\n").unwrap();

        let mut slave_ptr = Box::new(slave) as Box<dyn SerialPort>;

        sleep_ms(10);

        let lines = drain_lines(&mut slave_ptr);
        assert_eq!(lines, vec!["LED ON", "PWM set to 128"]);

        // when zero bytes to read
        let lines = drain_lines(&mut slave_ptr);
        assert!(lines.is_empty());
        assert_eq!(slave_ptr.bytes_to_read().unwrap(), 0);
    }

    #[test]
    fn test_drain_lines_keeps_trailing_fragment() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        master.write(b"OK\r\nPARTIAL").unwrap();

        let mut slave_ptr = Box::new(slave) as Box<dyn SerialPort>;

        sleep_ms(10);

        let lines = drain_lines(&mut slave_ptr);
        assert_eq!(lines, vec!["OK", "PARTIAL"]);
    }

    #[test]
    fn test_drain_lines_drops_malformed_bytes() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        master.write(b"Motor \xFF\xFEready\r\n").unwrap();

        let mut slave_ptr = Box::new(slave) as Box<dyn SerialPort>;

        sleep_ms(10);

        let lines = drain_lines(&mut slave_ptr);
        assert_eq!(lines, vec!["Motor ready"]);
    }

    #[test]
    fn test_decode_permissive() {
        assert_eq!(decode_permissive(b"STOP"), "STOP");
        assert_eq!(decode_permissive(b""), "");
        assert_eq!(decode_permissive(b"a\xFFb"), "ab");
        assert_eq!(decode_permissive(b"a\xC3"), "a"); // truncated sequence
        assert_eq!(decode_permissive("dönüş\r\n".as_bytes()), "dönüş\r\n");
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines("\r\n\r\n"), Vec::<String>::new());
        assert_eq!(split_lines(""), Vec::<String>::new());
        assert_eq!(split_lines("  padded  \r\n"), vec!["padded"]);
        assert_eq!(split_lines("no terminator"), vec!["no terminator"]);
    }
}
