use std::fmt;

/// Command vocabulary understood by the actuator firmware.
///
/// Each variant renders to the exact ASCII token the sketch parses. The
/// controller itself transmits plain strings and does not require commands to
/// come from this set; this type exists so callers do not have to format the
/// tokens by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// LED full on.
    LedOn,
    /// LED off.
    LedOff,
    /// LED brightness, 0-255.
    Pwm(u8),
    /// Motor direction clockwise.
    Clockwise,
    /// Motor direction counter-clockwise.
    CounterClockwise,
    /// Motor speed, 0-255.
    Speed(u8),
    /// Motor stop (coast).
    Stop,
    /// Motor active brake.
    Brake,
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::LedOn => write!(f, "ON"),
            DeviceCommand::LedOff => write!(f, "OFF"),
            DeviceCommand::Pwm(value) => write!(f, "PWM {}", value),
            DeviceCommand::Clockwise => write!(f, "CW"),
            DeviceCommand::CounterClockwise => write!(f, "CCW"),
            DeviceCommand::Speed(value) => write!(f, "SPEED {}", value),
            DeviceCommand::Stop => write!(f, "STOP"),
            DeviceCommand::Brake => write!(f, "BRAKE"),
        }
    }
}

/// Preset motor speed levels as (percentage, PWM value) pairs.
pub const SPEED_PRESETS: [(u8, u8); 4] = [(25, 64), (50, 128), (75, 191), (100, 255)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tokens() {
        assert_eq!(DeviceCommand::LedOn.to_string(), "ON");
        assert_eq!(DeviceCommand::LedOff.to_string(), "OFF");
        assert_eq!(DeviceCommand::Pwm(128).to_string(), "PWM 128");
        assert_eq!(DeviceCommand::Pwm(0).to_string(), "PWM 0");
        assert_eq!(DeviceCommand::Clockwise.to_string(), "CW");
        assert_eq!(DeviceCommand::CounterClockwise.to_string(), "CCW");
        assert_eq!(DeviceCommand::Speed(255).to_string(), "SPEED 255");
        assert_eq!(DeviceCommand::Stop.to_string(), "STOP");
        assert_eq!(DeviceCommand::Brake.to_string(), "BRAKE");
    }

    #[test]
    fn test_speed_presets_cover_full_range() {
        assert_eq!(SPEED_PRESETS[0], (25, 64));
        assert_eq!(SPEED_PRESETS[3], (100, 255));
    }
}
