use std::io::{self, BufRead, Write};
use std::process::exit;

use clap::{Arg, Command};
use tracing_subscriber::EnvFilter;

use arduino_driver::{DeviceCommand, Error, SerialDeviceController, SPEED_PRESETS};

fn parse_line(line: &str) -> Option<DeviceCommand> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?.to_ascii_lowercase();
    let argument = tokens.next();
    if tokens.next().is_some() {
        return None;
    }
    match (keyword.as_str(), argument) {
        ("on", None) => Some(DeviceCommand::LedOn),
        ("off", None) => Some(DeviceCommand::LedOff),
        ("pwm", Some(value)) => value.parse().ok().map(DeviceCommand::Pwm),
        ("cw", None) => Some(DeviceCommand::Clockwise),
        ("ccw", None) => Some(DeviceCommand::CounterClockwise),
        ("speed", Some(value)) => value.parse().ok().map(DeviceCommand::Speed),
        ("preset", Some(value)) => {
            let percent: u8 = value.trim_end_matches('%').parse().ok()?;
            SPEED_PRESETS
                .iter()
                .find(|(p, _)| *p == percent)
                .map(|(_, pwm)| DeviceCommand::Speed(*pwm))
        }
        ("stop", None) => Some(DeviceCommand::Stop),
        ("brake", None) => Some(DeviceCommand::Brake),
        _ => None,
    }
}

fn print_usage() {
    println!("Commands: on | off | pwm <0-255> | cw | ccw | speed <0-255>");
    println!("          preset <25|50|75|100> | stop | brake | quit");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = Command::new("Arduino Actuator Control Panel")
        .about("Sends LED and DC motor commands to an Arduino over a serial port")
        .disable_version_flag(true)
        .arg(
            Arg::new("port")
                .help("The device path to a serial port; omit to list available ports")
                .required(false),
        )
        .get_matches();

    let (mut controller, log_rx) = SerialDeviceController::new();

    let port_name = match matches.value_of("port") {
        Some(port_name) => port_name.to_string(),
        None => {
            let ports = controller.list_ports();
            for line in log_rx.try_iter() {
                println!("{}", line);
            }
            if ports.is_empty() {
                eprintln!("{}", Error::NoPortsFound);
                exit(1);
            }
            return;
        }
    };

    if let Err(e) = controller.connect(&port_name) {
        for line in log_rx.try_iter() {
            println!("{}", line);
        }
        eprintln!("{}", e);
        exit(1);
    }
    for line in log_rx.try_iter() {
        println!("{}", line);
    }
    print_usage();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => (),
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match parse_line(line) {
            Some(command) => {
                if let Err(e) = controller.send(command) {
                    eprintln!("{}", e);
                }
            }
            None => print_usage(),
        }
        for line in log_rx.try_iter() {
            println!("{}", line);
        }
    }

    controller.disconnect();
    for line in log_rx.try_iter() {
        println!("{}", line);
    }
}
