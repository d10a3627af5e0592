//! Thermaltake LEDFanBox CLI tool
//!
//! The LEDFanBox accepts raw HID output reports without a report ID: a tagged
//! two byte packet for the fan speed, a bare RGB triple for the color and a
//! single byte for the lighting mode.

use std::error::Error as _;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{cmp, thread};

use bytes::Bytes;
use clap::{
    crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches, Command, ValueEnum,
};
use tracing::{debug, warn};

use crate::controller::HidController;
use crate::device::{DeviceGuard, Transport};
use crate::error::Error;
use crate::thermaltake_ledfanbox::ThermaltakeLedFanBox;

mod color;
mod controller;
mod device;
mod error;
mod thermaltake_ledfanbox;

/// Colors shown by `--cycle-colors`, in order.
const CYCLE_COLORS: [Rgb; 9] = [
    Rgb { r: 0xff, g: 0x00, b: 0x00 },
    Rgb { r: 0x00, g: 0xff, b: 0x00 },
    Rgb { r: 0x00, g: 0x00, b: 0xff },
    Rgb { r: 0xff, g: 0xff, b: 0x00 },
    Rgb { r: 0xff, g: 0x00, b: 0xff },
    Rgb { r: 0x00, g: 0xff, b: 0xff },
    Rgb { r: 0xff, g: 0xff, b: 0xff },
    Rgb { r: 0xff, g: 0xa5, b: 0x00 },
    Rgb { r: 0x80, g: 0x00, b: 0x80 },
];

/// Pause between two colors of the cycle.
const CYCLE_INTERVAL: Duration = Duration::from_millis(500);

/// Longest sleep before checking for an interrupt.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

const EXAMPLES: &str = "\
Examples:
  ledfanbox --speed 50           # Set fan to 50%
  ledfanbox --rgb red            # Set RGB to red
  ledfanbox --rgb 255 0 0        # Set RGB to red (R G B)
  ledfanbox --mode rainbow       # Set rainbow mode
  ledfanbox --speed 75 --rgb blue --mode static
  ledfanbox --cycle-colors       # Cycle through colors";

/// Lighting mode.
#[repr(u8)]
#[derive(ValueEnum, PartialEq, Eq, Debug, Copy, Clone)]
enum Mode {
    Off = 0,
    Static,
    Breathing,
    Rainbow,
}

impl Mode {
    /// Names of all modes, as accepted on the CLI.
    fn names() -> Vec<String> {
        Self::value_variants()
            .iter()
            .filter_map(|mode| mode.to_possible_value())
            .map(|value| value.get_name().to_owned())
            .collect()
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode as Self
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        <Self as ValueEnum>::from_str(s, false).map_err(|_| {
            Error::InvalidArgument(format!("unknown mode '{s}', use: {}", Self::names().join(", ")))
        })
    }
}

/// RGB color.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl TryFrom<[i64; 3]> for Rgb {
    type Error = Error;

    fn try_from([r, g, b]: [i64; 3]) -> Result<Self, Error> {
        match (u8::try_from(r), u8::try_from(g), u8::try_from(b)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb { r, g, b }),
            _ => Err(Error::InvalidArgument(format!(
                "RGB values must be between 0 and 255, got ({r}, {g}, {b})"
            ))),
        }
    }
}

impl From<Rgb> for [i64; 3] {
    fn from(color: Rgb) -> Self {
        [color.r.into(), color.g.into(), color.b.into()]
    }
}

/// Requested device changes.
struct Config {
    speed: Option<i64>,
    rgb: Option<Vec<String>>,
    mode: Option<String>,
    cycle_colors: bool,
    cycle_interval: Duration,
}

impl Config {
    fn from_cli(matches: &ArgMatches) -> Self {
        Self {
            speed: matches.get_one::<i64>("speed").copied(),
            rgb: matches.get_many::<String>("rgb").map(|values| values.cloned().collect()),
            mode: matches.get_one::<String>("mode").cloned(),
            cycle_colors: matches.get_flag("cycle-colors"),
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle_interval: CYCLE_INTERVAL,
            cycle_colors: Default::default(),
            speed: Default::default(),
            mode: Default::default(),
            rgb: Default::default(),
        }
    }
}

fn main() -> ExitCode {
    setup_logs();

    let config = Config::from_cli(&cli());

    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = interrupted.clone();
    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        warn!("{}", Error::from(err));
    }

    let controller = ThermaltakeLedFanBox;
    let status = run(&config, &controller, &interrupted, || device::find_device(&controller));

    ExitCode::from(status)
}

/// Apply a config to the device returned by `open`, returning the exit status.
fn run<T, F>(config: &Config, controller: &dyn HidController, interrupted: &AtomicBool, open: F) -> u8
where
    T: Transport,
    F: FnOnce() -> Result<T, Error>,
{
    // Reject bad color arguments before touching the device.
    let color = match config.rgb.as_ref().map(|tokens| color::resolve_color(tokens.as_slice())) {
        Some(Ok(color)) => Some(color),
        Some(Err(err)) => {
            println!("\x1b[31mError:\x1b[0m {err}");
            return EXIT_FAILURE;
        },
        None => None,
    };

    let mut device = match open() {
        Ok(transport) => DeviceGuard::new(transport),
        Err(err) => {
            println!("\x1b[31mError:\x1b[0m {err}");
            println!("Make sure the device is connected and permissions are set");
            return EXIT_FAILURE;
        },
    };

    let status = match apply(config, color, controller, &mut device, interrupted) {
        Ok(()) => {
            println!("\n\x1b[32m✓ All commands executed successfully\x1b[0m");
            EXIT_SUCCESS
        },
        Err(Error::Interrupted) => {
            println!("\n\nInterrupted by user");
            EXIT_SUCCESS
        },
        // Unexpected errors end the sequence but are not fatal.
        Err(err) => {
            print_error_chain(&err);
            EXIT_SUCCESS
        },
    };

    drop(device);
    println!("\nDevice closed");

    status
}

/// Run all requested steps in their fixed order.
fn apply<T: Transport>(
    config: &Config,
    color: Option<[i64; 3]>,
    controller: &dyn HidController,
    device: &mut DeviceGuard<T>,
    interrupted: &AtomicBool,
) -> Result<(), Error> {
    if let Some(color) = color {
        set_color(device, controller, color)?;
    }

    if let Some(mode) = &config.mode {
        check_interrupt(interrupted)?;
        let result = mode.parse::<Mode>().and_then(|mode| controller.mode_bytes(mode));
        report(device, result, "mode", || format!("Mode set to {mode}"))?;
    }

    if let Some(speed) = config.speed {
        check_interrupt(interrupted)?;
        let result = controller.fan_speed_bytes(speed);
        report(device, result, "fan speed", || format!("Fan speed set to {speed}%"))?;
    }

    if config.cycle_colors {
        check_interrupt(interrupted)?;
        cycle_colors(device, controller, config.cycle_interval, interrupted)?;
    }

    check_interrupt(interrupted)
}

fn check_interrupt(interrupted: &AtomicBool) -> Result<(), Error> {
    if interrupted.load(Ordering::Relaxed) {
        return Err(Error::Interrupted);
    }

    Ok(())
}

/// Step through all cycle colors until done or interrupted.
fn cycle_colors<T: Transport>(
    device: &mut DeviceGuard<T>,
    controller: &dyn HidController,
    interval: Duration,
    interrupted: &AtomicBool,
) -> Result<(), Error> {
    println!("Cycling colors... (Ctrl+C to stop)");

    for (i, color) in CYCLE_COLORS.iter().enumerate() {
        if i > 0 {
            pause(interval, interrupted);
        }

        if interrupted.load(Ordering::Relaxed) {
            debug!("color cycle interrupted after {i} colors");
            return Err(Error::Interrupted);
        }

        set_color(device, controller, (*color).into())?;
    }

    Ok(())
}

fn set_color<T: Transport>(
    device: &mut DeviceGuard<T>,
    controller: &dyn HidController,
    [r, g, b]: [i64; 3],
) -> Result<(), Error> {
    let result = controller.color_bytes(r, g, b);
    report(device, result, "RGB", || format!("RGB set to ({r}, {g}, {b})"))
}

/// Write an encoded packet and print the outcome.
///
/// Invalid arguments and rejected writes are only reported, so later steps
/// still run. HID transport errors are returned.
fn report<T, M>(
    device: &mut DeviceGuard<T>,
    packet: Result<Bytes, Error>,
    what: &str,
    done: M,
) -> Result<(), Error>
where
    T: Transport,
    M: FnOnce() -> String,
{
    match packet.and_then(|packet| device.write_packet(packet)) {
        Ok(()) => println!("\x1b[32m✓\x1b[0m {}", done()),
        Err(err @ Error::WriteFailed { .. }) => {
            println!("\x1b[31m✗\x1b[0m Failed to set {what}: {err}")
        },
        Err(err @ Error::InvalidArgument(_)) => println!("\x1b[31mError:\x1b[0m {err}"),
        Err(err) => return Err(err),
    }

    Ok(())
}

/// Sleep for `duration`, returning early on interrupt.
fn pause(duration: Duration, interrupted: &AtomicBool) {
    let deadline = Instant::now() + duration;

    while !interrupted.load(Ordering::Relaxed) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        thread::sleep(cmp::min(remaining, INTERRUPT_POLL));
    }
}

/// Print an error with all of its sources.
fn print_error_chain(err: &Error) {
    let mut chain = error_chain(err).into_iter();

    if let Some(message) = chain.next() {
        println!("\n\x1b[31mError:\x1b[0m {message}");
    }
    for cause in chain {
        println!("  caused by: {cause}");
    }

    eprintln!("{err:?}");
}

/// Messages of an error followed by those of its sources.
fn error_chain(err: &Error) -> Vec<String> {
    let mut chain = vec![err.to_string()];

    let mut source = err.source();
    while let Some(err) = source {
        chain.push(err.to_string());
        source = err.source();
    }

    chain
}

fn setup_logs() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter_layer).with(fmt_layer).init();
}

/// Get clap CLI parameters.
fn cli() -> ArgMatches {
    Command::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .after_help(EXAMPLES)
        .arg(
            Arg::new("speed")
                .help("Fan speed in percent [possible values: 0..=100]")
                .long("speed")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("rgb")
                .help("LED color as a name or R G B values [possible values: 0..=255]")
                .long("rgb")
                .value_name("COLOR | R G B")
                .num_args(1..)
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("mode")
                .help(format!("Lighting mode [possible values: {}]", Mode::names().join(", ")))
                .long("mode"),
        )
        .arg(
            Arg::new("cycle-colors")
                .help("Cycle through rainbow colors")
                .long("cycle-colors")
                .action(ArgAction::SetTrue),
        )
        .get_matches()
}
