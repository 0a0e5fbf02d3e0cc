// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! `clibright`: list monitors and get or set their brightness.

use clap::{Args, Parser, Subcommand};
use clibright::{
    discover, logging, report, BrightnessEngine, Config, Error, Fraction, MonitorControlPort,
    NativePort, OutputFormat, TargetSelection, Verbosity,
};
use std::{
    io::{self, Write},
    process::ExitCode,
};

/// Manipulate monitor brightness.
#[derive(Debug, Parser)]
#[command(name = "clibright", version, about)]
struct Cli {
    /// Output verbosity. Specify multiple times to increase verbosity further.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Target {
    /// Physical monitor index. 0 indicates all monitors, see the list command to get a
    /// monitor's index.
    #[arg(short, long, default_value_t = 0)]
    index: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get monitor brightness
    Get {
        #[command(flatten)]
        target: Target,
    },
    /// Set brightness to a percentage
    Set {
        #[command(flatten)]
        target: Target,
        /// Brightness between 0 and 100%
        #[arg(value_name = "BRIGHTNESS%", value_parser = Fraction::from_percentage_str)]
        brightness: Fraction,
    },
    /// Increment brightness by a percentage
    Increment {
        #[command(flatten)]
        target: Target,
        /// Percentage points to add, between 0 and 100
        #[arg(value_name = "INCREMENT", value_parser = Fraction::from_percentage_str)]
        increment: Fraction,
    },
    /// Decrement brightness by a percentage
    Decrement {
        #[command(flatten)]
        target: Target,
        /// Percentage points to subtract, between 0 and 100
        #[arg(value_name = "DECREMENT", value_parser = Fraction::from_percentage_str)]
        decrement: Fraction,
    },
    /// List attached monitors
    List {
        #[command(flatten)]
        target: Target,
        /// The format to output the data in
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
}

impl Command {
    fn index(&self) -> usize {
        match self {
            Command::Get { target }
            | Command::Set { target, .. }
            | Command::Increment { target, .. }
            | Command::Decrement { target, .. }
            | Command::List { target, .. } => target.index,
        }
    }
}

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version go to stdout and are not failures
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", parse_error_line(&e));
            return ExitCode::FAILURE;
        }
    };
    let config = Config::new(Verbosity(cli.verbose));
    logging::init(config.verbosity);
    let port = NativePort::default();
    let (mut out, mut err) = (io::stdout(), io::stderr());
    match run(&port, cli.command, config, &mut out, &mut err) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let _ = writeln!(err, "clibright: {}", describe(&e, config.verbosity));
            ExitCode::FAILURE
        }
    }
}

/// Runs `command` against `port` and returns the process exit code.
///
/// Validation errors abort before any monitor is touched and are returned to the caller.
fn run<P: MonitorControlPort>(
    port: &P,
    command: Command,
    config: Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<u8, Error> {
    let discovery = discover(port);
    for e in &discovery.failures {
        let _ = writeln!(err, "clibright: {}", describe(e, config.verbosity));
    }
    let target = TargetSelection::resolve(command.index(), discovery.len())?;
    let engine = BrightnessEngine::new(port, config);
    let results = match command {
        Command::List { format, .. } => {
            let displays = report::collect(port, &discovery, target);
            return Ok(print_list(&displays, format, out, err));
        }
        _ if discovery.is_empty() => {
            print_no_monitors(out);
            return Ok(SUCCESS);
        }
        Command::Get { .. } => {
            let results = engine.get(&discovery, target);
            let line = report::brightness_line(&results);
            if !line.is_empty() {
                let _ = writeln!(out, "{}", line);
            }
            results
        }
        Command::Set { brightness, .. } => engine.set(&discovery, target, brightness),
        Command::Increment { increment, .. } => engine.increment(&discovery, target, increment),
        Command::Decrement { decrement, .. } => engine.decrement(&discovery, target, decrement),
    };
    let mut code = SUCCESS;
    for (index, e) in report::failures(&results) {
        let _ = writeln!(
            err,
            "clibright: monitor {}: {}",
            index,
            describe(e, config.verbosity)
        );
        code = FAILURE;
    }
    Ok(code)
}

fn print_list(
    displays: &[report::DisplayReport],
    format: OutputFormat,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    match format {
        OutputFormat::Human if displays.is_empty() => print_no_monitors(out),
        OutputFormat::Human => {
            let _ = write!(out, "{}", report::human(displays));
        }
        OutputFormat::Json => match report::json(displays) {
            Ok(json) => {
                let _ = writeln!(out, "{}", json);
            }
            Err(e) => {
                let _ = writeln!(err, "clibright: {}", e);
                return FAILURE;
            }
        },
    }
    SUCCESS
}

fn print_no_monitors(out: &mut dyn Write) {
    let _ = writeln!(out, "No attached physical monitors found.");
}

fn describe(e: &Error, verbosity: Verbosity) -> String {
    if verbosity.is_verbose() {
        e.chain()
    } else {
        e.to_string()
    }
}

/// Reduces a command line error to a single prefixed line.
fn parse_error_line(e: &clap::Error) -> String {
    let rendered = e.render().to_string();
    let first = rendered.lines().next().unwrap_or_default();
    format!("clibright: {}", first.trim_start_matches("error: "))
}
