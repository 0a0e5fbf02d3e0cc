// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Invocation configuration.

use tracing::level_filters::LevelFilter;

/// How chatty an invocation is, as the number of `-v` flags given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(pub u8);

impl Verbosity {
    /// Returns true when at least one `-v` was given.
    pub fn is_verbose(self) -> bool {
        self.0 > 0
    }

    /// Returns the most detailed log level to emit.
    pub fn level_filter(self) -> LevelFilter {
        match self.0 {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Output format of the `list` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Multi-line report
    #[default]
    Human,
    /// Pretty-printed JSON array
    Json,
}

/// Settings shared by every command of one invocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Diagnostic output level
    pub verbosity: Verbosity,
}

impl Config {
    /// Creates a configuration with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}
