// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! # Overview
//! - [⚖ 0BSD license](https://spdx.org/licenses/0BSD.html)
//!
//! This crate enumerates the physical monitors attached to a machine and reads or adjusts their
//! backlight brightness as a percentage.
//!
//! Linux and Windows are supported.
//!
//! # Example
//!
//! ```no_run
//! use clibright::{discover, BrightnessEngine, Config, NativePort, TargetSelection};
//!
//! fn show_brightness() -> Result<(), clibright::Error> {
//!     let port = NativePort::default();
//!     let discovered = discover(&port);
//!     let target = TargetSelection::resolve(0, discovered.len())?;
//!     let engine = BrightnessEngine::new(&port, Config::default());
//!     for result in engine.get(&discovered, target) {
//!         let change = result.outcome?;
//!         println!("Brightness of monitor {} is {}", result.index, change.new);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Windows
//!
//! Monitors are enumerated with `EnumDisplayMonitors` and every logical display is resolved into
//! its physical monitors. Brightness is read and written over DDC/CI through the monitor
//! configuration API (`GetMonitorBrightness`/`SetMonitorBrightness`).
//!
//! # Linux
//!
//! This crate interacts with devices found at `/sys/class/backlight`. Each backlight device is
//! reported as a logical display with a single physical monitor.
//!
//! Setting brightness is attempted using D-Bus and logind, which requires
//! [systemd 243 or newer](https://github.com/systemd/systemd/blob/877aa0bdcc2900712b02dac90856f181b93c4e40/NEWS#L262).
//! If this fails because the method is not available, the desired brightness is written to
//! `/sys/class/backlight/$DEVICE/brightness`, which requires permission (`udev` rules can help with
//! that).
//!
//! # Contribute
//!
//! All contributions shall be licensed under the [0BSD license](https://spdx.org/licenses/0BSD.html).

#![deny(missing_docs)]

use std::error::Error as StdError;
use thiserror::Error;

mod brightness;
mod config;
mod discovery;
mod engine;
pub mod logging;
mod platform;
mod port;
pub mod report;
mod target;

#[cfg(test)]
pub(crate) mod fake;

pub use brightness::{BrightnessReading, Fraction};
pub use config::{Config, OutputFormat, Verbosity};
pub use discovery::{discover, DiscoveredDisplay, DiscoveredMonitor, Discovery};
pub use engine::{Adjustment, BrightnessEngine, Change, OperationResult};
pub use platform::NativePort;
pub use port::{LogicalDisplay, MonitorControlPort, MonitorHandle, Rect};
pub use target::TargetSelection;

/// Errors used in this API
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Enumerating logical displays failed
    #[error("Failed to list monitors")]
    ListingMonitorsFailed(#[source] Box<dyn StdError + Send + Sync>),

    /// Reading a logical display's metadata or its physical monitors failed
    #[error("Failed to get information for display {display}")]
    GettingDisplayInfoFailed {
        /// Display name or identifier
        display: String,
        /// Cause
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The requested monitor index is past the end of the discovered monitors
    #[error("Invalid monitor index {index}, there are only {count} attached physical monitors.")]
    InvalidIndex {
        /// Requested 1-based index
        index: usize,
        /// Number of physical monitors discovered
        count: usize,
    },

    /// The monitor reports a brightness range that cannot be normalized
    #[error("Monitor does not support brightness control (reported range {minimum}..={maximum})")]
    UnsupportedMonitor {
        /// Reported minimum
        minimum: u32,
        /// Reported maximum
        maximum: u32,
    },

    /// Getting brightness failed
    #[error("Getting brightness failed for monitor {monitor}")]
    GettingBrightnessFailed {
        /// Monitor description
        monitor: String,
        /// Cause
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Setting brightness failed
    #[error("Setting brightness failed for monitor {monitor}")]
    SettingBrightnessFailed {
        /// Monitor description
        monitor: String,
        /// Cause
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A percentage argument was not a number between 0 and 100
    #[error("Invalid percentage {value}, must be between 0 and 100%.")]
    InvalidPercentage {
        /// Value as given by the user
        value: String,
    },
}

impl Error {
    /// Returns the message followed by every underlying cause, separated by `: `.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
