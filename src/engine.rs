// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Get, set, increment and decrement applied to a set of monitors.

use crate::{
    Config, DiscoveredMonitor, Discovery, Error, Fraction, MonitorControlPort, MonitorHandle,
    TargetSelection,
};
use tracing::{debug, info};

/// What to do with each targeted monitor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Adjustment {
    /// Read only
    Get,
    /// Set to an absolute fraction
    Set(Fraction),
    /// Raise by a fraction, saturating at full brightness
    Increment(Fraction),
    /// Lower by a fraction, saturating at zero
    Decrement(Fraction),
}

impl Adjustment {
    fn apply(self, previous: Fraction) -> Option<Fraction> {
        match self {
            Adjustment::Get => None,
            Adjustment::Set(target) => Some(target),
            Adjustment::Increment(delta) => Some(previous.saturating_add(delta.get())),
            Adjustment::Decrement(delta) => Some(previous.saturating_add(-delta.get())),
        }
    }
}

/// Brightness before and after an operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Change {
    /// Brightness read before the operation
    pub previous: Fraction,
    /// Brightness after the operation; equal to `previous` for [`Adjustment::Get`]
    pub new: Fraction,
    /// Raw value written, if any
    pub written: Option<u32>,
}

/// Outcome of an operation on one monitor.
#[derive(Debug)]
pub struct OperationResult {
    /// 1-based monitor index
    pub index: usize,
    /// Monitor description
    pub description: String,
    /// What happened, or why it failed
    pub outcome: Result<Change, Error>,
}

/// Applies brightness operations through a [`MonitorControlPort`].
#[derive(Debug)]
pub struct BrightnessEngine<'a, P> {
    port: &'a P,
    config: Config,
}

impl<'a, P: MonitorControlPort> BrightnessEngine<'a, P> {
    /// Creates an engine driving `port`.
    pub fn new(port: &'a P, config: Config) -> Self {
        Self { port, config }
    }

    /// Reads the brightness of every targeted monitor.
    pub fn get(
        &self,
        discovery: &Discovery<P::Handle>,
        target: TargetSelection,
    ) -> Vec<OperationResult> {
        self.apply(discovery, target, Adjustment::Get)
    }

    /// Sets the brightness of every targeted monitor.
    pub fn set(
        &self,
        discovery: &Discovery<P::Handle>,
        target: TargetSelection,
        fraction: Fraction,
    ) -> Vec<OperationResult> {
        self.apply(discovery, target, Adjustment::Set(fraction))
    }

    /// Raises the brightness of every targeted monitor.
    pub fn increment(
        &self,
        discovery: &Discovery<P::Handle>,
        target: TargetSelection,
        delta: Fraction,
    ) -> Vec<OperationResult> {
        self.apply(discovery, target, Adjustment::Increment(delta))
    }

    /// Lowers the brightness of every targeted monitor.
    pub fn decrement(
        &self,
        discovery: &Discovery<P::Handle>,
        target: TargetSelection,
        delta: Fraction,
    ) -> Vec<OperationResult> {
        self.apply(discovery, target, Adjustment::Decrement(delta))
    }

    /// Applies `adjustment` to every targeted monitor, in index order.
    ///
    /// A failure on one monitor is recorded in its result and does not stop the others.
    pub fn apply(
        &self,
        discovery: &Discovery<P::Handle>,
        target: TargetSelection,
        adjustment: Adjustment,
    ) -> Vec<OperationResult> {
        discovery
            .monitors()
            .filter(|monitor| target.contains(monitor.index))
            .map(|monitor| OperationResult {
                index: monitor.index,
                description: monitor.handle.description().to_owned(),
                outcome: self.apply_one(monitor, adjustment),
            })
            .collect()
    }

    fn apply_one(
        &self,
        monitor: &DiscoveredMonitor<P::Handle>,
        adjustment: Adjustment,
    ) -> Result<Change, Error> {
        let reading = self.port.read_brightness(&monitor.handle)?;
        debug!("monitor {} reads {:?}", monitor.index, reading);
        let previous = reading.to_fraction()?;
        let new = match adjustment.apply(previous) {
            Some(new) => new,
            None => {
                return Ok(Change {
                    previous,
                    new: previous,
                    written: None,
                })
            }
        };
        let raw = reading.to_raw(new)?;
        if self.config.verbosity.is_verbose() {
            info!(
                "monitor {}, current percentage: {}, new percentage: {}",
                monitor.index, previous, new
            );
        }
        debug!(
            "setting brightness of 0x{:X} to {}",
            monitor.handle.raw(),
            raw
        );
        self.port.write_brightness(&monitor.handle, raw)?;
        Ok(Change {
            previous,
            new,
            written: Some(raw),
        })
    }
}
