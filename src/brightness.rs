// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Conversion between raw brightness registers and fractions.

use crate::Error;
use std::fmt;

/// Raw brightness register as reported by a monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrightnessReading {
    /// Lowest supported value
    pub minimum: u32,
    /// Current value
    pub current: u32,
    /// Highest supported value
    pub maximum: u32,
}

impl BrightnessReading {
    /// Creates a reading from its three registers.
    pub fn new(minimum: u32, current: u32, maximum: u32) -> Self {
        Self {
            minimum,
            current,
            maximum,
        }
    }

    fn span(&self) -> Result<f64, Error> {
        if self.maximum <= self.minimum {
            return Err(Error::UnsupportedMonitor {
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        Ok(f64::from(self.maximum - self.minimum))
    }

    /// Returns the current value as a fraction of the supported range.
    ///
    /// A current value outside of `minimum..=maximum` is clamped into the range.
    pub fn to_fraction(&self) -> Result<Fraction, Error> {
        let span = self.span()?;
        let offset = f64::from(self.current) - f64::from(self.minimum);
        Ok(Fraction::clamped(offset / span))
    }

    /// Returns the raw value closest to `fraction` of the supported range.
    pub fn to_raw(&self, fraction: Fraction) -> Result<u32, Error> {
        let span = self.span()?;
        let raw = (f64::from(self.minimum) + fraction.get() * span).round();
        // Rounding at the edges may step just outside of the range
        Ok((raw as u32).clamp(self.minimum, self.maximum))
    }
}

/// Brightness normalized to `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Fraction(f64);

impl Fraction {
    /// Fully dimmed
    pub const MIN: Fraction = Fraction(0.0);

    /// Full brightness
    pub const MAX: Fraction = Fraction(1.0);

    /// Creates a fraction, clamping into `0.0..=1.0`. NaN becomes 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Fraction(value.clamp(0.0, 1.0))
    }

    /// Parses a user supplied percentage, which must be a finite number within `0..=100`.
    pub fn from_percentage_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidPercentage {
            value: s.to_owned(),
        };
        let value = s.trim().trim_end_matches('%').parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(invalid());
        }
        // "-0" parses as negative zero
        Ok(Fraction(value / 100.0 + 0.0))
    }

    /// Returns the fraction as a number in `0.0..=1.0`.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Returns the fraction as a percentage.
    pub fn percentage(self) -> f64 {
        self.0 * 100.0
    }

    /// Adds `delta` (a fraction, possibly negative), saturating at both ends.
    pub fn saturating_add(self, delta: f64) -> Self {
        Self::clamped(self.0 + delta)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percentage())
    }
}
