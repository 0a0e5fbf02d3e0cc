// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Interface to the host's native monitor control facility.

use crate::{BrightnessReading, Error};
use std::fmt;

/// Rectangle in virtual-desktop coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// x-coordinate of the upper-left corner
    pub left: i32,
    /// y-coordinate of the upper-left corner
    pub top: i32,
    /// x-coordinate of the lower-right corner
    pub right: i32,
    /// y-coordinate of the lower-right corner
    pub bottom: i32,
}

impl Rect {
    /// Returns the width of the rectangle.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Returns the height of the rectangle.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position: ({}, {}), Size: ({}, {})",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}

/// A monitor as seen by the OS display manager.
///
/// A logical display may be backed by several physical monitors (e.g. in duplicate mode), or by
/// none that support brightness control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalDisplay {
    /// Opaque platform identifier
    pub id: u64,
    /// Device name
    pub device_name: String,
    /// Bounding rectangle
    pub bounds: Rect,
    /// Work area rectangle
    pub work_area: Rect,
}

/// A physical monitor handle owned by the caller.
///
/// Implementations release the underlying native handle when dropped.
pub trait MonitorHandle: fmt::Debug {
    /// Returns the device-supplied description, which may be empty or truncated.
    fn description(&self) -> &str;

    /// Returns the native handle value, for diagnostics only.
    fn raw(&self) -> u64;
}

/// The four native primitives everything else is built on.
pub trait MonitorControlPort {
    /// Owned physical monitor handle
    type Handle: MonitorHandle;

    /// Enumerates logical displays in platform order.
    ///
    /// The outer error means enumeration itself failed. An inner error means the metadata of one
    /// display could not be read.
    fn logical_displays(&self) -> Result<Vec<Result<LogicalDisplay, Error>>, Error>;

    /// Returns the physical monitors behind a logical display, in platform order.
    fn physical_monitors(&self, display: &LogicalDisplay) -> Result<Vec<Self::Handle>, Error>;

    /// Reads the raw brightness register.
    fn read_brightness(&self, handle: &Self::Handle) -> Result<BrightnessReading, Error>;

    /// Writes a raw brightness value.
    fn write_brightness(&self, handle: &Self::Handle, value: u32) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_display_shows_position_and_size() {
        let rect = Rect {
            left: -1920,
            top: 0,
            right: 0,
            bottom: 1080,
        };
        assert_eq!(rect.to_string(), "Position: (-1920, 0), Size: (1920, 1080)");
    }
}
