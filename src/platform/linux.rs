// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Platform-specific implementation for Linux.

use crate::{BrightnessReading, Error, LogicalDisplay, MonitorControlPort, MonitorHandle};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

pub(crate) const BACKLIGHT_DIR: &str = "/sys/class/backlight";
pub(crate) const USER_DBUS_NAME: &str = "org.freedesktop.login1";
pub(crate) const SESSION_OBJECT_PATH: &str = "/org/freedesktop/login1/session/auto";
pub(crate) const SESSION_INTERFACE: &str = "org.freedesktop.login1.Session";
pub(crate) const SET_BRIGHTNESS_METHOD: &str = "SetBrightness";

/// Backlight devices exposed by the kernel under `/sys/class/backlight`.
///
/// Every device is a logical display backed by exactly one physical monitor.
#[derive(Debug)]
pub struct SysfsBacklight {
    root: PathBuf,
    use_logind: bool,
}

impl Default for SysfsBacklight {
    fn default() -> Self {
        Self {
            root: PathBuf::from(BACKLIGHT_DIR),
            use_logind: true,
        }
    }
}

impl SysfsBacklight {
    /// Uses devices under `root` and writes brightness files directly, bypassing logind.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            use_logind: false,
        }
    }

    fn device_names(&self) -> Result<Vec<String>, SysError> {
        let mut names = fs::read_dir(&self.root)
            .map_err(|source| SysError::ReadingBacklightDirFailed {
                path: self.root.clone(),
                source,
            })?
            .map(|entry| {
                let entry = entry.map_err(|source| SysError::ReadingBacklightDirFailed {
                    path: self.root.clone(),
                    source,
                })?;
                let keep = is_device_dir(&entry.path());
                Ok(entry.file_name().into_string().ok().filter(|_| keep))
            })
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, SysError>>()?;
        // Directory order is unspecified, so sort to keep indices stable between runs
        names.sort();
        Ok(names)
    }

    fn read_value(&self, device: &str, name: Value) -> Result<u32, SysError> {
        let path = self.root.join(device).join(name.as_str());
        fs::read_to_string(&path)
            .map_err(|source| SysError::ReadingBacklightDeviceFailed {
                device: device.into(),
                path: path.clone(),
                source,
            })?
            .trim()
            .parse::<u32>()
            .map_err(|e| SysError::ParsingBacklightInfoFailed {
                device: device.into(),
                path,
                reason: e.to_string(),
            })
    }

    /// This is a blocking operation that can take approximately 10-100ms depending on the device.
    fn set_value(&self, device: &str, value: u32) -> Result<(), SysError> {
        let path = self.root.join(device).join("brightness");
        fs::write(&path, value.to_string()).map_err(|source| SysError::WritingBrightnessFailed {
            device: device.into(),
            path,
            source,
        })
    }

    fn set_value_with_logind(&self, device: &str, value: u32) -> Result<(), SysError> {
        let desired = ("backlight", device, value);
        let bus = zbus::blocking::Connection::system().map_err(|source| {
            SysError::CallingLogindFailed {
                device: device.into(),
                source,
            }
        })?;
        let response = bus.call_method(
            Some(USER_DBUS_NAME),
            SESSION_OBJECT_PATH,
            Some(SESSION_INTERFACE),
            SET_BRIGHTNESS_METHOD,
            &desired,
        );
        match response {
            Ok(_) => Ok(()),
            Err(zbus::Error::MethodError(..)) => {
                // Setting brightness through dbus may not work on older systems that don't have
                // the `SetBrightness` method. Fall back to writing to the brightness file (which
                // requires permission).
                debug!("logind refused {}, writing sysfs directly", SET_BRIGHTNESS_METHOD);
                self.set_value(device, value)
            }
            Err(source) => Err(SysError::CallingLogindFailed {
                device: device.into(),
                source,
            }),
        }
    }
}

/// Handle to one backlight device. Nothing to release.
#[derive(Debug)]
pub struct BacklightHandle {
    device: String,
    ordinal: u64,
}

impl MonitorHandle for BacklightHandle {
    fn description(&self) -> &str {
        &self.device
    }

    fn raw(&self) -> u64 {
        self.ordinal
    }
}

impl MonitorControlPort for SysfsBacklight {
    type Handle = BacklightHandle;

    fn logical_displays(&self) -> Result<Vec<Result<LogicalDisplay, Error>>, Error> {
        let names = self.device_names()?;
        Ok(names
            .into_iter()
            .enumerate()
            .map(|(ordinal, device_name)| {
                Ok(LogicalDisplay {
                    id: ordinal as u64,
                    device_name,
                    bounds: Default::default(),
                    work_area: Default::default(),
                })
            })
            .collect())
    }

    fn physical_monitors(&self, display: &LogicalDisplay) -> Result<Vec<BacklightHandle>, Error> {
        let path = self.root.join(&display.device_name);
        if !is_device_dir(&path) {
            return Err(SysError::DeviceVanished {
                device: display.device_name.clone(),
                path,
            }
            .into());
        }
        Ok(vec![BacklightHandle {
            device: display.device_name.clone(),
            ordinal: display.id,
        }])
    }

    fn read_brightness(&self, handle: &BacklightHandle) -> Result<BrightnessReading, Error> {
        let maximum = self.read_value(&handle.device, Value::Max)?;
        let current = self.read_value(&handle.device, Value::Actual)?;
        Ok(BrightnessReading::new(0, current, maximum))
    }

    fn write_brightness(&self, handle: &BacklightHandle, value: u32) -> Result<(), Error> {
        if self.use_logind {
            self.set_value_with_logind(&handle.device, value)?;
        } else {
            self.set_value(&handle.device, value)?;
        }
        Ok(())
    }
}

fn is_device_dir(path: &Path) -> bool {
    path.join(Value::Actual.as_str()).exists() && path.join(Value::Max.as_str()).exists()
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Value {
    Actual,
    Max,
}

impl Value {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Value::Actual => "actual_brightness",
            Value::Max => "max_brightness",
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum SysError {
    #[error("Failed to read {} directory", .path.display())]
    ReadingBacklightDirFailed { path: PathBuf, source: io::Error },
    #[error("Backlight device {device} is gone from {}", .path.display())]
    DeviceVanished { device: String, path: PathBuf },
    #[error("Failed to read backlight device info {}", .path.display())]
    ReadingBacklightDeviceFailed {
        device: String,
        path: PathBuf,
        source: io::Error,
    },
    #[error("Failed to parse backlight info in {}: {reason}", .path.display())]
    ParsingBacklightInfoFailed {
        device: String,
        path: PathBuf,
        reason: String,
    },
    #[error("Failed to write brightness to {}", .path.display())]
    WritingBrightnessFailed {
        device: String,
        path: PathBuf,
        source: io::Error,
    },
    #[error("Failed to call {} on logind", SET_BRIGHTNESS_METHOD)]
    CallingLogindFailed { device: String, source: zbus::Error },
}

impl From<SysError> for Error {
    fn from(e: SysError) -> Self {
        match &e {
            SysError::ReadingBacklightDirFailed { .. } => Error::ListingMonitorsFailed(e.into()),
            SysError::DeviceVanished { device, .. } => Error::GettingDisplayInfoFailed {
                display: device.clone(),
                source: e.into(),
            },
            SysError::ReadingBacklightDeviceFailed { device, .. }
            | SysError::ParsingBacklightInfoFailed { device, .. } => {
                Error::GettingBrightnessFailed {
                    monitor: device.clone(),
                    source: e.into(),
                }
            }
            SysError::WritingBrightnessFailed { device, .. }
            | SysError::CallingLogindFailed { device, .. } => Error::SettingBrightnessFailed {
                monitor: device.clone(),
                source: e.into(),
            },
        }
    }
}
