// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Platform-specific implementation for Windows.

use crate::{BrightnessReading, Error, LogicalDisplay, MonitorControlPort, MonitorHandle, Rect};
use std::{ffi::OsString, fmt, mem::size_of, os::windows::ffi::OsStringExt};
use windows::{
    core::Error as WinError,
    Win32::{
        Devices::Display::{
            DestroyPhysicalMonitor, GetMonitorBrightness, GetNumberOfPhysicalMonitorsFromHMONITOR,
            GetPhysicalMonitorsFromHMONITOR, SetMonitorBrightness, PHYSICAL_MONITOR,
        },
        Foundation::{BOOL, HANDLE, LPARAM, RECT},
        Graphics::Gdi::{
            EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
        },
    },
};

/// The Win32 monitor configuration API (DDC/CI through `dxva2`).
#[derive(Debug, Default)]
pub struct MonitorConfiguration;

/// A safe wrapper for a physical monitor handle that implements `Drop` to call
/// `DestroyPhysicalMonitor`
pub struct WrappedPhysicalMonitor {
    handle: HANDLE,
    description: String,
}

impl fmt::Debug for WrappedPhysicalMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.handle.0, self.description)
    }
}

impl Drop for WrappedPhysicalMonitor {
    fn drop(&mut self) {
        unsafe {
            DestroyPhysicalMonitor(self.handle);
        }
    }
}

impl MonitorHandle for WrappedPhysicalMonitor {
    fn description(&self) -> &str {
        &self.description
    }

    fn raw(&self) -> u64 {
        self.handle.0 as u64
    }
}

impl MonitorControlPort for MonitorConfiguration {
    type Handle = WrappedPhysicalMonitor;

    fn logical_displays(&self) -> Result<Vec<Result<LogicalDisplay, Error>>, Error> {
        unsafe {
            let hmonitors = enum_display_monitors()?;
            Ok(hmonitors
                .into_iter()
                .map(|hmonitor| get_monitor_info(hmonitor).map_err(Into::into))
                .collect())
        }
    }

    fn physical_monitors(
        &self,
        display: &LogicalDisplay,
    ) -> Result<Vec<WrappedPhysicalMonitor>, Error> {
        unsafe {
            get_physical_monitors_from_hmonitor(HMONITOR(display.id as isize)).map_err(|source| {
                Error::GettingDisplayInfoFailed {
                    display: display.device_name.clone(),
                    source: Box::new(source),
                }
            })
        }
    }

    fn read_brightness(
        &self,
        handle: &WrappedPhysicalMonitor,
    ) -> Result<BrightnessReading, Error> {
        Ok(ddcci_get_monitor_brightness(handle)?)
    }

    fn write_brightness(&self, handle: &WrappedPhysicalMonitor, value: u32) -> Result<(), Error> {
        Ok(ddcci_set_monitor_brightness(handle, value)?)
    }
}

/// Calls `EnumDisplayMonitors` and returns a list of `HMONITOR` handles.\
/// Note that a `HMONITOR` is a logical construct that may correspond to multiple physical monitors.\
/// e.g. when in "Duplicate" mode two physical monitors will belong to the same `HMONITOR`
unsafe fn enum_display_monitors() -> Result<Vec<HMONITOR>, SysError> {
    unsafe extern "system" fn enum_monitors(
        handle: HMONITOR,
        _: HDC,
        _: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let monitors = &mut *(data.0 as *mut Vec<HMONITOR>);
        monitors.push(handle);
        true.into()
    }
    let mut hmonitors = Vec::<HMONITOR>::new();
    EnumDisplayMonitors(
        HDC::default(),
        None,
        Some(enum_monitors),
        LPARAM(&mut hmonitors as *mut _ as isize),
    )
    .ok()
    .map_err(SysError::EnumDisplayMonitorsFailed)?;
    Ok(hmonitors)
}

unsafe fn get_monitor_info(hmonitor: HMONITOR) -> Result<LogicalDisplay, SysError> {
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = size_of::<MONITORINFOEXW>() as u32;
    let info_ptr = &mut info as *mut _ as *mut MONITORINFO;
    GetMonitorInfoW(hmonitor, info_ptr)
        .ok()
        .map_err(|source| SysError::GetMonitorInfoFailed {
            hmonitor: hmonitor.0,
            source,
        })?;
    Ok(LogicalDisplay {
        id: hmonitor.0 as u64,
        device_name: wchar_to_string(&info.szDevice),
        bounds: to_rect(&info.monitorInfo.rcMonitor),
        work_area: to_rect(&info.monitorInfo.rcWork),
    })
}

/// Gets the list of `PHYSICAL_MONITOR` handles that belong to a `HMONITOR`.\
/// A valid handle is still returned for monitors without DDC/CI and for Remote Desktop Session
/// displays; reading their brightness fails later.
unsafe fn get_physical_monitors_from_hmonitor(
    hmonitor: HMONITOR,
) -> Result<Vec<WrappedPhysicalMonitor>, SysError> {
    let mut physical_number: u32 = 0;
    BOOL(GetNumberOfPhysicalMonitorsFromHMONITOR(
        hmonitor,
        &mut physical_number,
    ))
    .ok()
    .map_err(SysError::GetPhysicalMonitorsFailed)?;
    if physical_number == 0 {
        return Ok(Vec::new());
    }
    let mut raw_physical_monitors = vec![PHYSICAL_MONITOR::default(); physical_number as usize];
    // Allocate first so that pushing the wrapped handles always succeeds.
    let mut physical_monitors = Vec::with_capacity(raw_physical_monitors.len());
    BOOL(GetPhysicalMonitorsFromHMONITOR(
        hmonitor,
        &mut raw_physical_monitors,
    ))
    .ok()
    .map_err(SysError::GetPhysicalMonitorsFailed)?;
    // Transform immediately into WrappedPhysicalMonitor so the handles don't leak
    raw_physical_monitors.into_iter().for_each(|pm| {
        physical_monitors.push(WrappedPhysicalMonitor {
            handle: pm.hPhysicalMonitor,
            description: wchar_to_string(&pm.szPhysicalMonitorDescription),
        })
    });
    Ok(physical_monitors)
}

fn ddcci_get_monitor_brightness(
    monitor: &WrappedPhysicalMonitor,
) -> Result<BrightnessReading, SysError> {
    unsafe {
        let mut v = BrightnessReading::default();
        BOOL(GetMonitorBrightness(
            monitor.handle,
            &mut v.minimum,
            &mut v.current,
            &mut v.maximum,
        ))
        .ok()
        .map(|_| v)
        .map_err(|source| SysError::GettingMonitorBrightnessFailed {
            description: monitor.description.clone(),
            source,
        })
    }
}

fn ddcci_set_monitor_brightness(
    monitor: &WrappedPhysicalMonitor,
    value: u32,
) -> Result<(), SysError> {
    unsafe {
        BOOL(SetMonitorBrightness(monitor.handle, value))
            .ok()
            .map_err(|source| SysError::SettingBrightnessFailed {
                description: monitor.description.clone(),
                source,
            })
    }
}

#[derive(Clone, Debug, Error)]
pub(crate) enum SysError {
    #[error("Failed to enumerate display monitors")]
    EnumDisplayMonitorsFailed(#[source] WinError),
    #[error("Failed to get monitor info for monitor 0x{hmonitor:X}")]
    GetMonitorInfoFailed { hmonitor: isize, source: WinError },
    #[error("Failed to get physical monitors from the HMONITOR")]
    GetPhysicalMonitorsFailed(#[source] WinError),
    #[error("Failed to get monitor brightness (DDCCI)")]
    GettingMonitorBrightnessFailed {
        description: String,
        source: WinError,
    },
    #[error("Failed to set monitor brightness (DDCCI)")]
    SettingBrightnessFailed {
        description: String,
        source: WinError,
    },
}

impl From<SysError> for Error {
    fn from(e: SysError) -> Self {
        match &e {
            SysError::EnumDisplayMonitorsFailed(..) => Error::ListingMonitorsFailed(Box::new(e)),
            SysError::GetMonitorInfoFailed { hmonitor, .. } => Error::GettingDisplayInfoFailed {
                display: format!("0x{:X}", hmonitor),
                source: Box::new(e),
            },
            SysError::GetPhysicalMonitorsFailed(..) => Error::GettingDisplayInfoFailed {
                display: "unknown".into(),
                source: Box::new(e),
            },
            SysError::GettingMonitorBrightnessFailed { description, .. } => {
                Error::GettingBrightnessFailed {
                    monitor: description.clone(),
                    source: Box::new(e),
                }
            }
            SysError::SettingBrightnessFailed { description, .. } => {
                Error::SettingBrightnessFailed {
                    monitor: description.clone(),
                    source: Box::new(e),
                }
            }
        }
    }
}

fn to_rect(rect: &RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn wchar_to_string(s: &[u16]) -> String {
    let end = s.iter().position(|&x| x == 0).unwrap_or(s.len());
    let truncated = &s[0..end];
    OsString::from_wide(truncated).to_string_lossy().into()
}
