// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! In-memory port used by the unit tests.

use crate::{BrightnessReading, Error, LogicalDisplay, MonitorControlPort, MonitorHandle, Rect};
use std::{cell::RefCell, collections::HashMap, io, rc::Rc};

#[derive(Clone, Debug)]
pub(crate) struct FakeMonitor {
    pub(crate) id: u64,
    pub(crate) description: String,
    pub(crate) reading: BrightnessReading,
    pub(crate) fail_read: bool,
    pub(crate) fail_write: bool,
}

impl FakeMonitor {
    pub(crate) fn new(id: u64, minimum: u32, current: u32, maximum: u32) -> Self {
        Self {
            id,
            description: format!("Monitor {id}"),
            reading: BrightnessReading::new(minimum, current, maximum),
            fail_read: false,
            fail_write: false,
        }
    }

    pub(crate) fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub(crate) fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct FakeDisplay {
    pub(crate) display: LogicalDisplay,
    pub(crate) monitors: Vec<FakeMonitor>,
    pub(crate) fail_info: bool,
    pub(crate) fail_monitors: bool,
}

impl FakeDisplay {
    pub(crate) fn new(id: u64, monitors: Vec<FakeMonitor>) -> Self {
        Self {
            display: LogicalDisplay {
                id,
                device_name: format!(r"\\.\DISPLAY{id}"),
                bounds: Rect {
                    left: 0,
                    top: 0,
                    right: 1920,
                    bottom: 1080,
                },
                work_area: Rect {
                    left: 0,
                    top: 0,
                    right: 1920,
                    bottom: 1040,
                },
            },
            monitors,
            fail_info: false,
            fail_monitors: false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub(crate) readings: HashMap<u64, BrightnessReading>,
    pub(crate) writes: Vec<(u64, u32)>,
    pub(crate) acquired: usize,
    pub(crate) released: usize,
}

#[derive(Debug, Default)]
pub(crate) struct FakePort {
    pub(crate) displays: Vec<FakeDisplay>,
    pub(crate) fail_enumeration: bool,
    pub(crate) state: Rc<RefCell<FakeState>>,
}

impl FakePort {
    pub(crate) fn new(displays: Vec<FakeDisplay>) -> Self {
        let state = FakeState {
            readings: displays
                .iter()
                .flat_map(|d| d.monitors.iter())
                .map(|m| (m.id, m.reading))
                .collect(),
            ..Default::default()
        };
        Self {
            displays,
            fail_enumeration: false,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// One display per monitor.
    pub(crate) fn with_monitors(monitors: Vec<FakeMonitor>) -> Self {
        Self::new(
            monitors
                .into_iter()
                .enumerate()
                .map(|(i, m)| FakeDisplay::new(i as u64 + 1, vec![m]))
                .collect(),
        )
    }

    pub(crate) fn writes(&self) -> Vec<(u64, u32)> {
        self.state.borrow().writes.clone()
    }

    pub(crate) fn reading(&self, id: u64) -> BrightnessReading {
        self.state.borrow().readings[&id]
    }

    pub(crate) fn outstanding_handles(&self) -> usize {
        let state = self.state.borrow();
        state.acquired - state.released
    }

    fn monitor(&self, id: u64) -> &FakeMonitor {
        self.displays
            .iter()
            .flat_map(|d| d.monitors.iter())
            .find(|m| m.id == id)
            .expect("unknown fake monitor")
    }
}

#[derive(Debug)]
pub(crate) struct FakeHandle {
    id: u64,
    description: String,
    state: Rc<RefCell<FakeState>>,
}

impl MonitorHandle for FakeHandle {
    fn description(&self) -> &str {
        &self.description
    }

    fn raw(&self) -> u64 {
        self.id
    }
}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.state.borrow_mut().released += 1;
    }
}

fn native_failure(what: &str) -> Box<io::Error> {
    Box::new(io::Error::new(io::ErrorKind::Other, what.to_owned()))
}

impl MonitorControlPort for FakePort {
    type Handle = FakeHandle;

    fn logical_displays(&self) -> Result<Vec<Result<LogicalDisplay, Error>>, Error> {
        if self.fail_enumeration {
            return Err(Error::ListingMonitorsFailed(native_failure(
                "EnumDisplayMonitors failed",
            )));
        }
        Ok(self
            .displays
            .iter()
            .map(|d| {
                if d.fail_info {
                    Err(Error::GettingDisplayInfoFailed {
                        display: format!("0x{:X}", d.display.id),
                        source: native_failure("GetMonitorInfoW failed"),
                    })
                } else {
                    Ok(d.display.clone())
                }
            })
            .collect())
    }

    fn physical_monitors(&self, display: &LogicalDisplay) -> Result<Vec<FakeHandle>, Error> {
        let fake = self
            .displays
            .iter()
            .find(|d| d.display.id == display.id)
            .expect("unknown fake display");
        if fake.fail_monitors {
            return Err(Error::GettingDisplayInfoFailed {
                display: display.device_name.clone(),
                source: native_failure("GetPhysicalMonitorsFromHMONITOR failed"),
            });
        }
        self.state.borrow_mut().acquired += fake.monitors.len();
        Ok(fake
            .monitors
            .iter()
            .map(|m| FakeHandle {
                id: m.id,
                description: m.description.clone(),
                state: Rc::clone(&self.state),
            })
            .collect())
    }

    fn read_brightness(&self, handle: &FakeHandle) -> Result<BrightnessReading, Error> {
        if self.monitor(handle.id).fail_read {
            return Err(Error::GettingBrightnessFailed {
                monitor: handle.description.clone(),
                source: native_failure("GetMonitorBrightness failed"),
            });
        }
        Ok(self.state.borrow().readings[&handle.id])
    }

    fn write_brightness(&self, handle: &FakeHandle, value: u32) -> Result<(), Error> {
        if self.monitor(handle.id).fail_write {
            return Err(Error::SettingBrightnessFailed {
                monitor: handle.description.clone(),
                source: native_failure("SetMonitorBrightness failed"),
            });
        }
        let mut state = self.state.borrow_mut();
        state.writes.push((handle.id, value));
        if let Some(reading) = state.readings.get_mut(&handle.id) {
            reading.current = value;
        }
        Ok(())
    }
}
