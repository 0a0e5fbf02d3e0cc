// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Resolution of logical displays into a flat, indexed list of physical monitors.

use crate::{Error, LogicalDisplay, MonitorControlPort, MonitorHandle};
use tracing::debug;

/// A physical monitor and its 1-based position among all discovered monitors.
#[derive(Debug)]
pub struct DiscoveredMonitor<H> {
    /// 1-based index, stable for the lifetime of the [`Discovery`]
    pub index: usize,
    /// Owned native handle
    pub handle: H,
}

/// A logical display with the physical monitors found behind it.
#[derive(Debug)]
pub struct DiscoveredDisplay<H> {
    /// Display metadata
    pub display: LogicalDisplay,
    /// Physical monitors in platform order
    pub monitors: Vec<DiscoveredMonitor<H>>,
}

/// Result of one discovery pass.
///
/// Owns every handle it found; they are released when it is dropped.
#[derive(Debug)]
pub struct Discovery<H> {
    /// Logical displays in platform order
    pub displays: Vec<DiscoveredDisplay<H>>,
    /// Failures that were recovered from while discovering
    pub failures: Vec<Error>,
}

impl<H> Default for Discovery<H> {
    fn default() -> Self {
        Self {
            displays: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<H> Discovery<H> {
    /// Returns all physical monitors in index order.
    pub fn monitors(&self) -> impl Iterator<Item = &DiscoveredMonitor<H>> {
        self.displays.iter().flat_map(|d| d.monitors.iter())
    }

    /// Returns the number of physical monitors.
    pub fn len(&self) -> usize {
        self.displays.iter().map(|d| d.monitors.len()).sum()
    }

    /// Returns true if no physical monitor was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Enumerates every physical monitor reachable through `port`.
///
/// Failing to enumerate displays yields an empty discovery. Failing to read one display is
/// recorded in [`Discovery::failures`] and the remaining displays are still visited.
pub fn discover<P: MonitorControlPort>(port: &P) -> Discovery<P::Handle> {
    let mut discovery = Discovery::default();
    let displays = match port.logical_displays() {
        Ok(displays) => displays,
        Err(e) => {
            debug!("{}", e.chain());
            discovery.failures.push(e);
            return discovery;
        }
    };
    let mut next_index = 1;
    for logical in displays {
        let logical = match logical {
            Ok(logical) => logical,
            Err(e) => {
                debug!("{}", e.chain());
                discovery.failures.push(e);
                continue;
            }
        };
        let handles = match port.physical_monitors(&logical) {
            Ok(handles) => handles,
            Err(e) => {
                debug!("{}", e.chain());
                discovery.failures.push(e);
                Vec::new()
            }
        };
        debug!(
            "display {} (0x{:X}) has {} physical monitors",
            logical.device_name,
            logical.id,
            handles.len()
        );
        let monitors = handles
            .into_iter()
            .map(|handle| {
                let index = next_index;
                next_index += 1;
                debug!(
                    "physical monitor {} is {:?} (0x{:X})",
                    index,
                    handle.description(),
                    handle.raw()
                );
                DiscoveredMonitor { index, handle }
            })
            .collect();
        discovery.displays.push(DiscoveredDisplay {
            display: logical,
            monitors,
        });
    }
    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDisplay, FakeMonitor, FakePort};

    fn indices<H: MonitorHandle>(discovery: &Discovery<H>) -> Vec<(usize, u64)> {
        discovery
            .monitors()
            .map(|m| (m.index, m.handle.raw()))
            .collect()
    }

    #[test]
    fn flattens_in_platform_order() {
        let port = FakePort::new(vec![
            FakeDisplay::new(
                7,
                vec![
                    FakeMonitor::new(30, 0, 10, 100),
                    FakeMonitor::new(10, 0, 10, 100),
                ],
            ),
            FakeDisplay::new(3, vec![]),
            FakeDisplay::new(5, vec![FakeMonitor::new(20, 0, 10, 100)]),
        ]);
        let discovery = discover(&port);
        assert_eq!(discovery.displays.len(), 3);
        assert_eq!(discovery.len(), 3);
        assert_eq!(indices(&discovery), vec![(1, 30), (2, 10), (3, 20)]);
        assert!(discovery.failures.is_empty());
    }

    #[test]
    fn unreadable_display_is_skipped() {
        let mut broken = FakeDisplay::new(2, vec![FakeMonitor::new(20, 0, 10, 100)]);
        broken.fail_info = true;
        let port = FakePort::new(vec![
            FakeDisplay::new(1, vec![FakeMonitor::new(10, 0, 10, 100)]),
            broken,
            FakeDisplay::new(3, vec![FakeMonitor::new(30, 0, 10, 100)]),
        ]);
        let discovery = discover(&port);
        assert_eq!(indices(&discovery), vec![(1, 10), (2, 30)]);
        assert_eq!(discovery.failures.len(), 1);
        assert!(matches!(
            discovery.failures[0],
            Error::GettingDisplayInfoFailed { .. }
        ));
    }

    #[test]
    fn display_without_readable_monitors_is_kept_empty() {
        let mut broken = FakeDisplay::new(1, vec![FakeMonitor::new(10, 0, 10, 100)]);
        broken.fail_monitors = true;
        let port = FakePort::new(vec![
            broken,
            FakeDisplay::new(2, vec![FakeMonitor::new(20, 0, 10, 100)]),
        ]);
        let discovery = discover(&port);
        assert_eq!(discovery.displays.len(), 2);
        assert!(discovery.displays[0].monitors.is_empty());
        assert_eq!(indices(&discovery), vec![(1, 20)]);
        assert_eq!(discovery.failures.len(), 1);
    }

    #[test]
    fn failed_enumeration_is_empty() {
        let mut port = FakePort::with_monitors(vec![FakeMonitor::new(1, 0, 10, 100)]);
        port.fail_enumeration = true;
        let discovery = discover(&port);
        assert!(discovery.is_empty());
        assert!(matches!(
            discovery.failures.as_slice(),
            [Error::ListingMonitorsFailed(_)]
        ));
    }

    #[test]
    fn handles_are_released_on_drop() {
        let port = FakePort::new(vec![
            FakeDisplay::new(
                1,
                vec![FakeMonitor::new(1, 0, 1, 2), FakeMonitor::new(2, 0, 1, 2)],
            ),
            FakeDisplay::new(2, vec![FakeMonitor::new(3, 0, 1, 2)]),
        ]);
        let discovery = discover(&port);
        assert_eq!(port.outstanding_handles(), 3);
        drop(discovery);
        assert_eq!(port.outstanding_handles(), 0);
    }
}
