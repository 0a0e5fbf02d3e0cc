// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Text renderings of discovered monitors and operation results.

use crate::{
    Discovery, Error, MonitorControlPort, MonitorHandle, OperationResult, TargetSelection,
};
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Write;

/// One logical display as shown by `list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayReport {
    /// Device name
    pub monitor_name: String,
    /// Native display identifier in uppercase hexadecimal
    pub handle: String,
    /// Size of the bounding rectangle
    pub monitor_size: Size,
    /// Upper-left corner of the bounding rectangle
    pub monitor_location: Point,
    /// Work area rectangle
    pub work_area: Area,
    /// Physical monitors behind the display
    pub physical_monitors: Vec<MonitorReport>,
}

/// Width and height in pixels.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Virtual-desktop position.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Position and size.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One physical monitor as shown by `list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitorReport {
    /// 1-based index accepted by `--index`
    pub monitor_index: usize,
    /// Device-supplied description
    pub description: String,
    /// Raw minimum, if it could be read
    pub minimum_brightness: Option<u32>,
    /// Raw current value, if it could be read
    pub current_brightness: Option<u32>,
    /// Raw maximum, if it could be read
    pub maximum_brightness: Option<u32>,
    /// Why the brightness could not be read
    #[serde(skip)]
    pub error: Option<String>,
}

/// Reads every targeted monitor and collects what `list` shows.
///
/// When a single monitor is targeted, only its display is kept.
pub fn collect<P: MonitorControlPort>(
    port: &P,
    discovery: &Discovery<P::Handle>,
    target: TargetSelection,
) -> Vec<DisplayReport> {
    discovery
        .displays
        .iter()
        .filter(|d| {
            target == TargetSelection::All || d.monitors.iter().any(|m| target.contains(m.index))
        })
        .map(|d| DisplayReport {
            monitor_name: d.display.device_name.clone(),
            handle: format!("{:X}", d.display.id),
            monitor_size: Size {
                width: d.display.bounds.width(),
                height: d.display.bounds.height(),
            },
            monitor_location: Point {
                x: d.display.bounds.left,
                y: d.display.bounds.top,
            },
            work_area: Area {
                x: d.display.work_area.left,
                y: d.display.work_area.top,
                width: d.display.work_area.width(),
                height: d.display.work_area.height(),
            },
            physical_monitors: d
                .monitors
                .iter()
                .filter(|m| target.contains(m.index))
                .map(|m| {
                    let mut report = MonitorReport {
                        monitor_index: m.index,
                        description: m.handle.description().to_owned(),
                        minimum_brightness: None,
                        current_brightness: None,
                        maximum_brightness: None,
                        error: None,
                    };
                    match port.read_brightness(&m.handle) {
                        Ok(r) => {
                            report.minimum_brightness = Some(r.minimum);
                            report.current_brightness = Some(r.current);
                            report.maximum_brightness = Some(r.maximum);
                        }
                        Err(e) => report.error = Some(e.chain()),
                    }
                    report
                })
                .collect(),
        })
        .collect()
}

/// Renders displays as a multi-line report.
pub fn human(displays: &[DisplayReport]) -> String {
    let mut out = String::new();
    for d in displays {
        let _ = writeln!(
            out,
            "Found monitor {}, located at Position: ({}, {}), Size: ({}, {})",
            d.monitor_name,
            d.monitor_location.x,
            d.monitor_location.y,
            d.monitor_size.width,
            d.monitor_size.height
        );
        let _ = writeln!(
            out,
            "It has {} physical monitors:",
            d.physical_monitors.len()
        );
        for m in &d.physical_monitors {
            let _ = writeln!(
                out,
                "    Physical monitor {}, name {}",
                m.monitor_index, m.description
            );
            match (
                m.minimum_brightness,
                m.current_brightness,
                m.maximum_brightness,
            ) {
                (Some(min), Some(cur), Some(max)) => {
                    let _ = writeln!(
                        out,
                        "        Current brightness: {} - Minimum brightness: {} - Maximum brightness: {}",
                        cur, min, max
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "        Brightness unavailable: {}",
                        m.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
    }
    out
}

/// Renders displays as a pretty-printed JSON array.
pub fn json(displays: &[DisplayReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(displays)
}

/// Renders the new brightness of every successful result as comma separated percentages.
pub fn brightness_line(results: &[OperationResult]) -> String {
    results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .map(|change| change.new.to_string())
        .join(",")
}

/// Returns the failed results with their monitor index.
pub fn failures(results: &[OperationResult]) -> impl Iterator<Item = (usize, &Error)> {
    results
        .iter()
        .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.index, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        discover,
        fake::{FakeDisplay, FakeMonitor, FakePort},
        BrightnessEngine, Config,
    };

    fn port() -> FakePort {
        FakePort::new(vec![
            FakeDisplay::new(
                0x10001,
                vec![
                    FakeMonitor::new(1, 0, 20, 100),
                    FakeMonitor::new(2, 0, 0, 0).failing_read(),
                ],
            ),
            FakeDisplay::new(0x20002, vec![]),
        ])
    }

    #[test]
    fn human_report() {
        let port = port();
        let discovery = discover(&port);
        let text = human(&collect(&port, &discovery, TargetSelection::All));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            r"Found monitor \\.\DISPLAY65537, located at Position: (0, 0), Size: (1920, 1080)"
        );
        assert_eq!(lines[1], "It has 2 physical monitors:");
        assert_eq!(lines[2], "    Physical monitor 1, name Monitor 1");
        assert_eq!(
            lines[3],
            "        Current brightness: 20 - Minimum brightness: 0 - Maximum brightness: 100"
        );
        assert!(lines[5].starts_with("        Brightness unavailable: Getting brightness failed"));
        assert_eq!(lines[7], "It has 0 physical monitors:");
    }

    #[test]
    fn json_report() {
        let port = port();
        let discovery = discover(&port);
        let text = json(&collect(&port, &discovery, TargetSelection::All)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let first = &value[0];
        assert_eq!(first["Handle"], "10001");
        assert_eq!(first["MonitorSize"]["Width"], 1920);
        assert_eq!(first["MonitorLocation"]["X"], 0);
        assert_eq!(first["WorkArea"]["Height"], 1040);
        let monitors = first["PhysicalMonitors"].as_array().unwrap();
        assert_eq!(monitors[0]["MonitorIndex"], 1);
        assert_eq!(monitors[0]["CurrentBrightness"], 20);
        assert!(monitors[1]["CurrentBrightness"].is_null());
        assert!(monitors[1].get("Error").is_none());
        assert_eq!(value[1]["PhysicalMonitors"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn single_target_keeps_its_display_only() {
        let port = FakePort::new(vec![
            FakeDisplay::new(1, vec![FakeMonitor::new(1, 0, 1, 2)]),
            FakeDisplay::new(
                2,
                vec![FakeMonitor::new(2, 0, 1, 2), FakeMonitor::new(3, 0, 1, 2)],
            ),
        ]);
        let discovery = discover(&port);
        let target = TargetSelection::resolve(3, discovery.len()).unwrap();
        let displays = collect(&port, &discovery, target);
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].handle, "2");
        let indices: Vec<_> = displays[0]
            .physical_monitors
            .iter()
            .map(|m| m.monitor_index)
            .collect();
        assert_eq!(indices, vec![3]);
    }

    #[test]
    fn brightness_line_skips_failures() {
        let port = FakePort::with_monitors(vec![
            FakeMonitor::new(1, 0, 20, 100),
            FakeMonitor::new(2, 0, 0, 0).failing_read(),
            FakeMonitor::new(3, 0, 5, 10),
        ]);
        let discovery = discover(&port);
        let results = BrightnessEngine::new(&port, Config::default())
            .get(&discovery, TargetSelection::All);
        assert_eq!(brightness_line(&results), "20.00%,50.00%");
        let failed: Vec<_> = failures(&results).map(|(i, _)| i).collect();
        assert_eq!(failed, vec![2]);
    }
}
