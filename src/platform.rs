// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Native monitor control for the running platform.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod linux;
        pub use self::linux::SysfsBacklight as NativePort;
    } else if #[cfg(windows)] {
        mod windows;
        pub use self::windows::MonitorConfiguration as NativePort;
    } else {
        compile_error!("unsupported platform");
    }
}
