// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Diagnostic output setup.

use crate::Verbosity;

/// Installs a stderr subscriber filtered by `verbosity`.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(verbosity: Verbosity) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(verbosity.level_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
