// Copyright (C) 2024 The clibright authors. Distributed under the 0BSD license.

//! Resolution of a user supplied monitor index.

use crate::Error;
use std::num::NonZeroUsize;

/// The physical monitors an operation applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetSelection {
    /// Every discovered monitor
    All,
    /// The monitor at this 1-based index
    Single(NonZeroUsize),
}

impl TargetSelection {
    /// Resolves `index` against `count` discovered monitors.
    ///
    /// Index 0 selects every monitor, even when there are none. Any other index must be within
    /// `1..=count`.
    pub fn resolve(index: usize, count: usize) -> Result<Self, Error> {
        match NonZeroUsize::new(index) {
            None => Ok(TargetSelection::All),
            Some(i) if index <= count => Ok(TargetSelection::Single(i)),
            Some(_) => Err(Error::InvalidIndex { index, count }),
        }
    }

    /// Returns true if the monitor at 1-based `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        match self {
            TargetSelection::All => true,
            TargetSelection::Single(i) => i.get() == index,
        }
    }
}
