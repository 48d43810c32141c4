// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-pass counters.

/// How a draw pass covered the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// The whole surface was redrawn.
    Full,
    /// Only the merged dirty regions were redrawn.
    Partial,
}

/// Snapshot of draw-pass statistics, see [`RegionMerger::stats`](crate::RegionMerger::stats).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DrawStats {
    /// Draw passes recorded since the last reset.
    pub total_draws: u64,
    /// Passes that redrew the whole surface.
    pub full_redraws: u64,
    /// Passes that redrew only dirty regions.
    pub partial_redraws: u64,
    /// Regions currently waiting for the next pass.
    pub pending_regions: usize,
    /// `partial_redraws / total_draws`, `0.0` before the first pass.
    pub efficiency: f64,
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DrawCounters {
    total: u64,
    full: u64,
    partial: u64,
}

impl DrawCounters {
    pub(crate) fn record(&mut self, kind: DrawKind) {
        self.total += 1;
        match kind {
            DrawKind::Full => self.full += 1,
            DrawKind::Partial => self.partial += 1,
        }
    }

    pub(crate) fn snapshot(&self, pending_regions: usize) -> DrawStats {
        let efficiency = if self.total == 0 {
            0.0
        } else {
            self.partial as f64 / self.total as f64
        };
        DrawStats {
            total_draws: self.total,
            full_redraws: self.full,
            partial_redraws: self.partial,
            pending_regions,
            efficiency,
        }
    }
}
