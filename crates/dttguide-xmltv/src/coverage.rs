//! Heuristic check that fetched listings span the requested window.
//!
//! Upstream keeps an undocumented and sometimes short horizon of data, so
//! a grab can silently come back thinner than asked for. This is a
//! liveness check, not an exact guarantee: a bound counts as covered when
//! some programme starts within 24 hours of it on the inner side.

use anyhow::Result;
use chrono::TimeDelta;
use dttguide_api::guide::ProgramRecord;

use crate::time::programme_start;
use crate::window::DateWindow;

/// How close to a bound a programme start must be to cover it.
const COVERAGE_TOLERANCE: TimeDelta = TimeDelta::hours(24);

/// Which bounds of a window are covered by programme data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    /// Some programme starts less than 24h after the lower bound
    /// (or the window has no usable bounds).
    pub covers_earliest_start: bool,
    /// Some programme starts less than 24h before the upper bound
    /// (or the window has no usable bounds).
    pub covers_latest_start: bool,
}

impl Coverage {
    /// Coverage of a window that places no requirement on the data.
    const TRIVIAL: Self = Self {
        covers_earliest_start: true,
        covers_latest_start: true,
    };

    /// Returns `true` if both bounds are covered.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.covers_earliest_start && self.covers_latest_start
    }
}

/// Assesses how well `programmes` cover `window`.
///
/// Requires both bounds; a window missing either one is trivially covered.
/// Starts before the lower bound also count toward it (the difference is
/// negative, hence below 24h).
///
/// # Errors
///
/// Returns an error if a programme start cannot be parsed.
pub fn assess_coverage(programmes: &[ProgramRecord], window: &DateWindow) -> Result<Coverage> {
    let (Some(earliest), Some(latest)) = (window.earliest_start, window.latest_start_exclusive)
    else {
        return Ok(Coverage::TRIVIAL);
    };

    let mut coverage = Coverage {
        covers_earliest_start: false,
        covers_latest_start: false,
    };

    for programme in programmes {
        let start = programme_start(programme)?;

        if start.signed_duration_since(earliest) < COVERAGE_TOLERANCE {
            coverage.covers_earliest_start = true;
        }
        if latest.signed_duration_since(start) < COVERAGE_TOLERANCE {
            coverage.covers_latest_start = true;
        }
        if coverage.is_complete() {
            break;
        }
    }

    Ok(coverage)
}
