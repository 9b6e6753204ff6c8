//! Start-time window filtering and channel reconciliation.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use dttguide_api::guide::{ChannelRecord, ProgramRecord};

use crate::time::{BROADCAST_TZ, programme_start};

/// Half-open programme start window `[earliest_start, latest_start_exclusive)`.
///
/// Either bound may be absent, in which case that side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    /// Inclusive lower bound.
    pub earliest_start: Option<DateTime<FixedOffset>>,
    /// Exclusive upper bound.
    pub latest_start_exclusive: Option<DateTime<FixedOffset>>,
}

impl DateWindow {
    /// Creates a window from explicit bounds.
    #[must_use]
    pub const fn new(
        earliest_start: Option<DateTime<FixedOffset>>,
        latest_start_exclusive: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            earliest_start,
            latest_start_exclusive,
        }
    }

    /// Creates a window that accepts every start.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Resolves a window from XMLTV `--days`/`--offset` relative to `today`
    /// (a calendar date in UTC+7).
    ///
    /// - `offset` sets the lower bound to midnight of `today + offset` days.
    /// - `days` sets the upper bound to `days` days after the lower bound,
    ///   which defaults to midnight of `today`.
    /// - Without either, the window is unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the date arithmetic overflows.
    pub fn relative_to(today: NaiveDate, days: Option<i64>, offset: Option<i64>) -> Result<Self> {
        let midnight = today
            .and_time(NaiveTime::MIN)
            .and_local_timezone(*BROADCAST_TZ)
            .single()
            .with_context(|| format!("no midnight for {today}"))?;

        let mut earliest_start = offset
            .map(|offset| shift_days(midnight, offset))
            .transpose()?;

        let latest_start_exclusive = match days {
            Some(days) => {
                let start = *earliest_start.get_or_insert(midnight);
                Some(shift_days(start, days)?)
            }
            None => None,
        };

        Ok(Self::new(earliest_start, latest_start_exclusive))
    }

    /// Returns `true` if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.earliest_start.is_none() && self.latest_start_exclusive.is_none()
    }

    /// Returns `true` if `start` lies inside the window.
    #[must_use]
    pub fn contains(&self, start: &DateTime<FixedOffset>) -> bool {
        self.earliest_start.is_none_or(|earliest| *start >= earliest)
            && self
                .latest_start_exclusive
                .is_none_or(|latest| *start < latest)
    }
}

/// Moves an instant by whole days.
fn shift_days(instant: DateTime<FixedOffset>, days: i64) -> Result<DateTime<FixedOffset>> {
    TimeDelta::try_days(days)
        .and_then(|delta| instant.checked_add_signed(delta))
        .with_context(|| format!("date out of range: {instant} shifted by {days} days"))
}

/// Keeps the programmes whose start lies inside `window`, preserving order.
///
/// # Errors
///
/// Returns an error if any programme start cannot be parsed.
pub fn filter_programmes(
    programmes: Vec<ProgramRecord>,
    window: &DateWindow,
) -> Result<Vec<ProgramRecord>> {
    let total = programmes.len();
    let mut kept = Vec::with_capacity(total);

    for programme in programmes {
        let start = programme_start(&programme).with_context(|| {
            format!(
                "programme {:?} on channel {}",
                programme.pg_title, programme.channel_no
            )
        })?;
        if window.contains(&start) {
            kept.push(programme);
        }
    }

    tracing::debug!(
        total,
        kept = kept.len(),
        window = ?window,
        "programmes filtered by start window"
    );

    Ok(kept)
}

/// Channel numbers that have at least one programme.
#[must_use]
pub fn scheduled_channel_numbers(programmes: &[ProgramRecord]) -> HashSet<&str> {
    programmes
        .iter()
        .map(|programme| programme.channel_no.as_str())
        .collect()
}

/// Drops channels without any programme in `programmes`, preserving order.
///
/// Repeated channel numbers keep only their first record.
#[must_use]
pub fn retain_scheduled_channels(
    channels: Vec<ChannelRecord>,
    programmes: &[ProgramRecord],
) -> Vec<ChannelRecord> {
    let scheduled = scheduled_channel_numbers(programmes);
    let total = channels.len();
    let mut seen = HashSet::new();
    let kept: Vec<ChannelRecord> = channels
        .into_iter()
        .filter(|channel| scheduled.contains(channel.channel_no.as_str()))
        .filter(|channel| seen.insert(channel.channel_no.clone()))
        .collect();

    tracing::debug!(
        total,
        kept = kept.len(),
        "unscheduled and repeated channels dropped"
    );

    kept
}

/// Drops programmes whose channel number has no record in `channels`,
/// preserving order.
#[must_use]
pub fn retain_listed_programmes(
    programmes: Vec<ProgramRecord>,
    channels: &[ChannelRecord],
) -> Vec<ProgramRecord> {
    let listed: HashSet<&str> = channels
        .iter()
        .map(|channel| channel.channel_no.as_str())
        .collect();
    let total = programmes.len();
    let kept: Vec<ProgramRecord> = programmes
        .into_iter()
        .filter(|programme| listed.contains(programme.channel_no.as_str()))
        .collect();

    let orphans = total.saturating_sub(kept.len());
    if orphans > 0 {
        tracing::warn!(orphans, "programmes on unknown channels dropped");
    }

    kept
}
