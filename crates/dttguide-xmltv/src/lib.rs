//! XMLTV conversion for DTT Guide listings.
//!
//! Filters programme records to a requested start window, reconciles
//! channels with the programmes that survive, and serializes the result
//! as an XMLTV document.

/// Heuristic check that fetched data spans the requested window.
pub mod coverage;
/// XMLTV document model and its assembly from upstream records.
pub mod document;
/// Broadcaster-timezone timestamps and durations.
pub mod time;
/// Start-time window filtering and channel reconciliation.
pub mod window;
mod writer;

pub use coverage::{Coverage, assess_coverage};
pub use document::{
    DisplayNameOverrides, SourceInfo, Subtitles, Tv, XmltvChannel, XmltvProgramme, build_channels,
    build_programmes, channel_id,
};
pub use time::{BROADCAST_TZ, format_xmltv_time, parse_duration, parse_start, programme_start};
pub use window::{
    DateWindow, filter_programmes, retain_listed_programmes, retain_scheduled_channels,
};
