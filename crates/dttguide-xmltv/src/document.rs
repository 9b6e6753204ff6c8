//! XMLTV document model and its assembly from upstream records.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use dttguide_api::guide::{ChannelRecord, LogoRecord, ProgramRecord};

use crate::time::{parse_duration, programme_start};

/// Suffix appended to channel numbers to form XMLTV channel ids.
pub const CHANNEL_ID_SUFFIX: &str = "dttguide.nbtc.go.th";

/// Extra display names keyed by channel number, emitted before the
/// official station name.
pub type DisplayNameOverrides = BTreeMap<String, String>;

/// Builds the XMLTV channel id for a channel number.
///
/// Used for both `<channel id>` and `<programme channel>`, so the two
/// always agree.
#[must_use]
pub fn channel_id(channel_no: &str) -> String {
    format!("{channel_no}.{CHANNEL_ID_SUFFIX}")
}

/// Builds a PNG data URL from a base64 payload, which is kept verbatim.
#[must_use]
pub fn logo_data_url(payload: &str) -> String {
    format!("data:image/png;base64,{payload}")
}

/// Root `<tv>` metadata attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// `source-info-name`.
    pub source_info_name: String,
    /// `source-info-url`.
    pub source_info_url: String,
    /// `generator-info-name`.
    pub generator_info_name: String,
    /// `generator-info-url`.
    pub generator_info_url: String,
}

impl Default for SourceInfo {
    fn default() -> Self {
        Self {
            source_info_name: String::from("DTT Guide"),
            source_info_url: String::from("https://dttguide.nbtc.go.th/dttguide/"),
            generator_info_name: String::from("tv_grab_th_dttguide"),
            generator_info_url: String::from("https://github.com/peat-psuwit/tv_grab_th_dttguide"),
        }
    }
}

/// Accessibility markers rendered as `<subtitles type="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtitles {
    /// Closed captions.
    Teletext,
    /// Sign language interpretation.
    DeafSigned,
}

impl Subtitles {
    /// Value of the XMLTV `type` attribute.
    #[must_use]
    pub const fn xmltv_type(self) -> &'static str {
        match self {
            Self::Teletext => "teletext",
            Self::DeafSigned => "deaf-signed",
        }
    }
}

/// An XMLTV `<channel>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmltvChannel {
    /// Channel id (see [`channel_id`]).
    pub id: String,
    /// Display names in emission order.
    pub display_names: Vec<String>,
    /// Icon `src` (a data URL), if a logo exists.
    pub icon_src: Option<String>,
}

impl XmltvChannel {
    /// Builds a channel element from its upstream record.
    ///
    /// Display names are: the override for this channel number (if any),
    /// the official name, then the nickname unless it equals the official
    /// name. The icon comes from the first logo with a matching number.
    #[must_use]
    pub fn from_record(
        record: &ChannelRecord,
        logos: &[LogoRecord],
        overrides: &DisplayNameOverrides,
    ) -> Self {
        let mut display_names = Vec::with_capacity(3);
        if let Some(name) = overrides.get(&record.channel_no) {
            display_names.push(name.clone());
        }
        display_names.push(record.stn_name.clone());
        if record.stn_nickname != record.stn_name {
            display_names.push(record.stn_nickname.clone());
        }

        let icon_src = logos
            .iter()
            .find(|logo| logo.channel_no == record.channel_no)
            .map(|logo| logo_data_url(&logo.channel_logo_image));

        Self {
            id: channel_id(&record.channel_no),
            display_names,
            icon_src,
        }
    }
}

/// An XMLTV `<programme>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmltvProgramme {
    /// Referenced channel id.
    pub channel: String,
    /// Start instant (UTC+7).
    pub start: DateTime<FixedOffset>,
    /// Stop instant, `start + pgDuration`.
    pub stop: DateTime<FixedOffset>,
    /// Title.
    pub title: String,
    /// Description, when upstream has one.
    pub desc: Option<String>,
    /// Subtitle markers.
    pub subtitles: Vec<Subtitles>,
}

impl XmltvProgramme {
    /// Builds a programme element from its upstream record.
    ///
    /// # Errors
    ///
    /// Returns an error if the start or duration is malformed, or the stop
    /// instant overflows.
    pub fn from_record(record: &ProgramRecord) -> Result<Self> {
        let start = programme_start(record)?;
        let duration = parse_duration(&record.pg_duration)?;
        let stop = start
            .checked_add_signed(duration)
            .with_context(|| format!("stop time overflows: {start} + {duration}"))?;

        // audioDescFlag, multiLangFlag and subTitleFlag have no agreed XMLTV mapping.
        let mut subtitles = Vec::new();
        if record.close_capt {
            subtitles.push(Subtitles::Teletext);
        }
        if record.sign_lang {
            subtitles.push(Subtitles::DeafSigned);
        }

        Ok(Self {
            channel: channel_id(&record.channel_no),
            start,
            stop,
            title: record.pg_title.clone(),
            desc: record.pg_desc.clone(),
            subtitles,
        })
    }
}

/// The XMLTV document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tv {
    /// Root attributes.
    pub source: SourceInfo,
    /// Channel elements, emitted first.
    pub channels: Vec<XmltvChannel>,
    /// Programme elements, emitted after all channels.
    pub programmes: Vec<XmltvProgramme>,
}

impl Tv {
    /// Creates an empty document.
    #[must_use]
    pub const fn new(source: SourceInfo) -> Self {
        Self {
            source,
            channels: Vec::new(),
            programmes: Vec::new(),
        }
    }
}

/// Builds channel elements in input order.
#[must_use]
pub fn build_channels(
    channels: &[ChannelRecord],
    logos: &[LogoRecord],
    overrides: &DisplayNameOverrides,
) -> Vec<XmltvChannel> {
    channels
        .iter()
        .map(|record| XmltvChannel::from_record(record, logos, overrides))
        .collect()
}

/// Builds programme elements in input order (no sorting by time).
///
/// # Errors
///
/// Returns the first record's error, annotated with its title and channel.
pub fn build_programmes(programmes: &[ProgramRecord]) -> Result<Vec<XmltvProgramme>> {
    programmes
        .iter()
        .map(|record| {
            XmltvProgramme::from_record(record).with_context(|| {
                format!(
                    "programme {:?} on channel {}",
                    record.pg_title, record.channel_no
                )
            })
        })
        .collect()
}
