//! DTT Guide API record types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::json::deserialize_yes_flag;

/// Upstream partition of broadcast channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelCategory {
    /// Nationwide channels (`channelType` 1).
    National,
    /// Local channels (`channelType` 2).
    Local,
}

impl ChannelCategory {
    /// All categories in fetch order.
    pub const ALL: [Self; 2] = [Self::National, Self::Local];

    /// Value sent as `channelType` in request bodies.
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::National => "1",
            Self::Local => "2",
        }
    }
}

impl fmt::Display for ChannelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::National => f.write_str("national"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Request body shared by all listing endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct ChannelTypeRequest {
    #[serde(rename = "channelType")]
    pub channel_type: &'static str,
}

impl From<ChannelCategory> for ChannelTypeRequest {
    fn from(category: ChannelCategory) -> Self {
        Self {
            channel_type: category.wire_value(),
        }
    }
}

/// A channel from the `getChannelNameWeb` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelRecord {
    /// Channel number, the key shared by all endpoints (e.g. "03").
    #[serde(rename = "channelNo")]
    pub channel_no: String,
    /// Official station name.
    #[serde(rename = "stnName")]
    pub stn_name: String,
    /// Display nickname (often identical to `stn_name`).
    #[serde(rename = "stnNickname")]
    pub stn_nickname: String,
}

/// A channel logo from the `getChannelLogoMediaWeb` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoRecord {
    /// Channel number.
    #[serde(rename = "channelNo")]
    pub channel_no: String,
    /// Base64-encoded PNG payload.
    #[serde(rename = "channelLogoImage")]
    pub channel_logo_image: String,
}

/// A single programme from the `getProgramDataWeb` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgramRecord {
    /// Channel number.
    #[serde(rename = "channelNo")]
    pub channel_no: String,
    /// Broadcast date, `DD-MM-YY` in UTC+7.
    #[serde(rename = "pgDate")]
    pub pg_date: String,
    /// Start time, `HH:MM:SS` in UTC+7.
    #[serde(rename = "pgBeginTime")]
    pub pg_begin_time: String,
    /// Programme title.
    #[serde(rename = "pgTitle")]
    pub pg_title: String,
    /// Programme description (`null` upstream when absent).
    #[serde(rename = "pgDesc", default)]
    pub pg_desc: Option<String>,
    /// Duration, `H:MM:SS` (fields may be fractional).
    #[serde(rename = "pgDuration")]
    pub pg_duration: String,
    /// Closed captions available.
    #[serde(
        rename = "closeCaptFlag",
        deserialize_with = "deserialize_yes_flag",
        default
    )]
    pub close_capt: bool,
    /// Sign language interpretation available.
    #[serde(
        rename = "signLangFlag",
        deserialize_with = "deserialize_yes_flag",
        default
    )]
    pub sign_lang: bool,
    /// Audio description available. Not mapped to XMLTV.
    #[serde(
        rename = "audioDescFlag",
        deserialize_with = "deserialize_yes_flag",
        default
    )]
    pub audio_desc: bool,
    /// Multiple audio languages. Not mapped to XMLTV.
    #[serde(
        rename = "multiLangFlag",
        deserialize_with = "deserialize_yes_flag",
        default
    )]
    pub multi_lang: bool,
    /// Undocumented upstream; not mapped to XMLTV.
    #[serde(
        rename = "subTitleFlag",
        deserialize_with = "deserialize_yes_flag",
        default
    )]
    pub sub_title: bool,
}
