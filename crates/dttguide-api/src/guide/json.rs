//! JSON response wrapper types and custom deserializers.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

use super::types::LogoRecord;

/// Value upstream uses to mark a flag as set.
const FLAG_SET: &str = "Y";

/// Deserializes a `"Y"`/`"N"` string flag as `bool`.
///
/// Only `"Y"` maps to `true`; `null`, empty strings and any other value
/// map to `false`.
pub fn deserialize_yes_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    Ok(s.as_deref() == Some(FLAG_SET))
}

/// Response body carrying a `results` array (`getProgramDataWeb`,
/// `getChannelNameWeb`).
#[derive(Debug, Deserialize)]
pub struct ResultsResponse<T> {
    /// Listing records in response order.
    pub results: Vec<T>,
}

/// `getChannelLogoMediaWeb` response body.
#[derive(Debug, Deserialize)]
pub struct LogoMediaResponse {
    /// Logo records in response order.
    #[serde(rename = "channelLogoMediaImage")]
    pub images: Vec<LogoRecord>,
}
