//! `GrabberConfig` struct and environment resolution.

use anyhow::{Context, Result};
use dttguide_api::guide::{GUIDE_BASE_URL, GuideClient};
use dttguide_xmltv::{DisplayNameOverrides, SourceInfo};
use url::Url;

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "DTTGUIDE_BASE_URL";

/// User-Agent sent to the DTT Guide API.
const USER_AGENT: &str = concat!("tv_grab_th_dttguide/", env!("CARGO_PKG_VERSION"));

/// Grabber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabberConfig {
    /// Base URL of the `BcsEpgDataController` endpoints.
    pub base_url: Url,
    /// User-Agent header value.
    pub user_agent: String,
    /// Extra display names emitted before the official station name.
    pub display_name_overrides: DisplayNameOverrides,
    /// `<tv>` metadata attributes.
    pub source: SourceInfo,
}

/// Names listeners actually use, keyed by channel number.
fn default_display_name_overrides() -> DisplayNameOverrides {
    DisplayNameOverrides::from([
        // Nobody calls it by its full legal name.
        (String::from("03"), String::from("ThaiPBS")),
        (String::from("27"), String::from("ช่อง 8")),
    ])
}

impl GrabberConfig {
    /// Resolves the configuration from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DTTGUIDE_BASE_URL` is set but is not a valid URL.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration using `lookup` for environment values.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = match lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let result = Url::parse(raw.trim());
                result.with_context(|| format!("invalid {BASE_URL_ENV}: {raw}"))?
            }
            None => {
                let result = Url::parse(GUIDE_BASE_URL);
                result.context("invalid default base URL")?
            }
        };

        Ok(Self {
            base_url,
            user_agent: String::from(USER_AGENT),
            display_name_overrides: default_display_name_overrides(),
            source: SourceInfo::default(),
        })
    }

    /// Builds an API client for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build_client(&self) -> Result<GuideClient> {
        GuideClient::builder()
            .base_url(self.base_url.clone())
            .user_agent(self.user_agent.clone())
            .build()
            .context("failed to build DTT Guide API client")
    }
}
