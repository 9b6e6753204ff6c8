//! `GuideClient` - DTT Guide web API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalGuideApi;
use super::json::{LogoMediaResponse, ResultsResponse};
use super::types::{
    ChannelCategory, ChannelRecord, ChannelTypeRequest, LogoRecord, ProgramRecord,
};

/// Base URL of the `BcsEpgDataController` endpoints.
pub const GUIDE_BASE_URL: &str =
    "https://dttguide.nbtc.go.th/BcsEpgDataServices/BcsEpgDataController/";

/// Content type the endpoints expect on every request.
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Endpoint names.
const PROGRAM_DATA_ACTION: &str = "getProgramDataWeb";
const CHANNEL_NAME_ACTION: &str = "getChannelNameWeb";
const CHANNEL_LOGO_ACTION: &str = "getChannelLogoMediaWeb";

/// DTT Guide web API client.
///
/// No retries and no caching: any transport, status or decoding failure
/// is returned to the caller as-is.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GuideClient {
    /// HTTP client (reqwest, gzip enabled, JSON content type by default).
    http_client: Client,
    /// Base URL, always ending with `/`.
    base_url: Url,
}

/// Builder for `GuideClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct GuideClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
}

impl GuideClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (default: `dttguide-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - The default base URL is invalid.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<GuideClient> {
        let mut base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(GUIDE_BASE_URL);
            result.context("invalid default base URL")?
        };

        // `Url::join` replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(GuideClient {
            http_client,
            base_url,
        })
    }
}

impl GuideClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> GuideClientBuilder {
        GuideClientBuilder::new()
    }

    /// Builds a JSON decode error with a preview of the response body.
    fn json_decode_error(action: &str, json: &str) -> String {
        format!(
            "{} JSON decoding failed (len={}): {}",
            action,
            json.len(),
            &json[..json.floor_char_boundary(500)]
        )
    }

    /// Decodes a response body for the given endpoint.
    fn decode<T: DeserializeOwned>(action: &str, json: &str) -> Result<T> {
        let raw_result: std::result::Result<T, _> = serde_json::from_str(json);
        raw_result.with_context(|| Self::json_decode_error(action, json))
    }

    /// Parses a `getProgramDataWeb` response.
    pub(crate) fn parse_program_response(json: &str) -> Result<Vec<ProgramRecord>> {
        let response: ResultsResponse<ProgramRecord> = Self::decode(PROGRAM_DATA_ACTION, json)?;
        Ok(response.results)
    }

    /// Parses a `getChannelNameWeb` response.
    pub(crate) fn parse_channel_name_response(json: &str) -> Result<Vec<ChannelRecord>> {
        let response: ResultsResponse<ChannelRecord> = Self::decode(CHANNEL_NAME_ACTION, json)?;
        Ok(response.results)
    }

    /// Parses a `getChannelLogoMediaWeb` response.
    pub(crate) fn parse_channel_logo_response(json: &str) -> Result<Vec<LogoRecord>> {
        let response: LogoMediaResponse = Self::decode(CHANNEL_LOGO_ACTION, json)?;
        Ok(response.images)
    }

    /// Sends a POST request for one category and returns the raw body.
    async fn post_category(&self, action: &str, category: ChannelCategory) -> Result<String> {
        let url = self
            .base_url
            .join(action)
            .with_context(|| format!("failed to join URL path: {action}"))?;
        let body = serde_json::to_vec(&ChannelTypeRequest::from(category))
            .context("failed to encode request body")?;

        tracing::debug!(%url, %category, "DTT Guide API request");

        let result = self.http_client.post(url).body(body).send().await;
        let response = result.with_context(|| format!("{action} request failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{action} API error (HTTP {status})");
        }

        let json = response
            .text()
            .await
            .with_context(|| format!("failed to read {action} response"))?;

        tracing::debug!(%action, %category, body_len = json.len(), "Response body received");
        tracing::trace!(%action, body_preview = &json[..json.floor_char_boundary(500)], "Response body preview");

        Ok(json)
    }
}

impl LocalGuideApi for GuideClient {
    #[instrument(skip_all, fields(%category))]
    async fn fetch_program_data(&self, category: ChannelCategory) -> Result<Vec<ProgramRecord>> {
        let json = self.post_category(PROGRAM_DATA_ACTION, category).await?;
        Self::parse_program_response(&json)
    }

    #[instrument(skip_all, fields(%category))]
    async fn fetch_channel_names(&self, category: ChannelCategory) -> Result<Vec<ChannelRecord>> {
        let json = self.post_category(CHANNEL_NAME_ACTION, category).await?;
        Self::parse_channel_name_response(&json)
    }

    #[instrument(skip_all, fields(%category))]
    async fn fetch_channel_logos(&self, category: ChannelCategory) -> Result<Vec<LogoRecord>> {
        let json = self.post_category(CHANNEL_LOGO_ACTION, category).await?;
        Self::parse_channel_logo_response(&json)
    }
}
