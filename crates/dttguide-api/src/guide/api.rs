//! `GuideApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{ChannelCategory, ChannelRecord, LogoRecord, ProgramRecord};

/// DTT Guide web API trait.
///
/// Abstracts the three listing endpoints for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(GuideApi: Send)]
pub trait LocalGuideApi {
    /// Fetches programme listings (`getProgramDataWeb`) for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn fetch_program_data(&self, category: ChannelCategory) -> Result<Vec<ProgramRecord>>;

    /// Fetches channel names (`getChannelNameWeb`) for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn fetch_channel_names(&self, category: ChannelCategory) -> Result<Vec<ChannelRecord>>;

    /// Fetches channel logos (`getChannelLogoMediaWeb`) for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn fetch_channel_logos(&self, category: ChannelCategory) -> Result<Vec<LogoRecord>>;
}
