//! Multi-category fetch helpers.

use anyhow::{Context, Result};
use tracing::instrument;

use super::api::LocalGuideApi;
use super::types::{ChannelCategory, ChannelRecord, LogoRecord, ProgramRecord};

/// Raw records from every listing endpoint, concatenated in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideData {
    /// Channel names.
    pub channels: Vec<ChannelRecord>,
    /// Channel logos.
    pub logos: Vec<LogoRecord>,
    /// Programme listings.
    pub programmes: Vec<ProgramRecord>,
}

/// Fetches channel names, logos and programmes for each category.
///
/// Issues one request per endpoint and category, sequentially: names for
/// every category first, then logos, then programmes. Results of each
/// endpoint are concatenated in the order of `categories`.
///
/// # Errors
///
/// Returns the first failing request's error; nothing is retried.
#[instrument(skip_all)]
pub async fn fetch_guide(
    api: &(impl LocalGuideApi + Sync),
    categories: &[ChannelCategory],
) -> Result<GuideData> {
    let mut data = GuideData::default();

    for &category in categories {
        let channels = api
            .fetch_channel_names(category)
            .await
            .with_context(|| format!("failed to fetch {category} channel names"))?;
        tracing::debug!(%category, fetched = channels.len(), "channel names fetched");
        data.channels.extend(channels);
    }

    for &category in categories {
        let logos = api
            .fetch_channel_logos(category)
            .await
            .with_context(|| format!("failed to fetch {category} channel logos"))?;
        tracing::debug!(%category, fetched = logos.len(), "channel logos fetched");
        data.logos.extend(logos);
    }

    for &category in categories {
        let programmes = api
            .fetch_program_data(category)
            .await
            .with_context(|| format!("failed to fetch {category} programme data"))?;
        tracing::debug!(%category, fetched = programmes.len(), "programme data fetched");
        data.programmes.extend(programmes);
    }

    tracing::info!(
        channels = data.channels.len(),
        logos = data.logos.len(),
        programmes = data.programmes.len(),
        "DTT Guide fetch completed"
    );

    Ok(data)
}
