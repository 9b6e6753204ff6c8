//! Fetch, filter and convert pipeline.

use anyhow::{Context, Result};
use dttguide_api::guide::{ChannelCategory, GuideData, LocalGuideApi, fetch_guide};
use dttguide_xmltv::{
    Coverage, DateWindow, Tv, assess_coverage, build_channels, build_programmes,
    filter_programmes, retain_listed_programmes, retain_scheduled_channels,
};
use tracing::instrument;

use crate::config::GrabberConfig;

/// Result of one grab: the document and how well it covers the window.
#[derive(Debug)]
pub struct GrabOutcome {
    /// XMLTV document.
    pub tv: Tv,
    /// Coverage of the requested window by the surviving programmes.
    pub coverage: Coverage,
}

/// Filters fetched records to `window` and converts them to XMLTV.
///
/// Programmes on channels with no channel record and channels without a
/// surviving programme are dropped, and repeated channel records keep the
/// first, so every `<programme channel>` refers to exactly one emitted
/// `<channel>`.
///
/// # Errors
///
/// Returns an error if a surviving record has a malformed start or duration.
pub fn convert(data: GuideData, window: &DateWindow, config: &GrabberConfig) -> Result<GrabOutcome> {
    let programmes =
        filter_programmes(data.programmes, window).context("failed to filter programmes")?;
    let programmes = retain_listed_programmes(programmes, &data.channels);
    let channels = retain_scheduled_channels(data.channels, &programmes);

    let mut tv = Tv::new(config.source.clone());
    tv.channels = build_channels(&channels, &data.logos, &config.display_name_overrides);
    tv.programmes = build_programmes(&programmes).context("failed to build programmes")?;

    let coverage = assess_coverage(&programmes, window)?;

    tracing::info!(
        channels = tv.channels.len(),
        programmes = tv.programmes.len(),
        covers_earliest_start = coverage.covers_earliest_start,
        covers_latest_start = coverage.covers_latest_start,
        "XMLTV document built"
    );

    Ok(GrabOutcome { tv, coverage })
}

/// Fetches every channel category and converts the listings to XMLTV.
///
/// # Errors
///
/// Returns an error if any request fails or a record is malformed.
#[instrument(skip_all)]
pub async fn grab(
    api: &(impl LocalGuideApi + Sync),
    window: &DateWindow,
    config: &GrabberConfig,
) -> Result<GrabOutcome> {
    let data = fetch_guide(api, &ChannelCategory::ALL)
        .await
        .context("failed to fetch DTT Guide listings")?;
    convert(data, window, config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashSet;

    use anyhow::Result;
    use chrono::TimeZone;
    use dttguide_api::guide::{ChannelRecord, LogoRecord, ProgramRecord};
    use dttguide_xmltv::BROADCAST_TZ;

    use super::*;

    /// Mock API serving fixed national and local listings.
    struct MockGuideApi {
        national: GuideData,
        local: GuideData,
    }

    impl MockGuideApi {
        fn data(&self, category: ChannelCategory) -> &GuideData {
            match category {
                ChannelCategory::National => &self.national,
                ChannelCategory::Local => &self.local,
            }
        }
    }

    impl LocalGuideApi for MockGuideApi {
        async fn fetch_program_data(
            &self,
            category: ChannelCategory,
        ) -> Result<Vec<ProgramRecord>> {
            Ok(self.data(category).programmes.clone())
        }

        async fn fetch_channel_names(
            &self,
            category: ChannelCategory,
        ) -> Result<Vec<ChannelRecord>> {
            Ok(self.data(category).channels.clone())
        }

        async fn fetch_channel_logos(&self, category: ChannelCategory) -> Result<Vec<LogoRecord>> {
            Ok(self.data(category).logos.clone())
        }
    }

    fn channel(channel_no: &str, stn_name: &str, stn_nickname: &str) -> ChannelRecord {
        ChannelRecord {
            channel_no: String::from(channel_no),
            stn_name: String::from(stn_name),
            stn_nickname: String::from(stn_nickname),
        }
    }

    fn programme(channel_no: &str, pg_date: &str, pg_begin_time: &str) -> ProgramRecord {
        ProgramRecord {
            channel_no: String::from(channel_no),
            pg_date: String::from(pg_date),
            pg_begin_time: String::from(pg_begin_time),
            pg_title: String::from("ข่าว"),
            pg_desc: None,
            pg_duration: String::from("0:30:00"),
            close_capt: false,
            sign_lang: false,
            audio_desc: false,
            multi_lang: false,
            sub_title: false,
        }
    }

    fn mock_api() -> MockGuideApi {
        MockGuideApi {
            national: GuideData {
                channels: vec![
                    channel("03", "ไทยพีบีเอส", "ไทยพีบีเอส"),
                    channel("33", "ช่อง 3 เอชดี", "ช่อง 3"),
                ],
                logos: vec![LogoRecord {
                    channel_no: String::from("33"),
                    channel_logo_image: String::from("AAAA"),
                }],
                programmes: vec![
                    programme("03", "01-01-25", "05:00:00"),
                    programme("33", "05-01-25", "05:00:00"),
                ],
            },
            local: GuideData {
                channels: vec![channel("51", "สถานีท้องถิ่น", "สถานีท้องถิ่น")],
                logos: vec![],
                programmes: vec![programme("51", "02-01-25", "20:00:00")],
            },
        }
    }

    fn config() -> GrabberConfig {
        GrabberConfig::from_env().unwrap()
    }

    fn window_jan_1_to_3() -> DateWindow {
        DateWindow::new(
            Some(BROADCAST_TZ.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            Some(BROADCAST_TZ.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_grab_unbounded_keeps_everything() {
        // Arrange
        let api = mock_api();

        // Act
        let outcome = grab(&api, &DateWindow::unbounded(), &config())
            .await
            .unwrap();

        // Assert
        let ids: Vec<&str> = outcome.tv.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "03.dttguide.nbtc.go.th",
                "33.dttguide.nbtc.go.th",
                "51.dttguide.nbtc.go.th",
            ]
        );
        assert_eq!(outcome.tv.programmes.len(), 3);
        assert!(outcome.coverage.is_complete());
    }

    #[tokio::test]
    async fn test_grab_window_drops_unscheduled_channels() {
        // Arrange
        let api = mock_api();

        // Act
        let outcome = grab(&api, &window_jan_1_to_3(), &config()).await.unwrap();

        // Assert: channel 33 only has a programme on Jan 5
        let ids: Vec<&str> = outcome.tv.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["03.dttguide.nbtc.go.th", "51.dttguide.nbtc.go.th"]
        );
        assert_eq!(outcome.tv.programmes.len(), 2);
        assert!(outcome.coverage.is_complete());
    }

    #[tokio::test]
    async fn test_grab_programme_channels_are_emitted() {
        // Arrange
        let api = mock_api();

        // Act
        let outcome = grab(&api, &window_jan_1_to_3(), &config()).await.unwrap();

        // Assert
        let channel_ids: HashSet<&str> =
            outcome.tv.channels.iter().map(|c| c.id.as_str()).collect();
        assert!(
            outcome
                .tv
                .programmes
                .iter()
                .all(|p| channel_ids.contains(p.channel.as_str()))
        );
    }

    #[test]
    fn test_convert_drops_programmes_on_unknown_channels() {
        // Arrange
        let data = GuideData {
            channels: vec![channel("03", "ไทยพีบีเอส", "ไทยพีบีเอส")],
            logos: vec![],
            programmes: vec![
                programme("03", "01-01-25", "05:00:00"),
                programme("99", "01-01-25", "06:00:00"),
            ],
        };

        // Act
        let outcome = convert(data, &DateWindow::unbounded(), &config()).unwrap();

        // Assert
        let channel_ids: HashSet<&str> =
            outcome.tv.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(outcome.tv.programmes.len(), 1);
        assert!(
            outcome
                .tv
                .programmes
                .iter()
                .all(|p| channel_ids.contains(p.channel.as_str()))
        );
    }

    #[tokio::test]
    async fn test_grab_channel_listed_in_both_categories_is_emitted_once() {
        // Arrange: the channel-name endpoint returns 03 for both categories
        let mut api = mock_api();
        api.local
            .channels
            .push(channel("03", "ไทยพีบีเอส", "ไทยพีบีเอส"));

        // Act
        let outcome = grab(&api, &DateWindow::unbounded(), &config())
            .await
            .unwrap();
        let xml = outcome.tv.to_xml_string().unwrap();

        // Assert
        let ids: Vec<&str> = outcome.tv.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "03.dttguide.nbtc.go.th",
                "33.dttguide.nbtc.go.th",
                "51.dttguide.nbtc.go.th",
            ]
        );
        assert_eq!(
            xml.matches("<channel id=\"03.dttguide.nbtc.go.th\">").count(),
            1
        );
    }

    #[test]
    fn test_convert_reports_thin_data() {
        // Arrange: a single programme 23h into a two-day window
        let data = GuideData {
            channels: vec![channel("03", "ไทยพีบีเอส", "ไทยพีบีเอส")],
            logos: vec![],
            programmes: vec![programme("03", "01-01-25", "23:00:00")],
        };

        // Act
        let outcome = convert(data, &window_jan_1_to_3(), &config()).unwrap();

        // Assert: document is still produced
        assert_eq!(outcome.tv.channels.len(), 1);
        assert!(outcome.coverage.covers_earliest_start);
        assert!(!outcome.coverage.covers_latest_start);
        assert!(!outcome.coverage.is_complete());
    }

    #[test]
    fn test_convert_end_to_end_channel_xml() {
        // Arrange
        let data = GuideData {
            channels: vec![channel("03", "ไทยพีบีเอส", "ไทยพีบีเอส")],
            logos: vec![],
            programmes: vec![programme("03", "01-01-25", "05:00:00")],
        };

        // Act
        let outcome = convert(data, &DateWindow::unbounded(), &config()).unwrap();
        let xml = outcome.tv.to_xml_string().unwrap();

        // Assert
        assert!(xml.contains(
            "<channel id=\"03.dttguide.nbtc.go.th\">\
             <display-name lang=\"th\">ThaiPBS</display-name>\
             <display-name lang=\"th\">ไทยพีบีเอส</display-name>\
             </channel>"
        ));
        assert!(xml.contains(
            "<programme channel=\"03.dttguide.nbtc.go.th\" \
             start=\"20250101050000 +0700\" stop=\"20250101053000 +0700\">"
        ));
    }

    #[test]
    fn test_convert_bad_duration_outside_window_is_ignored() {
        // Arrange
        let mut outside = programme("03", "10-01-25", "05:00:00");
        outside.pg_duration = String::from("??");
        let data = GuideData {
            channels: vec![channel("03", "ไทยพีบีเอส", "ไทยพีบีเอส")],
            logos: vec![],
            programmes: vec![programme("03", "01-01-25", "05:00:00"), outside],
        };

        // Act
        let outcome = convert(data, &window_jan_1_to_3(), &config()).unwrap();

        // Assert
        assert_eq!(outcome.tv.programmes.len(), 1);
    }
}
