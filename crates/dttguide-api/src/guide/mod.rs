//! DTT Guide web API client module.
//!
//! Issues POST requests to the `BcsEpgDataController` endpoints and
//! decodes their JSON payloads into typed records.

mod api;
mod client;
pub(crate) mod json;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{GuideApi, LocalGuideApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{GUIDE_BASE_URL, GuideClient, GuideClientBuilder};
pub use types::{ChannelCategory, ChannelRecord, LogoRecord, ProgramRecord};
#[allow(clippy::module_name_repetitions)]
pub use util::{GuideData, fetch_guide};
