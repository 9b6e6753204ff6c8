//! API client library for the NBTC DTT Guide.
//!
//! The endpoints are reverse-engineered from the DTT Guide website and
//! return channel names, channel logos and programme listings as JSON.

/// DTT Guide web API client.
pub mod guide;
