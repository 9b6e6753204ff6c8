//! Grabber configuration module.
//!
//! Compiled-in defaults for the upstream API and the XMLTV output, with
//! an environment override for the API base URL.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::GrabberConfig;
