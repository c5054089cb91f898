//! Crop price estimation and forecasting, and crop recommendation.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cache;
pub mod cli;
pub mod commodity;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod predictor;
pub mod rainfall;
pub mod recommend;
pub mod service;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// On Linux this is `~/.config/agrinext`.
pub fn get_agrinext_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform, so fall back to the current directory
        return PathBuf::new();
    };

    config_dir.push("agrinext");
    config_dir
}
