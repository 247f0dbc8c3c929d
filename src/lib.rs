//! Parley library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Device family whose conventions the UI follows (animation curve).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Android,
}
