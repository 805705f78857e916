//! `attribs` command-line tool: render value objects described in JSON.

pub mod config;
pub mod document;

use anyhow::Result;
use attribs_core::{Formattable, ValueObject};

use crate::config::{Config, OutputMode};

/// Render `object` per the configured output mode.
pub fn render(object: &ValueObject, config: &Config) -> Result<String> {
    Ok(match config.mode {
        OutputMode::Pretty => object.pretty_with(&config.pretty()),
        OutputMode::Mapping => serde_json::to_string_pretty(&object.to_mapping())?,
        OutputMode::Compact => serde_json::to_string_pretty(&object.to_mapping_compact())?,
    })
}
