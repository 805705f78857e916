//! Runtime configuration from the command line and environment.

use std::path::PathBuf;

use attribs_core::PrettyOptions;
use clap::{Parser, ValueEnum};

pub const WIDTH_VAR: &str = "ATTRIBS_WIDTH";
pub const INDENT_VAR: &str = "ATTRIBS_INDENT";

/// What to print for the loaded value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// `Class.new(...)` rendering.
    Pretty,
    /// Every attribute, as JSON.
    Mapping,
    /// Attributes not still holding their default, as JSON.
    Compact,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "attribs", about = "Render value objects described in JSON", version)]
pub struct Config {
    #[arg(value_name = "FILE", help = "JSON document with classes and a root object")]
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputMode::Pretty)]
    pub mode: OutputMode,

    #[arg(
        long,
        env = "ATTRIBS_WIDTH",
        value_name = "N",
        help = "Line width before lists and attribute lists break",
        default_value_t = PrettyOptions::default().width,
        value_parser = clap::value_parser!(usize)
    )]
    pub width: usize,

    #[arg(
        long,
        env = "ATTRIBS_INDENT",
        value_name = "N",
        help = "Spaces per nesting level",
        default_value_t = PrettyOptions::default().indent,
        value_parser = clap::value_parser!(usize)
    )]
    pub indent: usize,
}

impl Config {
    pub fn pretty(&self) -> PrettyOptions {
        PrettyOptions {
            width: self.width,
            indent: self.indent,
        }
    }
}
