//! Pretty-printer producing `Class.new(attr: value, ...)` renderings.
//!
//! Layout rules:
//! - a list attribute stays inline while `[e1, e2, ...]` is shorter than the
//!   width, otherwise one element per line;
//! - the attribute list stays on one line while it fits in the width,
//!   otherwise one attribute per line;
//! - any multi-line attribute list is placed on its own indented lines
//!   between the parentheses.

use crate::value::{Value, format_time};
use crate::value_object::Attributes;

/// Layout thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Line-length threshold for inlining lists and attribute lists.
    pub width: usize,
    /// Spaces added per nesting level.
    pub indent: usize,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self { width: 50, indent: 2 }
    }
}

/// Values that supply their own nested rendering.
pub trait Formattable {
    fn pretty_with(&self, options: &PrettyOptions) -> String;

    fn pretty(&self) -> String {
        self.pretty_with(&PrettyOptions::default())
    }
}

impl Formattable for Value {
    fn pretty_with(&self, options: &PrettyOptions) -> String {
        match self {
            Value::Object(object) => object.pretty_with(options),
            Value::Time(time) => format!("Time.parse(\"{}\")", format_time(time)),
            other => other.inspect_with(options),
        }
    }
}

/// Render `name.new(...)` over an already compacted attribute mapping.
pub(crate) fn render_object(name: &str, values: &Attributes, options: &PrettyOptions) -> String {
    let fragments: Vec<String> = values
        .iter()
        .map(|(attr, value)| format!("{attr}: {}", render_attribute(value, options)))
        .collect();

    let mut rendered = fragments.join(", ");
    if rendered.chars().count() > options.width {
        rendered = fragments.join(",\n");
    }
    if rendered.contains('\n') {
        rendered = format!("\n{}\n", indent(&rendered, options.indent));
    }

    format!("{name}.new({rendered})")
}

fn render_attribute(value: &Value, options: &PrettyOptions) -> String {
    match value {
        Value::List(items) => {
            let elements: Vec<String> = items.iter().map(|item| item.pretty_with(options)).collect();
            let inline = format!("[{}]", elements.join(", "));
            if inline.chars().count() < options.width && !inline.contains('\n') {
                inline
            } else {
                format!("[\n{}\n]", indent(&elements.join(",\n"), options.indent))
            }
        }
        other => other.pretty_with(options),
    }
}

fn indent(block: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    block
        .split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
