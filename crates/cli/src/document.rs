//! JSON documents describing classes and one value object to render.
//!
//! ```json
//! {
//!   "classes": {
//!     "Widget": { "names": ["color", "size"], "defaults": { "options": {} } },
//!     "WidgetContainer": { "defaults": { "widgets": [] } }
//!   },
//!   "root": {
//!     "$new": "WidgetContainer",
//!     "widgets": [{ "$new": "Widget", "color": ":green", "size": 7 }]
//!   }
//! }
//! ```
//!
//! Strings starting with `:` become symbols, `{"$time": "..."}` becomes a
//! timestamp and `{"$new": "Class", ...}` a nested value object. A class may
//! `extends` an earlier one, adding `names`/`defaults` and dropping `remove`.

use anyhow::{Context, Result, anyhow, bail};
use attribs_core::{AttributeSet, Attributes, Value, ValueClass, ValueObject};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as Json;

const NEW_KEY: &str = "$new";
const TIME_KEY: &str = "$time";

#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub classes: IndexMap<String, ClassDecl>,
    pub root: Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassDecl {
    pub extends: Option<String>,
    pub names: Vec<String>,
    pub defaults: IndexMap<String, Json>,
    pub remove: Vec<String>,
}

/// Classes defined by a document, by name.
#[derive(Debug, Default)]
pub struct Registry {
    classes: IndexMap<String, ValueClass>,
}

impl Registry {
    pub fn from_decls(decls: &IndexMap<String, ClassDecl>) -> Result<Self> {
        let mut registry = Registry::default();
        for (name, decl) in decls {
            let class = registry.define(name, decl)?;
            tracing::debug!(class = name.as_str(), names = ?class.attributes().names(), "defined class");
            registry.classes.insert(name.clone(), class);
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&ValueClass> {
        self.classes.get(name)
    }

    fn define(&self, name: &str, decl: &ClassDecl) -> Result<ValueClass> {
        // Defaults are converted once so every instance shares them.
        let defaults = decl
            .defaults
            .iter()
            .map(|(key, json)| Ok((key.clone(), self.value(json)?)))
            .collect::<Result<Vec<(String, Value)>>>()?;

        let class = match &decl.extends {
            Some(parent) => {
                let parent = self
                    .get(parent)
                    .ok_or_else(|| anyhow!("class `{name}` extends undefined class `{parent}`"))?;
                parent.derive(name, |set| {
                    set.add(decl.names.iter().cloned(), defaults)
                        .remove(decl.remove.iter())
                })
            }
            None => {
                let set = AttributeSet::new(decl.names.iter().cloned(), defaults);
                ValueClass::new(name, set.remove(decl.remove.iter()))
            }
        };
        Ok(class)
    }

    /// Convert a JSON value into an attribute value.
    pub fn value(&self, json: &Json) -> Result<Value> {
        Ok(match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::from(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::from(i),
                None => Value::from(n.as_f64().ok_or_else(|| anyhow!("unsupported number {n}"))?),
            },
            Json::String(s) => match s.strip_prefix(':') {
                Some(symbol) if !symbol.is_empty() => Value::symbol(symbol),
                _ => Value::from(s.as_str()),
            },
            Json::Array(items) => Value::list(
                items
                    .iter()
                    .map(|item| self.value(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(fields) => {
                if let Some(class) = fields.get(NEW_KEY) {
                    Value::from(self.instantiate(class, fields)?)
                } else if let Some(time) = fields.get(TIME_KEY) {
                    let text = time.as_str().context("`$time` must be a string")?;
                    Value::parse_time(text).ok_or_else(|| anyhow!("unparseable time `{text}`"))?
                } else {
                    Value::map(
                        fields
                            .iter()
                            .map(|(key, value)| Ok((Value::symbol(key), self.value(value)?)))
                            .collect::<Result<Vec<_>>>()?,
                    )
                }
            }
        })
    }

    fn instantiate(
        &self,
        class: &Json,
        fields: &serde_json::Map<String, Json>,
    ) -> Result<ValueObject> {
        let name = class.as_str().context("`$new` must name a class")?;
        let class = self
            .get(name)
            .ok_or_else(|| anyhow!("undefined class `{name}`"))?;

        let mut attributes = Attributes::new();
        for (key, value) in fields {
            if key != NEW_KEY {
                attributes.insert(key.clone(), self.value(value)?);
            }
        }
        Ok(class.construct(attributes)?)
    }
}

/// Parse a document and build its root value object.
pub fn load(source: &str) -> Result<ValueObject> {
    let document: Document = serde_json::from_str(source).context("invalid document")?;
    let registry = Registry::from_decls(&document.classes)?;

    match registry.value(&document.root)? {
        Value::Object(object) => Ok(object),
        other => bail!("root must be a `$new` object, found {}", other.kind()),
    }
}
