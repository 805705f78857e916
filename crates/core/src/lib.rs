//! `attribs-core` — immutable attribute-backed value objects.
//!
//! An [`AttributeSet`] declares attribute names and defaults. Binding it to a
//! [`ValueClass`] gives that class a keyword constructor, value equality,
//! `with`-style updates, list appends and a pretty-printer. Pure data: no I/O.

pub mod attribute_set;
pub mod error;
pub mod pretty;
pub mod value;
pub mod value_object;

pub use attribute_set::AttributeSet;
pub use error::{AttribsError, AttribsResult, ValidationError};
pub use pretty::{Formattable, PrettyOptions};
pub use value::{Opaque, Value};
pub use value_object::{Attributes, ValueClass, ValueObject};

/// Build an [`Attributes`] mapping from `name: value` pairs.
///
/// ```ignore
/// let attrs = attributes! { color: Value::symbol("green"), size: 7 };
/// ```
#[macro_export]
macro_rules! attributes {
    () => {
        $crate::Attributes::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attributes::new();
        $(
            attrs.insert(
                ::std::string::String::from(stringify!($name)),
                $crate::Value::from($value),
            );
        )+
        attrs
    }};
}
