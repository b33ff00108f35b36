//! Type Coercion & Nil Policy
//!
//! Converts captured text into field values. An explicit nil never reaches the
//! textual conversion: it yields the kind's zero value instead.

use bigdecimal::BigDecimal;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Conversion applied to captured text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoercionKind {
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Boolean,
    Char,
    String,
    Processor,
}

impl fmt::Display for CoercionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoercionKind::Int => "int",
            CoercionKind::Long => "long",
            CoercionKind::Float => "float",
            CoercionKind::Double => "double",
            CoercionKind::Decimal => "decimal",
            CoercionKind::Boolean => "boolean",
            CoercionKind::Char => "char",
            CoercionKind::String => "string",
            CoercionKind::Processor => "processor",
        };
        f.write_str(name)
    }
}

/// A value that can be bound from element or attribute text
pub trait Coerce: Sized + Send + 'static {
    const KIND: CoercionKind;

    /// Value used when the element is explicitly nil
    fn zero() -> Self;

    /// Convert non-nil text
    fn from_text(text: &str) -> Result<Self, String>;

    /// Nil-aware conversion: `None` means the element carried the nil marker
    fn coerce(text: Option<&str>) -> Result<Self, String> {
        match text {
            Some(text) => Self::from_text(text),
            None => Ok(Self::zero()),
        }
    }
}

macro_rules! coerce_parsed {
    ($ty:ty, $kind:ident, $zero:expr) => {
        impl Coerce for $ty {
            const KIND: CoercionKind = CoercionKind::$kind;

            fn zero() -> Self {
                $zero
            }

            fn from_text(text: &str) -> Result<Self, String> {
                text.parse::<$ty>().map_err(|e| e.to_string())
            }
        }
    };
}

coerce_parsed!(i32, Int, 0);
coerce_parsed!(i64, Long, 0);
coerce_parsed!(f32, Float, 0.0);
coerce_parsed!(f64, Double, 0.0);

impl Coerce for BigDecimal {
    const KIND: CoercionKind = CoercionKind::Decimal;

    fn zero() -> Self {
        BigDecimal::from(0)
    }

    fn from_text(text: &str) -> Result<Self, String> {
        BigDecimal::from_str(text).map_err(|e| e.to_string())
    }
}

impl Coerce for bool {
    const KIND: CoercionKind = CoercionKind::Boolean;

    fn zero() -> Self {
        false
    }

    /// Anything other than `true` in any case reads as false
    fn from_text(text: &str) -> Result<Self, String> {
        Ok(text.eq_ignore_ascii_case("true"))
    }
}

impl Coerce for char {
    const KIND: CoercionKind = CoercionKind::Char;

    fn zero() -> Self {
        '\0'
    }

    fn from_text(text: &str) -> Result<Self, String> {
        text.chars().next().ok_or_else(|| "empty text".to_string())
    }
}

impl Coerce for String {
    const KIND: CoercionKind = CoercionKind::String;

    fn zero() -> Self {
        String::new()
    }

    fn from_text(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }
}

/// Absent on nil; present otherwise
impl<V: Coerce> Coerce for Option<V> {
    const KIND: CoercionKind = V::KIND;

    fn zero() -> Self {
        None
    }

    fn from_text(text: &str) -> Result<Self, String> {
        V::from_text(text).map(Some)
    }
}

/// Caller-supplied conversion for values the built-in kinds don't cover
pub type Processor<V> = Arc<dyn Fn(&str) -> Result<V, String> + Send + Sync>;

/// Wrap a closure as a processor
pub fn processor<V, F>(f: F) -> Processor<V>
where
    F: Fn(&str) -> Result<V, String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Split comma-separated text into trimmed items; empty text gives no items
pub fn csv() -> Processor<Vec<String>> {
    processor(|text: &str| {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(text.split(',').map(|item| item.trim().to_string()).collect())
    })
}

/// Prepare captured text for conversion
pub(crate) fn prepare(text: &str, kind: CoercionKind, trim: bool) -> &str {
    // Numbers, booleans and decimals never carry meaningful surrounding
    // whitespace; strings only lose it when trimming is enabled.
    match kind {
        CoercionKind::String | CoercionKind::Char | CoercionKind::Processor if !trim => text,
        _ => text.trim(),
    }
}
