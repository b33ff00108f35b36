//! Binder Configuration

use crate::xpath::element::{local_name, prefix, PathElement};

/// Attribute convention marking an element as explicitly nil
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NilConvention {
    /// Local name of the marker attribute
    pub attribute: String,
    /// Required prefix; `None` accepts any prefix or none
    pub prefix: Option<String>,
    /// Value the attribute must carry
    pub value: String,
}

impl Default for NilConvention {
    /// `xsi:nil="true"`, accepted under any prefix
    fn default() -> Self {
        NilConvention {
            attribute: "nil".to_string(),
            prefix: None,
            value: "true".to_string(),
        }
    }
}

impl NilConvention {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        NilConvention {
            attribute: attribute.into(),
            prefix: None,
            value: value.into(),
        }
    }

    /// Only accept the marker under `prefix`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Does the observed element carry the marker?
    pub fn is_nil(&self, element: &PathElement) -> bool {
        element.attributes().any(|(name, value)| {
            local_name(name) == self.attribute
                && value == self.value
                && match &self.prefix {
                    Some(required) => prefix(name) == Some(required.as_str()),
                    None => true,
                }
        })
    }
}

/// Options shared by every parse a binder runs
#[derive(Debug, Clone)]
pub struct BinderOptions {
    pub nil: NilConvention,
    /// Trim surrounding whitespace from string-like captures
    pub trim_text: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        BinderOptions {
            nil: NilConvention::default(),
            trim_text: false,
        }
    }
}

impl BinderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nil_convention(mut self, nil: NilConvention) -> Self {
        self.nil = nil;
        self
    }

    pub fn trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_nil_any_prefix() {
        let nil = NilConvention::default();
        assert!(nil.is_nil(&PathElement::observed("Count", [("xsi:nil", "true")])));
        assert!(nil.is_nil(&PathElement::observed("Count", [("nil", "true")])));
        assert!(!nil.is_nil(&PathElement::observed("Count", [("nil", "false")])));
        assert!(!nil.is_nil(&PathElement::observed("Count", [("null", "true")])));
    }

    #[test]
    fn test_prefixed_nil() {
        let nil = NilConvention::default().with_prefix("xsi");
        assert!(nil.is_nil(&PathElement::observed("Count", [("xsi:nil", "true")])));
        assert!(!nil.is_nil(&PathElement::observed("Count", [("nil", "true")])));
    }

    #[test]
    fn test_custom_convention() {
        let nil = NilConvention::new("absent", "1");
        assert!(nil.is_nil(&PathElement::observed("Count", [("absent", "1")])));
        assert!(!nil.is_nil(&PathElement::observed("Count", [("nil", "true")])));
    }

    #[test]
    fn test_options_builder() {
        let options = BinderOptions::new().trim_text(true);
        assert!(options.trim_text);
        assert_eq!(options.nil, NilConvention::default());
    }
}
