//! Path Elements
//!
//! A single path segment: a name plus attribute constraints. Declared elements
//! come from patterns and may be sparse; observed elements come from the
//! document and carry every attribute the tag had.

use memchr::memchr;
use std::collections::BTreeMap;
use std::fmt;

/// Whether a segment addresses an element or one of its attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKind {
    Element,
    Attribute,
}

/// One segment of a path pattern or of the observed stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathElement {
    name: String,
    kind: SegmentKind,
    /// Attribute constraints. `None` means the attribute only has to exist.
    predicates: BTreeMap<String, Option<String>>,
}

impl PathElement {
    /// Declared element segment without constraints
    pub fn element(name: impl Into<String>) -> Self {
        PathElement {
            name: name.into(),
            kind: SegmentKind::Element,
            predicates: BTreeMap::new(),
        }
    }

    /// Declared attribute segment (`@name`)
    pub fn attribute(name: impl Into<String>) -> Self {
        PathElement {
            name: name.into(),
            kind: SegmentKind::Attribute,
            predicates: BTreeMap::new(),
        }
    }

    /// Observed element built from a start tag
    pub fn observed<I, K, V>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        PathElement {
            name: name.into(),
            kind: SegmentKind::Element,
            predicates: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }

    /// Add a value constraint `[@key='value']`
    pub fn with_predicate(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.insert(key.into(), Some(value.into()));
        self
    }

    /// Add an existence constraint `[@key]`
    pub fn with_required(mut self, key: impl Into<String>) -> Self {
        self.predicates.insert(key.into(), None);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_attribute(&self) -> bool {
        self.kind == SegmentKind::Attribute
    }

    pub fn predicates(&self) -> &BTreeMap<String, Option<String>> {
        &self.predicates
    }

    /// Look up an observed attribute by the same name rule used for matching
    pub fn attribute_value(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(|(_, v)| v.as_deref())
    }

    /// Observed attributes in name order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.predicates
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Directional match: `self` is the declaration, `observed` the document side.
    ///
    /// Extra attributes on the observed side never prevent a match.
    pub fn matches(&self, observed: &PathElement) -> bool {
        if self.kind != observed.kind || !names_match(&self.name, &observed.name) {
            return false;
        }

        self.predicates.iter().all(|(key, expected)| match observed.find(key) {
            Some((_, actual)) => match expected {
                Some(expected) => actual.as_deref() == Some(expected.as_str()),
                None => true,
            },
            None => false,
        })
    }

    fn find(&self, key: &str) -> Option<(&String, &Option<String>)> {
        if let Some(hit) = self.predicates.get_key_value(key) {
            return Some(hit);
        }
        if has_prefix(key) {
            return None;
        }
        self.predicates
            .iter()
            .find(|(observed, _)| local_name(observed) == key)
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_attribute() {
            f.write_str("@")?;
        }
        f.write_str(&self.name)?;

        if !self.predicates.is_empty() {
            f.write_str("[")?;
            for (i, (key, value)) in self.predicates.iter().enumerate() {
                if i > 0 {
                    f.write_str(" and ")?;
                }
                match value {
                    Some(value) => write!(f, "@{}='{}'", key, value)?,
                    None => write!(f, "@{}", key)?,
                }
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// A prefixed declaration compares qualified names, an unprefixed one local names
pub(crate) fn names_match(declared: &str, observed: &str) -> bool {
    if has_prefix(declared) {
        declared == observed
    } else {
        declared == local_name(observed)
    }
}

/// Local part of a possibly prefixed name
pub fn local_name(name: &str) -> &str {
    match memchr(b':', name.as_bytes()) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Prefix part of a possibly prefixed name
pub fn prefix(name: &str) -> Option<&str> {
    memchr(b':', name.as_bytes()).map(|pos| &name[..pos])
}

fn has_prefix(name: &str) -> bool {
    memchr(b':', name.as_bytes()).is_some()
}
