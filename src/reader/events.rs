//! XML Event Types
//!
//! The four events the binder consumes, and the pull trait producing them.

use crate::error::BindError;

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Start of an element; empty elements are followed by a matching `EndTag`
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Character data, already unescaped. Runs may be split arbitrarily.
    Text(String),
    /// End of an element
    EndTag { name: String },
    /// End of input; repeated on every further pull
    Eof,
}

impl XmlEvent {
    /// Start tag without attributes
    pub fn start(name: impl Into<String>) -> Self {
        XmlEvent::StartTag {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Start tag with attributes
    pub fn start_with<I, K, V>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        XmlEvent::StartTag {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        XmlEvent::Text(text.into())
    }

    pub fn end(name: impl Into<String>) -> Self {
        XmlEvent::EndTag { name: name.into() }
    }

    /// Check if this is a start tag
    pub fn is_start(&self) -> bool {
        matches!(self, XmlEvent::StartTag { .. })
    }

    /// Check if this is an end tag
    pub fn is_end(&self) -> bool {
        matches!(self, XmlEvent::EndTag { .. })
    }

    /// Get text content if applicable
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlEvent::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Pull source of XML events.
///
/// Each call blocks until the next event is available. After `Eof` a source
/// keeps returning `Eof`.
pub trait EventSource {
    fn next_event(&mut self) -> Result<XmlEvent, BindError>;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn next_event(&mut self) -> Result<XmlEvent, BindError> {
        (**self).next_event()
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn next_event(&mut self) -> Result<XmlEvent, BindError> {
        (**self).next_event()
    }
}

/// Event source over any iterator of events, for tokenizers living elsewhere
#[derive(Debug)]
pub struct IterSource<I> {
    events: I,
}

impl<I: Iterator<Item = XmlEvent>> IterSource<I> {
    pub fn new<T>(events: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        IterSource {
            events: events.into_iter(),
        }
    }
}

impl<I: Iterator<Item = XmlEvent>> EventSource for IterSource<I> {
    fn next_event(&mut self) -> Result<XmlEvent, BindError> {
        Ok(self.events.next().unwrap_or(XmlEvent::Eof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_source_repeats_eof() {
        let mut source = IterSource::new(vec![XmlEvent::start("a"), XmlEvent::end("a")]);
        assert!(source.next_event().unwrap().is_start());
        assert!(source.next_event().unwrap().is_end());
        assert_eq!(source.next_event().unwrap(), XmlEvent::Eof);
        assert_eq!(source.next_event().unwrap(), XmlEvent::Eof);
    }

    #[test]
    fn test_constructors() {
        let event = XmlEvent::start_with("Item", [("id", "1")]);
        assert_eq!(
            event,
            XmlEvent::StartTag {
                name: "Item".to_string(),
                attributes: vec![("id".to_string(), "1".to_string())],
            }
        );
        assert_eq!(XmlEvent::text("A").as_text(), Some("A"));
        assert_eq!(XmlEvent::end("Item").as_text(), None);
    }

    #[test]
    fn test_mut_ref_source() {
        fn pull<S: EventSource>(mut source: S) -> XmlEvent {
            source.next_event().unwrap()
        }

        let mut inner = IterSource::new(vec![XmlEvent::text("x"), XmlEvent::text("y")]);
        assert_eq!(pull(&mut inner), XmlEvent::text("x"));
        assert_eq!(pull(&mut inner), XmlEvent::text("y"));
    }
}
