//! quick-xml Tokenizer Adapter
//!
//! Turns raw bytes into the binder's four events. Empty elements expand into a
//! start/end pair, CDATA becomes text, and comments, processing instructions,
//! declarations and doctypes are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use super::events::{EventSource, XmlEvent};
use crate::error::BindError;

/// Pull reader over a byte slice or any `BufRead`
pub struct XmlReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// End tag owed for an empty element already reported as a start tag
    pending_end: Option<String>,
}

impl<'a> XmlReader<&'a [u8]> {
    /// Read from an in-memory document
    pub fn from_bytes(input: &'a [u8]) -> Self {
        Self::new(Reader::from_reader(input))
    }

    /// Read from an in-memory string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::from_bytes(input.as_bytes())
    }
}

impl<R: BufRead> XmlReader<R> {
    /// Read from a buffered stream
    pub fn from_reader(reader: R) -> Self {
        Self::new(Reader::from_reader(reader))
    }

    fn new(reader: Reader<R>) -> Self {
        XmlReader {
            reader,
            buf: Vec::with_capacity(1024),
            pending_end: None,
        }
    }

    fn error(&self, message: impl std::fmt::Display) -> BindError {
        BindError::Tokenizer {
            message: format!("{} at byte {}", message, self.reader.buffer_position()),
        }
    }
}

impl<R: BufRead> EventSource for XmlReader<R> {
    fn next_event(&mut self) -> Result<XmlEvent, BindError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(XmlEvent::EndTag { name });
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    let message = e.to_string();
                    return Err(self.error(message));
                }
            };

            let converted = match event {
                Event::Start(tag) => start_tag(&tag),
                Event::Empty(tag) => start_tag(&tag).map(|event| {
                    if let XmlEvent::StartTag { name, .. } = &event {
                        self.pending_end = Some(name.clone());
                    }
                    event
                }),
                Event::End(tag) => utf8(tag.name().as_ref()).map(|name| XmlEvent::EndTag { name }),
                Event::Text(text) => match text.unescape() {
                    Ok(text) if text.is_empty() => continue,
                    Ok(text) => Ok(XmlEvent::Text(text.into_owned())),
                    Err(e) => Err(e.to_string()),
                },
                Event::CData(data) => utf8(&data.into_inner()).map(XmlEvent::Text),
                Event::Eof => Ok(XmlEvent::Eof),
                _ => continue,
            };

            return converted.map_err(|message| self.error(message));
        }
    }
}

fn start_tag(tag: &BytesStart<'_>) -> Result<XmlEvent, String> {
    let name = utf8(tag.name().as_ref())?;
    let mut attributes = Vec::new();

    for attr in tag.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attributes.push((key, value.into_owned()));
    }

    Ok(XmlEvent::StartTag { name, attributes })
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| format!("invalid UTF-8: {}", e))
}

/// Tokenize a whole document into events, ending with `Eof`
pub fn collect_events(input: &str) -> Result<Vec<XmlEvent>, BindError> {
    let mut reader = XmlReader::from_str(input);
    let mut events = Vec::new();
    loop {
        let event = reader.next_event()?;
        let done = event == XmlEvent::Eof;
        events.push(event);
        if done {
            return Ok(events);
        }
    }
}
