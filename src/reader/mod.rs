//! XML Reader Module
//!
//! Event input for the binder:
//! - Events: the four event kinds and the `EventSource` pull trait
//! - Tokenizer: quick-xml adapter over slices and buffered streams

pub mod events;
pub mod tokenizer;

pub use events::{EventSource, IterSource, XmlEvent};
pub use tokenizer::{collect_events, XmlReader};
