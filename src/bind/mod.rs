//! Binding Module
//!
//! Everything between declared patterns and populated values:
//! - Descriptor: per-type field declarations compiled into typed slots
//! - Repository: ordered pattern registrations, first match wins
//! - Engine: the streaming state machine driving one parse
//! - List: per-scope accumulation of repeated matches
//! - Coerce: text conversion and nil zero values
//! - Binder: the public build-once, parse-many entry point

pub mod binder;
pub mod coerce;
pub mod descriptor;
mod engine;
mod list;
pub mod options;
pub mod repository;

pub use binder::Binder;
pub use coerce::{csv, processor, Coerce, CoercionKind, Processor};
pub use descriptor::{Bindable, DescriptorBuilder, DestinationKind, FieldBinding, TypeDescriptor};
pub use options::{BinderOptions, NilConvention};
pub use repository::BindingRepository;
