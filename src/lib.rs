//! xmlbind - Streaming XML to typed-object binding
//!
//! Types declare restricted XPath patterns for their fields. A single forward
//! pass over the document's events matches the current element path against
//! those patterns and writes coerced values into a freshly built object.
//!
//! Layers:
//! - xpath: pattern dialect, directional matcher, parse cache
//! - reader: event model and the quick-xml tokenizer adapter
//! - bind: descriptors, the streaming engine, list accumulation, coercion
//! - parallel: batch binding over Rayon (feature `parallel`)
//!
//! ```
//! use xmlbind::{Binder, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Order {
//!     items: Vec<String>,
//!     count: i32,
//! }
//!
//! let descriptor = TypeDescriptor::builder("Order")
//!     .root("/Order")
//!     .default_constructor()
//!     .list("items", "Item", |o: &mut Order, v: Vec<String>| o.items = v)
//!     .field("count", "Count", |o: &mut Order, v: i32| o.count = v)
//!     .build()
//!     .unwrap();
//!
//! let order = Binder::new(descriptor)
//!     .parse_str("<Order><Item>A</Item><Item>B</Item><Count>42</Count></Order>")
//!     .unwrap();
//! assert_eq!(order.items, ["A", "B"]);
//! assert_eq!(order.count, 42);
//! ```

pub mod bind;
pub mod error;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reader;
pub mod xpath;

pub use bind::{
    csv, processor, Bindable, Binder, BinderOptions, Coerce, CoercionKind, DescriptorBuilder,
    DestinationKind, FieldBinding, NilConvention, Processor, TypeDescriptor,
};
pub use error::BindError;
pub use reader::{EventSource, IterSource, XmlEvent, XmlReader};
pub use xpath::{PathElement, PathPattern};

#[cfg(feature = "parallel")]
pub use parallel::{bind_all, try_bind_all};
