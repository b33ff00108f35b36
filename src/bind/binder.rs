//! Binder Entry Point
//!
//! A `Binder` pairs an immutable descriptor with parse options. It is built
//! once and can run any number of parses, concurrently if needed.

use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, warn};

use super::descriptor::{Bindable, TypeDescriptor};
use super::engine::{bind_object, Cursor};
use super::options::BinderOptions;
use crate::error::BindError;
use crate::reader::{EventSource, XmlEvent, XmlReader};

/// Binds XML documents into values of `T`
pub struct Binder<T> {
    descriptor: Arc<TypeDescriptor<T>>,
    options: BinderOptions,
}

impl<T> Clone for Binder<T> {
    fn clone(&self) -> Self {
        Binder {
            descriptor: Arc::clone(&self.descriptor),
            options: self.options.clone(),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("descriptor", &self.descriptor)
            .field("options", &self.options)
            .finish()
    }
}

impl<T: 'static> Binder<T> {
    /// Create a new binder with default options
    pub fn new(descriptor: impl Into<Arc<TypeDescriptor<T>>>) -> Self {
        let descriptor = descriptor.into();
        if !descriptor.has_constructor() {
            warn!(
                type_name = %descriptor.name(),
                "descriptor has no constructor; only parse_into can bind it"
            );
        }
        Binder {
            descriptor,
            options: BinderOptions::default(),
        }
    }

    /// Binder for a type that declares its own descriptor
    pub fn of() -> Result<Self, BindError>
    where
        T: Bindable,
    {
        Ok(Self::new(T::descriptor()?))
    }

    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn descriptor(&self) -> &TypeDescriptor<T> {
        &self.descriptor
    }

    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Bind a fresh instance from `source`
    pub fn parse<S: EventSource>(&self, mut source: S) -> Result<T, BindError> {
        let mut target = self.descriptor.construct()?;
        self.bind(&mut source, &mut target)?;
        Ok(target)
    }

    /// Bind into a caller-supplied instance; no constructor is needed
    pub fn parse_into<S: EventSource>(&self, mut source: S, target: &mut T) -> Result<(), BindError> {
        self.bind(&mut source, target)
    }

    pub fn parse_str(&self, xml: &str) -> Result<T, BindError> {
        self.parse(XmlReader::from_str(xml))
    }

    pub fn parse_bytes(&self, xml: &[u8]) -> Result<T, BindError> {
        self.parse(XmlReader::from_bytes(xml))
    }

    /// Bind from a buffered stream, reading it incrementally
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<T, BindError> {
        self.parse(XmlReader::from_reader(reader))
    }

    fn bind(&self, source: &mut dyn EventSource, target: &mut T) -> Result<(), BindError> {
        let mut cx = Cursor::new(source, &self.options);
        self.locate_root(&mut cx)?;
        bind_object(&self.descriptor, target, &mut cx)
    }

    /// Stream until the root element is on top of the stack
    fn locate_root(&self, cx: &mut Cursor<'_>) -> Result<(), BindError> {
        let root = self.descriptor.root_pattern();
        loop {
            match cx.pull()? {
                XmlEvent::StartTag { name, attributes } => {
                    cx.enter(name, attributes);
                    let found = match root {
                        Some(pattern) => pattern.matches(cx.stack(), None),
                        None => true,
                    };
                    if found {
                        debug!(
                            type_name = %self.descriptor.name(),
                            path = %cx.path(),
                            "located root element"
                        );
                        return Ok(());
                    }
                }
                XmlEvent::EndTag { .. } => cx.leave(),
                XmlEvent::Text(_) => {}
                XmlEvent::Eof => {
                    let pattern = root.map(|p| p.to_string()).unwrap_or_else(|| "*".to_string());
                    return Err(BindError::RootNotFound { pattern });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::IterSource;

    #[derive(Debug, Default, PartialEq)]
    struct Order {
        items: Vec<String>,
        count: i32,
    }

    impl Bindable for Order {
        fn descriptor() -> Result<TypeDescriptor<Self>, BindError> {
            TypeDescriptor::builder("Order")
                .root("//Order")
                .default_constructor()
                .list("items", "Item", |o: &mut Order, v: Vec<String>| o.items = v)
                .field("count", "Count", |o: &mut Order, v: i32| o.count = v)
                .build()
        }
    }

    #[test]
    fn test_parse_order() {
        let binder = Binder::<Order>::of().unwrap();
        let order = binder
            .parse_str("<Order><Item>A</Item><Item>B</Item><Count>42</Count></Order>")
            .unwrap();
        assert_eq!(
            order,
            Order {
                items: vec!["A".to_string(), "B".to_string()],
                count: 42
            }
        );
    }

    #[test]
    fn test_root_below_envelope() {
        let binder = Binder::<Order>::of().unwrap();
        let order = binder
            .parse_str("<Envelope><Header/><Body><Order><Count>3</Count></Order></Body></Envelope>")
            .unwrap();
        assert_eq!(order.count, 3);
    }

    #[test]
    fn test_root_not_found() {
        let binder = Binder::<Order>::of().unwrap();
        let err = binder.parse_str("<Invoice><Count>1</Count></Invoice>").unwrap_err();
        assert!(matches!(err, BindError::RootNotFound { ref pattern } if pattern == "//Order"));
    }

    #[test]
    fn test_parse_into_keeps_unbound_fields() {
        let binder = Binder::<Order>::of().unwrap();
        let mut order = Order {
            items: vec!["kept".to_string()],
            count: 0,
        };
        let source = IterSource::new(vec![
            XmlEvent::start("Order"),
            XmlEvent::start("Count"),
            XmlEvent::text("7"),
            XmlEvent::end("Count"),
            XmlEvent::end("Order"),
        ]);
        binder.parse_into(source, &mut order).unwrap();
        assert_eq!(order.items, vec!["kept".to_string()]);
        assert_eq!(order.count, 7);
    }

    #[test]
    fn test_missing_constructor_reported_by_parse() {
        let descriptor = TypeDescriptor::builder("Order")
            .field("count", "Count", |o: &mut Order, v: i32| o.count = v)
            .build()
            .unwrap();
        let binder = Binder::new(descriptor);

        let err = binder.parse_str("<Order/>").unwrap_err();
        assert!(err.is_configuration());

        let mut order = Order::default();
        binder
            .parse_into(XmlReader::from_str("<Order><Count>5</Count></Order>"), &mut order)
            .unwrap();
        assert_eq!(order.count, 5);
    }

    #[test]
    fn test_parse_reader() {
        let binder = Binder::<Order>::of().unwrap();
        let xml = b"<Order><Item>x</Item></Order>";
        let order = binder.parse_reader(&xml[..]).unwrap();
        assert_eq!(order.items, vec!["x".to_string()]);
    }
}
