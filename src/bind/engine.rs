//! Streaming Binder Engine
//!
//! One `bind_object` call owns one object scope: it is entered with the scope's
//! element already on the stack and returns after consuming that element's end
//! tag. Nested objects and list items recurse into the same function over the
//! same cursor, so every binder sees the events of its own subtree only.

use tracing::trace;

use super::coerce::{prepare, CoercionKind};
use super::descriptor::{Destination, ScalarSlot, TypeDescriptor};
use super::list::ListBuffer;
use super::options::BinderOptions;
use crate::error::BindError;
use crate::reader::{EventSource, XmlEvent};
use crate::xpath::pattern::stack_path;
use crate::xpath::PathElement;

/// Event cursor and observed stack shared by every binder of one parse
pub(crate) struct Cursor<'a> {
    source: &'a mut dyn EventSource,
    stack: Vec<PathElement>,
    options: &'a BinderOptions,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a mut dyn EventSource, options: &'a BinderOptions) -> Self {
        Cursor {
            source,
            stack: Vec::with_capacity(16),
            options,
        }
    }

    pub(crate) fn stack(&self) -> &[PathElement] {
        &self.stack
    }

    pub(crate) fn options(&self) -> &BinderOptions {
        self.options
    }

    /// Observed stack rendered as a path
    pub(crate) fn path(&self) -> String {
        stack_path(&self.stack)
    }

    pub(crate) fn pull(&mut self) -> Result<XmlEvent, BindError> {
        self.source.next_event()
    }

    pub(crate) fn enter(&mut self, name: String, attributes: Vec<(String, String)>) {
        self.stack.push(PathElement::observed(name, attributes));
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    /// Does the innermost open element carry the nil marker?
    pub(crate) fn is_nil(&self) -> bool {
        self.stack
            .last()
            .map(|element| self.options.nil.is_nil(element))
            .unwrap_or(false)
    }

    /// Consume the innermost element's content through its end tag.
    ///
    /// Returns `None` for a nil element, otherwise the concatenated text of the
    /// element and its descendants. The element stays on the stack.
    pub(crate) fn capture_text(&mut self) -> Result<Option<String>, BindError> {
        let nil = self.is_nil();
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            match self.pull()? {
                XmlEvent::StartTag { .. } => depth += 1,
                XmlEvent::Text(run) => {
                    if !nil {
                        text.push_str(&run);
                    }
                }
                XmlEvent::EndTag { .. } => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                XmlEvent::Eof => return Err(self.eof()),
            }
        }

        Ok(if nil { None } else { Some(text) })
    }

    /// Consume and pop the innermost element without binding anything
    pub(crate) fn skip_element(&mut self) -> Result<(), BindError> {
        let mut depth = 0usize;
        loop {
            match self.pull()? {
                XmlEvent::StartTag { .. } => depth += 1,
                XmlEvent::Text(_) => {}
                XmlEvent::EndTag { .. } => {
                    if depth == 0 {
                        self.leave();
                        return Ok(());
                    }
                    depth -= 1;
                }
                XmlEvent::Eof => return Err(self.eof()),
            }
        }
    }

    pub(crate) fn eof(&self) -> BindError {
        BindError::UnexpectedEof { path: self.path() }
    }

    /// Coerce captured text into a scalar field, naming the field on failure
    pub(crate) fn assign_scalar<T>(
        &self,
        slot: &dyn ScalarSlot<T>,
        field: &str,
        target: &mut T,
        text: Option<&str>,
    ) -> Result<(), BindError> {
        let kind = slot.kind();
        let prepared = text.map(|t| prepare(t, kind, self.options.trim_text));

        slot.assign(target, prepared)
            .map_err(|message| self.coercion_error(field, kind, text, message))
    }

    pub(crate) fn coercion_error(
        &self,
        field: &str,
        kind: CoercionKind,
        text: Option<&str>,
        message: String,
    ) -> BindError {
        BindError::Coercion {
            field: field.to_string(),
            path: self.path(),
            kind,
            text: text.unwrap_or_default().to_string(),
            message,
        }
    }
}

/// Bind the element on top of the stack into `target`.
///
/// Returns once the element's end tag has been consumed and popped.
pub(crate) fn bind_object<T: 'static>(
    descriptor: &TypeDescriptor<T>,
    target: &mut T,
    cx: &mut Cursor<'_>,
) -> Result<(), BindError> {
    let depth = match cx.stack().len().checked_sub(1) {
        Some(depth) => depth,
        None => return Err(cx.eof()),
    };

    let mut lists: Vec<Option<Box<dyn ListBuffer<T> + '_>>> =
        (0..descriptor.field_count()).map(|_| None).collect();

    bind_attributes(descriptor, target, cx, depth)?;

    loop {
        match cx.pull()? {
            XmlEvent::StartTag { name, attributes } => {
                cx.enter(name, attributes);
                bind_attributes(descriptor, target, cx, depth)?;

                let Some((index, field)) = descriptor.resolve(cx.stack(), depth) else {
                    trace!(path = %cx.path(), "no binding, streaming through");
                    continue;
                };
                trace!(path = %cx.path(), field = %field.name(), "bound");

                match field.destination() {
                    Destination::Scalar(slot) => {
                        let text = cx.capture_text()?;
                        cx.assign_scalar(slot.as_ref(), field.name(), target, text.as_deref())?;
                        cx.leave();
                    }
                    Destination::Object(slot) => slot.bind(target, cx)?,
                    Destination::List(slot) => {
                        lists[index]
                            .get_or_insert_with(|| slot.buffer())
                            .push_item(field.name(), cx)?;
                    }
                }
            }
            XmlEvent::Text(_) => {}
            XmlEvent::EndTag { .. } => {
                let closing = cx.stack().len().saturating_sub(1);
                cx.leave();
                if closing == depth {
                    break;
                }
            }
            XmlEvent::Eof => return Err(cx.eof()),
        }
    }

    for buffer in lists.into_iter().flatten() {
        buffer.finish(target);
    }
    Ok(())
}

/// Bind attributes of the innermost element, each as a transient `@name` segment
fn bind_attributes<T: 'static>(
    descriptor: &TypeDescriptor<T>,
    target: &mut T,
    cx: &mut Cursor<'_>,
    depth: usize,
) -> Result<(), BindError> {
    if !descriptor.binds_attributes() {
        return Ok(());
    }

    let attributes: Vec<(String, String)> = match cx.stack.last() {
        Some(element) => element
            .attributes()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => return Ok(()),
    };

    for (name, value) in attributes {
        cx.stack.push(PathElement::attribute(name));
        let resolved = descriptor.resolve(cx.stack(), depth);
        let result = match resolved.map(|(_, field)| (field, field.destination())) {
            Some((field, Destination::Scalar(slot))) => {
                cx.assign_scalar(slot.as_ref(), field.name(), target, Some(&value))
            }
            _ => Ok(()),
        };
        cx.stack.pop();
        result?;
    }
    Ok(())
}

/// Bind a nested object field: construct, recurse, write back
pub(crate) fn bind_nested<U: 'static>(
    descriptor: &TypeDescriptor<U>,
    cx: &mut Cursor<'_>,
) -> Result<Option<U>, BindError> {
    if cx.is_nil() {
        cx.skip_element()?;
        return Ok(None);
    }
    let mut child = descriptor.construct()?;
    bind_object(descriptor, &mut child, cx)?;
    Ok(Some(child))
}
