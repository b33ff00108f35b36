//! List Binder
//!
//! Each matching element appends one item, in document order, to a buffer
//! owned by the enclosing object scope. The buffer is written to its field
//! when that scope closes.

use std::marker::PhantomData;
use std::sync::Arc;

use super::coerce::{prepare, Coerce};
use super::descriptor::{DestinationKind, Projected, TypeDescriptor};
use super::engine::{bind_nested, Cursor};
use crate::error::BindError;

/// A list field of `T`
pub(crate) trait ListSlot<T>: Send + Sync {
    fn describe(&self) -> DestinationKind;

    /// Fresh accumulator for one object scope
    fn buffer(&self) -> Box<dyn ListBuffer<T> + '_>;
}

/// Items collected so far for one list field
pub(crate) trait ListBuffer<T> {
    /// Bind the element on top of the stack as one item; pops it
    fn push_item(&mut self, field: &str, cx: &mut Cursor<'_>) -> Result<(), BindError>;

    /// Write the collected items into `target`
    fn finish(self: Box<Self>, target: &mut T);
}

/// List of coerced scalars; nil items take the zero value
pub(crate) struct ScalarList<V, F> {
    setter: F,
    _item: PhantomData<fn() -> V>,
}

impl<V, F> ScalarList<V, F> {
    pub(crate) fn new(setter: F) -> Self {
        ScalarList {
            setter,
            _item: PhantomData,
        }
    }
}

impl<T, V, F> ListSlot<T> for ScalarList<V, F>
where
    V: Coerce,
    F: Fn(&mut T, Vec<V>) + Send + Sync,
{
    fn describe(&self) -> DestinationKind {
        DestinationKind::List(Box::new(DestinationKind::Scalar(V::KIND)))
    }

    fn buffer(&self) -> Box<dyn ListBuffer<T> + '_> {
        Box::new(ScalarBuffer {
            slot: self,
            items: Vec::new(),
        })
    }
}

struct ScalarBuffer<'a, V, F> {
    slot: &'a ScalarList<V, F>,
    items: Vec<V>,
}

impl<T, V, F> ListBuffer<T> for ScalarBuffer<'_, V, F>
where
    V: Coerce,
    F: Fn(&mut T, Vec<V>),
{
    fn push_item(&mut self, field: &str, cx: &mut Cursor<'_>) -> Result<(), BindError> {
        let text = cx.capture_text()?;
        let prepared = text
            .as_deref()
            .map(|t| prepare(t, V::KIND, cx.options().trim_text));

        let item = V::coerce(prepared)
            .map_err(|message| cx.coercion_error(field, V::KIND, text.as_deref(), message))?;
        self.items.push(item);
        cx.leave();
        Ok(())
    }

    fn finish(self: Box<Self>, target: &mut T) {
        (self.slot.setter)(target, self.items);
    }
}

/// List of nested objects; nil items are skipped
pub(crate) struct ObjectList<U, F> {
    descriptor: Arc<TypeDescriptor<U>>,
    setter: F,
}

impl<U, F> ObjectList<U, F> {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor<U>>, setter: F) -> Self {
        ObjectList { descriptor, setter }
    }
}

impl<T, U, F> ListSlot<T> for ObjectList<U, F>
where
    U: 'static,
    F: Fn(&mut T, Vec<U>) + Send + Sync,
{
    fn describe(&self) -> DestinationKind {
        let item = DestinationKind::Object(self.descriptor.name().to_string());
        DestinationKind::List(Box::new(item))
    }

    fn buffer(&self) -> Box<dyn ListBuffer<T> + '_> {
        Box::new(ObjectBuffer {
            slot: self,
            items: Vec::new(),
        })
    }
}

struct ObjectBuffer<'a, U, F> {
    slot: &'a ObjectList<U, F>,
    items: Vec<U>,
}

impl<T, U, F> ListBuffer<T> for ObjectBuffer<'_, U, F>
where
    U: 'static,
    F: Fn(&mut T, Vec<U>),
{
    fn push_item(&mut self, _field: &str, cx: &mut Cursor<'_>) -> Result<(), BindError> {
        if let Some(item) = bind_nested(&self.slot.descriptor, cx)? {
            self.items.push(item);
        }
        Ok(())
    }

    fn finish(self: Box<Self>, target: &mut T) {
        (self.slot.setter)(target, self.items);
    }
}

impl<T, P> ListSlot<T> for Projected<T, P, dyn ListSlot<P>> {
    fn describe(&self) -> DestinationKind {
        self.inner.describe()
    }

    fn buffer(&self) -> Box<dyn ListBuffer<T> + '_> {
        Box::new(ProjectedBuffer {
            inner: self.inner.buffer(),
            project: self.project,
        })
    }
}

struct ProjectedBuffer<'a, T, P> {
    inner: Box<dyn ListBuffer<P> + 'a>,
    project: fn(&mut T) -> &mut P,
}

impl<T, P> ListBuffer<T> for ProjectedBuffer<'_, T, P> {
    fn push_item(&mut self, field: &str, cx: &mut Cursor<'_>) -> Result<(), BindError> {
        self.inner.push_item(field, cx)
    }

    fn finish(self: Box<Self>, target: &mut T) {
        self.inner.finish((self.project)(target));
    }
}
