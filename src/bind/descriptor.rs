//! Type Descriptors
//!
//! A descriptor is the compiled form of a type's path declarations: one
//! `FieldBinding` per field, each holding its anchored patterns and a typed
//! destination slot, plus a repository mapping patterns back to fields.
//! Descriptors are built once and only read afterwards.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use super::coerce::{Coerce, CoercionKind, Processor};
use super::engine::{bind_nested, Cursor};
use super::list::{ListSlot, ObjectList, ScalarList};
use super::repository::BindingRepository;
use crate::error::BindError;
use crate::xpath::cache::parse_cached;
use crate::xpath::{PathElement, PathExpr, PathPattern, Scope};

/// Shape of a field's destination, for inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationKind {
    Scalar(CoercionKind),
    /// Nested object, by descriptor name
    Object(String),
    List(Box<DestinationKind>),
}

/// Writes one coerced value into a field of `T`
pub(crate) trait ScalarSlot<T>: Send + Sync {
    fn kind(&self) -> CoercionKind;

    /// `None` means the element carried the nil marker
    fn assign(&self, target: &mut T, text: Option<&str>) -> Result<(), String>;
}

/// Binds a nested element into a field of `T`
pub(crate) trait ObjectSlot<T>: Send + Sync {
    fn describe(&self) -> DestinationKind;

    /// Entered with the nested element on top of the stack; pops it
    fn bind(&self, target: &mut T, cx: &mut Cursor<'_>) -> Result<(), BindError>;
}

pub(crate) enum Destination<T> {
    Scalar(Arc<dyn ScalarSlot<T>>),
    Object(Arc<dyn ObjectSlot<T>>),
    List(Arc<dyn ListSlot<T>>),
}

impl<T: 'static> Destination<T> {
    fn describe(&self) -> DestinationKind {
        match self {
            Destination::Scalar(slot) => DestinationKind::Scalar(slot.kind()),
            Destination::Object(slot) => slot.describe(),
            Destination::List(slot) => slot.describe(),
        }
    }

    /// Re-target the destination at `C` through a projection into `T`
    fn project<C: 'static>(&self, project: fn(&mut C) -> &mut T) -> Destination<C> {
        match self {
            Destination::Scalar(inner) => Destination::Scalar(Arc::new(Projected {
                inner: Arc::clone(inner),
                project,
            })),
            Destination::Object(inner) => Destination::Object(Arc::new(Projected {
                inner: Arc::clone(inner),
                project,
            })),
            Destination::List(inner) => Destination::List(Arc::new(Projected {
                inner: Arc::clone(inner),
                project,
            })),
        }
    }
}

/// A slot of `P` reached through `&mut T -> &mut P`
pub(crate) struct Projected<T, P, S: ?Sized> {
    pub(crate) inner: Arc<S>,
    pub(crate) project: fn(&mut T) -> &mut P,
}

impl<T, P> ScalarSlot<T> for Projected<T, P, dyn ScalarSlot<P>> {
    fn kind(&self) -> CoercionKind {
        self.inner.kind()
    }

    fn assign(&self, target: &mut T, text: Option<&str>) -> Result<(), String> {
        self.inner.assign((self.project)(target), text)
    }
}

impl<T, P> ObjectSlot<T> for Projected<T, P, dyn ObjectSlot<P>> {
    fn describe(&self) -> DestinationKind {
        self.inner.describe()
    }

    fn bind(&self, target: &mut T, cx: &mut Cursor<'_>) -> Result<(), BindError> {
        self.inner.bind((self.project)(target), cx)
    }
}

/// Scalar field set through a caller closure
struct FieldSlot<V, F> {
    setter: F,
    _value: PhantomData<fn() -> V>,
}

impl<T, V, F> ScalarSlot<T> for FieldSlot<V, F>
where
    V: Coerce,
    F: Fn(&mut T, V) + Send + Sync,
{
    fn kind(&self) -> CoercionKind {
        V::KIND
    }

    fn assign(&self, target: &mut T, text: Option<&str>) -> Result<(), String> {
        (self.setter)(target, V::coerce(text)?);
        Ok(())
    }
}

/// Scalar field decoded by a caller-supplied processor; nil gives `V::default()`
struct ProcessedSlot<V, F> {
    processor: Processor<V>,
    setter: F,
}

impl<T, V, F> ScalarSlot<T> for ProcessedSlot<V, F>
where
    V: Default + 'static,
    F: Fn(&mut T, V) + Send + Sync,
{
    fn kind(&self) -> CoercionKind {
        CoercionKind::Processor
    }

    fn assign(&self, target: &mut T, text: Option<&str>) -> Result<(), String> {
        let value = match text {
            Some(text) => (self.processor)(text)?,
            None => V::default(),
        };
        (self.setter)(target, value);
        Ok(())
    }
}

/// Nested object field bound by the nested type's own descriptor
struct NestedSlot<U, F> {
    descriptor: Arc<TypeDescriptor<U>>,
    setter: F,
}

impl<T, U, F> ObjectSlot<T> for NestedSlot<U, F>
where
    U: 'static,
    F: Fn(&mut T, U) + Send + Sync,
{
    fn describe(&self) -> DestinationKind {
        DestinationKind::Object(self.descriptor.name().to_string())
    }

    fn bind(&self, target: &mut T, cx: &mut Cursor<'_>) -> Result<(), BindError> {
        if let Some(value) = bind_nested(&self.descriptor, cx)? {
            (self.setter)(target, value);
        }
        Ok(())
    }
}

/// One declared field
pub struct FieldBinding<T> {
    name: String,
    patterns: Vec<Arc<PathPattern>>,
    destination: Destination<T>,
}

impl<T: 'static> FieldBinding<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anchored patterns, one per union alternative
    pub fn patterns(&self) -> &[Arc<PathPattern>] {
        &self.patterns
    }

    pub fn kind(&self) -> DestinationKind {
        self.destination.describe()
    }

    pub(crate) fn destination(&self) -> &Destination<T> {
        &self.destination
    }

    fn selects_attribute(&self) -> bool {
        self.patterns
            .iter()
            .any(|p| p.tail().map(PathElement::is_attribute).unwrap_or(false))
    }
}

/// Compiled binding table for `T`
pub struct TypeDescriptor<T> {
    name: String,
    root: Option<Arc<PathPattern>>,
    base: Arc<PathPattern>,
    constructor: Option<Arc<dyn Fn() -> T + Send + Sync>>,
    fields: Vec<FieldBinding<T>>,
    repository: BindingRepository<usize>,
    binds_attributes: bool,
}

impl<T: 'static> TypeDescriptor<T> {
    /// Start declaring a descriptor
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder<T> {
        DescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared root pattern, if any
    pub fn root_pattern(&self) -> Option<&Arc<PathPattern>> {
        self.root.as_ref()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldBinding<T>> {
        self.fields.iter()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Build a fresh instance with the declared constructor
    pub fn construct(&self) -> Result<T, BindError> {
        match &self.constructor {
            Some(constructor) => Ok(constructor()),
            None => Err(BindError::config(&self.name, "no constructor declared")),
        }
    }

    /// First field bound at `stack` for a scope element at `depth`
    pub(crate) fn resolve(&self, stack: &[PathElement], depth: usize) -> Option<(usize, &FieldBinding<T>)> {
        let scope = Scope {
            root: &self.base,
            depth,
        };
        self.repository
            .resolve(stack, Some(scope))
            .map(|&index| (index, &self.fields[index]))
    }

    pub(crate) fn binds_attributes(&self) -> bool {
        self.binds_attributes
    }
}

impl<T: 'static> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<(&str, DestinationKind)> =
            self.fields.iter().map(|field| (field.name(), field.kind())).collect();
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("root", &self.root.as_ref().map(|root| root.to_string()))
            .field("fields", &fields)
            .finish()
    }
}

/// A type that knows its own descriptor
pub trait Bindable: Sized + 'static {
    fn descriptor() -> Result<TypeDescriptor<Self>, BindError>;
}

/// Declares fields of `T`.
///
/// Errors are recorded as they happen and reported by `build`, so a chain of
/// declarations never needs intermediate `?`.
pub struct DescriptorBuilder<T> {
    name: String,
    root: Option<Arc<PathPattern>>,
    base: Arc<PathPattern>,
    /// Parent for relative patterns; the base, or a `scoped` prefix
    anchor: Arc<PathPattern>,
    constructor: Option<Arc<dyn Fn() -> T + Send + Sync>>,
    fields: Vec<FieldBinding<T>>,
    inherited: Vec<FieldBinding<T>>,
    error: Option<BindError>,
}

impl<T: 'static> DescriptorBuilder<T> {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        let base = Arc::new(PathPattern::implicit_root());
        DescriptorBuilder {
            name: name.into(),
            root: None,
            anchor: Arc::clone(&base),
            base,
            constructor: None,
            fields: Vec::new(),
            inherited: Vec::new(),
            error: None,
        }
    }

    /// Pattern locating the type's element; must come before any field
    pub fn root(mut self, pattern: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.root.is_some()
            || !self.fields.is_empty()
            || !self.inherited.is_empty()
            || !Arc::ptr_eq(&self.anchor, &self.base)
        {
            let err = BindError::config(&self.name, "root must be declared once, before any field");
            return self.fail(err);
        }

        let expr = match parse_cached(pattern) {
            Ok(expr) => expr,
            Err(message) => return self.fail(pattern_error(pattern, message)),
        };
        let root = match expr.alternatives.as_slice() {
            [single] if !single.selects_attribute() => Arc::new(single.detached()),
            [_] => {
                let message = format!("root `{}` selects an attribute", pattern);
                let err = BindError::config(&self.name, message);
                return self.fail(err);
            }
            _ => {
                let message = format!("root `{}` cannot be a union", pattern);
                let err = BindError::config(&self.name, message);
                return self.fail(err);
            }
        };

        self.base = Arc::clone(&root);
        self.anchor = Arc::clone(&root);
        self.root = Some(root);
        self
    }

    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// Scalar field (element text or attribute value)
    pub fn field<V, F>(self, name: &str, pattern: &str, setter: F) -> Self
    where
        V: Coerce,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let slot = FieldSlot {
            setter,
            _value: PhantomData,
        };
        self.declare(name, pattern, Destination::Scalar(Arc::new(slot)), true)
    }

    /// Scalar field decoded by `processor`
    pub fn processed<V, F>(self, name: &str, pattern: &str, processor: Processor<V>, setter: F) -> Self
    where
        V: Default + Send + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let slot = ProcessedSlot { processor, setter };
        self.declare(name, pattern, Destination::Scalar(Arc::new(slot)), true)
    }

    /// Nested object field
    pub fn object<U, F>(
        self,
        name: &str,
        pattern: &str,
        descriptor: impl Into<Arc<TypeDescriptor<U>>>,
        setter: F,
    ) -> Self
    where
        U: 'static,
        F: Fn(&mut T, U) + Send + Sync + 'static,
    {
        let descriptor = descriptor.into();
        if !descriptor.has_constructor() {
            let err = nested_without_constructor(&descriptor);
            return self.fail(err);
        }
        let slot = NestedSlot { descriptor, setter };
        self.declare(name, pattern, Destination::Object(Arc::new(slot)), false)
    }

    /// List of scalars, one item per matching element
    pub fn list<V, F>(self, name: &str, pattern: &str, setter: F) -> Self
    where
        V: Coerce,
        F: Fn(&mut T, Vec<V>) + Send + Sync + 'static,
    {
        let slot = ScalarList::new(setter);
        self.declare(name, pattern, Destination::List(Arc::new(slot)), false)
    }

    /// List of nested objects, one item per matching element
    pub fn object_list<U, F>(
        self,
        name: &str,
        pattern: &str,
        descriptor: impl Into<Arc<TypeDescriptor<U>>>,
        setter: F,
    ) -> Self
    where
        U: 'static,
        F: Fn(&mut T, Vec<U>) + Send + Sync + 'static,
    {
        let descriptor = descriptor.into();
        if !descriptor.has_constructor() {
            let err = nested_without_constructor(&descriptor);
            return self.fail(err);
        }
        let slot = ObjectList::new(descriptor, setter);
        self.declare(name, pattern, Destination::List(Arc::new(slot)), false)
    }

    /// Declare fields whose relative patterns continue below `prefix`
    pub fn scoped<F>(mut self, prefix: &str, declare: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if self.error.is_some() {
            return self;
        }
        let expr = match parse_cached(prefix) {
            Ok(expr) => expr,
            Err(message) => return self.fail(pattern_error(prefix, message)),
        };
        let scope = match expr.alternatives.as_slice() {
            [single] if !single.selects_attribute() => Arc::new(single.anchored(&self.anchor)),
            _ => {
                let message = format!("scope `{}` must be a single element path", prefix);
                let err = BindError::config(&self.name, message);
                return self.fail(err);
            }
        };

        let outer = std::mem::replace(&mut self.anchor, scope);
        let mut builder = declare(self);
        builder.anchor = outer;
        builder
    }

    /// Inherit every field of `parent`, reached through `project`.
    ///
    /// Inherited patterns are re-anchored at this type's root and rank after
    /// the type's own fields.
    pub fn extends<P: 'static>(mut self, parent: &TypeDescriptor<P>, project: fn(&mut T) -> &mut P) -> Self {
        if self.error.is_some() {
            return self;
        }
        for field in parent.fields() {
            let patterns = field
                .patterns
                .iter()
                .map(|pattern| pattern.reanchor(&parent.base, &self.base))
                .collect();
            self.inherited.push(FieldBinding {
                name: field.name.clone(),
                patterns,
                destination: field.destination.project(project),
            });
        }
        self
    }

    /// Finish the descriptor, reporting the first recorded error
    pub fn build(self) -> Result<TypeDescriptor<T>, BindError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut fields = self.fields;
        fields.extend(self.inherited);

        let mut repository = BindingRepository::new();
        for (index, field) in fields.iter().enumerate() {
            for pattern in &field.patterns {
                repository.register(Arc::clone(pattern), index);
            }
        }
        let binds_attributes = fields.iter().any(FieldBinding::selects_attribute);

        debug!(
            type_name = %self.name,
            fields = fields.len(),
            patterns = repository.len(),
            "built type descriptor"
        );

        Ok(TypeDescriptor {
            name: self.name,
            root: self.root,
            base: self.base,
            constructor: self.constructor,
            fields,
            repository,
            binds_attributes,
        })
    }

    fn declare(mut self, name: &str, pattern: &str, destination: Destination<T>, scalar: bool) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.compile(pattern, scalar) {
            Ok(patterns) => {
                self.fields.push(FieldBinding {
                    name: name.to_string(),
                    patterns,
                    destination,
                });
                self
            }
            Err(err) => self.fail(err),
        }
    }

    fn compile(&self, pattern: &str, scalar: bool) -> Result<Vec<Arc<PathPattern>>, BindError> {
        let expr = parse_cached(pattern).map_err(|message| pattern_error(pattern, message))?;
        if !scalar && expr.alternatives.iter().any(PathExpr::selects_attribute) {
            let message = format!("attribute pattern `{}` can only bind a scalar field", pattern);
            return Err(BindError::config(&self.name, message));
        }
        Ok(expr
            .alternatives
            .iter()
            .map(|alternative| Arc::new(alternative.anchored(&self.anchor)))
            .collect())
    }

    fn fail(mut self, err: BindError) -> Self {
        if self.error.is_none() {
            self.error = Some(err);
        }
        self
    }
}

fn pattern_error(pattern: &str, message: String) -> BindError {
    BindError::Pattern {
        pattern: pattern.to_string(),
        message,
    }
}

fn nested_without_constructor<U: 'static>(descriptor: &TypeDescriptor<U>) -> BindError {
    BindError::config(descriptor.name(), "nested type has no constructor")
}
