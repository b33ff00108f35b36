//! Path Patterns
//!
//! A chain of declared segments plus an anchor saying where the chain must
//! start. Relative patterns keep an `Arc` to their parent pattern and are
//! resolved by walking back through it at match time.

use std::fmt;
use std::sync::Arc;

use super::element::PathElement;

/// Where the first segment of a pattern has to sit in the observed stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// `/a/b`: the chain starts at the document root
    Document,
    /// `//a/b`: the chain may start at any depth
    Floating,
    /// `a/b`: the chain continues right below the tail of another pattern
    Under(Arc<PathPattern>),
}

/// A declared path pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
    steps: Vec<PathElement>,
    anchor: Anchor,
}

/// The binder a match is evaluated for.
///
/// Patterns chained under `root` are resolved against the concrete element at
/// `depth` instead of walking into `root` itself, so a nested binder's relative
/// patterns bind to exactly the position it was delegated at.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub root: &'a Arc<PathPattern>,
    pub depth: usize,
}

impl PathPattern {
    pub fn new(steps: Vec<PathElement>, anchor: Anchor) -> Self {
        PathPattern { steps, anchor }
    }

    /// Absolute pattern anchored at the document root
    pub fn absolute(steps: Vec<PathElement>) -> Self {
        Self::new(steps, Anchor::Document)
    }

    /// Pattern that may start at any depth
    pub fn floating(steps: Vec<PathElement>) -> Self {
        Self::new(steps, Anchor::Floating)
    }

    /// Pattern continuing below `parent`
    pub fn under(parent: &Arc<PathPattern>, steps: Vec<PathElement>) -> Self {
        Self::new(steps, Anchor::Under(Arc::clone(parent)))
    }

    /// Placeholder root for types that declare none
    pub fn implicit_root() -> Self {
        Self::floating(Vec::new())
    }

    pub fn steps(&self) -> &[PathElement] {
        &self.steps
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Last declared segment
    pub fn tail(&self) -> Option<&PathElement> {
        self.steps.last()
    }

    /// Test the pattern against the full observed stack
    pub fn matches(&self, stack: &[PathElement], scope: Option<Scope<'_>>) -> bool {
        self.matches_ending_at(stack, stack.len(), scope)
    }

    /// Test the pattern against `stack[..end]`, tail-aligned
    fn matches_ending_at(&self, stack: &[PathElement], end: usize, scope: Option<Scope<'_>>) -> bool {
        let len = self.steps.len();
        if len > end {
            return false;
        }

        let start = end - len;
        let aligned = self
            .steps
            .iter()
            .zip(&stack[start..end])
            .all(|(declared, observed)| declared.matches(observed));
        if !aligned {
            return false;
        }

        match &self.anchor {
            Anchor::Document => start == 0,
            Anchor::Floating => true,
            Anchor::Under(parent) => match scope {
                Some(scope) if Arc::ptr_eq(parent, scope.root) => start == scope.depth + 1,
                _ => parent.matches_ending_at(stack, start, scope),
            },
        }
    }

    /// Rebuild the chain so links to `from` point at `to` instead
    pub fn reanchor(self: &Arc<Self>, from: &Arc<PathPattern>, to: &Arc<PathPattern>) -> Arc<Self> {
        match &self.anchor {
            Anchor::Under(parent) if Arc::ptr_eq(parent, from) => {
                Arc::new(PathPattern::under(to, self.steps.clone()))
            }
            Anchor::Under(parent) => {
                let parent = parent.reanchor(from, to);
                Arc::new(PathPattern::under(&parent, self.steps.clone()))
            }
            _ => Arc::clone(self),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Anchor::Document => f.write_str("/")?,
            Anchor::Floating => f.write_str("//")?,
            Anchor::Under(parent) if !parent.is_empty() => write!(f, "{}/", parent)?,
            Anchor::Under(_) => {}
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Render an observed stack as `/a/b/@c` for error messages
pub fn stack_path(stack: &[PathElement]) -> String {
    if stack.is_empty() {
        return "/".to_string();
    }
    let mut path = String::new();
    for element in stack {
        path.push('/');
        if element.is_attribute() {
            path.push('@');
        }
        path.push_str(element.name());
    }
    path
}
