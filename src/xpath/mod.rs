//! Restricted XPath Patterns
//!
//! The pattern side of binding:
//! - Path elements with attribute constraints
//! - Directional matching against the observed stack
//! - Absolute, floating (`//`) and relative (parent-chained) anchors
//! - Parsed pattern caching

pub mod cache;
pub mod element;
pub mod lexer;
pub mod parser;
pub mod pattern;

pub use element::{PathElement, SegmentKind};
pub use parser::{parse, PathExpr, PatternExpr, Start};
pub use pattern::{Anchor, PathPattern, Scope};
