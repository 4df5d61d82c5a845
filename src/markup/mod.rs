//! Markup handling: cleanup, tree construction and selector queries.

pub mod document;
pub mod normalizer;
pub mod selection;
pub mod selector;

pub use document::{Document, NodeId};
pub use normalizer::normalize;
pub use selection::{ElementRef, Selection};
pub use selector::{Position, Selector, SelectorError};
