//! Matchers for files and tree nodes.

pub mod annotation;
pub mod file;
pub mod types;

pub use annotation::AnnotationMatcher;
pub use file::FileMatcher;
pub use types::{TypeMatcher, is_of_class_type};

/// A stateless description of a node shape.
///
/// Matching is pure and never fails; nodes missing the information a pattern
/// needs simply do not match.
pub trait Pattern<N: ?Sized>: Send + Sync {
    fn matches(&self, node: &N) -> bool;
}

/// Returns true if `node` matches `pattern`.
pub fn matches<N: ?Sized, P: Pattern<N> + ?Sized>(node: &N, pattern: &P) -> bool {
    pattern.matches(node)
}
