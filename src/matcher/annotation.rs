//! Annotation matching by resolved type.

use super::Pattern;
use crate::tree::{Annotation, J};

/// Matches annotations whose resolved type is a given annotation type.
///
/// The comparison uses the type attached by the parser, so `@Rule` with
/// `import org.junit.Rule;`, `@Rule` through `import org.junit.*;` and a
/// fully-qualified `@org.junit.Rule` all match
/// `AnnotationMatcher::new("@org.junit.Rule")`. An annotation without a
/// resolved type never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMatcher {
    fqn: String,
}

impl AnnotationMatcher {
    /// Creates a matcher from a signature such as `@org.junit.Rule`.
    ///
    /// Arguments in the signature (`@A(value = 1)`) are ignored.
    pub fn new(signature: &str) -> Self {
        let name = signature.trim().trim_start_matches('@');
        let name = name.split('(').next().unwrap_or(name).trim();
        Self {
            fqn: name.to_string(),
        }
    }

    /// The fully-qualified annotation type.
    pub fn fully_qualified_name(&self) -> &str {
        &self.fqn
    }
}

impl Pattern<Annotation> for AnnotationMatcher {
    fn matches(&self, annotation: &Annotation) -> bool {
        annotation
            .name
            .ty
            .as_ref()
            .is_some_and(|ty| ty.is_class(&self.fqn))
    }
}

impl Pattern<J> for AnnotationMatcher {
    fn matches(&self, node: &J) -> bool {
        match node {
            J::Annotation(annotation) => self.matches(&**annotation),
            _ => false,
        }
    }
}
