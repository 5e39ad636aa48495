//! Cheap whole-unit checks that gate a rewrite.
//!
//! A [`Precondition`] is evaluated once per compilation unit before any
//! visitor runs. [`Check`] wraps a visitor so that it only runs on units the
//! precondition accepts; on every other unit it hands back the input tree.

use crate::context::ExecutionContext;
use crate::tree::scan::{self, Element};
use crate::tree::{CompilationUnit, TreeVisitor};
use std::sync::Arc;
use tracing::debug;

/// A pure predicate over a compilation unit.
pub trait Precondition: Send + Sync {
    fn evaluate(&self, cu: &CompilationUnit, ctx: &ExecutionContext) -> bool;

    /// Returns a description of the precondition.
    fn describe(&self) -> String;
}

/// Holds when the unit refers to a type, through an import or any
/// resolved type reference.
#[derive(Debug, Clone)]
pub struct UsesType {
    fqn: String,
}

impl UsesType {
    pub fn new(fqn: impl Into<String>) -> Self {
        Self { fqn: fqn.into() }
    }
}

impl Precondition for UsesType {
    fn evaluate(&self, cu: &CompilationUnit, _ctx: &ExecutionContext) -> bool {
        let package = self.fqn.rsplit_once('.').map(|(p, _)| p).unwrap_or("");
        scan::any(cu, |element| match element {
            Element::Import(import) if !import.is_static => {
                import.qualid == self.fqn
                    || (import.is_wildcard() && import.package_name() == package)
            }
            Element::Identifier(ident) => ident.ty.as_ref().is_some_and(|ty| ty.is_class(&self.fqn)),
            _ => false,
        })
    }

    fn describe(&self) -> String {
        format!("uses type {}", self.fqn)
    }
}

/// Holds when every inner precondition holds, evaluated in order and
/// stopping at the first that does not.
pub struct And {
    preconditions: Vec<Box<dyn Precondition>>,
}

/// Holds when any inner precondition holds, evaluated in order and
/// stopping at the first that does.
pub struct Or {
    preconditions: Vec<Box<dyn Precondition>>,
}

pub fn and(preconditions: Vec<Box<dyn Precondition>>) -> And {
    And { preconditions }
}

pub fn or(preconditions: Vec<Box<dyn Precondition>>) -> Or {
    Or { preconditions }
}

impl Precondition for And {
    fn evaluate(&self, cu: &CompilationUnit, ctx: &ExecutionContext) -> bool {
        self.preconditions.iter().all(|p| p.evaluate(cu, ctx))
    }

    fn describe(&self) -> String {
        let parts: Vec<_> = self.preconditions.iter().map(|p| p.describe()).collect();
        format!("({})", parts.join(" and "))
    }
}

impl Precondition for Or {
    fn evaluate(&self, cu: &CompilationUnit, ctx: &ExecutionContext) -> bool {
        self.preconditions.iter().any(|p| p.evaluate(cu, ctx))
    }

    fn describe(&self) -> String {
        let parts: Vec<_> = self.preconditions.iter().map(|p| p.describe()).collect();
        format!("({})", parts.join(" or "))
    }
}

/// Runs a visitor only on units accepted by a precondition.
pub struct Check<P, V> {
    precondition: P,
    visitor: V,
}

impl<P: Precondition, V: TreeVisitor> Check<P, V> {
    pub fn new(precondition: P, visitor: V) -> Self {
        Self {
            precondition,
            visitor,
        }
    }
}

impl<P: Precondition, V: TreeVisitor> TreeVisitor for Check<P, V> {
    fn visit(
        &mut self,
        cu: &Arc<CompilationUnit>,
        ctx: &ExecutionContext,
    ) -> Arc<CompilationUnit> {
        if !self.precondition.evaluate(cu, ctx) {
            debug!(
                path = %cu.source_path.display(),
                precondition = %self.precondition.describe(),
                "Precondition not met, skipping unit"
            );
            return cu.clone();
        }
        self.visitor.visit(cu, ctx)
    }
}
