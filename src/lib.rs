//! # Rewrite DSL
//!
//! Lossless rewriting of Java sources with typed matching, code templates
//! and project-level follow-up actions.
//!
//! This crate provides:
//! - A lossless Java syntax tree with resolved types, built on tree-sitter
//! - Visitors with a cursor that carries messages between tree levels
//! - Preconditions that skip units a rewrite cannot apply to
//! - Code templates with typed placeholders, formatted on insertion
//! - Import management and dependency version upgrades
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rewrite_dsl::prelude::*;
//!
//! // Move JUnit 4 `@Rule MockWebServer` fields to JUnit 5 `@AfterEach`
//! let result = Rewrite::in_repo("./my-service")
//!     .recipe(update_mock_web_server()?)
//!     .dry_run()
//!     .run()?;
//!
//! println!("{}", result.diff());
//! # Ok::<(), rewrite_dsl::error::RefactorError>(())
//! ```
//!
//! ## Visiting a Single Unit
//!
//! ```rust
//! use rewrite_dsl::prelude::*;
//!
//! let recipe = update_mock_web_server()?;
//! let cu = JavaParser::new()
//!     .classpath(recipe.classpath())
//!     .parse("class A {}\n", "A.java")?;
//!
//! let out = recipe.visitor().visit(&cu, &ExecutionContext::new());
//! assert!(std::sync::Arc::ptr_eq(&cu, &out));
//! # Ok::<(), rewrite_dsl::error::RefactorError>(())
//! ```

pub mod context;
pub mod dependency;
pub mod diff;
pub mod error;
pub mod lang;
pub mod matcher;
pub mod precondition;
pub mod recipe;
pub mod rewrite;
pub mod transform;
pub mod tree;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::context::{Diagnostic, ExecutionContext};
    pub use crate::dependency::{
        ActionReport, SecondaryAction, UpgradeDependencyVersion, VersionSelector, run_actions,
    };
    pub use crate::diff::DiffSummary;
    pub use crate::error::{RefactorError, Result, SynthesisError};
    pub use crate::lang::{Classpath, Java, JavaParser, Language};
    pub use crate::matcher::{AnnotationMatcher, FileMatcher, Pattern, TypeMatcher, matches};
    pub use crate::precondition::{Check, Precondition, UsesType, and, or};
    pub use crate::recipe::{Recipe, RuleMigrationConfig, RuleToLifecycleMethod, update_mock_web_server};
    pub use crate::rewrite::{Rewrite, RewriteResult};
    pub use crate::transform::{
        AutoFormat, FileChange, ImportEdits, IndentFormatter, InsertionSlot, JavaTemplate,
        add_import_if_absent, remove_import_if_unused,
    };
    pub use crate::tree::{CompilationUnit, Cursor, J, JavaType, JavaVisitor, Kind, TreeVisitor};
}

pub use prelude::*;
