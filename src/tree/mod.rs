//! Lossless syntax tree for Java compilation units.
//!
//! Every node is an immutable value. Edits go through `with_*` methods that
//! return a new node, and parents hold children through [`Arc`] so that a
//! rewritten tree shares every untouched subtree with the tree it came from.
//!
//! Each node carries the whitespace (and comments) that precede it as a
//! [`Space`] prefix, so printing a tree with [`std::fmt::Display`] reproduces
//! the original source text.

pub mod cursor;
mod nodes;
mod print;
pub mod scan;
pub mod visitor;

pub use cursor::Cursor;
pub use nodes::{
    Annotation, Block, ClassDeclaration, ClassKind, CompilationUnit, Expression, Identifier,
    Import, MethodDeclaration, MethodInvocation, Modifier, NamedVariable, Package, RawStatement,
    Statement, Throws, VariableDeclarations,
};
pub use visitor::{JavaVisitor, TreeVisitor};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity token for a tree node.
///
/// Ids are only compared, never used to look nodes up or mutate them. A node
/// keeps its id across `with_*` edits, so an edited node is still recognised
/// as "the same declaration" by code that captured it earlier in a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh, process-unique id.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Whitespace and comments preceding a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Space(String);

impl Space {
    /// The empty prefix.
    pub const EMPTY: Space = Space(String::new());

    /// Creates a prefix from raw text.
    pub fn format(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// A single space.
    pub fn single() -> Self {
        Self(" ".to_string())
    }

    /// Returns the raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the prefix starts a new line.
    pub fn has_newline(&self) -> bool {
        self.0.contains('\n')
    }

    /// Indentation of the last line of the prefix, if the prefix contains a newline.
    pub fn indent(&self) -> Option<&str> {
        self.0.rfind('\n').map(|idx| &self.0[idx + 1..])
    }

    /// Number of line breaks in the prefix.
    pub fn newlines(&self) -> usize {
        self.0.matches('\n').count()
    }
}

/// Type information attached by the resolution phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    /// A class, interface, annotation or enum identified by its fully-qualified name.
    Class(String),
    /// A primitive type or `void`.
    Primitive(String),
    /// An array of the element type.
    Array(Box<JavaType>),
}

impl JavaType {
    /// Builds a class type from a fully-qualified name.
    pub fn class(fqn: impl Into<String>) -> Self {
        Self::Class(fqn.into())
    }

    /// Wraps the type in `dimensions` array levels.
    pub fn array_of(self, dimensions: usize) -> Self {
        (0..dimensions).fold(self, |ty, _| Self::Array(Box::new(ty)))
    }

    /// Returns the fully-qualified name for class types.
    pub fn fully_qualified_name(&self) -> Option<&str> {
        match self {
            Self::Class(fqn) => Some(fqn),
            Self::Primitive(_) | Self::Array(_) => None,
        }
    }

    /// Returns true if this is the class type `fqn`.
    pub fn is_class(&self, fqn: &str) -> bool {
        self.fully_qualified_name() == Some(fqn)
    }
}

impl std::fmt::Display for JavaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(fqn) => f.write_str(fqn),
            Self::Primitive(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// Kind tag for tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    CompilationUnit,
    ClassDeclaration,
    Block,
    MethodDeclaration,
    VariableDeclarations,
    MethodInvocation,
    Annotation,
    Identifier,
    Raw,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CompilationUnit => "compilation unit",
            Self::ClassDeclaration => "class declaration",
            Self::Block => "block",
            Self::MethodDeclaration => "method declaration",
            Self::VariableDeclarations => "variable declarations",
            Self::MethodInvocation => "method invocation",
            Self::Annotation => "annotation",
            Self::Identifier => "identifier",
            Self::Raw => "raw statement",
        };
        f.write_str(name)
    }
}

/// A handle to any tree node.
///
/// Cloning a `J` clones an [`Arc`] (or a small identifier), never a subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum J {
    CompilationUnit(Arc<CompilationUnit>),
    ClassDeclaration(Arc<ClassDeclaration>),
    Block(Arc<Block>),
    MethodDeclaration(Arc<MethodDeclaration>),
    VariableDeclarations(Arc<VariableDeclarations>),
    MethodInvocation(Arc<MethodInvocation>),
    Annotation(Arc<Annotation>),
    Identifier(Identifier),
    Raw(Arc<RawStatement>),
}

impl J {
    /// Returns the kind tag of the node.
    pub fn kind(&self) -> Kind {
        match self {
            Self::CompilationUnit(_) => Kind::CompilationUnit,
            Self::ClassDeclaration(_) => Kind::ClassDeclaration,
            Self::Block(_) => Kind::Block,
            Self::MethodDeclaration(_) => Kind::MethodDeclaration,
            Self::VariableDeclarations(_) => Kind::VariableDeclarations,
            Self::MethodInvocation(_) => Kind::MethodInvocation,
            Self::Annotation(_) => Kind::Annotation,
            Self::Identifier(_) => Kind::Identifier,
            Self::Raw(_) => Kind::Raw,
        }
    }

    /// Returns the identity of the node.
    pub fn id(&self) -> NodeId {
        match self {
            Self::CompilationUnit(n) => n.id,
            Self::ClassDeclaration(n) => n.id,
            Self::Block(n) => n.id,
            Self::MethodDeclaration(n) => n.id,
            Self::VariableDeclarations(n) => n.id,
            Self::MethodInvocation(n) => n.id,
            Self::Annotation(n) => n.id,
            Self::Identifier(n) => n.id,
            Self::Raw(n) => n.id,
        }
    }

    /// Returns the whitespace prefix of the node.
    pub fn prefix(&self) -> &Space {
        match self {
            Self::CompilationUnit(n) => &n.prefix,
            Self::ClassDeclaration(n) => &n.prefix,
            Self::Block(n) => &n.prefix,
            Self::MethodDeclaration(n) => &n.prefix,
            Self::VariableDeclarations(n) => &n.prefix,
            Self::MethodInvocation(n) => &n.prefix,
            Self::Annotation(n) => &n.prefix,
            Self::Identifier(n) => &n.prefix,
            Self::Raw(n) => &n.prefix,
        }
    }

    /// Returns the resolved type of the node, if the node has one.
    ///
    /// Identifiers report their own type, annotations the annotation type and
    /// variable declarations their declared type.
    pub fn java_type(&self) -> Option<&JavaType> {
        match self {
            Self::Identifier(n) => n.ty.as_ref(),
            Self::Annotation(n) => n.name.ty.as_ref(),
            Self::VariableDeclarations(n) => n.type_expr.ty.as_ref(),
            Self::ClassDeclaration(n) => n.ty.as_ref(),
            _ => None,
        }
    }
}

impl From<Statement> for J {
    fn from(statement: Statement) -> Self {
        match statement {
            Statement::Class(n) => Self::ClassDeclaration(n),
            Statement::Method(n) => Self::MethodDeclaration(n),
            Statement::Variables(n) => Self::VariableDeclarations(n),
            Statement::Invocation(n) => Self::MethodInvocation(n),
            Statement::Raw(n) => Self::Raw(n),
        }
    }
}

impl std::fmt::Display for J {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompilationUnit(n) => write!(f, "{n}"),
            Self::ClassDeclaration(n) => write!(f, "{n}"),
            Self::Block(n) => write!(f, "{n}"),
            Self::MethodDeclaration(n) => write!(f, "{n}"),
            Self::VariableDeclarations(n) => write!(f, "{n}"),
            Self::MethodInvocation(n) => write!(f, "{n}"),
            Self::Annotation(n) => write!(f, "{n}"),
            Self::Identifier(n) => write!(f, "{n}"),
            Self::Raw(n) => write!(f, "{n}"),
        }
    }
}
