//! Node definitions.

use super::{JavaType, NodeId, Space};
use std::path::PathBuf;
use std::sync::Arc;

/// A parsed `.java` file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub prefix: Space,
    pub source_path: PathBuf,
    pub package: Option<Package>,
    pub imports: Vec<Import>,
    pub types: Vec<Statement>,
    pub eof: Space,
}

impl CompilationUnit {
    pub fn with_imports(&self, imports: Vec<Import>) -> Self {
        Self {
            imports,
            ..self.clone()
        }
    }

    pub fn with_types(&self, types: Vec<Statement>) -> Self {
        Self {
            types,
            ..self.clone()
        }
    }

    /// Returns the package name, or an empty string for the default package.
    pub fn package_name(&self) -> &str {
        self.package.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Returns the top-level class and interface declarations.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDeclaration>> {
        self.types.iter().filter_map(|s| match s {
            Statement::Class(cd) => Some(cd),
            _ => None,
        })
    }
}

/// `package a.b.c;`
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: NodeId,
    pub prefix: Space,
    /// The dotted package name.
    pub name: String,
    /// The declaration as written, including the trailing semicolon.
    pub text: String,
}

/// `import [static] a.b.C;`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub id: NodeId,
    pub prefix: Space,
    pub is_static: bool,
    /// Qualified name, ending in `.*` for on-demand imports.
    pub qualid: String,
}

impl Import {
    /// Creates a single-type import with an empty prefix.
    pub fn new(qualid: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            is_static: false,
            qualid: qualid.into(),
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }

    /// Returns true for `import a.b.*;`.
    pub fn is_wildcard(&self) -> bool {
        self.qualid.ends_with(".*")
    }

    /// The package part of the import (`a.b` for `a.b.C` and `a.b.*`).
    pub fn package_name(&self) -> &str {
        self.qualid
            .rsplit_once('.')
            .map(|(pkg, _)| pkg)
            .unwrap_or("")
    }

    /// The last segment of the import (`C` for `a.b.C`).
    pub fn type_name(&self) -> &str {
        self.qualid
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.qualid)
    }
}

/// Whether a type declaration is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

/// A modifier keyword (`public`, `static`, ...) or any other token that sits
/// among the modifiers, such as type parameters or an annotation written
/// after a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub prefix: Space,
    pub keyword: String,
}

/// A name, optionally carrying the type it resolves to.
///
/// Used for declaration names, type references, annotation names and
/// variable references.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub prefix: Space,
    pub simple_name: String,
    pub ty: Option<JavaType>,
}

impl Identifier {
    pub fn new(simple_name: impl Into<String>, ty: Option<JavaType>) -> Self {
        Self {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            simple_name: simple_name.into(),
            ty,
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }

    pub fn with_type(&self, ty: Option<JavaType>) -> Self {
        Self {
            ty,
            ..self.clone()
        }
    }
}

/// `@Name` or `@Name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: NodeId,
    pub prefix: Space,
    pub name: Identifier,
    /// Argument list as written, including the parentheses.
    pub arguments: Option<String>,
}

impl Annotation {
    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub id: NodeId,
    pub prefix: Space,
    pub leading_annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub kind: ClassKind,
    pub kind_prefix: Space,
    pub name: Identifier,
    /// Type parameters, `extends` and `implements` clauses as written.
    pub header: String,
    pub body: Arc<Block>,
    pub ty: Option<JavaType>,
}

impl ClassDeclaration {
    pub fn with_body(&self, body: Arc<Block>) -> Self {
        Self {
            body,
            ..self.clone()
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }
}

/// `{ ... }`, used for class bodies and method bodies alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub prefix: Space,
    pub statements: Vec<Statement>,
    /// Whitespace before the closing brace.
    pub end: Space,
}

impl Block {
    pub fn with_statements(&self, statements: Vec<Statement>) -> Self {
        Self {
            statements,
            ..self.clone()
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }

    pub fn with_end(&self, end: Space) -> Self {
        Self {
            end,
            ..self.clone()
        }
    }
}

/// A member of a class body or a statement of a method body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Class(Arc<ClassDeclaration>),
    Method(Arc<MethodDeclaration>),
    Variables(Arc<VariableDeclarations>),
    Invocation(Arc<MethodInvocation>),
    /// Anything the lowering keeps as text: constructors, control flow,
    /// initializers, enums, records.
    Raw(Arc<RawStatement>),
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Class(n) => n.id,
            Self::Method(n) => n.id,
            Self::Variables(n) => n.id,
            Self::Invocation(n) => n.id,
            Self::Raw(n) => n.id,
        }
    }

    pub fn prefix(&self) -> &Space {
        match self {
            Self::Class(n) => &n.prefix,
            Self::Method(n) => &n.prefix,
            Self::Variables(n) => &n.prefix,
            Self::Invocation(n) => &n.prefix,
            Self::Raw(n) => &n.prefix,
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Self {
        match self {
            Self::Class(n) => Self::Class(Arc::new(n.with_prefix(prefix))),
            Self::Method(n) => Self::Method(Arc::new(n.with_prefix(prefix))),
            Self::Variables(n) => Self::Variables(Arc::new(n.with_prefix(prefix))),
            Self::Invocation(n) => Self::Invocation(Arc::new(n.with_prefix(prefix))),
            Self::Raw(n) => Self::Raw(Arc::new(RawStatement {
                prefix,
                ..n.as_ref().clone()
            })),
        }
    }

    /// Returns true if both statements are the same allocation.
    pub fn ptr_eq(&self, other: &Statement) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) => Arc::ptr_eq(a, b),
            (Self::Method(a), Self::Method(b)) => Arc::ptr_eq(a, b),
            (Self::Variables(a), Self::Variables(b)) => Arc::ptr_eq(a, b),
            (Self::Invocation(a), Self::Invocation(b)) => Arc::ptr_eq(a, b),
            (Self::Raw(a), Self::Raw(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A field or local variable declaration: `@A private final T a = x, b;`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarations {
    pub id: NodeId,
    pub prefix: Space,
    pub leading_annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub type_expr: Identifier,
    pub variables: Vec<NamedVariable>,
    /// Whitespace before the terminating semicolon.
    pub terminator: Space,
}

impl VariableDeclarations {
    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }

    /// Keeps the leading annotations for which `keep` returns true.
    ///
    /// When the first annotation goes, the element that now leads the
    /// declaration loses its own prefix so the declaration keeps starting at
    /// its original position.
    pub fn retain_annotations(&self, keep: impl Fn(&Annotation) -> bool) -> Self {
        let first_removed = self.leading_annotations.first().is_some_and(|a| !keep(a));
        let mut next = Self {
            leading_annotations: self
                .leading_annotations
                .iter()
                .filter(|a| keep(*a))
                .cloned()
                .collect(),
            ..self.clone()
        };
        if first_removed {
            if let Some(annotation) = next.leading_annotations.first_mut() {
                annotation.prefix = Space::EMPTY;
            } else if let Some(modifier) = next.modifiers.first_mut() {
                modifier.prefix = Space::EMPTY;
            } else {
                next.type_expr.prefix = Space::EMPTY;
            }
        }
        next
    }
}

/// One declarator of a [`VariableDeclarations`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamedVariable {
    pub id: NodeId,
    pub prefix: Space,
    pub name: Identifier,
    /// Dimensions and initializer as written, e.g. ` = new Foo()`.
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub id: NodeId,
    pub prefix: Space,
    pub leading_annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub return_type: Identifier,
    pub name: Identifier,
    /// Formal parameters as written, including surrounding whitespace.
    pub parameters: String,
    pub throws: Option<Throws>,
    /// `None` for abstract and interface methods.
    pub body: Option<Arc<Block>>,
    /// Whitespace before the `;` of a method without body.
    pub terminator: Space,
}

impl MethodDeclaration {
    pub fn with_body(&self, body: Option<Arc<Block>>) -> Self {
        Self {
            body,
            ..self.clone()
        }
    }

    pub fn with_throws(&self, throws: Option<Throws>) -> Self {
        Self {
            throws,
            ..self.clone()
        }
    }

    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }

    /// Types listed in the throws clause.
    pub fn thrown_types(&self) -> &[Identifier] {
        self.throws.as_ref().map(|t| t.types.as_slice()).unwrap_or(&[])
    }
}

/// `throws A, B`
#[derive(Debug, Clone, PartialEq)]
pub struct Throws {
    /// Whitespace before the `throws` keyword.
    pub prefix: Space,
    pub types: Vec<Identifier>,
}

/// An expression statement calling a method: `select.name(arguments);`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInvocation {
    pub id: NodeId,
    pub prefix: Space,
    pub select: Option<Expression>,
    /// Whitespace before the `.` that follows the select.
    pub dot_prefix: Space,
    pub name: Identifier,
    /// Argument list as written, including parentheses.
    pub arguments: String,
    pub terminator: Space,
}

impl MethodInvocation {
    pub fn with_prefix(&self, prefix: Space) -> Self {
        Self {
            prefix,
            ..self.clone()
        }
    }
}

/// The receiver of a method invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Raw { prefix: Space, text: String },
}

impl Expression {
    pub fn java_type(&self) -> Option<&JavaType> {
        match self {
            Self::Identifier(ident) => ident.ty.as_ref(),
            Self::Raw { .. } => None,
        }
    }
}

/// Source text kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    pub id: NodeId,
    pub prefix: Space,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(name: &str, fqn: &str, prefix: &str) -> Annotation {
        Annotation {
            id: NodeId::next(),
            prefix: Space::format(prefix),
            name: Identifier::new(name, Some(JavaType::class(fqn))),
            arguments: None,
        }
    }

    fn field(annotations: Vec<Annotation>, modifiers: Vec<Modifier>) -> VariableDeclarations {
        VariableDeclarations {
            id: NodeId::next(),
            prefix: Space::format("\n    "),
            leading_annotations: annotations,
            modifiers,
            type_expr: Identifier::new("Foo", None).with_prefix(Space::single()),
            variables: Vec::new(),
            terminator: Space::EMPTY,
        }
    }

    #[test]
    fn test_import_segments() {
        let import = Import::new("org.junit.Rule");
        assert_eq!(import.package_name(), "org.junit");
        assert_eq!(import.type_name(), "Rule");
        assert!(!import.is_wildcard());
        assert!(Import::new("org.junit.*").is_wildcard());
    }

    #[test]
    fn test_retain_annotations_hoists_prefix_to_modifier() {
        let decl = field(
            vec![annotation("Rule", "org.junit.Rule", "")],
            vec![Modifier {
                prefix: Space::format("\n    "),
                keyword: "public".into(),
            }],
        );

        let stripped = decl.retain_annotations(|a| a.name.simple_name != "Rule");

        assert!(stripped.leading_annotations.is_empty());
        assert_eq!(stripped.modifiers[0].prefix, Space::EMPTY);
        assert_eq!(stripped.id, decl.id);
    }

    #[test]
    fn test_retain_annotations_keeps_later_prefixes() {
        let decl = field(
            vec![
                annotation("Deprecated", "java.lang.Deprecated", ""),
                annotation("Rule", "org.junit.Rule", "\n    "),
            ],
            Vec::new(),
        );

        let stripped = decl.retain_annotations(|a| a.name.simple_name != "Rule");

        assert_eq!(stripped.leading_annotations.len(), 1);
        assert_eq!(stripped.type_expr.prefix, Space::single());
    }

    #[test]
    fn test_with_body_shares_untouched_children() {
        let body = Arc::new(Block {
            id: NodeId::next(),
            prefix: Space::single(),
            statements: Vec::new(),
            end: Space::EMPTY,
        });
        let class = ClassDeclaration {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            leading_annotations: Vec::new(),
            modifiers: Vec::new(),
            kind: ClassKind::Class,
            kind_prefix: Space::EMPTY,
            name: Identifier::new("A", None).with_prefix(Space::single()),
            header: String::new(),
            body: body.clone(),
            ty: None,
        };

        let new_body = Arc::new(body.with_end(Space::format("\n")));
        let edited = class.with_body(new_body.clone());

        assert_eq!(edited.id, class.id);
        assert!(Arc::ptr_eq(&edited.body, &new_body));
        assert!(Arc::ptr_eq(&class.body, &body));
    }
}
