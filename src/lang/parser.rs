//! Lowering of tree-sitter-java parse trees into the lossless [`tree`](crate::tree).
//!
//! The lowering walks the concrete syntax tree with a byte position that only
//! moves forward. Everything between the position and the start of the next
//! node becomes that node's [`Space`] prefix, so comments and blank lines are
//! carried along without being modelled. Constructs the rewrite never needs
//! to look inside (constructors, control flow, records, initializers, enum
//! constants) are kept as [`RawStatement`]s.
//!
//! Type references are resolved while lowering, against the unit's imports,
//! the types it declares and the parser's [`Classpath`].

use super::types::{Classpath, TypeResolver, dimensions};
use super::{Java, Language};
use crate::error::{RefactorError, Result};
use crate::tree::{
    Annotation, Block, ClassDeclaration, ClassKind, CompilationUnit, Expression, Identifier,
    Import, JavaType, MethodDeclaration, MethodInvocation, Modifier, NamedVariable, NodeId,
    Package, RawStatement, Space, Statement, Throws, VariableDeclarations,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tree_sitter::Node;

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Parses Java source into resolved compilation units.
///
/// # Example
///
/// ```rust
/// use rewrite_dsl::lang::JavaParser;
///
/// let parser = JavaParser::new().classpath(["org.junit.Rule"]);
/// let cu = parser.parse("import org.junit.*;\nclass A {\n    @Rule int x;\n}\n", "A.java")?;
///
/// assert_eq!(cu.to_string(), "import org.junit.*;\nclass A {\n    @Rule int x;\n}\n");
/// # Ok::<(), rewrite_dsl::error::RefactorError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct JavaParser {
    classpath: Arc<Classpath>,
}

impl JavaParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser sharing an existing classpath.
    pub fn with_classpath(classpath: Arc<Classpath>) -> Self {
        Self { classpath }
    }

    /// Adds fully-qualified type names to the classpath.
    pub fn classpath(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Arc::make_mut(&mut self.classpath).extend(types);
        self
    }

    /// Parses one compilation unit.
    ///
    /// Fails with [`RefactorError::Parse`] if the source has syntax errors.
    pub fn parse(&self, source: &str, path: impl AsRef<Path>) -> Result<Arc<CompilationUnit>> {
        let path = path.as_ref();
        let tree = Java.parse(source).map_err(|e| match e {
            RefactorError::Parse { message, .. } => RefactorError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        let root = tree.root_node();

        if root.has_error() {
            let message = first_error(root)
                .map(|node| {
                    let at = node.start_position();
                    format!("syntax error at line {}, column {}", at.row + 1, at.column + 1)
                })
                .unwrap_or_else(|| "syntax error".to_string());
            return Err(RefactorError::Parse {
                path: path.to_path_buf(),
                message,
            });
        }

        let mut lowering = Lowering {
            src: source,
            pos: 0,
            resolver: resolver_for(root, source, &self.classpath),
            scopes: Vec::new(),
        };
        Ok(Arc::new(lowering.compilation_unit(root, path)))
    }
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i as u32))
        .filter(|child| !child.is_extra())
        .collect()
}

fn find_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    children(node).into_iter().find(|child| child.kind() == kind)
}

fn node_text<'s>(src: &'s str, node: Node<'_>) -> &'s str {
    &src[node.start_byte()..node.end_byte()]
}

fn is_annotation(node: Node<'_>) -> bool {
    matches!(node.kind(), "marker_annotation" | "annotation")
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    (0..node.child_count())
        .filter_map(|i| node.child(i as u32))
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn resolver_for<'c>(root: Node<'_>, src: &str, classpath: &'c Classpath) -> TypeResolver<'c> {
    let package = find_child(root, "package_declaration")
        .and_then(|p| {
            children(p)
                .into_iter()
                .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
        })
        .map(|name| node_text(src, name).to_string())
        .unwrap_or_default();

    let mut resolver = TypeResolver::new(package, classpath);
    for import in children(root)
        .into_iter()
        .filter(|c| c.kind() == "import_declaration")
    {
        if find_child(import, "static").is_none() {
            resolver.import(&import_name(src, import));
        }
    }
    declare_types(&mut resolver, root, src, "");
    resolver
}

fn declare_types(resolver: &mut TypeResolver<'_>, node: Node<'_>, src: &str, outer: &str) {
    for child in children(node) {
        if child.kind() == "enum_body_declarations" {
            declare_types(resolver, child, src, outer);
            continue;
        }
        if !TYPE_DECLARATIONS.contains(&child.kind()) {
            continue;
        }
        let Some(name) = child.child_by_field_name("name") else {
            continue;
        };
        let qualified = nested_name(outer, node_text(src, name));
        resolver.declare(&qualified);
        if let Some(body) = child.child_by_field_name("body") {
            declare_types(resolver, body, src, &qualified);
        }
    }
}

fn nested_name(outer: &str, name: &str) -> String {
    if outer.is_empty() {
        name.to_string()
    } else {
        format!("{outer}.{name}")
    }
}

fn import_name(src: &str, import: Node<'_>) -> String {
    children(import)
        .into_iter()
        .filter(|c| matches!(c.kind(), "identifier" | "scoped_identifier" | "." | "asterisk"))
        .map(|c| node_text(src, c))
        .collect()
}

/// What a block belongs to, which decides how its children are lowered.
#[derive(Clone, Copy)]
enum Owner<'n> {
    Class(&'n str),
    /// A method body, with the source name of the class declaring the method.
    Method(&'n str),
}

struct Lowering<'s, 'c> {
    src: &'s str,
    pos: usize,
    resolver: TypeResolver<'c>,
    scopes: Vec<HashMap<String, Option<JavaType>>>,
}

impl Lowering<'_, '_> {
    fn space(&mut self, until: usize) -> Space {
        Space::format(self.span(until))
    }

    fn span(&mut self, until: usize) -> String {
        let text = self.src.get(self.pos..until).unwrap_or_default().to_string();
        self.pos = until.max(self.pos);
        text
    }

    fn text(&mut self, node: Node<'_>) -> String {
        self.pos = node.end_byte();
        node_text(self.src, node).to_string()
    }

    fn lookup(&self, name: &str) -> Option<JavaType> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
            .flatten()
    }

    fn compilation_unit(&mut self, root: Node<'_>, path: &Path) -> CompilationUnit {
        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();

        for child in children(root) {
            match child.kind() {
                "package_declaration" => {
                    let name = children(child)
                        .into_iter()
                        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
                        .map(|n| node_text(self.src, n).to_string())
                        .unwrap_or_default();
                    package = Some(Package {
                        id: NodeId::next(),
                        prefix: self.space(child.start_byte()),
                        name,
                        text: self.text(child),
                    });
                }
                "import_declaration" => imports.push(Import {
                    id: NodeId::next(),
                    prefix: self.space(child.start_byte()),
                    is_static: find_child(child, "static").is_some(),
                    qualid: {
                        self.pos = child.end_byte();
                        import_name(self.src, child)
                    },
                }),
                "class_declaration" | "interface_declaration" | "enum_declaration" => {
                    let statement = self.or_raw(child, |l| {
                        l.class_declaration(child, "").map(Statement::Class)
                    });
                    types.push(statement);
                }
                _ => types.push(self.raw(child)),
            }
        }

        CompilationUnit {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            source_path: path.to_path_buf(),
            package,
            imports,
            types,
            eof: self.space(self.src.len()),
        }
    }

    fn or_raw(
        &mut self,
        node: Node<'_>,
        lower: impl FnOnce(&mut Self) -> Option<Statement>,
    ) -> Statement {
        let start = self.pos;
        match lower(self) {
            Some(statement) => statement,
            None => {
                self.pos = start;
                self.raw(node)
            }
        }
    }

    fn raw(&mut self, node: Node<'_>) -> Statement {
        Statement::Raw(Arc::new(RawStatement {
            id: NodeId::next(),
            prefix: self.space(node.start_byte()),
            text: self.text(node),
        }))
    }

    /// Splits a declaration's `modifiers` into leading annotations and the rest.
    fn modifiers(&mut self, declaration: Node<'_>) -> (Vec<Annotation>, Vec<Modifier>) {
        let mut annotations = Vec::new();
        let mut modifiers = Vec::new();
        let Some(node) = find_child(declaration, "modifiers") else {
            return (annotations, modifiers);
        };
        for child in children(node) {
            if is_annotation(child) && modifiers.is_empty() {
                annotations.push(self.annotation(child));
            } else {
                modifiers.push(Modifier {
                    prefix: self.space(child.start_byte()),
                    keyword: self.text(child),
                });
            }
        }
        (annotations, modifiers)
    }

    fn annotation(&mut self, node: Node<'_>) -> Annotation {
        let prefix = self.space(node.start_byte());
        self.pos = node.start_byte() + 1;
        let (name_start, name_end) = node
            .child_by_field_name("name")
            .map(|n| (n.start_byte(), n.end_byte()))
            .unwrap_or((self.pos, node.end_byte()));
        let name_prefix = self.space(name_start);
        let simple_name = self.span(name_end);
        let ty = self.resolver.resolve(&simple_name);
        let arguments = node
            .child_by_field_name("arguments")
            .map(|args| self.span(args.end_byte()));
        self.pos = node.end_byte();

        Annotation {
            id: NodeId::next(),
            prefix,
            name: Identifier {
                id: NodeId::next(),
                prefix: name_prefix,
                simple_name,
                ty,
            },
            arguments,
        }
    }

    fn class_declaration(&mut self, node: Node<'_>, outer: &str) -> Option<Arc<ClassDeclaration>> {
        let name_node = node.child_by_field_name("name")?;
        let body_node = node.child_by_field_name("body")?;
        let (kind, keyword) = match node.kind() {
            "interface_declaration" => (ClassKind::Interface, find_child(node, "interface")?),
            "enum_declaration" => (ClassKind::Enum, find_child(node, "enum")?),
            _ => (ClassKind::Class, find_child(node, "class")?),
        };
        let source_name = nested_name(outer, node_text(self.src, name_node));
        let ty = Some(JavaType::class(self.resolver.qualify(&source_name)));

        let prefix = self.space(node.start_byte());
        let (leading_annotations, modifiers) = self.modifiers(node);
        let kind_prefix = self.space(keyword.start_byte());
        self.pos = keyword.end_byte();
        let name = Identifier {
            id: NodeId::next(),
            prefix: self.space(name_node.start_byte()),
            simple_name: self.text(name_node),
            ty: ty.clone(),
        };
        let header = children(node)
            .into_iter()
            .filter(|c| {
                c.start_byte() >= name_node.end_byte() && c.end_byte() <= body_node.start_byte()
            })
            .map(|c| c.end_byte())
            .max()
            .map(|end| self.span(end))
            .unwrap_or_default();

        let fields = self.field_scope(body_node);
        self.scopes.push(fields);
        let body = if body_node.kind() == "enum_body" {
            self.enum_body(body_node, &source_name)
        } else {
            self.block(body_node, Owner::Class(&source_name))
        };
        self.scopes.pop();

        Some(Arc::new(ClassDeclaration {
            id: NodeId::next(),
            prefix,
            leading_annotations,
            modifiers,
            kind,
            kind_prefix,
            name,
            header,
            body,
            ty,
        }))
    }

    /// Field names of a class body and their declared types.
    fn field_scope(&self, body: Node<'_>) -> HashMap<String, Option<JavaType>> {
        let mut scope = HashMap::new();
        for field in children(body)
            .into_iter()
            .flat_map(|c| match c.kind() {
                "enum_body_declarations" => children(c),
                _ => vec![c],
            })
            .filter(|c| matches!(c.kind(), "field_declaration" | "constant_declaration"))
        {
            let ty = field
                .child_by_field_name("type")
                .and_then(|t| self.resolver.resolve(node_text(self.src, t)));
            for declarator in children(field)
                .into_iter()
                .filter(|c| c.kind() == "variable_declarator")
            {
                if let Some(name) = declarator.child_by_field_name("name") {
                    scope.insert(
                        node_text(self.src, name).to_string(),
                        self.declarator_type(declarator, ty.clone()),
                    );
                }
            }
        }
        scope
    }

    fn block(&mut self, node: Node<'_>, owner: Owner<'_>) -> Arc<Block> {
        let prefix = self.space(node.start_byte());
        self.pos = node.start_byte() + 1;
        let mut statements = Vec::new();
        let mut end = Space::EMPTY;

        for child in children(node) {
            match child.kind() {
                "{" => {}
                "}" => {
                    end = self.space(child.start_byte());
                    self.pos = child.end_byte();
                }
                _ => statements.push(match owner {
                    Owner::Class(name) => self.member(child, name),
                    Owner::Method(name) => self.body_statement(child, name),
                }),
            }
        }
        self.pos = node.end_byte();

        Arc::new(Block {
            id: NodeId::next(),
            prefix,
            statements,
            end,
        })
    }

    /// Lowers an enum body. The constants, up to and including the `;` that
    /// ends them, become one raw statement ahead of the members.
    fn enum_body(&mut self, node: Node<'_>, class_name: &str) -> Arc<Block> {
        let prefix = self.space(node.start_byte());
        self.pos = node.start_byte() + 1;

        let mut constants: Option<(usize, usize)> = None;
        let mut members = Vec::new();
        for child in children(node) {
            match child.kind() {
                "{" | "}" => {}
                "enum_body_declarations" => {
                    for inner in children(child) {
                        if inner.kind() == ";" {
                            let start = constants.map_or(inner.start_byte(), |(start, _)| start);
                            constants = Some((start, inner.end_byte()));
                        } else {
                            members.push(inner);
                        }
                    }
                }
                _ => {
                    let start = constants.map_or(child.start_byte(), |(start, _)| start);
                    constants = Some((start, child.end_byte()));
                }
            }
        }

        let mut statements = Vec::new();
        if let Some((start, end)) = constants {
            statements.push(Statement::Raw(Arc::new(RawStatement {
                id: NodeId::next(),
                prefix: self.space(start),
                text: self.span(end),
            })));
        }
        for member in members {
            statements.push(self.member(member, class_name));
        }
        let end = match find_child(node, "}") {
            Some(brace) => self.space(brace.start_byte()),
            None => Space::EMPTY,
        };
        self.pos = node.end_byte();

        Arc::new(Block {
            id: NodeId::next(),
            prefix,
            statements,
            end,
        })
    }

    fn member(&mut self, node: Node<'_>, class_name: &str) -> Statement {
        match node.kind() {
            "field_declaration" | "constant_declaration" => {
                self.or_raw(node, |l| l.variables(node).map(Statement::Variables))
            }
            "method_declaration" => self.or_raw(node, |l| {
                l.method(node, class_name).map(Statement::Method)
            }),
            "class_declaration" | "interface_declaration" | "enum_declaration" => {
                self.or_raw(node, |l| {
                    l.class_declaration(node, class_name).map(Statement::Class)
                })
            }
            _ => self.raw(node),
        }
    }

    fn body_statement(&mut self, node: Node<'_>, class_name: &str) -> Statement {
        match node.kind() {
            "class_declaration" | "interface_declaration" | "enum_declaration" => {
                self.or_raw(node, |l| {
                    l.class_declaration(node, class_name).map(Statement::Class)
                })
            }
            "local_variable_declaration" => {
                self.or_raw(node, |l| l.variables(node).map(Statement::Variables))
            }
            "expression_statement" => {
                self.or_raw(node, |l| l.invocation(node).map(Statement::Invocation))
            }
            _ => self.raw(node),
        }
    }

    fn variables(&mut self, node: Node<'_>) -> Option<Arc<VariableDeclarations>> {
        let type_node = node.child_by_field_name("type")?;

        let prefix = self.space(node.start_byte());
        let (leading_annotations, modifiers) = self.modifiers(node);
        let type_prefix = self.space(type_node.start_byte());
        let written = self.text(type_node);
        let ty = self.resolver.resolve(&written);
        let mut variables = Vec::new();
        let mut terminator = Space::EMPTY;

        for child in children(node)
            .into_iter()
            .filter(|c| c.start_byte() >= type_node.end_byte())
        {
            match child.kind() {
                "variable_declarator" => {
                    let (name_start, name_end) = child
                        .child_by_field_name("name")
                        .map(|n| (n.start_byte(), n.end_byte()))
                        .unwrap_or((child.start_byte(), child.end_byte()));
                    let var_prefix = self.space(name_start);
                    let simple_name = self.span(name_end);
                    let initializer =
                        (child.end_byte() > name_end).then(|| self.span(child.end_byte()));
                    variables.push(NamedVariable {
                        id: NodeId::next(),
                        prefix: var_prefix,
                        name: Identifier {
                            id: NodeId::next(),
                            prefix: Space::EMPTY,
                            simple_name,
                            ty: self.declarator_type(child, ty.clone()),
                        },
                        initializer,
                    });
                }
                "," => self.pos = child.end_byte(),
                ";" => {
                    terminator = self.space(child.start_byte());
                    self.pos = child.end_byte();
                }
                _ => {}
            }
        }

        if let Some(scope) = self.scopes.last_mut() {
            for variable in &variables {
                scope.insert(variable.name.simple_name.clone(), variable.name.ty.clone());
            }
        }

        Some(Arc::new(VariableDeclarations {
            id: NodeId::next(),
            prefix,
            leading_annotations,
            modifiers,
            type_expr: Identifier {
                id: NodeId::next(),
                prefix: type_prefix,
                simple_name: written,
                ty,
            },
            variables,
            terminator,
        }))
    }

    /// The declared type with any `name[]` dimensions of the declarator added.
    fn declarator_type(&self, declarator: Node<'_>, ty: Option<JavaType>) -> Option<JavaType> {
        match declarator.child_by_field_name("dimensions") {
            Some(dims) => ty.map(|ty| ty.array_of(dimensions(node_text(self.src, dims)))),
            None => ty,
        }
    }

    fn parameter_scope(&self, parameters: Node<'_>) -> HashMap<String, Option<JavaType>> {
        children(parameters)
            .into_iter()
            .filter(|c| c.kind() == "formal_parameter")
            .filter_map(|param| {
                let name = param.child_by_field_name("name")?;
                let ty = param
                    .child_by_field_name("type")
                    .and_then(|t| self.resolver.resolve(node_text(self.src, t)));
                Some((node_text(self.src, name).to_string(), ty))
            })
            .collect()
    }

    fn method(&mut self, node: Node<'_>, class_name: &str) -> Option<Arc<MethodDeclaration>> {
        let type_node = node.child_by_field_name("type")?;
        let name_node = node.child_by_field_name("name")?;
        let params_node = node.child_by_field_name("parameters")?;
        let body_node = node.child_by_field_name("body");
        let semicolon = match body_node {
            Some(_) => None,
            None => Some(find_child(node, ";")?),
        };

        let prefix = self.space(node.start_byte());
        let (leading_annotations, mut modifiers) = self.modifiers(node);
        if let Some(type_parameters) = node.child_by_field_name("type_parameters") {
            modifiers.push(Modifier {
                prefix: self.space(type_parameters.start_byte()),
                keyword: self.text(type_parameters),
            });
        }
        let return_prefix = self.space(type_node.start_byte());
        let written = self.text(type_node);
        let return_type = Identifier {
            id: NodeId::next(),
            prefix: return_prefix,
            ty: self.resolver.resolve(&written),
            simple_name: written,
        };
        let name = Identifier {
            id: NodeId::next(),
            prefix: self.space(name_node.start_byte()),
            simple_name: self.text(name_node),
            ty: None,
        };
        let mut parameters = self.span(params_node.end_byte());
        if let Some(dimensions) = node.child_by_field_name("dimensions") {
            parameters.push_str(&self.span(dimensions.end_byte()));
        }
        let throws = find_child(node, "throws").map(|t| self.throws(t));

        let (body, terminator) = match (body_node, semicolon) {
            (Some(body_node), _) => {
                let scope = self.parameter_scope(params_node);
                self.scopes.push(scope);
                let body = self.block(body_node, Owner::Method(class_name));
                self.scopes.pop();
                (Some(body), Space::EMPTY)
            }
            (None, Some(semicolon)) => {
                let terminator = self.space(semicolon.start_byte());
                self.pos = semicolon.end_byte();
                (None, terminator)
            }
            (None, None) => (None, Space::EMPTY),
        };
        self.pos = node.end_byte();

        Some(Arc::new(MethodDeclaration {
            id: NodeId::next(),
            prefix,
            leading_annotations,
            modifiers,
            return_type,
            name,
            parameters,
            throws,
            body,
            terminator,
        }))
    }

    fn throws(&mut self, node: Node<'_>) -> Throws {
        let prefix = self.space(node.start_byte());
        self.pos = node.start_byte() + "throws".len();
        let mut types = Vec::new();
        for child in children(node) {
            match child.kind() {
                "throws" => {}
                "," => self.pos = child.end_byte(),
                _ => {
                    let prefix = self.space(child.start_byte());
                    let written = self.text(child);
                    types.push(Identifier {
                        id: NodeId::next(),
                        prefix,
                        ty: self.resolver.resolve(&written),
                        simple_name: written,
                    });
                }
            }
        }
        Throws { prefix, types }
    }

    /// Lowers `select.name(args);` and `name(args);`. Anything else stays raw.
    fn invocation(&mut self, node: Node<'_>) -> Option<Arc<MethodInvocation>> {
        let call = children(node).into_iter().find(|c| c.is_named())?;
        if call.kind() != "method_invocation"
            || call.child_by_field_name("type_arguments").is_some()
            || find_child(call, "super").is_some()
        {
            return None;
        }
        let name_node = call.child_by_field_name("name")?;
        let args_node = call.child_by_field_name("arguments")?;
        let semicolon = find_child(node, ";")?;
        let object = call.child_by_field_name("object");
        let dot = match object {
            Some(_) => Some(find_child(call, ".")?),
            None => None,
        };

        let prefix = self.space(node.start_byte());
        let select = object.map(|object| {
            let prefix = self.space(object.start_byte());
            let text = self.text(object);
            if object.kind() == "identifier" {
                Expression::Identifier(Identifier {
                    id: NodeId::next(),
                    prefix,
                    ty: self.lookup(&text),
                    simple_name: text,
                })
            } else {
                Expression::Raw { prefix, text }
            }
        });
        let dot_prefix = match dot {
            Some(dot) => {
                let space = self.space(dot.start_byte());
                self.pos = dot.end_byte();
                space
            }
            None => Space::EMPTY,
        };
        let name = Identifier {
            id: NodeId::next(),
            prefix: self.space(name_node.start_byte()),
            simple_name: self.text(name_node),
            ty: None,
        };
        let arguments = self.span(args_node.end_byte());
        let terminator = self.space(semicolon.start_byte());
        self.pos = node.end_byte();

        Some(Arc::new(MethodInvocation {
            id: NodeId::next(),
            prefix,
            select,
            dot_prefix,
            name,
            arguments,
            terminator,
        }))
    }
}
