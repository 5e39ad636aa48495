//! Code synthesis from Java snippets with typed placeholders.
//!
//! A template is a snippet of Java source in which `#{any(fqn)}` marks a
//! position filled at apply time by an existing tree fragment of type `fqn`
//! (`#{}` accepts a fragment of any type). Building a template parses the
//! snippet once, against a symbol environment made only of the template's
//! own imports, and fixes its shape:
//!
//! - a **type reference** such as `IOException`,
//! - class **members** such as a method declaration, or
//! - method body **statements** such as `#{any(a.B)}.close();`.
//!
//! ```rust
//! use rewrite_dsl::transform::template::{InsertionSlot, JavaTemplate};
//!
//! let template = JavaTemplate::builder("#{any(okhttp3.mockwebserver.MockWebServer)}.close();")
//!     .imports(["okhttp3.mockwebserver.MockWebServer"])
//!     .build()?;
//! assert_eq!(template.placeholder_count(), 1);
//! # Ok::<(), rewrite_dsl::error::RefactorError>(())
//! ```

use super::format::{AutoFormat, IndentFormatter};
use crate::error::{RefactorError, Result, SynthesisError};
use crate::lang::JavaParser;
use crate::tree::{
    Annotation, Block, ClassDeclaration, CompilationUnit, Cursor, Expression, Identifier, J, JavaType,
    MethodDeclaration, MethodInvocation, NamedVariable, NodeId, RawStatement, Space, Statement,
    Throws, VariableDeclarations,
};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

const PLACEHOLDER: &str = r"#\{\s*(?:any\(\s*([\w.$]*)\s*\))?\s*\}";

const WRAPPER_CLASS: &str = "__Template";

/// Where a template's fragment is spliced into the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionSlot {
    /// After the last statement of a block, class body or method body.
    LastStatement,
    /// At the end of a method's throws clause, creating the clause if needed.
    ThrowsClause,
}

impl fmt::Display for InsertionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastStatement => f.write_str("last statement"),
            Self::ThrowsClause => f.write_str("throws clause entry"),
        }
    }
}

#[derive(Debug, Clone)]
struct Placeholder {
    token: String,
    fqn: Option<String>,
}

#[derive(Debug, Clone)]
enum Shape {
    TypeReference(Identifier),
    Members(Vec<Statement>),
    Statements(Vec<Statement>),
}

impl Shape {
    fn describe(&self) -> &'static str {
        match self {
            Self::TypeReference(_) => "type reference",
            Self::Members(_) => "member",
            Self::Statements(_) => "statement",
        }
    }
}

/// A parsed, reusable code template.
#[derive(Clone)]
pub struct JavaTemplate {
    code: String,
    imports: Vec<String>,
    placeholders: Vec<Placeholder>,
    shape: Shape,
    formatter: Arc<dyn AutoFormat>,
}

impl fmt::Debug for JavaTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaTemplate")
            .field("code", &self.code)
            .field("imports", &self.imports)
            .field("shape", &self.shape.describe())
            .finish()
    }
}

/// Builder for [`JavaTemplate`].
pub struct JavaTemplateBuilder {
    code: String,
    imports: Vec<String>,
    formatter: Arc<dyn AutoFormat>,
}

impl JavaTemplateBuilder {
    /// Declares fully-qualified types the snippet refers to.
    pub fn imports(mut self, imports: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Replaces the formatter applied to every result.
    pub fn formatter(mut self, formatter: impl AutoFormat + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Parses the snippet.
    pub fn build(self) -> Result<JavaTemplate> {
        let invalid = |message: String| RefactorError::Template {
            template: self.code.clone(),
            message,
        };

        let pattern = Regex::new(PLACEHOLDER)?;
        let mut placeholders = Vec::new();
        let mut substituted = String::with_capacity(self.code.len());
        let mut last = 0;
        for captures in pattern.captures_iter(&self.code) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let fqn = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .filter(|fqn| !fqn.is_empty());
            if let Some(fqn) = &fqn
                && !self.imports.contains(fqn)
            {
                return Err(invalid(format!(
                    "placeholder type {fqn} is not among the template imports"
                )));
            }
            let token = format!("__p{}__", placeholders.len());
            substituted.push_str(&self.code[last..whole.start()]);
            substituted.push_str(&token);
            last = whole.end();
            placeholders.push(Placeholder { token, fqn });
        }
        substituted.push_str(&self.code[last..]);

        let parser = JavaParser::new().classpath(self.imports.iter().cloned());
        let header: String = self
            .imports
            .iter()
            .map(|fqn| format!("import {fqn};\n"))
            .collect();

        let shape = if is_type_name(substituted.trim()) {
            let source = format!("{header}class {WRAPPER_CLASS} {{\n{} __field;\n}}\n", substituted.trim());
            let field = parser
                .parse(&source, "__Template.java")
                .ok()
                .and_then(|cu| first_member(&cu))
                .and_then(|member| match member {
                    Statement::Variables(vd) => Some(vd.type_expr.clone()),
                    _ => None,
                });
            match field {
                Some(ty) if ty.ty.is_some() => Shape::TypeReference(ty.with_prefix(Space::EMPTY)),
                _ => {
                    return Err(invalid(format!(
                        "type {} does not resolve against the template imports",
                        substituted.trim()
                    )));
                }
            }
        } else {
            let members = format!("{header}class {WRAPPER_CLASS} {{\n{substituted}\n}}\n");
            match parser.parse(&members, "__Template.java") {
                Ok(cu) if is_members_only(&cu) => Shape::Members(class_members(&cu)),
                _ => {
                    let statements = format!(
                        "{header}class {WRAPPER_CLASS} {{\nvoid __template() {{\n{substituted}\n}}\n}}\n"
                    );
                    let cu = parser
                        .parse(&statements, "__Template.java")
                        .map_err(|e| invalid(e.to_string()))?;
                    Shape::Statements(method_statements(&cu))
                }
            }
        };

        Ok(JavaTemplate {
            code: self.code,
            imports: self.imports,
            placeholders,
            shape,
            formatter: self.formatter,
        })
    }
}

fn is_type_name(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

fn wrapper(cu: &CompilationUnit) -> Option<&Arc<ClassDeclaration>> {
    cu.classes().find(|cd| cd.name.simple_name == WRAPPER_CLASS)
}

fn first_member(cu: &CompilationUnit) -> Option<Statement> {
    wrapper(cu).and_then(|cd| cd.body.statements.first().cloned())
}

fn is_members_only(cu: &CompilationUnit) -> bool {
    wrapper(cu).is_some_and(|cd| {
        !cd.body.statements.is_empty()
            && cd
                .body
                .statements
                .iter()
                .all(|s| !matches!(s, Statement::Raw(_) | Statement::Invocation(_)))
    })
}

fn class_members(cu: &CompilationUnit) -> Vec<Statement> {
    wrapper(cu)
        .map(|cd| cd.body.statements.clone())
        .unwrap_or_default()
}

fn method_statements(cu: &CompilationUnit) -> Vec<Statement> {
    wrapper(cu)
        .and_then(|cd| {
            cd.body.statements.iter().find_map(|s| match s {
                Statement::Method(md) => md.body.as_ref().map(|b| b.statements.clone()),
                _ => None,
            })
        })
        .unwrap_or_default()
}

impl JavaTemplate {
    /// Starts a template from source text.
    pub fn builder(code: impl Into<String>) -> JavaTemplateBuilder {
        JavaTemplateBuilder {
            code: code.into(),
            imports: Vec::new(),
            formatter: Arc::new(IndentFormatter),
        }
    }

    /// The snippet as written.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Fully-qualified types the snippet refers to.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// Splices the template into the node at the cursor.
    ///
    /// `args` fill the placeholders in order. The node at the cursor is not
    /// modified; the returned node is a formatted copy with the fragment in
    /// place.
    pub fn apply(
        &self,
        cursor: &Cursor,
        slot: InsertionSlot,
        args: &[J],
    ) -> std::result::Result<J, SynthesisError> {
        let target = cursor.value().ok_or(SynthesisError::NoTarget)?;
        self.check_arguments(args)?;

        let incompatible = || SynthesisError::IncompatibleSlot {
            slot: format!("{} {}", self.shape.describe(), slot),
            target: target.kind().to_string(),
        };

        let after = match (slot, target) {
            (InsertionSlot::LastStatement, J::ClassDeclaration(cd)) => {
                let members = self.members(args).ok_or_else(incompatible)?;
                J::ClassDeclaration(Arc::new(cd.with_body(append(&cd.body, members))))
            }
            (InsertionSlot::LastStatement, J::Block(block)) => {
                let in_class = matches!(cursor.parent_value(), Some(J::ClassDeclaration(_)));
                let fragment = if in_class {
                    self.members(args)
                } else {
                    self.statements(args)
                };
                J::Block(append(block, fragment.ok_or_else(incompatible)?))
            }
            (InsertionSlot::LastStatement, J::MethodDeclaration(md)) => {
                let body = md.body.as_ref().ok_or_else(incompatible)?;
                let statements = self.statements(args).ok_or_else(incompatible)?;
                J::MethodDeclaration(Arc::new(md.with_body(Some(append(body, statements)))))
            }
            (InsertionSlot::ThrowsClause, J::MethodDeclaration(md)) => {
                let Shape::TypeReference(ty) = &self.shape else {
                    return Err(incompatible());
                };
                J::MethodDeclaration(Arc::new(add_thrown(md, ty)))
            }
            _ => return Err(incompatible()),
        };

        Ok(self.formatter.format(target, after, cursor))
    }

    fn check_arguments(&self, args: &[J]) -> std::result::Result<(), SynthesisError> {
        if args.len() != self.placeholders.len() {
            return Err(SynthesisError::ArgumentCount {
                expected: self.placeholders.len(),
                actual: args.len(),
            });
        }
        for (index, (placeholder, arg)) in self.placeholders.iter().zip(args).enumerate() {
            let Some(expected) = &placeholder.fqn else {
                continue;
            };
            if !arg.java_type().is_some_and(|ty| ty.is_class(expected)) {
                return Err(SynthesisError::PlaceholderType {
                    index,
                    expected: expected.clone(),
                    actual: arg
                        .java_type()
                        .map(JavaType::to_string)
                        .unwrap_or_else(|| "<unresolved>".to_string()),
                });
            }
        }
        Ok(())
    }

    fn members(&self, args: &[J]) -> Option<Vec<Statement>> {
        match &self.shape {
            Shape::Members(members) => Some(self.instantiate(members, args)),
            _ => None,
        }
    }

    fn statements(&self, args: &[J]) -> Option<Vec<Statement>> {
        match &self.shape {
            Shape::Statements(statements) => Some(self.instantiate(statements, args)),
            Shape::Members(members)
                if members.iter().all(|m| matches!(m, Statement::Variables(_))) =>
            {
                Some(self.instantiate(members, args))
            }
            _ => None,
        }
    }

    fn instantiate(&self, statements: &[Statement], args: &[J]) -> Vec<Statement> {
        let bindings: Vec<(&str, &J)> = self
            .placeholders
            .iter()
            .map(|p| p.token.as_str())
            .zip(args)
            .collect();
        let fill = Fill { bindings };
        statements.iter().map(|s| fill.statement(s)).collect()
    }
}

fn append(block: &Arc<Block>, statements: Vec<Statement>) -> Arc<Block> {
    let mut all = block.statements.clone();
    all.extend(statements);
    Arc::new(block.with_statements(all))
}

fn add_thrown(md: &MethodDeclaration, ty: &Identifier) -> MethodDeclaration {
    let entry = Identifier {
        id: NodeId::next(),
        ..ty.with_prefix(Space::single())
    };
    let throws = match &md.throws {
        Some(throws) => {
            let mut types = throws.types.clone();
            types.push(entry);
            Throws {
                prefix: throws.prefix.clone(),
                types,
            }
        }
        None => Throws {
            prefix: Space::single(),
            types: vec![entry],
        },
    };
    md.with_throws(Some(throws))
}

/// Copies template statements with fresh node ids and placeholders filled.
struct Fill<'a> {
    bindings: Vec<(&'a str, &'a J)>,
}

impl Fill<'_> {
    fn binding(&self, token: &str) -> Option<&J> {
        self.bindings
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, arg)| *arg)
    }

    /// Source text of a bound fragment without its prefix.
    fn source(arg: &J) -> String {
        match arg {
            J::Identifier(ident) => ident.simple_name.clone(),
            other => other.to_string().trim_start().to_string(),
        }
    }

    fn text(&self, text: &str) -> String {
        self.bindings
            .iter()
            .fold(text.to_string(), |text, (token, arg)| {
                text.replace(token, &Self::source(arg))
            })
    }

    fn identifier(&self, ident: &Identifier) -> Identifier {
        match self.binding(&ident.simple_name) {
            Some(arg) => Identifier {
                id: NodeId::next(),
                prefix: ident.prefix.clone(),
                simple_name: Self::source(arg),
                ty: arg.java_type().cloned(),
            },
            None => Identifier {
                id: NodeId::next(),
                simple_name: self.text(&ident.simple_name),
                ..ident.clone()
            },
        }
    }

    fn expression(&self, expression: &Expression) -> Expression {
        match expression {
            Expression::Identifier(ident) => match self.binding(&ident.simple_name) {
                Some(J::Identifier(_)) | None => Expression::Identifier(self.identifier(ident)),
                Some(arg) => Expression::Raw {
                    prefix: ident.prefix.clone(),
                    text: Self::source(arg),
                },
            },
            Expression::Raw { prefix, text } => Expression::Raw {
                prefix: prefix.clone(),
                text: self.text(text),
            },
        }
    }

    fn annotation(&self, annotation: &Annotation) -> Annotation {
        Annotation {
            id: NodeId::next(),
            prefix: annotation.prefix.clone(),
            name: self.identifier(&annotation.name),
            arguments: annotation.arguments.as_deref().map(|a| self.text(a)),
        }
    }

    fn block(&self, block: &Block) -> Arc<Block> {
        Arc::new(Block {
            id: NodeId::next(),
            prefix: block.prefix.clone(),
            statements: block.statements.iter().map(|s| self.statement(s)).collect(),
            end: block.end.clone(),
        })
    }

    fn statement(&self, statement: &Statement) -> Statement {
        match statement {
            Statement::Class(cd) => Statement::Class(Arc::new(ClassDeclaration {
                id: NodeId::next(),
                leading_annotations: cd.leading_annotations.iter().map(|a| self.annotation(a)).collect(),
                name: self.identifier(&cd.name),
                header: self.text(&cd.header),
                body: self.block(&cd.body),
                ..cd.as_ref().clone()
            })),
            Statement::Method(md) => Statement::Method(Arc::new(MethodDeclaration {
                id: NodeId::next(),
                leading_annotations: md.leading_annotations.iter().map(|a| self.annotation(a)).collect(),
                return_type: self.identifier(&md.return_type),
                name: self.identifier(&md.name),
                parameters: self.text(&md.parameters),
                throws: md.throws.as_ref().map(|t| Throws {
                    prefix: t.prefix.clone(),
                    types: t.types.iter().map(|ty| self.identifier(ty)).collect(),
                }),
                body: md.body.as_ref().map(|b| self.block(b)),
                ..md.as_ref().clone()
            })),
            Statement::Variables(vd) => Statement::Variables(Arc::new(VariableDeclarations {
                id: NodeId::next(),
                leading_annotations: vd.leading_annotations.iter().map(|a| self.annotation(a)).collect(),
                type_expr: self.identifier(&vd.type_expr),
                variables: vd
                    .variables
                    .iter()
                    .map(|v| NamedVariable {
                        id: NodeId::next(),
                        prefix: v.prefix.clone(),
                        name: self.identifier(&v.name),
                        initializer: v.initializer.as_deref().map(|i| self.text(i)),
                    })
                    .collect(),
                ..vd.as_ref().clone()
            })),
            Statement::Invocation(mi) => Statement::Invocation(Arc::new(MethodInvocation {
                id: NodeId::next(),
                select: mi.select.as_ref().map(|e| self.expression(e)),
                name: self.identifier(&mi.name),
                arguments: self.text(&mi.arguments),
                ..mi.as_ref().clone()
            })),
            Statement::Raw(raw) => Statement::Raw(Arc::new(RawStatement {
                id: NodeId::next(),
                prefix: raw.prefix.clone(),
                text: self.text(&raw.text),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Kind;

    const SERVER: &str = "okhttp3.mockwebserver.MockWebServer";

    fn parse(source: &str) -> Arc<CompilationUnit> {
        JavaParser::new().parse(source, "A.java").unwrap()
    }

    fn server() -> J {
        J::Identifier(Identifier::new("server", Some(JavaType::class(SERVER))))
    }

    fn close() -> JavaTemplate {
        JavaTemplate::builder(format!("#{{any({SERVER})}}.close();"))
            .imports([SERVER])
            .build()
            .unwrap()
    }

    fn after_each() -> JavaTemplate {
        JavaTemplate::builder(format!(
            "@AfterEach\nvoid afterEachTest() throws IOException {{#{{any({SERVER})}}.close();\n}}"
        ))
        .imports(["org.junit.jupiter.api.AfterEach", "java.io.IOException", SERVER])
        .build()
        .unwrap()
    }

    fn io_exception() -> JavaTemplate {
        JavaTemplate::builder("IOException")
            .imports(["java.io.IOException"])
            .build()
            .unwrap()
    }

    fn method_cursor(cu: &Arc<CompilationUnit>, index: usize) -> Cursor {
        let class = cu.classes().next().unwrap();
        let Statement::Method(md) = &class.body.statements[index] else {
            panic!("expected a method");
        };
        let mut cursor = Cursor::new();
        cursor.push(J::ClassDeclaration(class.clone()));
        cursor.push(J::MethodDeclaration(md.clone()));
        cursor
    }

    #[test]
    fn test_shapes() {
        assert_eq!(close().shape.describe(), "statement");
        assert_eq!(after_each().shape.describe(), "member");
        assert_eq!(io_exception().shape.describe(), "type reference");
    }

    #[test]
    fn test_placeholder_type_must_be_imported() {
        let err = JavaTemplate::builder(format!("#{{any({SERVER})}}.close();"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RefactorError::Template { .. }));
    }

    #[test]
    fn test_unresolved_type_reference_is_rejected() {
        let err = JavaTemplate::builder("IOException").build().unwrap_err();
        assert!(err.to_string().contains("does not resolve"));
    }

    #[test]
    fn test_invalid_snippet_is_rejected() {
        assert!(JavaTemplate::builder("void (").build().is_err());
    }

    #[test]
    fn test_append_member_to_class() {
        let cu = parse("class A {\n    MockWebServer server;\n}\n");
        let class = cu.classes().next().unwrap().clone();
        let mut cursor = Cursor::new();
        cursor.push(J::ClassDeclaration(class.clone()));

        let out = after_each()
            .apply(&cursor, InsertionSlot::LastStatement, &[server()])
            .unwrap();

        assert_eq!(
            out.to_string(),
            "class A {\n    MockWebServer server;\n\n    @AfterEach\n    void afterEachTest() throws IOException {\n        server.close();\n    }\n}"
        );
        assert_eq!(class.body.statements.len(), 1);
        let J::ClassDeclaration(out) = out else {
            panic!("expected a class");
        };
        let Statement::Method(md) = &out.body.statements[1] else {
            panic!("expected a method");
        };
        assert_eq!(
            md.leading_annotations[0].name.ty,
            Some(JavaType::class("org.junit.jupiter.api.AfterEach"))
        );
        assert_eq!(
            md.thrown_types()[0].ty,
            Some(JavaType::class("java.io.IOException"))
        );
    }

    #[test]
    fn test_append_statement_to_method() {
        let cu = parse("class A {\n    void tearDown() {\n        log();\n    }\n}\n");
        let cursor = method_cursor(&cu, 0);

        let out = close()
            .apply(&cursor, InsertionSlot::LastStatement, &[server()])
            .unwrap();

        assert_eq!(
            out.to_string(),
            "\n    void tearDown() {\n        log();\n        server.close();\n    }"
        );
        let J::MethodDeclaration(md) = out else {
            panic!("expected a method");
        };
        let Some(Statement::Invocation(mi)) = md.body.as_ref().unwrap().statements.last() else {
            panic!("expected an invocation");
        };
        assert_eq!(
            mi.select.as_ref().and_then(Expression::java_type),
            Some(&JavaType::class(SERVER))
        );
    }

    #[test]
    fn test_throws_clause_created_and_extended() {
        let cu = parse("class A {\n    void a() {}\n    void b() throws Exception {}\n}\n");
        let template = io_exception();

        let a = template
            .apply(&method_cursor(&cu, 0), InsertionSlot::ThrowsClause, &[])
            .unwrap();
        let b = template
            .apply(&method_cursor(&cu, 1), InsertionSlot::ThrowsClause, &[])
            .unwrap();

        assert_eq!(a.to_string(), "\n    void a() throws IOException {}");
        assert_eq!(b.to_string(), "\n    void b() throws Exception, IOException {}");
    }

    #[test]
    fn test_placeholder_type_mismatch() {
        let cu = parse("class A {\n    void tearDown() {}\n}\n");
        let wrong = J::Identifier(Identifier::new("s", Some(JavaType::class("java.lang.String"))));
        let untyped = J::Identifier(Identifier::new("s", None));

        let err = close()
            .apply(&method_cursor(&cu, 0), InsertionSlot::LastStatement, &[wrong])
            .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::PlaceholderType {
                index: 0,
                expected: SERVER.into(),
                actual: "java.lang.String".into(),
            }
        );
        assert!(matches!(
            close().apply(&method_cursor(&cu, 0), InsertionSlot::LastStatement, &[untyped]),
            Err(SynthesisError::PlaceholderType { .. })
        ));
    }

    #[test]
    fn test_argument_count() {
        let cu = parse("class A {\n    void tearDown() {}\n}\n");
        let err = close()
            .apply(&method_cursor(&cu, 0), InsertionSlot::LastStatement, &[])
            .unwrap_err();
        assert_eq!(err, SynthesisError::ArgumentCount { expected: 1, actual: 0 });
    }

    #[test]
    fn test_incompatible_slots() {
        let cu = parse("abstract class A {\n    abstract void tearDown();\n}\n");
        let class = cu.classes().next().unwrap().clone();
        let mut class_cursor = Cursor::new();
        class_cursor.push(J::ClassDeclaration(class));

        let statement_into_class = close().apply(&class_cursor, InsertionSlot::LastStatement, &[server()]);
        let throws_into_class = io_exception().apply(&class_cursor, InsertionSlot::ThrowsClause, &[]);
        let into_abstract = close().apply(&method_cursor(&cu, 0), InsertionSlot::LastStatement, &[server()]);

        for result in [statement_into_class, throws_into_class, into_abstract] {
            assert!(matches!(result, Err(SynthesisError::IncompatibleSlot { .. })));
        }
        assert!(matches!(
            close().apply(&Cursor::new(), InsertionSlot::LastStatement, &[server()]),
            Err(SynthesisError::NoTarget)
        ));
    }

    #[test]
    fn test_apply_does_not_touch_target() {
        let cu = parse("class A {\n    void tearDown() {}\n}\n");
        let cursor = method_cursor(&cu, 0);
        let before = cu.to_string();

        close()
            .apply(&cursor, InsertionSlot::LastStatement, &[server()])
            .unwrap();

        assert_eq!(cu.to_string(), before);
        assert_eq!(cursor.value().map(J::kind), Some(Kind::MethodDeclaration));
    }
}
