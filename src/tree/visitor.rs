//! Tree-in/tree-out traversal.
//!
//! [`JavaVisitor`] has one method per node kind that has children worth
//! rewriting. Every method defaults to the matching `walk_*` function, which
//! visits the children and rebuilds the node only if one of them changed.
//! Overriding a method and calling `walk_*` from it gives pre-order code
//! before the call and post-order code after it.
//!
//! Before a `visit_*` method runs, the node is pushed onto the [`Cursor`].
//! The walk functions replace the frame's value with the rebuilt node once
//! the children are done, so post-order code sees the current shape of the
//! node through [`Cursor::value`].

use super::{
    Block, ClassDeclaration, CompilationUnit, Cursor, J, MethodDeclaration, MethodInvocation,
    Statement, VariableDeclarations,
};
use crate::context::ExecutionContext;
use std::sync::Arc;

/// Entry point of a rewrite over one compilation unit.
///
/// Returns the input `Arc` itself when nothing changed.
pub trait TreeVisitor: Send {
    fn visit(&mut self, cu: &Arc<CompilationUnit>, ctx: &ExecutionContext)
    -> Arc<CompilationUnit>;
}

pub trait JavaVisitor {
    fn visit_compilation_unit(
        &mut self,
        cu: &Arc<CompilationUnit>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<CompilationUnit> {
        walk_compilation_unit(self, cu, cursor, ctx)
    }

    fn visit_class_declaration(
        &mut self,
        cd: &Arc<ClassDeclaration>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<ClassDeclaration> {
        walk_class_declaration(self, cd, cursor, ctx)
    }

    fn visit_block(
        &mut self,
        block: &Arc<Block>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<Block> {
        walk_block(self, block, cursor, ctx)
    }

    fn visit_method_declaration(
        &mut self,
        md: &Arc<MethodDeclaration>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<MethodDeclaration> {
        walk_method_declaration(self, md, cursor, ctx)
    }

    fn visit_variable_declarations(
        &mut self,
        vd: &Arc<VariableDeclarations>,
        _cursor: &mut Cursor,
        _ctx: &ExecutionContext,
    ) -> Arc<VariableDeclarations> {
        vd.clone()
    }

    fn visit_method_invocation(
        &mut self,
        mi: &Arc<MethodInvocation>,
        _cursor: &mut Cursor,
        _ctx: &ExecutionContext,
    ) -> Arc<MethodInvocation> {
        mi.clone()
    }

    /// Visits a whole unit with a fresh cursor.
    fn visit_tree(&mut self, cu: &Arc<CompilationUnit>, ctx: &ExecutionContext) -> Arc<CompilationUnit> {
        let mut cursor = Cursor::new();
        cursor.attach(J::CompilationUnit(cu.clone()), |cursor| {
            self.visit_compilation_unit(cu, cursor, ctx)
        })
    }
}

/// Visits a statement, pushing it onto the cursor first.
pub fn visit_statement<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    statement: &Statement,
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Statement {
    match statement {
        Statement::Class(cd) => Statement::Class(cursor.attach(J::ClassDeclaration(cd.clone()), |c| {
            visitor.visit_class_declaration(cd, c, ctx)
        })),
        Statement::Method(md) => Statement::Method(cursor.attach(J::MethodDeclaration(md.clone()), |c| {
            visitor.visit_method_declaration(md, c, ctx)
        })),
        Statement::Variables(vd) => {
            Statement::Variables(cursor.attach(J::VariableDeclarations(vd.clone()), |c| {
                visitor.visit_variable_declarations(vd, c, ctx)
            }))
        }
        Statement::Invocation(mi) => {
            Statement::Invocation(cursor.attach(J::MethodInvocation(mi.clone()), |c| {
                visitor.visit_method_invocation(mi, c, ctx)
            }))
        }
        Statement::Raw(_) => statement.clone(),
    }
}

fn visit_statements<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    statements: &[Statement],
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Option<Vec<Statement>> {
    let visited: Vec<Statement> = statements
        .iter()
        .map(|statement| visit_statement(visitor, statement, cursor, ctx))
        .collect();
    let changed = visited
        .iter()
        .zip(statements)
        .any(|(after, before)| !after.ptr_eq(before));
    changed.then_some(visited)
}

fn visit_body<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    body: &Arc<Block>,
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Arc<Block> {
    cursor.attach(J::Block(body.clone()), |c| visitor.visit_block(body, c, ctx))
}

pub fn walk_compilation_unit<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    cu: &Arc<CompilationUnit>,
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Arc<CompilationUnit> {
    match visit_statements(visitor, &cu.types, cursor, ctx) {
        Some(types) => {
            let rebuilt = Arc::new(cu.with_types(types));
            cursor.set_value(J::CompilationUnit(rebuilt.clone()));
            rebuilt
        }
        None => cu.clone(),
    }
}

pub fn walk_class_declaration<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    cd: &Arc<ClassDeclaration>,
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Arc<ClassDeclaration> {
    let body = visit_body(visitor, &cd.body, cursor, ctx);
    if Arc::ptr_eq(&body, &cd.body) {
        return cd.clone();
    }
    let rebuilt = Arc::new(cd.with_body(body));
    cursor.set_value(J::ClassDeclaration(rebuilt.clone()));
    rebuilt
}

pub fn walk_block<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    block: &Arc<Block>,
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Arc<Block> {
    match visit_statements(visitor, &block.statements, cursor, ctx) {
        Some(statements) => {
            let rebuilt = Arc::new(block.with_statements(statements));
            cursor.set_value(J::Block(rebuilt.clone()));
            rebuilt
        }
        None => block.clone(),
    }
}

pub fn walk_method_declaration<V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    md: &Arc<MethodDeclaration>,
    cursor: &mut Cursor,
    ctx: &ExecutionContext,
) -> Arc<MethodDeclaration> {
    let Some(body) = &md.body else {
        return md.clone();
    };
    let visited = visit_body(visitor, body, cursor, ctx);
    if Arc::ptr_eq(&visited, body) {
        return md.clone();
    }
    let rebuilt = Arc::new(md.with_body(Some(visited)));
    cursor.set_value(J::MethodDeclaration(rebuilt.clone()));
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Identifier, Kind, NodeId, Space};
    use std::path::PathBuf;

    fn variables(name: &str) -> Statement {
        Statement::Variables(Arc::new(VariableDeclarations {
            id: NodeId::next(),
            prefix: Space::format("\n    "),
            leading_annotations: Vec::new(),
            modifiers: Vec::new(),
            type_expr: Identifier::new("int", None),
            variables: vec![crate::tree::NamedVariable {
                id: NodeId::next(),
                prefix: Space::single(),
                name: Identifier::new(name, None),
                initializer: None,
            }],
            terminator: Space::EMPTY,
        }))
    }

    fn unit(members: Vec<Statement>) -> Arc<CompilationUnit> {
        let class = ClassDeclaration {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            leading_annotations: Vec::new(),
            modifiers: Vec::new(),
            kind: crate::tree::ClassKind::Class,
            kind_prefix: Space::EMPTY,
            name: Identifier::new("A", None).with_prefix(Space::single()),
            header: String::new(),
            body: Arc::new(Block {
                id: NodeId::next(),
                prefix: Space::single(),
                statements: members,
                end: Space::format("\n"),
            }),
            ty: None,
        };
        Arc::new(CompilationUnit {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            source_path: PathBuf::from("A.java"),
            package: None,
            imports: Vec::new(),
            types: vec![Statement::Class(Arc::new(class))],
            eof: Space::format("\n"),
        })
    }

    struct Noop;
    impl JavaVisitor for Noop {}

    #[test]
    fn test_noop_visitor_returns_same_tree() {
        let cu = unit(vec![variables("a"), variables("b")]);
        let ctx = ExecutionContext::new();

        let visited = Noop.visit_tree(&cu, &ctx);

        assert!(Arc::ptr_eq(&visited, &cu));
    }

    struct Rename;
    impl JavaVisitor for Rename {
        fn visit_variable_declarations(
            &mut self,
            vd: &Arc<VariableDeclarations>,
            _cursor: &mut Cursor,
            _ctx: &ExecutionContext,
        ) -> Arc<VariableDeclarations> {
            if vd.variables[0].name.simple_name != "a" {
                return vd.clone();
            }
            let mut renamed = vd.as_ref().clone();
            renamed.variables[0].name.simple_name = "renamed".into();
            Arc::new(renamed)
        }
    }

    #[test]
    fn test_rebuild_shares_untouched_siblings() {
        let cu = unit(vec![variables("a"), variables("b")]);
        let ctx = ExecutionContext::new();

        let visited = Rename.visit_tree(&cu, &ctx);

        assert!(!Arc::ptr_eq(&visited, &cu));
        let before = cu.classes().next().unwrap();
        let after = visited.classes().next().unwrap();
        assert_eq!(after.id, before.id);
        assert!(!after.body.statements[0].ptr_eq(&before.body.statements[0]));
        assert!(after.body.statements[1].ptr_eq(&before.body.statements[1]));
        assert!(visited.to_string().contains("int renamed"));
    }

    #[derive(Default)]
    struct Recorder {
        paths: Vec<Vec<Kind>>,
        post_order: Vec<String>,
    }

    impl JavaVisitor for Recorder {
        fn visit_variable_declarations(
            &mut self,
            vd: &Arc<VariableDeclarations>,
            cursor: &mut Cursor,
            _ctx: &ExecutionContext,
        ) -> Arc<VariableDeclarations> {
            self.paths.push(cursor.path().map(J::kind).collect());
            cursor.put_message_on_first_enclosing(
                Kind::ClassDeclaration,
                "last",
                vd.variables[0].name.simple_name.clone(),
            );
            vd.clone()
        }

        fn visit_class_declaration(
            &mut self,
            cd: &Arc<ClassDeclaration>,
            cursor: &mut Cursor,
            ctx: &ExecutionContext,
        ) -> Arc<ClassDeclaration> {
            let cd = walk_class_declaration(self, cd, cursor, ctx);
            if let Some(name) = cursor.poll_message::<String>("last") {
                self.post_order.push(name);
            }
            cd
        }
    }

    #[test]
    fn test_children_post_before_parent_post_order() {
        let cu = unit(vec![variables("a"), variables("b")]);
        let ctx = ExecutionContext::new();
        let mut recorder = Recorder::default();

        recorder.visit_tree(&cu, &ctx);

        assert_eq!(
            recorder.paths[0],
            vec![
                Kind::VariableDeclarations,
                Kind::Block,
                Kind::ClassDeclaration,
                Kind::CompilationUnit
            ]
        );
        assert_eq!(recorder.post_order, vec!["b".to_string()]);
    }
}
