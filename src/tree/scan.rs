//! Read-only scans over a compilation unit.
//!
//! A scan visits imports, every identifier the tree models, and every piece
//! of source text the lowering kept verbatim. The callback can stop the scan
//! early by returning [`ControlFlow::Break`].

use super::{CompilationUnit, Expression, Identifier, Import, Statement};
use std::ops::ControlFlow;

/// One element reported by [`walk`].
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Import(&'a Import),
    Identifier(&'a Identifier),
    /// Verbatim source text: parameters, initializers, arguments, raw statements.
    Text(&'a str),
}

/// Visits every element of `cu` in source order.
pub fn walk<'a, B, F>(cu: &'a CompilationUnit, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(Element<'a>) -> ControlFlow<B>,
{
    for import in &cu.imports {
        f(Element::Import(import))?;
    }
    for statement in &cu.types {
        walk_statement(statement, f)?;
    }
    ControlFlow::Continue(())
}

fn walk_statement<'a, B, F>(statement: &'a Statement, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(Element<'a>) -> ControlFlow<B>,
{
    match statement {
        Statement::Class(cd) => {
            for annotation in &cd.leading_annotations {
                f(Element::Identifier(&annotation.name))?;
                text(annotation.arguments.as_deref(), f)?;
            }
            for modifier in &cd.modifiers {
                f(Element::Text(&modifier.keyword))?;
            }
            f(Element::Identifier(&cd.name))?;
            f(Element::Text(&cd.header))?;
            for statement in &cd.body.statements {
                walk_statement(statement, f)?;
            }
        }
        Statement::Method(md) => {
            for annotation in &md.leading_annotations {
                f(Element::Identifier(&annotation.name))?;
                text(annotation.arguments.as_deref(), f)?;
            }
            for modifier in &md.modifiers {
                f(Element::Text(&modifier.keyword))?;
            }
            f(Element::Identifier(&md.return_type))?;
            f(Element::Identifier(&md.name))?;
            f(Element::Text(&md.parameters))?;
            for ty in md.thrown_types() {
                f(Element::Identifier(ty))?;
            }
            if let Some(body) = &md.body {
                for statement in &body.statements {
                    walk_statement(statement, f)?;
                }
            }
        }
        Statement::Variables(vd) => {
            for annotation in &vd.leading_annotations {
                f(Element::Identifier(&annotation.name))?;
                text(annotation.arguments.as_deref(), f)?;
            }
            for modifier in &vd.modifiers {
                f(Element::Text(&modifier.keyword))?;
            }
            f(Element::Identifier(&vd.type_expr))?;
            for variable in &vd.variables {
                f(Element::Identifier(&variable.name))?;
                text(variable.initializer.as_deref(), f)?;
            }
        }
        Statement::Invocation(mi) => {
            match &mi.select {
                Some(Expression::Identifier(ident)) => f(Element::Identifier(ident))?,
                Some(Expression::Raw { text, .. }) => f(Element::Text(text))?,
                None => {}
            }
            f(Element::Identifier(&mi.name))?;
            f(Element::Text(&mi.arguments))?;
        }
        Statement::Raw(raw) => f(Element::Text(&raw.text))?,
    }
    ControlFlow::Continue(())
}

fn text<'a, B, F>(value: Option<&'a str>, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(Element<'a>) -> ControlFlow<B>,
{
    match value {
        Some(value) => f(Element::Text(value)),
        None => ControlFlow::Continue(()),
    }
}

/// Returns true if any element satisfies `predicate`.
pub fn any<'a>(cu: &'a CompilationUnit, mut predicate: impl FnMut(Element<'a>) -> bool) -> bool {
    walk(cu, &mut |element| {
        if predicate(element) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

/// Returns true if `word` appears in `text` as a whole Java identifier.
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}
