//! Formatting of synthesized code.
//!
//! Template fragments come out of the parser with the whitespace of the
//! template text. [`IndentFormatter`] re-indents the statements that a
//! structural edit introduced so they line up with their new surroundings,
//! and leaves every statement that existed before the edit alone. New line
//! breaks use the line ending of the surrounding code.

use crate::tree::{Block, Cursor, J, MethodDeclaration, NodeId, Space, Statement, Throws};
use std::collections::HashSet;
use std::sync::Arc;

/// Reformats the result of a structural edit.
pub trait AutoFormat: Send + Sync {
    /// `before` is the edited node as it was, `after` the edited node, and
    /// `cursor` points at the node's original position.
    fn format(&self, before: &J, after: J, cursor: &Cursor) -> J;
}

/// Indentation-only formatter.
///
/// The indentation unit is detected from the block being edited and falls
/// back to four spaces (or a tab when the enclosing code uses tabs).
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentFormatter;

impl AutoFormat for IndentFormatter {
    fn format(&self, before: &J, after: J, cursor: &Cursor) -> J {
        let owner = owner_indent(after.prefix(), cursor);
        let nl = enclosing_line_ending(before, cursor);
        match (before, &after) {
            (J::ClassDeclaration(old), J::ClassDeclaration(new)) => {
                let body = format_block(&old.body, &new.body, &owner, true, nl);
                J::ClassDeclaration(Arc::new(new.with_body(body)))
            }
            (J::MethodDeclaration(old), J::MethodDeclaration(new)) => match (&old.body, &new.body) {
                (Some(old_body), Some(new_body)) => {
                    let body = format_block(old_body, new_body, &owner, false, nl);
                    J::MethodDeclaration(Arc::new(new.with_body(Some(body))))
                }
                _ => after,
            },
            (J::Block(old), J::Block(new)) => {
                let members = matches!(cursor.parent_value(), Some(J::ClassDeclaration(_)));
                let owner = cursor
                    .path()
                    .skip(1)
                    .find_map(|node| node.prefix().indent())
                    .unwrap_or_default()
                    .to_string();
                J::Block(format_block(old, new, &owner, members, nl))
            }
            _ => after,
        }
    }
}

/// Indentation of the line a node starts on.
fn owner_indent(prefix: &Space, cursor: &Cursor) -> String {
    prefix
        .indent()
        .or_else(|| cursor.path().find_map(|node| node.prefix().indent()))
        .unwrap_or_default()
        .to_string()
}

/// `"\r\n"` if `text` breaks lines that way, `"\n"` otherwise.
pub(crate) fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(idx) if text[..idx].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Line ending of the nearest enclosing code that has a line break.
fn enclosing_line_ending(before: &J, cursor: &Cursor) -> &'static str {
    std::iter::once(before.to_string())
        .chain(cursor.path().map(J::to_string))
        .find(|text| text.contains('\n'))
        .map_or("\n", |text| line_ending(&text))
}

fn unit_for(owner: &str) -> &'static str {
    if owner.contains('\t') { "\t" } else { "    " }
}

fn format_block(
    before: &Block,
    after: &Arc<Block>,
    owner: &str,
    members: bool,
    nl: &str,
) -> Arc<Block> {
    let existing: HashSet<NodeId> = before.statements.iter().map(Statement::id).collect();
    if after.statements.iter().all(|s| existing.contains(&s.id())) {
        return after.clone();
    }

    let child_indent = after
        .statements
        .iter()
        .filter(|s| existing.contains(&s.id()))
        .find_map(|s| s.prefix().indent())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{owner}{}", unit_for(owner)));
    let unit = child_indent
        .strip_prefix(owner)
        .filter(|unit| !unit.is_empty())
        .unwrap_or(unit_for(owner))
        .to_string();

    let statements = after
        .statements
        .iter()
        .enumerate()
        .map(|(idx, statement)| {
            if existing.contains(&statement.id()) {
                return statement.clone();
            }
            let blank_line = members
                && idx > 0
                && matches!(statement, Statement::Method(_) | Statement::Class(_));
            let newline = if blank_line { format!("{nl}{nl}") } else { nl.to_string() };
            let statement = match statement {
                Statement::Method(md) => {
                    Statement::Method(Arc::new(format_method(md, &child_indent, &unit, nl)))
                }
                other => other.clone(),
            };
            statement.with_prefix(Space::format(format!("{newline}{child_indent}")))
        })
        .collect();

    let mut block = after.with_statements(statements);
    if !block.end.has_newline() && !block.statements.is_empty() {
        block.end = Space::format(format!("{nl}{owner}"));
    }
    Arc::new(block)
}

/// Lays out a synthesized method declaration, one annotation per line.
fn format_method(md: &MethodDeclaration, indent: &str, unit: &str, nl: &str) -> MethodDeclaration {
    let line = Space::format(format!("{nl}{indent}"));
    let mut md = md.clone();

    for (idx, annotation) in md.leading_annotations.iter_mut().enumerate() {
        annotation.prefix = if idx == 0 { Space::EMPTY } else { line.clone() };
    }
    let after_annotations = if md.leading_annotations.is_empty() {
        Space::EMPTY
    } else {
        line.clone()
    };
    for (idx, modifier) in md.modifiers.iter_mut().enumerate() {
        modifier.prefix = if idx == 0 {
            after_annotations.clone()
        } else {
            Space::single()
        };
    }
    md.return_type.prefix = if md.modifiers.is_empty() {
        after_annotations
    } else {
        Space::single()
    };
    md.name.prefix = Space::single();
    md.throws = md.throws.take().map(|throws| Throws {
        prefix: Space::single(),
        types: throws
            .types
            .into_iter()
            .map(|ty| ty.with_prefix(Space::single()))
            .collect(),
    });

    if let Some(body) = &md.body {
        let inner = format!("{indent}{unit}");
        let statements: Vec<Statement> = body
            .statements
            .iter()
            .map(|s| s.with_prefix(Space::format(format!("{nl}{inner}"))))
            .collect();
        let end = if statements.is_empty() {
            Space::EMPTY
        } else {
            line.clone()
        };
        md.body = Some(Arc::new(Block {
            prefix: Space::single(),
            statements,
            end,
            ..body.as_ref().clone()
        }));
    }
    md
}
