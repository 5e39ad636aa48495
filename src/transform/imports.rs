//! Idempotent import management.
//!
//! Both operations are safe to call speculatively: when there is nothing to
//! do they return the input `Arc` itself.
//!
//! New imports are placed in a simple layout: third-party imports first,
//! then `java.*`/`javax.*` after a blank line, static imports last. Inside a
//! group an import goes after the last import that sorts before it. Line
//! breaks follow the unit's existing line ending.

use super::format::line_ending;
use crate::tree::scan::{self, Element};
use crate::tree::{CompilationUnit, Import, Space};
use std::sync::Arc;
use tracing::trace;

fn group(import: &Import) -> u8 {
    if import.is_static {
        3
    } else if import.qualid.starts_with("java.") || import.qualid.starts_with("javax.") {
        2
    } else {
        1
    }
}

fn package_of(fqn: &str) -> &str {
    fqn.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
}

fn simple_name(fqn: &str) -> &str {
    fqn.rsplit_once('.').map(|(_, s)| s).unwrap_or(fqn)
}

fn is_blank(space: &Space) -> bool {
    space.as_str().trim().is_empty()
}

fn separator(same_group: bool, nl: &str) -> Space {
    Space::format(if same_group { nl.to_string() } else { format!("{nl}{nl}") })
}

/// Returns true if `fqn` is usable in `cu` without a new import.
fn is_covered(cu: &CompilationUnit, fqn: &str) -> bool {
    let package = package_of(fqn);
    package.is_empty()
        || package == "java.lang"
        || package == cu.package_name()
        || cu.imports.iter().any(|i| {
            !i.is_static && (i.qualid == fqn || (i.is_wildcard() && i.package_name() == package))
        })
}

/// Adds `import fqn;` unless the type is already imported or needs no import.
pub fn add_import_if_absent(cu: &Arc<CompilationUnit>, fqn: &str) -> Arc<CompilationUnit> {
    if is_covered(cu, fqn) {
        return cu.clone();
    }

    let nl = line_ending(&cu.to_string());
    let blank = format!("{nl}{nl}");
    let mut import = Import::new(fqn);
    let key = (group(&import), fqn.to_string());
    let mut imports = cu.imports.clone();
    let mut types = cu.types.clone();

    if imports.is_empty() {
        import.prefix = Space::format(if cu.package.is_some() { blank.as_str() } else { "" });
        if let Some(first) = types.first_mut()
            && !first.prefix().as_str().starts_with(&blank)
        {
            let rest = first.prefix().as_str().trim_start_matches(['\n', '\r']).to_string();
            *first = first.with_prefix(Space::format(format!("{blank}{rest}")));
        }
        imports.push(import);
    } else {
        let idx = imports
            .iter()
            .rposition(|i| (group(i), i.qualid.clone()) < key)
            .map(|i| i + 1)
            .unwrap_or(0);

        if idx == 0 {
            import.prefix = imports[0].prefix.clone();
        } else {
            import.prefix = separator(group(&imports[idx - 1]) == key.0, nl);
        }
        if let Some(next) = imports.get_mut(idx)
            && (idx == 0 || is_blank(&next.prefix))
        {
            next.prefix = separator(group(next) == key.0, nl);
        }
        imports.insert(idx, import);
    }

    trace!(import = fqn, path = %cu.source_path.display(), "Adding import");
    Arc::new(CompilationUnit {
        imports,
        types,
        ..cu.as_ref().clone()
    })
}

/// Returns true if anything besides its own import refers to `fqn`.
fn is_referenced(cu: &CompilationUnit, fqn: &str) -> bool {
    let simple = simple_name(fqn);
    scan::any(cu, |element| match element {
        Element::Import(_) => false,
        Element::Identifier(ident) => {
            ident.ty.as_ref().is_some_and(|ty| ty.is_class(fqn))
                || scan::contains_word(&ident.simple_name, simple)
        }
        Element::Text(text) => scan::contains_word(text, simple),
    })
}

/// Removes `import fqn;` if nothing in the unit refers to the type any more.
///
/// References are found through resolved types and, for source kept as
/// text, by the simple name appearing as a word. The latter errs on the side
/// of keeping the import.
pub fn remove_import_if_unused(cu: &Arc<CompilationUnit>, fqn: &str) -> Arc<CompilationUnit> {
    let Some(idx) = cu
        .imports
        .iter()
        .position(|i| !i.is_static && i.qualid == fqn)
    else {
        return cu.clone();
    };
    if is_referenced(cu, fqn) {
        return cu.clone();
    }

    let mut imports = cu.imports.clone();
    let removed = imports.remove(idx);
    if let Some(next) = imports.get_mut(idx)
        && (idx == 0 || (is_blank(&next.prefix) && removed.prefix.newlines() > next.prefix.newlines()))
    {
        next.prefix = removed.prefix;
    }

    let mut types = cu.types.clone();
    if imports.is_empty()
        && cu.package.is_none()
        && let Some(first) = types.first_mut()
    {
        let rest = first.prefix().as_str().trim_start_matches(['\n', '\r']).to_string();
        *first = first.with_prefix(Space::format(rest));
    }

    trace!(import = fqn, path = %cu.source_path.display(), "Removing unused import");
    Arc::new(CompilationUnit {
        imports,
        types,
        ..cu.as_ref().clone()
    })
}

/// Import changes collected during a traversal and applied once it is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportEdits {
    adds: Vec<String>,
    removes: Vec<String>,
}

impl ImportEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn maybe_add_import(&mut self, fqn: impl Into<String>) {
        let fqn = fqn.into();
        if !self.adds.contains(&fqn) {
            self.adds.push(fqn);
        }
    }

    pub fn maybe_remove_import(&mut self, fqn: impl Into<String>) {
        let fqn = fqn.into();
        if !self.removes.contains(&fqn) {
            self.removes.push(fqn);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.removes.is_empty()
    }

    /// Applies the additions, then the removals.
    pub fn apply(&self, cu: &Arc<CompilationUnit>) -> Arc<CompilationUnit> {
        let added = self
            .adds
            .iter()
            .fold(cu.clone(), |cu, fqn| add_import_if_absent(&cu, fqn));
        self.removes
            .iter()
            .fold(added, |cu, fqn| remove_import_if_unused(&cu, fqn))
    }
}
