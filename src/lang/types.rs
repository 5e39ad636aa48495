//! Name resolution for Java type references.
//!
//! Resolution is purely nominal: a simple name is looked up in the unit's
//! single-type imports, the types the unit declares, on-demand imports (only
//! for names known to the [`Classpath`]) and finally `java.lang`. There is no
//! inference and no overload resolution; a name that cannot be placed is left
//! without a type.

use crate::tree::JavaType;
use std::collections::{HashMap, HashSet};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const JAVA_LANG: &[&str] = &[
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "FunctionalInterface",
    "IllegalArgumentException",
    "IllegalStateException",
    "Integer",
    "InterruptedException",
    "Iterable",
    "Long",
    "Math",
    "NullPointerException",
    "Number",
    "Object",
    "Override",
    "Record",
    "Runnable",
    "RuntimeException",
    "SafeVarargs",
    "Short",
    "String",
    "StringBuilder",
    "SuppressWarnings",
    "System",
    "Thread",
    "Throwable",
    "UnsupportedOperationException",
    "Void",
];

/// Fully-qualified names known to exist beyond the unit being parsed.
///
/// Used to decide what an on-demand import such as `import org.junit.*;`
/// actually brings into scope.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    types: HashSet<String>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fully-qualified type name.
    pub fn add(&mut self, fqn: impl Into<String>) {
        self.types.insert(fqn.into());
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.types.contains(fqn)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Classpath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for Classpath {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.types.extend(iter.into_iter().map(Into::into));
    }
}

/// Symbol environment of one compilation unit.
#[derive(Debug, Clone)]
pub struct TypeResolver<'a> {
    package: String,
    imports: HashMap<String, String>,
    wildcards: Vec<String>,
    declared: HashMap<String, String>,
    classpath: &'a Classpath,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver for a unit in `package` (empty for the default package).
    pub fn new(package: impl Into<String>, classpath: &'a Classpath) -> Self {
        Self {
            package: package.into(),
            imports: HashMap::new(),
            wildcards: Vec::new(),
            declared: HashMap::new(),
            classpath,
        }
    }

    /// Registers a non-static import. `qualid` ends in `.*` for on-demand imports.
    pub fn import(&mut self, qualid: &str) {
        if let Some(package) = qualid.strip_suffix(".*") {
            self.wildcards.push(package.to_string());
        } else if let Some((_, simple)) = qualid.rsplit_once('.') {
            self.imports.insert(simple.to_string(), qualid.to_string());
        }
    }

    /// Registers a type declared in the unit under its (possibly nested)
    /// source name, e.g. `Outer` or `Outer.Inner`.
    pub fn declare(&mut self, qualified_name: &str) {
        let fqn = self.qualify(qualified_name);
        let simple = qualified_name
            .rsplit_once('.')
            .map(|(_, simple)| simple)
            .unwrap_or(qualified_name);
        self.declared.entry(simple.to_string()).or_insert_with(|| fqn.clone());
        self.declared.insert(qualified_name.to_string(), fqn);
    }

    /// The fully-qualified name of a type declared in this unit.
    pub fn qualify(&self, qualified_name: &str) -> String {
        if self.package.is_empty() {
            qualified_name.to_string()
        } else {
            format!("{}.{}", self.package, qualified_name)
        }
    }

    /// Resolves a type reference as written in source, array dimensions and
    /// varargs included.
    pub fn resolve(&self, written: &str) -> Option<JavaType> {
        self.resolve_element(written)
            .map(|ty| ty.array_of(dimensions(written)))
    }

    fn resolve_element(&self, written: &str) -> Option<JavaType> {
        let name = erase(written);
        if name.is_empty() || name == "var" {
            return None;
        }
        if PRIMITIVES.contains(&name) {
            return Some(JavaType::Primitive(name.to_string()));
        }
        if let Some((head, rest)) = name.split_once('.') {
            return match self.resolve_simple(head) {
                Some(outer) => Some(JavaType::class(format!("{outer}.{rest}"))),
                None if is_package_segment(head) => Some(JavaType::class(name)),
                None => None,
            };
        }
        self.resolve_simple(name).map(JavaType::Class)
    }

    fn resolve_simple(&self, simple: &str) -> Option<String> {
        if let Some(fqn) = self.imports.get(simple) {
            return Some(fqn.clone());
        }
        if let Some(fqn) = self.declared.get(simple) {
            return Some(fqn.clone());
        }
        let same_package = self.qualify(simple);
        if self.classpath.contains(&same_package) {
            return Some(same_package);
        }
        if let Some(fqn) = self
            .wildcards
            .iter()
            .map(|package| format!("{package}.{simple}"))
            .find(|fqn| self.classpath.contains(fqn))
        {
            return Some(fqn);
        }
        let lang = format!("java.lang.{simple}");
        if JAVA_LANG.contains(&simple) || self.classpath.contains(&lang) {
            return Some(lang);
        }
        None
    }
}

/// Number of array levels in a written type, outside its type arguments.
pub(crate) fn dimensions(written: &str) -> usize {
    let mut depth = 0usize;
    let mut count = 0;
    for c in written.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '[' if depth == 0 => count += 1,
            _ => {}
        }
    }
    count + usize::from(written.trim_end().ends_with("..."))
}

/// Strips type arguments, array dimensions, varargs and whitespace.
fn erase(written: &str) -> &str {
    let name = written.split('<').next().unwrap_or(written);
    let name = name.split('[').next().unwrap_or(name);
    name.trim().trim_end_matches("...").trim()
}

/// Package segments are lower-case by convention; type names are not.
fn is_package_segment(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}
