//! Source printing.
//!
//! Each node prints its own prefix followed by its tokens, so printing an
//! unmodified tree yields the text it was parsed from.

use super::nodes::*;
use super::Space;
use std::fmt::{self, Display, Formatter};

impl Display for Space {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for CompilationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        if let Some(package) = &self.package {
            write!(f, "{}{}", package.prefix, package.text)?;
        }
        for import in &self.imports {
            write!(f, "{import}")?;
        }
        for ty in &self.types {
            write!(f, "{ty}")?;
        }
        write!(f, "{}", self.eof)
    }
}

impl Display for Import {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_static { "import static" } else { "import" };
        write!(f, "{}{} {};", self.prefix, keyword, self.qualid)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.simple_name)
    }
}

impl Display for Modifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.keyword)
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.prefix, self.name)?;
        if let Some(arguments) = &self.arguments {
            f.write_str(arguments)?;
        }
        Ok(())
    }
}

impl Display for ClassDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        write_leading(f, &self.leading_annotations, &self.modifiers)?;
        write!(
            f,
            "{}{}{}{}{}",
            self.kind_prefix,
            self.kind.keyword(),
            self.name,
            self.header,
            self.body
        )
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.prefix)?;
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        write!(f, "{}}}", self.end)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(n) => n.fmt(f),
            Self::Method(n) => n.fmt(f),
            Self::Variables(n) => n.fmt(f),
            Self::Invocation(n) => n.fmt(f),
            Self::Raw(n) => n.fmt(f),
        }
    }
}

impl Display for VariableDeclarations {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        write_leading(f, &self.leading_annotations, &self.modifiers)?;
        write!(f, "{}", self.type_expr)?;
        for (idx, variable) in self.variables.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}{}", variable.prefix, variable.name)?;
            if let Some(initializer) = &variable.initializer {
                f.write_str(initializer)?;
            }
        }
        write!(f, "{};", self.terminator)
    }
}

impl Display for MethodDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        write_leading(f, &self.leading_annotations, &self.modifiers)?;
        write!(f, "{}{}{}", self.return_type, self.name, self.parameters)?;
        if let Some(throws) = &self.throws {
            write!(f, "{throws}")?;
        }
        match &self.body {
            Some(body) => write!(f, "{body}"),
            None => write!(f, "{};", self.terminator),
        }
    }
}

impl Display for Throws {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}throws", self.prefix)?;
        for (idx, ty) in self.types.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

impl Display for MethodInvocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        if let Some(select) = &self.select {
            write!(f, "{select}{}.", self.dot_prefix)?;
        }
        write!(f, "{}{}{};", self.name, self.arguments, self.terminator)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(ident) => ident.fmt(f),
            Self::Raw { prefix, text } => write!(f, "{prefix}{text}"),
        }
    }
}

impl Display for RawStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.text)
    }
}

fn write_leading(
    f: &mut Formatter<'_>,
    annotations: &[Annotation],
    modifiers: &[Modifier],
) -> fmt::Result {
    for annotation in annotations {
        write!(f, "{annotation}")?;
    }
    for modifier in modifiers {
        write!(f, "{modifier}")?;
    }
    Ok(())
}
