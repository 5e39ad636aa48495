//! Declared-type matching.

use super::Pattern;
use crate::tree::{Expression, Identifier, J, JavaType, VariableDeclarations};

/// Matches nodes whose resolved type is a given class.
///
/// Declarations match on the declared type, unless a declarator carries a
/// different type of its own, as `s[]` does. Identifiers and expressions
/// match on their own type. Nodes without a resolved type never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMatcher {
    fqn: String,
}

impl TypeMatcher {
    pub fn new(fqn: impl Into<String>) -> Self {
        Self { fqn: fqn.into() }
    }

    pub fn fully_qualified_name(&self) -> &str {
        &self.fqn
    }

    fn matches_type(&self, ty: Option<&JavaType>) -> bool {
        is_of_class_type(ty, &self.fqn)
    }
}

/// Returns true if `ty` is the class type `fqn`.
pub fn is_of_class_type(ty: Option<&JavaType>, fqn: &str) -> bool {
    ty.is_some_and(|ty| ty.is_class(fqn))
}

impl Pattern<VariableDeclarations> for TypeMatcher {
    fn matches(&self, declarations: &VariableDeclarations) -> bool {
        self.matches_type(declarations.type_expr.ty.as_ref())
            && declarations
                .variables
                .iter()
                .all(|v| v.name.ty.as_ref().is_none_or(|ty| ty.is_class(&self.fqn)))
    }
}

impl Pattern<Identifier> for TypeMatcher {
    fn matches(&self, identifier: &Identifier) -> bool {
        self.matches_type(identifier.ty.as_ref())
    }
}

impl Pattern<Expression> for TypeMatcher {
    fn matches(&self, expression: &Expression) -> bool {
        self.matches_type(expression.java_type())
    }
}

impl Pattern<J> for TypeMatcher {
    fn matches(&self, node: &J) -> bool {
        self.matches_type(node.java_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NamedVariable, NodeId, Space};

    const SERVER: &str = "okhttp3.mockwebserver.MockWebServer";

    fn field(ty: Option<JavaType>) -> VariableDeclarations {
        VariableDeclarations {
            id: NodeId::next(),
            prefix: Space::EMPTY,
            leading_annotations: Vec::new(),
            modifiers: Vec::new(),
            type_expr: Identifier::new("MockWebServer", ty),
            variables: Vec::new(),
            terminator: Space::EMPTY,
        }
    }

    #[test]
    fn test_declared_type() {
        let matcher = TypeMatcher::new(SERVER);

        assert!(matcher.matches(&field(Some(JavaType::class(SERVER)))));
        assert!(!matcher.matches(&field(Some(JavaType::class("com.example.MockWebServer")))));
        assert!(!matcher.matches(&field(None)));
    }

    #[test]
    fn test_expression_and_identifier() {
        let matcher = TypeMatcher::new(SERVER);
        let typed = Identifier::new("server", Some(JavaType::class(SERVER)));

        assert!(matcher.matches(&typed));
        assert!(matcher.matches(&Expression::Identifier(typed.clone())));
        assert!(matcher.matches(&J::Identifier(typed)));
        assert!(!matcher.matches(&Expression::Raw {
            prefix: Space::EMPTY,
            text: "server".into(),
        }));
    }

    #[test]
    fn test_array_declarations_do_not_match() {
        let matcher = TypeMatcher::new(SERVER);
        let server = JavaType::class(SERVER);

        assert!(!matcher.matches(&field(Some(server.clone().array_of(1)))));

        let mut declarator_array = field(Some(server.clone()));
        declarator_array.variables.push(NamedVariable {
            id: NodeId::next(),
            prefix: Space::single(),
            name: Identifier::new("s", Some(server.array_of(1))),
            initializer: Some("[]".into()),
        });
        assert!(!matcher.matches(&declarator_array));

        declarator_array.variables[0].name.ty = None;
        assert!(matcher.matches(&declarator_array));
    }

    #[test]
    fn test_primitive_never_matches_class() {
        assert!(!is_of_class_type(Some(&JavaType::Primitive("int".into())), "int"));
        assert!(is_of_class_type(Some(&JavaType::class(SERVER)), SERVER));
    }
}
