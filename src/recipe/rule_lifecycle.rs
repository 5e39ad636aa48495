//! Migration of a JUnit 4 `@Rule` field to an explicit JUnit 5 lifecycle
//! method.
//!
//! With the default configuration this turns
//!
//! ```java
//! @Rule
//! public MockWebServer server = new MockWebServer();
//! ```
//!
//! into a plain field and closes the server after each test, either in a new
//! `@AfterEach void afterEachTest() throws IOException` method or at the end
//! of the class's existing `@AfterEach` method.
//!
//! The visitor works per class declaration. Fields and methods post what
//! they found to the enclosing class through the cursor, and the class acts
//! on both messages once its body has been visited.

use super::Recipe;
use super::config::RuleMigrationConfig;
use crate::context::{Diagnostic, ExecutionContext};
use crate::dependency::{SecondaryAction, UpgradeDependencyVersion};
use crate::error::{Result, SynthesisError};
use crate::matcher::{AnnotationMatcher, Pattern, TypeMatcher, is_of_class_type};
use crate::precondition::{Check, UsesType, and};
use crate::transform::{ImportEdits, InsertionSlot, JavaTemplate};
use crate::tree::visitor::{walk_class_declaration, walk_compilation_unit, walk_method_declaration};
use crate::tree::{
    ClassDeclaration, CompilationUnit, Cursor, Identifier, J, JavaVisitor, Kind, MethodDeclaration,
    Statement, TreeVisitor, VariableDeclarations,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

const TRACKED_VARIABLE: &str = "tracked-variable";
const AFTER_METHOD: &str = "after-method";

/// Everything the per-unit visitors share.
struct Migration {
    config: RuleMigrationConfig,
    rule: AnnotationMatcher,
    after: AnnotationMatcher,
    tracked: TypeMatcher,
    new_method: JavaTemplate,
    close_statement: JavaTemplate,
    exception: JavaTemplate,
}

/// Recipe that replaces a `@Rule` field with an "after each" close call.
pub struct RuleToLifecycleMethod {
    migration: Arc<Migration>,
    display_name: String,
    description: String,
}

impl RuleToLifecycleMethod {
    /// Builds the recipe, parsing its templates once.
    pub fn new(config: RuleMigrationConfig) -> Result<Self> {
        config.validate()?;
        let simple = RuleMigrationConfig::simple_name;

        let new_method = JavaTemplate::builder(format!(
            "@{}\nvoid {}() throws {} {{#{{any({})}}.{}();\n}}",
            simple(&config.after_annotation),
            config.method_name,
            simple(&config.exception_type),
            config.tracked_type,
            config.close_method,
        ))
        .imports([
            config.after_annotation.as_str(),
            config.exception_type.as_str(),
            config.tracked_type.as_str(),
        ])
        .build()?;
        let close_statement = JavaTemplate::builder(format!(
            "#{{any({})}}.{}();",
            config.tracked_type, config.close_method
        ))
        .imports([config.tracked_type.as_str()])
        .build()?;
        let exception = JavaTemplate::builder(simple(&config.exception_type))
            .imports([config.exception_type.as_str()])
            .build()?;

        let display_name = format!(
            "{} @{} to @{}",
            simple(&config.tracked_type),
            simple(&config.rule_annotation),
            simple(&config.after_annotation)
        );
        let description = format!(
            "Removes @{} from {} fields and calls {}() on them in an @{} method.",
            simple(&config.rule_annotation),
            simple(&config.tracked_type),
            config.close_method,
            simple(&config.after_annotation)
        );

        Ok(Self {
            migration: Arc::new(Migration {
                rule: AnnotationMatcher::new(&config.rule_annotation),
                after: AnnotationMatcher::new(&config.after_annotation),
                tracked: TypeMatcher::new(config.tracked_type.clone()),
                config,
                new_method,
                close_statement,
                exception,
            }),
            display_name,
            description,
        })
    }

    pub fn config(&self) -> &RuleMigrationConfig {
        &self.migration.config
    }
}

/// The okhttp3 `MockWebServer` migration with its 4.x dependency upgrade.
pub fn update_mock_web_server() -> Result<RuleToLifecycleMethod> {
    RuleToLifecycleMethod::new(RuleMigrationConfig::default())
}

impl Recipe for RuleToLifecycleMethod {
    fn name(&self) -> &str {
        "rule-to-lifecycle-method"
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn visitor(&self) -> Box<dyn TreeVisitor> {
        let config = &self.migration.config;
        Box::new(Check::new(
            and(vec![
                Box::new(UsesType::new(config.rule_annotation.clone())),
                Box::new(UsesType::new(config.tracked_type.clone())),
            ]),
            RuleVisitor::new(self.migration.clone()),
        ))
    }

    fn recipe_list(&self) -> Vec<Box<dyn SecondaryAction>> {
        self.migration
            .config
            .dependency
            .iter()
            .map(|dep| {
                Box::new(UpgradeDependencyVersion::new(
                    dep.group.clone(),
                    dep.artifact.clone(),
                    &dep.selector,
                    dep.known_versions.iter().cloned(),
                )) as Box<dyn SecondaryAction>
            })
            .collect()
    }

    fn classpath(&self) -> Vec<String> {
        let config = &self.migration.config;
        vec![
            config.rule_annotation.clone(),
            config.after_annotation.clone(),
            config.tracked_type.clone(),
            config.exception_type.clone(),
        ]
    }
}

struct RuleVisitor {
    migration: Arc<Migration>,
    imports: ImportEdits,
    source_path: PathBuf,
}

impl RuleVisitor {
    fn new(migration: Arc<Migration>) -> Self {
        Self {
            migration,
            imports: ImportEdits::new(),
            source_path: PathBuf::new(),
        }
    }

    /// Imports a template needs, minus the type its placeholders bind.
    fn add_template_imports(&mut self, template: &JavaTemplate) {
        for fqn in template.imports() {
            if *fqn != self.migration.config.tracked_type {
                self.imports.maybe_add_import(fqn.clone());
            }
        }
    }

    /// Closes `variable` in the class at the cursor.
    fn close_variable(
        &mut self,
        cd: &Arc<ClassDeclaration>,
        variable: Identifier,
        after_method: Option<Arc<MethodDeclaration>>,
        cursor: &mut Cursor,
    ) -> std::result::Result<Arc<ClassDeclaration>, SynthesisError> {
        let migration = self.migration.clone();
        let variable = J::Identifier(variable);

        let Some(after_method) = after_method else {
            let J::ClassDeclaration(updated) =
                migration
                    .new_method
                    .apply(cursor, InsertionSlot::LastStatement, &[variable])?
            else {
                return Err(SynthesisError::NoTarget);
            };
            self.add_template_imports(&migration.new_method);
            return Ok(updated);
        };

        let Some(idx) = cd
            .body
            .statements
            .iter()
            .position(|s| s.id() == after_method.id)
        else {
            return Ok(cd.clone());
        };
        let Statement::Method(method) = &cd.body.statements[idx] else {
            return Ok(cd.clone());
        };
        if method.body.is_none() {
            debug!(
                method = %method.name.simple_name,
                "After method has no body, leaving it alone"
            );
            return Ok(cd.clone());
        }

        let mut method = match cursor.attach(J::MethodDeclaration(method.clone()), |c| {
            migration
                .close_statement
                .apply(c, InsertionSlot::LastStatement, &[variable])
        })? {
            J::MethodDeclaration(method) => method,
            _ => return Err(SynthesisError::NoTarget),
        };

        let declares_exception = method
            .thrown_types()
            .iter()
            .any(|ty| is_of_class_type(ty.ty.as_ref(), &migration.config.exception_type));
        if !declares_exception {
            method = match cursor.attach(J::MethodDeclaration(method.clone()), |c| {
                migration.exception.apply(c, InsertionSlot::ThrowsClause, &[])
            })? {
                J::MethodDeclaration(method) => method,
                _ => return Err(SynthesisError::NoTarget),
            };
            self.imports
                .maybe_add_import(migration.config.exception_type.clone());
        }

        let mut statements = cd.body.statements.clone();
        statements[idx] = Statement::Method(method);
        Ok(Arc::new(
            cd.with_body(Arc::new(cd.body.with_statements(statements))),
        ))
    }
}

impl TreeVisitor for RuleVisitor {
    fn visit(&mut self, cu: &Arc<CompilationUnit>, ctx: &ExecutionContext) -> Arc<CompilationUnit> {
        self.visit_tree(cu, ctx)
    }
}

impl JavaVisitor for RuleVisitor {
    fn visit_compilation_unit(
        &mut self,
        cu: &Arc<CompilationUnit>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<CompilationUnit> {
        self.imports = ImportEdits::new();
        self.source_path = cu.source_path.clone();

        let visited = walk_compilation_unit(self, cu, cursor, ctx);
        if self.imports.is_empty() {
            visited
        } else {
            self.imports.apply(&visited)
        }
    }

    fn visit_class_declaration(
        &mut self,
        cd: &Arc<ClassDeclaration>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<ClassDeclaration> {
        // Nested classes queue their own import edits; a failure here drops
        // them along with the nested rewrites.
        let pending = self.imports.clone();
        let visited = walk_class_declaration(self, cd, cursor, ctx);
        let variable: Option<Identifier> = cursor.poll_message(TRACKED_VARIABLE);
        let after_method: Option<Arc<MethodDeclaration>> = cursor.poll_message(AFTER_METHOD);
        let Some(variable) = variable else {
            return visited;
        };

        match self.close_variable(&visited, variable, after_method, cursor) {
            Ok(updated) => {
                self.imports
                    .maybe_remove_import(self.migration.config.rule_annotation.clone());
                updated
            }
            Err(e) => {
                warn!(
                    path = %self.source_path.display(),
                    class = %cd.name.simple_name,
                    error = %e,
                    "Could not migrate rule field"
                );
                ctx.report(Diagnostic {
                    source_path: self.source_path.clone(),
                    declaration: cd.name.simple_name.clone(),
                    message: e.to_string(),
                });
                self.imports = pending;
                cd.clone()
            }
        }
    }

    fn visit_method_declaration(
        &mut self,
        md: &Arc<MethodDeclaration>,
        cursor: &mut Cursor,
        ctx: &ExecutionContext,
    ) -> Arc<MethodDeclaration> {
        let visited = walk_method_declaration(self, md, cursor, ctx);
        if visited
            .leading_annotations
            .iter()
            .any(|a| self.migration.after.matches(a))
        {
            cursor.put_message_on_first_enclosing(
                Kind::ClassDeclaration,
                AFTER_METHOD,
                visited.clone(),
            );
        }
        visited
    }

    fn visit_variable_declarations(
        &mut self,
        vd: &Arc<VariableDeclarations>,
        cursor: &mut Cursor,
        _ctx: &ExecutionContext,
    ) -> Arc<VariableDeclarations> {
        if !self.migration.tracked.matches(&**vd) {
            return vd.clone();
        }
        let rule = &self.migration.rule;
        let stripped = vd.retain_annotations(|a| !rule.matches(a));
        if stripped.leading_annotations.len() == vd.leading_annotations.len() {
            return vd.clone();
        }

        if let Some(first) = stripped.variables.first() {
            cursor.put_message_on_first_enclosing(
                Kind::ClassDeclaration,
                TRACKED_VARIABLE,
                first.name.clone(),
            );
        }
        Arc::new(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::JavaParser;
    use crate::recipe::config::DependencyConfig;

    fn run(recipe: &RuleToLifecycleMethod, source: &str) -> (Arc<CompilationUnit>, Arc<CompilationUnit>, ExecutionContext) {
        let cu = JavaParser::new()
            .classpath(recipe.classpath())
            .parse(source, "src/test/java/ServerTest.java")
            .unwrap();
        let ctx = ExecutionContext::new();
        let out = recipe.visitor().visit(&cu, &ctx);
        (cu, out, ctx)
    }

    #[test]
    fn test_metadata() {
        let recipe = update_mock_web_server().unwrap();

        assert_eq!(recipe.name(), "rule-to-lifecycle-method");
        assert_eq!(recipe.display_name(), "MockWebServer @Rule to @AfterEach");
        assert!(recipe.description().contains("close()"));
        assert_eq!(recipe.recipe_list().len(), 1);
        assert_eq!(
            recipe.recipe_list()[0].describe(),
            "upgrade com.squareup.okhttp3:mockwebserver to 4.X"
        );
    }

    #[test]
    fn test_new_after_method() {
        let recipe = update_mock_web_server().unwrap();
        let (_, out, ctx) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule\n    public MockWebServer server = new MockWebServer();\n}\n",
        );

        assert_eq!(
            out.to_string(),
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.jupiter.api.AfterEach;\n\nimport java.io.IOException;\n\nclass ServerTest {\n    public MockWebServer server = new MockWebServer();\n\n    @AfterEach\n    void afterEachTest() throws IOException {\n        server.close();\n    }\n}\n"
        );
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_existing_after_method_without_body_is_skipped() {
        let recipe = update_mock_web_server().unwrap();
        let (_, out, ctx) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\nimport org.junit.jupiter.api.AfterEach;\n\nabstract class ServerTest {\n    @Rule MockWebServer server;\n\n    @AfterEach\n    abstract void tearDown();\n}\n",
        );

        assert_eq!(
            out.to_string(),
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.jupiter.api.AfterEach;\n\nabstract class ServerTest {\n    MockWebServer server;\n\n    @AfterEach\n    abstract void tearDown();\n}\n"
        );
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_other_rules_are_kept() {
        let recipe = update_mock_web_server().unwrap();
        let (cu, out, _) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\nimport org.junit.rules.TemporaryFolder;\n\nclass ServerTest {\n    @Rule public TemporaryFolder folder = new TemporaryFolder();\n    MockWebServer server;\n}\n",
        );

        assert!(Arc::ptr_eq(&cu, &out));
    }

    #[test]
    fn test_rule_import_kept_while_still_used() {
        let recipe = update_mock_web_server().unwrap();
        let (_, out, _) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\nimport org.junit.rules.TemporaryFolder;\n\nclass ServerTest {\n    @Rule public TemporaryFolder folder = new TemporaryFolder();\n    @Rule public MockWebServer server = new MockWebServer();\n}\n",
        );

        let printed = out.to_string();
        assert!(printed.contains("import org.junit.Rule;"));
        assert!(printed.contains("@Rule public TemporaryFolder folder"));
        assert!(printed.contains("    public MockWebServer server = new MockWebServer();"));
        assert!(printed.contains("server.close();"));
    }

    #[test]
    fn test_synthesis_error_leaves_class_and_reports() {
        let recipe = update_mock_web_server().unwrap();
        let cu = JavaParser::new()
            .classpath(recipe.classpath())
            .parse(
                "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule MockWebServer server;\n}\n",
                "ServerTest.java",
            )
            .unwrap();
        let class = cu.classes().next().unwrap();
        let Statement::Variables(field) = &class.body.statements[0] else {
            panic!("expected a field");
        };
        let mut untyped = field.as_ref().clone();
        untyped.variables[0].name.ty = None;
        let body = class
            .body
            .with_statements(vec![Statement::Variables(Arc::new(untyped))]);
        let cu = Arc::new(cu.with_types(vec![Statement::Class(Arc::new(
            class.with_body(Arc::new(body)),
        ))]));
        let ctx = ExecutionContext::new();

        let out = recipe.visitor().visit(&cu, &ctx);

        assert!(Arc::ptr_eq(&out, &cu));
        let diagnostics = ctx.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].declaration, "ServerTest");
        assert!(diagnostics[0].message.contains("placeholder 0 expects"));
    }

    #[test]
    fn test_gate_matches_unconditional_visitor_on_rejected_units() {
        let recipe = update_mock_web_server().unwrap();
        for source in [
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    public MockWebServer server = new MockWebServer();\n}\n",
            "import org.junit.Rule;\nimport org.junit.rules.TemporaryFolder;\n\nclass ServerTest {\n    @Rule public TemporaryFolder folder = new TemporaryFolder();\n}\n",
            "class Plain {\n    void f() {}\n}\n",
        ] {
            let cu = JavaParser::new()
                .classpath(recipe.classpath())
                .parse(source, "ServerTest.java")
                .unwrap();
            let ctx = ExecutionContext::new();

            let gated = recipe.visitor().visit(&cu, &ctx);
            let ungated = RuleVisitor::new(recipe.migration.clone()).visit(&cu, &ctx);

            assert_eq!(gated.to_string(), ungated.to_string());
            assert!(Arc::ptr_eq(&gated, &cu));
            assert!(Arc::ptr_eq(&ungated, &cu));
        }
    }

    #[test]
    fn test_array_fields_are_not_closed() {
        let recipe = update_mock_web_server().unwrap();
        let (cu, out, _) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule MockWebServer[] servers;\n    @Rule MockWebServer server[];\n}\n",
        );

        assert!(Arc::ptr_eq(&cu, &out));
    }

    #[test]
    fn test_failure_drops_nested_import_edits() {
        let recipe = update_mock_web_server().unwrap();
        let cu = JavaParser::new()
            .classpath(recipe.classpath())
            .parse(
                "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule MockWebServer server;\n\n    static class Inner {\n        @Rule MockWebServer inner;\n    }\n}\n",
                "ServerTest.java",
            )
            .unwrap();
        let class = cu.classes().next().unwrap();
        let Statement::Variables(field) = &class.body.statements[0] else {
            panic!("expected a field");
        };
        let mut untyped = field.as_ref().clone();
        untyped.variables[0].name.ty = None;
        let mut statements = class.body.statements.clone();
        statements[0] = Statement::Variables(Arc::new(untyped));
        let cu = Arc::new(cu.with_types(vec![Statement::Class(Arc::new(
            class.with_body(Arc::new(class.body.with_statements(statements))),
        ))]));
        let ctx = ExecutionContext::new();

        let out = recipe.visitor().visit(&cu, &ctx);

        assert!(Arc::ptr_eq(&out, &cu));
        assert_eq!(ctx.diagnostics().len(), 1);
        let printed = out.to_string();
        assert!(printed.contains("import org.junit.Rule;"));
        assert!(!printed.contains("AfterEach"));
        assert!(!printed.contains("IOException"));
    }

    #[test]
    fn test_local_class_is_migrated() {
        let recipe = update_mock_web_server().unwrap();
        let (_, out, _) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    void m() {\n        class L {\n            @Rule MockWebServer s;\n        }\n    }\n}\n",
        );

        assert_eq!(
            out.to_string(),
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.jupiter.api.AfterEach;\n\nimport java.io.IOException;\n\nclass ServerTest {\n    void m() {\n        class L {\n            MockWebServer s;\n\n            @AfterEach\n            void afterEachTest() throws IOException {\n                s.close();\n            }\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn test_enum_is_migrated() {
        let recipe = update_mock_web_server().unwrap();
        let (_, out, _) = run(
            &recipe,
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nenum Servers {\n    ONE, TWO;\n\n    @Rule MockWebServer server;\n}\n",
        );

        assert_eq!(
            out.to_string(),
            "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.jupiter.api.AfterEach;\n\nimport java.io.IOException;\n\nenum Servers {\n    ONE, TWO;\n\n    MockWebServer server;\n\n    @AfterEach\n    void afterEachTest() throws IOException {\n        server.close();\n    }\n}\n"
        );
    }

    #[test]
    fn test_custom_configuration() {
        let config = RuleMigrationConfig {
            tracked_type: "com.example.Server".into(),
            close_method: "shutdown".into(),
            exception_type: "java.lang.Exception".into(),
            method_name: "stopServer".into(),
            dependency: None::<DependencyConfig>,
            ..Default::default()
        };
        let recipe = RuleToLifecycleMethod::new(config).unwrap();
        let (_, out, _) = run(
            &recipe,
            "package com.example;\n\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule Server server;\n}\n",
        );

        assert_eq!(
            out.to_string(),
            "package com.example;\n\nimport org.junit.jupiter.api.AfterEach;\n\nclass ServerTest {\n    Server server;\n\n    @AfterEach\n    void stopServer() throws Exception {\n        server.shutdown();\n    }\n}\n"
        );
        assert!(recipe.recipe_list().is_empty());
    }
}
