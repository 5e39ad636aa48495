//! Integration tests for the rewrite crate.

use rewrite_dsl::prelude::*;
use rewrite_dsl::tree::Statement;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn recipe() -> RuleToLifecycleMethod {
    update_mock_web_server().unwrap()
}

fn rewrite(source: &str) -> (Arc<CompilationUnit>, Arc<CompilationUnit>, ExecutionContext) {
    let recipe = recipe();
    let cu = JavaParser::new()
        .classpath(recipe.classpath())
        .parse(source, "ServerTest.java")
        .unwrap();
    let ctx = ExecutionContext::new();
    let out = recipe.visitor().visit(&cu, &ctx);
    (cu, out, ctx)
}

const SCENARIO_A: &str = "package com.example;

import okhttp3.mockwebserver.MockWebServer;
import org.junit.Rule;
import org.junit.Test;

public class ServerTest {
    @Rule
    public MockWebServer server = new MockWebServer();

    @Test
    public void serves() throws Exception {
        server.enqueue(response());
    }
}
";

const SCENARIO_A_EXPECTED: &str = "package com.example;

import okhttp3.mockwebserver.MockWebServer;
import org.junit.Test;
import org.junit.jupiter.api.AfterEach;

import java.io.IOException;

public class ServerTest {
    public MockWebServer server = new MockWebServer();

    @Test
    public void serves() throws Exception {
        server.enqueue(response());
    }

    @AfterEach
    void afterEachTest() throws IOException {
        server.close();
    }
}
";

const SCENARIO_B: &str = "import okhttp3.mockwebserver.MockWebServer;
import org.junit.Rule;
import org.junit.jupiter.api.AfterEach;

class ServerTest {
    @Rule
    public MockWebServer server = new MockWebServer();

    @AfterEach
    void tearDown() {
    }
}
";

const SCENARIO_B_EXPECTED: &str = "import okhttp3.mockwebserver.MockWebServer;
import org.junit.jupiter.api.AfterEach;

import java.io.IOException;

class ServerTest {
    public MockWebServer server = new MockWebServer();

    @AfterEach
    void tearDown() throws IOException {
        server.close();
    }
}
";

#[test]
fn test_rule_field_gets_new_after_each_method() {
    let (_, out, ctx) = rewrite(SCENARIO_A);

    assert_eq!(out.to_string(), SCENARIO_A_EXPECTED);
    assert!(ctx.diagnostics().is_empty());

    let class = out.classes().next().unwrap();
    let methods: Vec<_> = class
        .body
        .statements
        .iter()
        .filter(|s| matches!(s, Statement::Method(_)))
        .collect();
    assert_eq!(methods.len(), 2);
}

#[test]
fn test_rule_field_closed_in_existing_after_each_method() {
    let (_, out, _) = rewrite(SCENARIO_B);
    assert_eq!(out.to_string(), SCENARIO_B_EXPECTED);
}

#[test]
fn test_crlf_sources_keep_crlf() {
    for (source, expected) in [(SCENARIO_A, SCENARIO_A_EXPECTED), (SCENARIO_B, SCENARIO_B_EXPECTED)] {
        let (_, out, _) = rewrite(&source.replace('\n', "\r\n"));

        let printed = out.to_string();
        assert_eq!(printed, expected.replace('\n', "\r\n"));
        assert_eq!(printed.matches('\n').count(), printed.matches("\r\n").count());
    }
}

#[test]
fn test_existing_throws_clause_is_completed_once() {
    let source = SCENARIO_B.replace("void tearDown() {", "void tearDown() throws IOException {")
        .replace(
            "import org.junit.jupiter.api.AfterEach;\n",
            "import org.junit.jupiter.api.AfterEach;\n\nimport java.io.IOException;\n",
        );

    let (_, out, _) = rewrite(&source);

    assert_eq!(out.to_string(), SCENARIO_B_EXPECTED);
}

#[test]
fn test_other_exceptions_are_kept() {
    let source = SCENARIO_B.replace("void tearDown() {", "void tearDown() throws InterruptedException {");

    let (_, out, _) = rewrite(&source);

    assert!(out
        .to_string()
        .contains("void tearDown() throws InterruptedException, IOException {\n        server.close();\n    }"));
}

#[test]
fn test_field_without_rule_is_unchanged() {
    let source = SCENARIO_A.replace("    @Rule\n", "");
    let (cu, out, _) = rewrite(&source);

    assert!(Arc::ptr_eq(&cu, &out));
    assert_eq!(out.to_string(), source);
}

#[test]
fn test_unit_without_tracked_type_is_unchanged() {
    let (cu, out, _) = rewrite(
        "import org.junit.Rule;\nimport org.junit.rules.TemporaryFolder;\n\nclass A {\n    @Rule public TemporaryFolder folder = new TemporaryFolder();\n}\n",
    );
    assert!(Arc::ptr_eq(&cu, &out));
}

#[test]
fn test_rewrite_is_idempotent() {
    for source in [SCENARIO_A, SCENARIO_B] {
        let (_, once, _) = rewrite(source);
        let (reparsed, twice, _) = rewrite(&once.to_string());

        assert!(Arc::ptr_eq(&reparsed, &twice));
        assert_eq!(twice.to_string(), once.to_string());
    }
}

#[test]
fn test_fully_qualified_and_wildcard_references() {
    let (_, out, _) = rewrite(
        "import org.junit.*;\n\nclass ServerTest {\n    @org.junit.Rule\n    okhttp3.mockwebserver.MockWebServer server;\n}\n",
    );

    let printed = out.to_string();
    assert!(!printed.contains("@org.junit.Rule"));
    assert!(printed.contains("    okhttp3.mockwebserver.MockWebServer server;"));
    assert!(printed.contains("        server.close();"));
    assert!(printed.contains("import org.junit.jupiter.api.AfterEach;"));
}

#[test]
fn test_two_rule_fields_last_one_wins() {
    let (_, out, _) = rewrite(
        "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule MockWebServer first;\n    @Rule MockWebServer second;\n}\n",
    );

    let printed = out.to_string();
    assert!(printed.contains("        second.close();"));
    assert!(!printed.contains("first.close();"));
    assert!(!printed.contains("@Rule"));
    assert_eq!(printed.matches("@AfterEach").count(), 1);
}

#[test]
fn test_nested_classes_are_handled_separately() {
    let (_, out, _) = rewrite(
        "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.Rule;\n\nclass Outer {\n    static class Inner {\n        @Rule MockWebServer server;\n    }\n}\n",
    );

    assert_eq!(
        out.to_string(),
        "import okhttp3.mockwebserver.MockWebServer;\nimport org.junit.jupiter.api.AfterEach;\n\nimport java.io.IOException;\n\nclass Outer {\n    static class Inner {\n        MockWebServer server;\n\n        @AfterEach\n        void afterEachTest() throws IOException {\n            server.close();\n        }\n    }\n}\n"
    );
}

fn create_project(dir: &Path) {
    let pkg = dir.join("src/test/java/com/example");
    fs::create_dir_all(&pkg).unwrap();
    fs::create_dir_all(dir.join("target/generated")).unwrap();
    fs::write(pkg.join("ServerTest.java"), SCENARIO_A).unwrap();
    fs::write(pkg.join("PlainTest.java"), "package com.example;\n\nclass PlainTest {}\n").unwrap();
    fs::write(dir.join("target/generated/ServerTest.java"), SCENARIO_A).unwrap();
    fs::write(
        dir.join("pom.xml"),
        "<project>\n  <dependencies>\n    <dependency>\n      <groupId>com.squareup.okhttp3</groupId>\n      <artifactId>mockwebserver</artifactId>\n      <version>3.14.9</version>\n    </dependency>\n  </dependencies>\n</project>\n",
    )
    .unwrap();
}

#[test]
fn test_runner_dry_run() {
    let dir = TempDir::new().unwrap();
    create_project(dir.path());

    let result = Rewrite::in_repo(dir.path())
        .recipe(recipe())
        .dry_run()
        .run()
        .unwrap();

    assert_eq!(result.changes.len(), 1);
    assert!(result.changes[0].path.ends_with("ServerTest.java"));
    assert_eq!(result.actions.len(), 1);
    assert_eq!(result.actions[0].changes.len(), 1);
    assert_eq!(result.files_modified(), 2);
    assert_eq!(result.summary.files_changed, 2);

    let diff = result.diff();
    assert!(diff.contains("--- a/src/test/java/com/example/ServerTest.java"));
    assert!(diff.contains("-    @Rule"));
    assert!(diff.contains("+        server.close();"));
    assert!(diff.contains("+      <version>4.12.0</version>"));

    let on_disk = fs::read_to_string(dir.path().join("src/test/java/com/example/ServerTest.java")).unwrap();
    assert_eq!(on_disk, SCENARIO_A);
}

#[test]
fn test_runner_applies_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    create_project(dir.path());

    let first = Rewrite::in_repo(dir.path()).recipe(recipe()).run().unwrap();
    assert_eq!(first.files_modified(), 2);

    let source = fs::read_to_string(dir.path().join("src/test/java/com/example/ServerTest.java")).unwrap();
    assert_eq!(source, SCENARIO_A_EXPECTED);
    let pom = fs::read_to_string(dir.path().join("pom.xml")).unwrap();
    assert!(pom.contains("<version>4.12.0</version>"));
    let generated = fs::read_to_string(dir.path().join("target/generated/ServerTest.java")).unwrap();
    assert_eq!(generated, SCENARIO_A);

    let second = Rewrite::in_repo(dir.path()).recipe(recipe()).run().unwrap();
    assert_eq!(second.files_modified(), 0);
}

#[test]
fn test_runner_skip_dependencies() {
    let dir = TempDir::new().unwrap();
    create_project(dir.path());

    let result = Rewrite::in_repo(dir.path())
        .recipe(recipe())
        .skip_dependencies()
        .run()
        .unwrap();

    assert!(result.actions.is_empty());
    let pom = fs::read_to_string(dir.path().join("pom.xml")).unwrap();
    assert!(pom.contains("<version>3.14.9</version>"));
}

#[test]
fn test_runner_upgrades_dependency_without_matching_sources() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build.gradle"),
        "dependencies {\n    testImplementation 'com.squareup.okhttp3:mockwebserver:3.14.9'\n}\n",
    )
    .unwrap();

    let result = Rewrite::in_repo(dir.path()).recipe(recipe()).run().unwrap();

    assert!(result.changes.is_empty());
    assert_eq!(result.files_modified(), 1);
    let gradle = fs::read_to_string(dir.path().join("build.gradle")).unwrap();
    assert!(gradle.contains("'com.squareup.okhttp3:mockwebserver:4.12.0'"));
}

#[test]
fn test_runner_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Broken.java"), "class Broken {").unwrap();

    let err = Rewrite::in_repo(dir.path()).recipe(recipe()).run().unwrap_err();

    assert!(matches!(err, RefactorError::Parse { .. }));
}

#[test]
fn test_runner_missing_root() {
    let err = Rewrite::in_repo("/nonexistent/project")
        .recipe(recipe())
        .run()
        .unwrap_err();
    assert!(matches!(err, RefactorError::RepoNotFound(_)));
}

#[test]
fn test_runner_with_custom_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("migration.yaml");
    fs::write(
        &config_path,
        "tracked_type: com.example.Server\nclose_method: shutdown\nmethod_name: stopServer\ndependency: null\n",
    )
    .unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("ServerTest.java"),
        "package com.example;\n\nimport org.junit.Rule;\n\nclass ServerTest {\n    @Rule Server server;\n}\n",
    )
    .unwrap();

    let config = RuleMigrationConfig::from_file(&config_path).unwrap();
    let result = Rewrite::in_repo(dir.path())
        .recipe(RuleToLifecycleMethod::new(config).unwrap())
        .run()
        .unwrap();

    assert_eq!(result.changes.len(), 1);
    assert!(result.actions.is_empty());
    let source = fs::read_to_string(src.join("ServerTest.java")).unwrap();
    assert!(source.contains("    void stopServer() throws IOException {\n        server.shutdown();\n    }"));
    assert!(source.contains("import java.io.IOException;"));
}
