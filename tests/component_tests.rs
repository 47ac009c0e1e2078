//! Component lifecycle integration tests
//!
//! Exercises init, add, remove, and doctor end to end against the persisted
//! configuration file. AI components are avoided where a live model source
//! could trigger a real download; templates cover that synthesis path.

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_init_custom_template_creates_config() {
    let project = TestProject::new();
    project.init("custom");

    assert!(project.config_exists());
    let config = project.config_contents();
    assert!(config.contains("name: testproj"));
    assert!(config.contains("type: custom"));
    assert!(!config.contains("services"));
}

#[test]
fn test_init_rag_template_synthesizes_full_stack() {
    let project = TestProject::new();
    project.init("rag");

    let config = project.config_contents();
    assert!(config.contains("type: rag"));
    assert!(config.contains("- llm"));
    assert!(config.contains("- embedding"));
    assert!(config.contains("- vector"));
    assert!(config.contains("pgvector"));
    assert!(config.contains("qwen2.5:3b"));
    assert!(config.contains("nomic-embed-text"));
    assert!(config.contains("default: qwen2.5:3b"));
    assert!(config.contains("port: 11434"));
}

#[test]
fn test_init_twice_fails() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .args(["init", "--name", "again", "--template", "custom", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_unknown_template_fails() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["init", "--template", "microservice", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown template: microservice"));
}

#[test]
fn test_add_cache_writes_defaults() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .args(["component", "add", "cache", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'cache'"));

    let config = project.config_contents();
    assert!(config.contains("- cache"));
    assert!(config.contains("type: redis"));
    assert!(config.contains("port: 6379"));
    assert!(config.contains("maxmemory_policy: allkeys-lru"));
}

#[test]
fn test_re_add_is_a_no_op() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .args(["component", "add", "cache", "-y"])
        .assert()
        .success();
    let before = project.config_contents();

    project
        .cmd()
        .args(["component", "add", "cache", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already enabled"));
    assert_eq!(project.config_contents(), before);
}

#[test]
fn test_add_vector_cascades_database() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .args(["component", "add", "vector", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'database'"))
        .stdout(predicate::str::contains("Added 'vector'"));

    let config = project.config_contents();
    assert!(config.contains("- database"));
    assert!(config.contains("- vector"));
    assert!(config.contains("type: postgres"));
    assert!(config.contains("version: '16'") || config.contains("version: \"16\""));
    assert!(config.contains("port: 5432"));
    assert!(config.contains("pgvector"));
}

#[test]
fn test_remove_vector_keeps_database() {
    let project = TestProject::new();
    project.init("custom");
    project
        .cmd()
        .args(["component", "add", "vector", "-y"])
        .assert()
        .success();

    project
        .cmd()
        .args(["component", "remove", "vector", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'vector'"));

    let config = project.config_contents();
    assert!(!config.contains("- vector"));
    assert!(!config.contains("pgvector"));
    assert!(config.contains("- database"));
    assert!(config.contains("type: postgres"));
}

#[test]
fn test_remove_database_cascades_vector() {
    let project = TestProject::new();
    project.init("custom");
    project
        .cmd()
        .args(["component", "add", "vector", "-y"])
        .assert()
        .success();

    project
        .cmd()
        .args(["component", "remove", "database", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'vector'"))
        .stdout(predicate::str::contains("Removed 'database'"));

    let config = project.config_contents();
    assert!(!config.contains("- database"));
    assert!(!config.contains("- vector"));
    assert!(!config.contains("postgres"));
}

#[test]
fn test_remove_not_enabled_component() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .args(["component", "remove", "storage", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not enabled"));
}

#[test]
fn test_add_unknown_component_fails() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .args(["component", "add", "blockchain", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown component: blockchain"));
}

#[test]
fn test_component_list_marks_enabled() {
    let project = TestProject::new();
    project.init("custom");
    project
        .cmd()
        .args(["component", "add", "cache", "-y"])
        .assert()
        .success();

    project
        .cmd()
        .args(["component", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[enabled]"));
}

#[test]
fn test_component_info_shows_models() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["component", "info", "llm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("qwen2.5:3b"))
        .stdout(predicate::str::contains("(default)"));
}

#[test]
fn test_doctor_passes_on_fresh_project() {
    let project = TestProject::new();
    project.init("rag");

    project
        .cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("all checks passed"));
}

#[test]
fn test_doctor_detects_and_fixes_broken_config() {
    let project = TestProject::new();
    project.init("custom");
    project
        .cmd()
        .args(["component", "add", "vector", "-y"])
        .assert()
        .success();

    // Hand-edit the config to violate the dependency invariant
    let config = project.config_contents();
    let broken = config.replace("- database\n", "");
    std::fs::write(project.path.join(".localdev/config.yaml"), broken).unwrap();

    project
        .cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("requires 'database'"))
        .stdout(predicate::str::contains("--fix"));

    project
        .cmd()
        .args(["doctor", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repaired"));

    project
        .cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("all checks passed"));
    assert!(project.config_contents().contains("- database"));
}

#[test]
fn test_start_with_no_components_is_graceful() {
    let project = TestProject::new();
    project.init("custom");

    project
        .cmd()
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("No services configured"));
}

#[test]
fn test_start_unknown_service_fails() {
    let project = TestProject::new();
    project.init("custom");
    project
        .cmd()
        .args(["component", "add", "cache", "-y"])
        .assert()
        .success();

    project
        .cmd()
        .args(["start", "warp-drive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown service: warp-drive"));
}
