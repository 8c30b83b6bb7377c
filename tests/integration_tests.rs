//! Integration tests for the reorder-tree CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use reorder_tree::core::Product;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PRODUCT: &str = r#"part_number: ASM-100
nodes:
  - part_number: WASHER
    instance_name: w
    source: bought
    properties:
      filter: DIN125
  - part_number: PLATE
    instance_name: p2
    source: made
  - part_number: BOLT
    instance_name: b
    source: bought
    properties:
      filter: DIN933
  - part_number: README
    instance_name: doc
    source: unknown
    kind: other
  - part_number: PLATE
    instance_name: p1
    source: made
    properties:
      group: Frame
"#;

/// Helper to get a reorder-tree command isolated from the user's config
fn reorder_tree(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reorder-tree").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env_remove("REORDER_TREE_CONFIG")
        .env_remove("REORDER_TREE_DELIMITER")
        .env_remove("REORDER_TREE_POSITION")
        .env_remove("REORDER_TREE_START_INDEX")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a product file next to a fast project config
fn setup_product(extra_config: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".reorder-tree.yaml"),
        format!("dialog:\n  settle_ms: 0\n{}", extra_config),
    )
    .unwrap();
    let path = tmp.path().join("asm.yaml");
    fs::write(&path, PRODUCT).unwrap();
    (tmp, path)
}

fn part_numbers(path: &Path) -> Vec<String> {
    Product::load(path)
        .unwrap()
        .nodes
        .into_iter()
        .map(|n| n.part_number)
        .collect()
}

fn instance_names(path: &Path) -> Vec<String> {
    Product::load(path)
        .unwrap()
        .nodes
        .into_iter()
        .map(|n| n.instance_name)
        .collect()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    reorder_tree(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("product assembly"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    reorder_tree(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reorder-tree"));
}

#[test]
fn test_missing_product_file_fails() {
    let tmp = TempDir::new().unwrap();
    reorder_tree(tmp.path())
        .args(["run", "missing.yaml"])
        .assert()
        .failure();
}

// ============================================================================
// Run Command Tests
// ============================================================================

#[test]
fn test_run_full_workflow() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 4 of 4"))
        .stdout(predicate::str::contains("Reordered"));

    assert_eq!(
        part_numbers(&path),
        vec!["GROUP FRAME", "PLATE", "PLATE", "README", "GROUP NO GROUP", "WASHER", "BOLT"]
    );

    let names = instance_names(&path);
    assert_eq!(names[1], "PLATE.1");
    assert_eq!(names[2], "PLATE.2");
    assert_eq!(names[3], "README.1");
    assert_eq!(names[5], "WASHER.1");
    assert_eq!(names[6], "BOLT.1");
}

#[test]
fn test_run_without_groups_or_renumbering() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups", "--no-renumber", "-q"])
        .assert()
        .success();

    assert_eq!(instance_names(&path), vec!["p1", "p2", "w", "doc", "b"]);
}

#[test]
fn test_run_is_idempotent() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path()).args(["run", "asm.yaml"]).assert().success();
    let first = fs::read_to_string(&path).unwrap();

    reorder_tree(tmp.path()).args(["run", "asm.yaml"]).assert().success();
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_run_shuffled_gives_same_result() {
    let (tmp, path) = setup_product("");
    let shuffled = tmp.path().join("shuffled.yaml");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups", "-o", "plain.yaml"])
        .assert()
        .success();
    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups", "--shuffle-seed", "11", "-o", "shuffled.yaml"])
        .assert()
        .success();

    assert_eq!(part_numbers(&tmp.path().join("plain.yaml")), part_numbers(&shuffled));
    // The input file itself was not touched
    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_dry_run_writes_nothing() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_json_report() {
    let (tmp, _path) = setup_product("");

    let output = reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["groups"].as_array().unwrap().len(), 0);
    assert!(report["sort"]["moves"].as_u64().unwrap() > 0);
    assert_eq!(report["renumber"]["skipped"], 0);
}

#[test]
fn test_run_token_out_of_range_leaves_file_unchanged() {
    let (tmp, path) = setup_product("tree:\n  in_position: 5\n");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Warning:"))
        .stderr(predicate::str::contains("Failed to sort nodes"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_without_dialog_window_is_an_error() {
    let (tmp, path) = setup_product("  window_name: Part design\n");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to connect"))
        .stderr(predicate::str::contains("Warning:").not());

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_in_disabled_workspace_is_a_warning() {
    let (tmp, path) = setup_product("active: false\n");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("disabled"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_outside_workspace_is_denied() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("asm.yaml");
    fs::write(&path, PRODUCT).unwrap();
    let settings = tmp.path().join("settings.yaml");
    fs::write(
        &settings,
        "restrictions:\n  allow_outside_workspace: false\ndialog:\n  settle_ms: 0\n",
    )
    .unwrap();

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--config"])
        .arg(&settings)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No workspace configuration"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_outside_workspace_allowed_by_default() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("asm.yaml");
    fs::write(&path, PRODUCT).unwrap();
    let settings = tmp.path().join("settings.yaml");
    fs::write(&settings, "dialog:\n  settle_ms: 0\n").unwrap();

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups", "--no-renumber"])
        .env("REORDER_TREE_CONFIG", &settings)
        .assert()
        .success();

    assert_eq!(instance_names(&path), vec!["p1", "p2", "w", "doc", "b"]);
}

#[test]
fn test_run_env_overrides_project_config() {
    let (tmp, path) = setup_product("tree:\n  in_position: 5\n");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml", "--no-groups", "--no-renumber"])
        .env("REORDER_TREE_POSITION", "1")
        .assert()
        .success();

    assert_eq!(instance_names(&path), vec!["p1", "p2", "w", "doc", "b"]);
}

#[test]
fn test_run_rejects_unknown_user() {
    let (tmp, path) = setup_product("restrictions:\n  allow_all_users: false\n");

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml"])
        .env("USER", "nobody")
        .env("USERNAME", "nobody")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not allowed"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_run_reports_yaml_syntax_errors() {
    let (tmp, path) = setup_product("");
    fs::write(&path, "part_number: ASM\nnodes:\n  - part_number: [\n").unwrap();

    reorder_tree(tmp.path())
        .args(["run", "asm.yaml"])
        .assert()
        .failure();
}

// ============================================================================
// Plan Command Tests
// ============================================================================

#[test]
fn test_plan_json() {
    let (tmp, path) = setup_product("");

    let output = reorder_tree(tmp.path())
        .args(["plan", "asm.yaml", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["instance_name"], "p1");
    assert_eq!(rows[0]["from"], 3);
    assert_eq!(rows[0]["moves_up"], 3);

    // Planning never writes
    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_plan_with_groups_includes_separators() {
    let (tmp, _path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["plan", "asm.yaml", "--groups", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GROUP FRAME"))
        .stdout(predicate::str::contains("GROUP NO GROUP"));
}

#[test]
fn test_plan_markdown_and_csv() {
    let (tmp, _path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["plan", "asm.yaml", "-f", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| POS"));

    reorder_tree(tmp.path())
        .args(["plan", "asm.yaml", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "position,from,moves_up,part_number,instance_name,source,key",
        ));
}

#[test]
fn test_plan_table_summary() {
    let (tmp, _path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["plan", "asm.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("move(s) needed"));
}

// ============================================================================
// Renumber and Groups Command Tests
// ============================================================================

#[test]
fn test_renumber_in_tree_order() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["renumber", "asm.yaml", "--start-index", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed"));

    assert_eq!(
        instance_names(&path),
        vec!["WASHER.10", "PLATE.10", "BOLT.10", "README.10", "PLATE.11"]
    );
}

#[test]
fn test_renumber_index_overflow_leaves_file_unchanged() {
    let (tmp, path) = setup_product("");

    // PLATE occurs twice, so its second index does not fit
    reorder_tree(tmp.path())
        .args(["renumber", "asm.yaml", "--start-index", "4294967295"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overflows"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_renumber_dry_run() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["renumber", "asm.yaml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p1\tPLATE.2"));

    assert_eq!(fs::read_to_string(&path).unwrap(), PRODUCT);
}

#[test]
fn test_groups_create_and_remove() {
    let (tmp, path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["groups", "asm.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 2 group separator(s)"));

    let product = Product::load(&path).unwrap();
    let separators: Vec<_> = product.nodes.iter().filter(|n| n.is_group_identifier()).collect();
    assert_eq!(separators.len(), 2);
    assert!(separators.iter().all(|n| !n.in_bom));

    reorder_tree(tmp.path())
        .args(["groups", "asm.yaml", "--remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2"));

    assert_eq!(Product::load(&path).unwrap().nodes.len(), 5);
}

// ============================================================================
// Config and Completions Tests
// ============================================================================

#[test]
fn test_config_show_merges_project_config() {
    let (tmp, _path) = setup_product("tree:\n  start_index: 7\n");

    reorder_tree(tmp.path())
        .args(["config", "show", "tree.start_index"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));

    reorder_tree(tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("window_name: Graph tree reordering"));
}

#[test]
fn test_config_show_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    reorder_tree(tmp.path())
        .args(["config", "show", "tree.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_keys_and_path() {
    let (tmp, _path) = setup_product("");

    reorder_tree(tmp.path())
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tree.in_delimiter"));

    reorder_tree(tmp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".reorder-tree.yaml"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    reorder_tree(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reorder-tree"));
}
