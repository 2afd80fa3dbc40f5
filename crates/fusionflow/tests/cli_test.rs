#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TOPOLOGY: &str = r#"
- name: us-east
  display_name: US East
  availability_zones:
    - name: az1
      network_interface_groups:
        - name: nigA
          group_type: eth
          eth:
            prefix: 10.21.200.0/24
            gateway: 10.21.200.1
            mtu: 1500
        - name: nigB
          group_type: eth
          eth:
            prefix: 10.21.201.0/24
      storage_endpoints:
        - name: se-1
          endpoint_type: iscsi
          iscsi:
            - address: 10.21.200.124/24
              gateway: 10.21.200.1
              network_interface_groups: [nigA]
      arrays:
        - name: arr1
          host_name: flasharray1
          hardware_type: flash-array-x
          appliance_id: "1187351-242133817"
"#;

const REGION_ONLY: &str = r#"
- name: us-east
  display_name: US East
"#;

fn topology_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn fusion() -> Command {
    let mut cmd = Command::cargo_bin("fusion").unwrap();
    cmd.env_remove("FUSION_TOPOLOGY_PATH")
        .env_remove("FUSION_API_HOST")
        .env_remove("FUSION_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    fusion()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ストレージ基盤をYAMLから構築する"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("validate"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    fusion()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fusionflow"));
}

/// applyコマンドのヘルプにポーリング設定が表示されることを確認
#[test]
fn test_apply_help() {
    fusion()
        .arg("apply")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[TOPOLOGY]"))
        .stdout(predicate::str::contains("--poll-interval"))
        .stdout(predicate::str::contains("--poll-timeout"));
}

/// 不正なコマンドでエラーになることを確認
#[test]
fn test_invalid_command() {
    fusion().arg("invalid-command").assert().failure();
}

#[test]
fn test_validate_topology() {
    let file = topology_file(TOPOLOGY);
    fusion()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("トポロジーは正常です"))
        .stdout(predicate::str::contains("リージョン: 1個"))
        .stdout(predicate::str::contains("アレイ: 1個"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let file = topology_file(&TOPOLOGY.replace("mtu: 1500", "mtu: 100"));
    fusion()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nigA"));
}

#[test]
fn test_validate_rejects_undeclared_override_group() {
    let file = topology_file(&TOPOLOGY.replace(
        "          hardware_type: flash-array-x\n",
        "          hardware_type: flash-array-x\n          network_interface_group: nig-typo\n",
    ));
    fusion()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("arr1"))
        .stderr(predicate::str::contains("nig-typo"));
}

#[test]
fn test_validate_broken_yaml() {
    let file = topology_file("- name: [unterminated");
    fusion().arg("validate").arg(file.path()).assert().failure();
}

/// トポロジーファイルが見つからない場合はエラーになることを確認
#[test]
fn test_validate_without_topology() {
    let dir = tempfile::tempdir().unwrap();
    fusion()
        .current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .arg("validate")
        .assert()
        .failure();
}

#[test]
fn test_plan_lists_actions_in_order() {
    let file = topology_file(TOPOLOGY);
    fusion()
        .arg("plan")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Create region us-east"))
        .stdout(predicate::str::contains(
            "Turn off maintenance mode on array arr1 in availability zone az1 in region us-east",
        ))
        .stdout(predicate::str::contains("network interface group nigB"))
        .stdout(predicate::str::contains("6 to create, 1 to update, 1 arrays to rebind"));
}

#[test]
fn test_apply_empty_topology_needs_no_api() {
    let file = topology_file("[]");
    fusion()
        .arg("apply")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("適用するリソースがありません"))
        .stdout(predicate::str::contains("Done setting up infrastructure!"));
}

#[test]
fn test_apply_requires_access_token() {
    let file = topology_file(REGION_ONLY);
    fusion()
        .arg("apply")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("FUSION_ACCESS_TOKEN"));
}

#[test]
fn test_apply_creates_region() {
    let mut server = mockito::Server::new();
    let create = server
        .mock("POST", "/api/1.1/regions")
        .match_header("authorization", "Bearer token")
        .with_status(202)
        .with_body(r#"{"id": "op-1", "status": "Succeeded"}"#)
        .expect(1)
        .create();

    let file = topology_file(REGION_ONLY);
    fusion()
        .env("FUSION_ACCESS_TOKEN", "token")
        .arg("apply")
        .arg(file.path())
        .arg("--api-host")
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating region us-east"))
        .stdout(predicate::str::contains("Done setting up infrastructure!"))
        .stdout(predicate::str::contains("1 created"));

    create.assert();
}

#[test]
fn test_apply_accepts_existing_region() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/1.1/regions")
        .with_status(409)
        .with_body(r#"{"error": {"pure_code": "NameReserved", "message": "taken"}}"#)
        .create();
    server
        .mock("GET", "/api/1.1/regions/us-east")
        .with_status(200)
        .with_body(r#"{"id": "r-1", "name": "us-east"}"#)
        .create();

    let file = topology_file(REGION_ONLY);
    fusion()
        .env("FUSION_ACCESS_TOKEN", "token")
        .env("FUSION_API_HOST", server.url())
        .arg("apply")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("1 already existed"));
}

#[test]
fn test_apply_aborts_on_reserved_name_without_resource() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/1.1/regions")
        .with_status(409)
        .create();
    server
        .mock("GET", "/api/1.1/regions/us-east")
        .with_status(404)
        .create();

    let file = topology_file(REGION_ONLY);
    fusion()
        .env("FUSION_ACCESS_TOKEN", "token")
        .env("FUSION_API_HOST", server.url())
        .arg("apply")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Creating region us-east"))
        .stdout(predicate::str::contains("Done setting up infrastructure!").not())
        .stderr(predicate::str::contains("is reserved"));
}
