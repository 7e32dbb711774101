use std::fs;

use eqdiff_compiler::Family;
use indoc::indoc;

use super::loader::{LoadError, load_header, load_overrides, load_universe};

const UNIVERSE: &str = indoc! {r#"
    {
      "packages": [
        {
          "path": "example.com/app/models",
          "types": [
            {
              "name": "Server",
              "type": {
                "kind": "struct",
                "fields": [
                  { "name": "Port", "type": { "kind": "builtin", "name": "int" } }
                ]
              }
            }
          ]
        }
      ]
    }
"#};

#[test]
fn universe_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.json");
    fs::write(&path, UNIVERSE).unwrap();

    let universe = load_universe(&path).unwrap();

    assert_eq!(universe.len(), 1);
    assert!(universe.lookup("example.com/app/models.Server").is_some());
}

#[test]
fn missing_universe_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_universe(&dir.path().join("nope.json")).unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }));
    assert!(err.to_string().starts_with("failed to read '"));
}

#[test]
fn invalid_universe_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.json");
    fs::write(&path, "{ \"packages\": 3 }").unwrap();

    let err = load_universe(&path).unwrap_err();
    assert!(matches!(err, LoadError::Universe { .. }));
}

#[test]
fn yaml_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.yaml");
    fs::write(
        &path,
        indoc! {"
            example.com/app/models.Server:
              equal:
                pkg: example.com/app/compare
                name: ServersEqual
              merge:
                pkg: example.com/app/compare
                name: MergeServers
        "},
    )
    .unwrap();

    let table = load_overrides(&path).unwrap();
    let func = table
        .lookup("example.com/app/models.Server", Family::Equal)
        .unwrap();

    assert_eq!(func.pkg, "example.com/app/compare");
    assert_eq!(func.name, "ServersEqual");
    assert!(table.lookup("example.com/app/models.Server", Family::Diff).is_none());
}

#[test]
fn json_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.JSON");
    fs::write(
        &path,
        r#"{"example.com/app/models.Server": {"diff": {"pkg": "example.com/app/compare", "name": "ServersDiff"}}}"#,
    )
    .unwrap();

    let table = load_overrides(&path).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn empty_yaml_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.yml");
    fs::write(&path, "\n").unwrap();

    assert!(load_overrides(&path).unwrap().is_empty());
}

#[test]
fn malformed_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overrides.yaml");
    fs::write(&path, "example.com/app/models.Server: [1, 2]\n").unwrap();

    let err = load_overrides(&path).unwrap_err();
    assert!(matches!(err, LoadError::OverridesYaml { .. }));
}

#[test]
fn header_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("header.txt");
    fs::write(&path, "// Copyright ACME\n").unwrap();

    assert_eq!(load_header(&path).unwrap(), "// Copyright ACME\n");
}
