use crate::utils::*;

#[test]
fn capitalize_basic() {
    assert_eq!(capitalize("string"), "String");
    assert_eq!(capitalize("Backend"), "Backend");
    assert_eq!(capitalize(""), "");
    assert_eq!(capitalize("élan"), "Élan");
}

#[test]
fn path_base_segments() {
    assert_eq!(path_base("github.com/haproxytech/client-native/v6/models"), "models");
    assert_eq!(path_base(""), "");
}

#[test]
fn package_alias_rules() {
    assert_eq!(package_alias("client-native").as_deref(), Some("client_native"));
    assert_eq!(package_alias("1x-pkg").as_deref(), Some("_1x_pkg"));
    assert_eq!(package_alias("v1"), None);
    assert_eq!(package_alias("_internal"), None);
}

#[test]
fn default_package_name_from_path() {
    assert_eq!(default_package_name("example.com/app/models"), "models");
    assert_eq!(default_package_name("example.com/go-utils"), "go_utils");
}

#[test]
fn identifiers() {
    assert!(is_identifier("EqualBackend"));
    assert!(is_identifier("_x1"));
    assert!(!is_identifier("1x"));
    assert!(!is_identifier("a-b"));
    assert!(!is_identifier(""));

    assert!(is_exported("Backend"));
    assert!(!is_exported("backend"));
    assert!(!is_exported("_Backend"));
}

#[test]
fn split_full_name_cases() {
    assert_eq!(split_full_name("k8s.io/api/core/v1.Pod"), Some(("k8s.io/api/core/v1", "Pod")));
    assert_eq!(split_full_name("models.Backend"), Some(("models", "Backend")));
    assert_eq!(split_full_name("k8s.io/api"), None);
    assert_eq!(split_full_name("models."), None);
    assert_eq!(split_full_name(".Backend"), None);
}
