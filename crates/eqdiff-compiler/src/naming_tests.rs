use std::collections::BTreeSet;

use eqdiff_core::TypeHandle;

use crate::naming::{Family, fqn, function_name, spell};
use crate::test_utils::{MODELS, SHARED, lookup, models_universe};
use crate::Import;

#[test]
fn fqn_tokens() {
    assert_eq!(fqn("string"), "String");
    assert_eq!(fqn("[]string"), "SliceString");
    assert_eq!(fqn("[2]int"), "Array2Int");
    assert_eq!(fqn("[]*Server"), "SlicePointerServer");
    assert_eq!(fqn("**int"), "PointerPointerInt");
    assert_eq!(fqn("map[string][]int"), "MapStringSliceInt");
    assert_eq!(fqn("shared.Labels"), "SharedLabels");
    assert_eq!(fqn("[][]byte"), "SliceSliceByte");
}

#[test]
fn fqn_is_deterministic() {
    assert_eq!(fqn("map[string]*models.Server"), fqn("map[string]*models.Server"));
    assert_ne!(fqn("[]string"), fqn("[1]string"));
}

#[test]
fn function_names() {
    assert_eq!(function_name(Family::Equal, "Tags"), "EqualTags");
    assert_eq!(function_name(Family::Diff, "[]Server"), "DiffSliceServer");
    assert_eq!(function_name(Family::Diff, "*int"), "DiffPointerInt");
}

#[test]
fn family_properties() {
    assert_eq!(Family::ALL, [Family::Equal, Family::Diff]);
    assert_eq!(Family::Equal.result_type(), "bool");
    assert_eq!(Family::Diff.result_type(), "map[string][]interface{}");
    assert_eq!(Family::Diff.file_suffix(), "diff");
}

#[test]
fn spell_in_own_package() {
    let u = models_universe();
    let backend = lookup(&u, "Backend");
    let mut imports = BTreeSet::new();

    assert_eq!(spell(&backend, MODELS, &mut imports), "Backend");
    assert!(imports.is_empty());
}

#[test]
fn spell_from_other_package() {
    let u = models_universe();
    let backend = lookup(&u, "Backend");
    let labels = backend
        .fields()
        .into_iter()
        .find(|f| f.name == "Labels")
        .unwrap()
        .ty;
    let mut imports = BTreeSet::new();

    assert_eq!(spell(&labels, MODELS, &mut imports), "shared.Labels");
    assert_eq!(spell(&labels, SHARED, &mut BTreeSet::new()), "Labels");
    assert_eq!(imports.into_iter().collect::<Vec<_>>(), [Import::new(SHARED, "shared")]);
}

#[test]
fn spell_structural() {
    let u = models_universe();
    let listener = lookup(&u, "Listener");
    let spelled: Vec<String> = listener
        .fields()
        .iter()
        .map(|f| spell(&f.ty, MODELS, &mut BTreeSet::new()))
        .collect();

    assert_eq!(spelled, ["[2]int", "map[string]Server", "struct { X int }"]);
}
