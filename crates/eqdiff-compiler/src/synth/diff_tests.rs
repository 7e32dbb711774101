use indoc::indoc;

use super::*;
use crate::test_utils::{describe, job_universe, models_universe, untab};

fn diff_of(ctx: &GenContext, name: &str) -> String {
    let function = ctx
        .find_function(name)
        .unwrap_or_else(|| panic!("no function {name}"));
    untab(&function.text)
}

#[test]
fn struct_method() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Backend"), &OverrideTable::new());

    assert_eq!(
        untab(&ctx.functions[0].text),
        indoc! {r#"
            func (rec Backend) Diff(obj Backend) map[string][]interface{} {
                diff := make(map[string][]interface{})
                if rec.Name != obj.Name {
                    diff["Name"] = []interface{}{rec.Name, obj.Name}
                }
                for diffKey, diffValue := range DiffSliceServer(rec.Servers, obj.Servers) {
                    diff[diffKeyJoin("Servers", diffKey)] = diffValue
                }
                for diffKey, diffValue := range rec.Tags.Diff(obj.Tags) {
                    diff[diffKeyJoin("Tags", diffKey)] = diffValue
                }
                for diffKey, diffValue := range rec.Labels.Diff(obj.Labels) {
                    diff[diffKeyJoin("Labels", diffKey)] = diffValue
                }
                for diffKey, diffValue := range DiffPointerInt(rec.Weight, obj.Weight) {
                    diff[diffKeyJoin("Weight", diffKey)] = diffValue
                }
                // Hook is not compared: func values are not compared
                return diff
            }"#}
    );
}

#[test]
fn slice_helper() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Backend"), &OverrideTable::new());

    assert_eq!(
        diff_of(&ctx, "DiffTags"),
        indoc! {r#"
            func DiffTags(x, y Tags) map[string][]interface{} {
                diff := make(map[string][]interface{})
                if len(x) == 0 && len(y) == 0 {
                    return diff
                }
                if x == nil {
                    diff[""] = []interface{}{nil, y}
                    return diff
                }
                if y == nil {
                    diff[""] = []interface{}{x, nil}
                    return diff
                }
                for i := 0; i < len(x) && i < len(y); i++ {
                    if x[i] != y[i] {
                        diff[fmt.Sprintf("[%d]", i)] = []interface{}{x[i], y[i]}
                    }
                }
                for i := len(y); i < len(x); i++ {
                    diff[fmt.Sprintf("[%d]", i)] = []interface{}{x[i], nil}
                }
                for i := len(x); i < len(y); i++ {
                    diff[fmt.Sprintf("[%d]", i)] = []interface{}{nil, y[i]}
                }
                return diff
            }"#}
    );
    let tags = ctx.find_function("DiffTags").unwrap();
    assert!(tags.imports.contains(&Import::fmt()));
}

#[test]
fn slice_of_structs_merges() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Backend"), &OverrideTable::new());

    let text = diff_of(&ctx, "DiffSliceServer");
    assert!(text.contains("for diffKey, diffValue := range x[i].Diff(y[i]) {"));
    assert!(text.contains(r#"diff[diffKeyJoin(fmt.Sprintf("[%d]", i), diffKey)] = diffValue"#));
}

#[test]
fn map_helper() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Listener"), &OverrideTable::new());

    assert_eq!(
        diff_of(&ctx, "DiffMapStringServer"),
        indoc! {r#"
            func DiffMapStringServer(x, y map[string]Server) map[string][]interface{} {
                diff := make(map[string][]interface{})
                if len(x) == 0 && len(y) == 0 {
                    return diff
                }
                if x == nil {
                    diff[""] = []interface{}{nil, y}
                    return diff
                }
                if y == nil {
                    diff[""] = []interface{}{x, nil}
                    return diff
                }
                for k, vx := range x {
                    vy, ok := y[k]
                    if !ok {
                        diff[fmt.Sprintf("[%v]", k)] = []interface{}{vx, nil}
                        continue
                    }
                    for diffKey, diffValue := range vx.Diff(vy) {
                        diff[diffKeyJoin(fmt.Sprintf("[%v]", k), diffKey)] = diffValue
                    }
                }
                for k, vy := range y {
                    if _, ok := x[k]; !ok {
                        diff[fmt.Sprintf("[%v]", k)] = []interface{}{nil, vy}
                    }
                }
                return diff
            }"#}
    );
}

#[test]
fn array_helper() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Listener"), &OverrideTable::new());

    assert_eq!(
        diff_of(&ctx, "DiffArray2Int"),
        indoc! {r#"
            func DiffArray2Int(x, y [2]int) map[string][]interface{} {
                diff := make(map[string][]interface{})
                for i := range x {
                    if x[i] != y[i] {
                        diff[fmt.Sprintf("[%d]", i)] = []interface{}{x[i], y[i]}
                    }
                }
                return diff
            }"#}
    );
}

#[test]
fn pointer_to_builtin() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Backend"), &OverrideTable::new());

    assert_eq!(
        diff_of(&ctx, "DiffPointerInt"),
        indoc! {r#"
            func DiffPointerInt(x, y *int) map[string][]interface{} {
                diff := make(map[string][]interface{})
                if x == nil && y == nil {
                    return diff
                }
                if x == nil {
                    diff[""] = []interface{}{nil, *y}
                    return diff
                }
                if y == nil {
                    diff[""] = []interface{}{*x, nil}
                    return diff
                }
                if *x != *y {
                    diff[""] = []interface{}{*x, *y}
                }
                return diff
            }"#}
    );
    let helper = ctx.find_function("DiffPointerInt").unwrap();
    assert!(helper.imports.is_empty());
}

#[test]
fn pointer_to_struct_returns_nested_diff() {
    let u = models_universe();
    let ctx = synthesize_diff(&describe(&u, "Node"), &OverrideTable::new());

    assert!(diff_of(&ctx, "DiffPointerNode").ends_with("return (*x).Diff(*y)\n}"));
}

#[test]
fn key_join_helper() {
    let join = diff_key_join();

    assert_eq!(join.name, DIFF_KEY_JOIN);
    assert!(!join.method);
    assert_eq!(
        untab(&join.text),
        indoc! {r#"
            func diffKeyJoin(prefix, key string) string {
                if key == "" {
                    return prefix
                }
                if prefix == "" {
                    return key
                }
                if key[0] == '[' {
                    return prefix + key
                }
                return prefix + "." + key
            }"#}
    );
}

#[test]
fn defined_builtin_unit() {
    let u = job_universe();
    let ctx = synthesize_diff(&describe(&u, "Job"), &OverrideTable::new());

    assert!(untab(&ctx.functions[0].text).contains("range rec.Mode.Diff(obj.Mode) {"));
    assert_eq!(
        diff_of(&ctx, "DiffMode"),
        indoc! {r#"
            func DiffMode(x, y Mode) map[string][]interface{} {
                diff := make(map[string][]interface{})
                if x != y {
                    diff[""] = []interface{}{x, y}
                }
                return diff
            }"#}
    );
}
