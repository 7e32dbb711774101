use super::*;

#[test]
fn passthrough_keeps_source() {
    let source = "package models\n";
    assert_eq!(Passthrough.format(source).unwrap(), source);
}

#[test]
fn missing_program() {
    let gofmt = Gofmt::new().program("eqdiff-no-such-formatter");
    let err = gofmt.format("package models\n").unwrap_err();

    assert!(matches!(err, FormatError::Spawn { .. }));
    assert!(err.to_string().starts_with("cannot run `eqdiff-no-such-formatter`"));
}

#[cfg(unix)]
#[test]
fn external_program_output() {
    let cat = Gofmt::new().program("cat");
    assert_eq!(cat.format("package models\n").unwrap(), "package models\n");
}

#[cfg(unix)]
#[test]
fn failing_program_is_rejection() {
    let err = Gofmt::new().program("false").format("package models\n").unwrap_err();
    assert!(matches!(err, FormatError::Rejected { .. }));
}

#[test]
fn goimports_missing_program() {
    let err = Goimports::new()
        .program("eqdiff-no-such-goimports")
        .format("package models\n")
        .unwrap_err();
    assert!(err.to_string().starts_with("cannot run `eqdiff-no-such-goimports`"));
}

#[cfg(unix)]
#[test]
fn goimports_pipes_like_gofmt() {
    let cat = Goimports::new().program("cat");
    assert_eq!(cat.format("package models\n").unwrap(), "package models\n");
}
