use crate::logging::default_filter;

#[test]
fn verbosity_levels() {
    assert_eq!(default_filter(0), "warn");
    assert_eq!(default_filter(1), "debug");
    assert_eq!(default_filter(2), "trace");
    assert_eq!(default_filter(7), "trace");
}
