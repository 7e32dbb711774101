use super::*;

#[test]
fn is_indexed() {
    assert!(TypeKind::Array.is_indexed());
    assert!(TypeKind::Slice.is_indexed());
    assert!(TypeKind::Map.is_indexed());
    assert!(!TypeKind::Pointer.is_indexed());
    assert!(!TypeKind::Struct.is_indexed());
}

#[test]
fn has_element() {
    assert!(TypeKind::Pointer.has_element());
    assert!(TypeKind::Map.has_element());
    assert!(!TypeKind::Builtin.has_element());
    assert!(!TypeKind::Interface.has_element());
}

#[test]
fn is_terminal() {
    assert!(TypeKind::Interface.is_terminal());
    assert!(TypeKind::Func.is_terminal());
    assert!(TypeKind::Unknown.is_terminal());
    assert!(!TypeKind::Struct.is_terminal());
    assert!(!TypeKind::Builtin.is_terminal());
}

#[test]
fn display() {
    assert_eq!(TypeKind::Slice.to_string(), "slice");
    assert_eq!(TypeKind::Func.to_string(), "func");
}
