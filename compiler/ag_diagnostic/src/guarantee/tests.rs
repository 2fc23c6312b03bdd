use super::*;

#[test]
fn from_error_count_returns_some_for_nonzero() {
    assert!(ErrorGuaranteed::from_error_count(1).is_some());
    assert!(ErrorGuaranteed::from_error_count(100).is_some());
}

#[test]
fn from_error_count_returns_none_for_zero() {
    assert!(ErrorGuaranteed::from_error_count(0).is_none());
}

#[test]
fn display_shows_error_message() {
    assert_eq!(ErrorGuaranteed::new().to_string(), "error(s) emitted");
}

#[test]
fn guarantees_compare_equal() {
    let first = ErrorGuaranteed::new();
    let second = first;
    assert_eq!(first, second);
}
