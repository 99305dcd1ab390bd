use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E5002.as_str(), "E5002");
}

#[test]
fn test_error_code_families() {
    assert!(ErrorCode::E3006.is_splice_error());
    assert!(!ErrorCode::E2001.is_splice_error());
    assert!(ErrorCode::E5001.is_generative_error());
    assert!(!ErrorCode::E6002.is_generative_error());
}

#[test]
fn test_descriptions_are_nonempty() {
    for code in [
        ErrorCode::E1001,
        ErrorCode::E2001,
        ErrorCode::E3001,
        ErrorCode::E4002,
        ErrorCode::E5002,
        ErrorCode::E6001,
        ErrorCode::E9001,
    ] {
        assert!(!code.description().is_empty(), "{code} has no description");
    }
}
