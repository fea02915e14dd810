//! Failure propagation: every error aborts the conversion with its kind.

use x2j::{convert_str, ErrorKind};

const MARKUP: &str = r#"<A><B C="x">abcd</B><N>forty</N></A>"#;

fn failure(schema: &str) -> ErrorKind {
    convert_str(MARKUP, Some(schema)).unwrap_err().kind()
}

#[test]
fn test_malformed_markup() {
    let err = convert_str("<A><B></A>", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MarkupParse);
}

#[test]
fn test_malformed_schema() {
    assert_eq!(failure(r#"{"a": "#), ErrorKind::SchemaParse);
}

#[test]
fn test_invalid_path() {
    assert_eq!(failure(r#"{"a": "XPATH(/A/#)"}"#), ErrorKind::PathEvaluation);
}

#[test]
fn test_element_path_selecting_text() {
    assert_eq!(failure(r#"{"a": "VALUE(/A/B/node())"}"#), ErrorKind::ElementResolution);
}

#[test]
fn test_coercion_failure_discards_everything() {
    assert_eq!(
        failure(r#"{"ok": "VALUE(/A/B)", "n": "VALUE(/A/N):INT"}"#),
        ErrorKind::ValueCoercion
    );
}

#[test]
fn test_missing_value_under_numeric_suffix() {
    assert_eq!(failure(r#"{"n": "XPATH(/A/B/@missing):INT"}"#), ErrorKind::ValueCoercion);
    assert_eq!(failure(r#"{"m": "VALUE(/A/Missing):DBL"}"#), ErrorKind::ValueCoercion);
}

#[test]
fn test_substring_out_of_bounds() {
    assert_eq!(failure(r#"{"s": "SUBSTR(VALUE(/A/B),5,1)"}"#), ErrorKind::StringOperation);
    assert_eq!(failure(r#"["SUBSTR(VALUE(/A/B),0,9)"]"#), ErrorKind::StringOperation);
}

#[test]
fn test_failure_inside_recurrent_template() {
    assert_eq!(
        failure(r#"[{"recurrent_path": "/A/B", "v": "RECUR_ELEM(/@C):DBL"}]"#),
        ErrorKind::ValueCoercion
    );
}

#[test]
fn test_error_text_carries_code_message() {
    let err = convert_str(MARKUP, Some(r#"{"n": "VALUE(/A/N):INT"}"#)).unwrap_err();
    assert_eq!(err.kind().code(), "X2J_ERR_010");
    assert!(err
        .to_string()
        .starts_with("Error while converting a value to the requested type."));
}
