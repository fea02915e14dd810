//! Default projection tests (no schema)

use crate::common::fixture;
use insta::assert_snapshot;
use serde_json::{json, Value};
use x2j::{convert_str, emit_json};

#[test]
fn test_order_without_schema() {
    let json = convert_str(&fixture("structural", "order.xml"), None).unwrap();
    let expected: Value = serde_json::from_str(&fixture("structural", "order.json")).unwrap();
    assert_eq!(json, expected);
}

#[test]
fn test_empty_embedded_schema_falls_back_to_structure() {
    let json = convert_str("<Root><JSONSchema>  </JSONSchema><Id>5</Id></Root>", None).unwrap();
    assert_eq!(json, json!({"Root": {"JSONSchema": "", "Id": 5}}));
}

#[test]
fn test_emitted_structure() {
    let json = convert_str(r#"<Box w="2"><Item>a</Item><Item>b</Item></Box>"#, None).unwrap();
    let text = String::from_utf8(emit_json(&json, 4).unwrap()).unwrap();
    assert_snapshot!(text, @r###"
    {
        "Box": {
            "w": 2,
            "Item": [
                "a",
                "b"
            ]
        }
    }
    "###);
}
