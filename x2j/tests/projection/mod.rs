//! Schema projection tests
//!
//! End-to-end conversions of the shipment fixture with the schema supplied
//! as a file, as a string and embedded in the markup.

use crate::common::{fixture, fixture_path};
use serde_json::{json, Value};
use x2j::{convert, convert_document, convert_str, load_markup, load_schema};

fn assert_shipment_header(json: &Value) {
    assert_eq!(json["ShipmentIdentifier"], "1202103301135561781564861");
    assert_eq!(json["Carrier"], "XYZ-ABCD Logistics");
    assert_eq!(json["LineItems"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["LineItems"][0]["Identifier"], "I1");
}

#[test]
fn test_schema_from_file() {
    let markup = x2j::read_markup_file(fixture_path("projection", "shipment.xml")).unwrap();
    let schema_text = x2j::read_schema_file(fixture_path("projection", "shipment_schema.json")).unwrap();
    let schema = load_schema(&schema_text).unwrap().unwrap();
    let doc = load_markup(&markup).unwrap();

    let json = convert(doc.root_element(), Some(&schema)).unwrap();

    assert_shipment_header(&json);
    assert_eq!(json["Type"], "COD_SHP");
    assert_eq!(json["OrderNo"], "22268086");
    assert_eq!(json["Temp"], json!(["Some Org Name", 1234, "ABCD", "22268086"]));
    assert_eq!(
        json["OrderTempInfo"],
        "&lt;Note&gt;Leave at door&lt;/Note&gt;"
    );
}

#[test]
fn test_recurrent_line_items() {
    let json = convert_str(
        &fixture("projection", "shipment.xml"),
        Some(&fixture("projection", "shipment_schema.json")),
    )
    .unwrap();

    assert_eq!(
        json["LineItems"],
        json!([
            {
                "Identifier": "I1",
                "Quantity": 2,
                "Description": "Blue widget",
                "Status": "OPEN",
                "Price": 12.5,
                "Field1": "CONSTANT1",
                "Field2": 1000,
                "Field3": "1001",
                "Field4": 1001
            },
            {
                "Identifier": "I2",
                "Quantity": 1,
                "Description": "Red widget",
                "Status": "SHIPPED",
                "Price": 7.0,
                "Field1": "CONSTANT1",
                "Field2": 1000,
                "Field3": "1001",
                "Field4": 1001
            },
            {
                "Identifier": "I3",
                "Quantity": 10,
                "Description": "Bolt &amp; nut",
                "Status": "OPEN",
                "Price": 0.25,
                "Field1": "CONSTANT1",
                "Field2": 1000,
                "Field3": "1001",
                "Field4": 1001
            }
        ])
    );
}

#[test]
fn test_string_operators_in_schema() {
    let json = convert_str(
        &fixture("projection", "shipment.xml"),
        Some(&fixture("projection", "shipment_schema.json")),
    )
    .unwrap();

    assert_eq!(
        json["Summary"],
        json!({
            "Label": "SOME ORG NAME, 1001",
            "KeyPrefix": 1202,
            "KeyLength": 25,
            "Open": "OPEN"
        })
    );
}

#[test]
fn test_output_keeps_schema_key_order() {
    let json = convert_str(
        &fixture("projection", "shipment.xml"),
        Some(&fixture("projection", "shipment_schema.json")),
    )
    .unwrap();

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "ShipmentIdentifier",
            "Type",
            "OrderNo",
            "Carrier",
            "LineItems",
            "Temp",
            "OrderTempInfo",
            "Summary"
        ]
    );
}

#[test]
fn test_embedded_schema() {
    let markup = fixture("projection", "shipment_embedded.xml");
    let expected = json!({
        "ShipmentIdentifier": "1202103301135561781564861",
        "Carrier": "XYZ-ABCD Logistics",
        "LineItems": [{"Identifier": "I1"}, {"Identifier": "I2"}]
    });

    let doc = load_markup(&markup).unwrap();
    assert_eq!(convert_document(&doc).unwrap(), expected);
    assert_eq!(convert_str(&markup, None).unwrap(), expected);
    assert_eq!(convert_str(&markup, Some("  ")).unwrap(), expected);
}

#[test]
fn test_explicit_schema_wins_over_embedded() {
    let json = convert_str(
        &fixture("projection", "shipment_embedded.xml"),
        Some(r#"{"Key": "XPATH(/MyShipments/Shipment/@Shipment_Key)"}"#),
    )
    .unwrap();
    assert_eq!(json, json!({"Key": "1202103301135561781564861"}));
}

#[test]
fn test_reprojection_is_a_no_op() {
    let markup = fixture("projection", "shipment.xml");
    let once = convert_str(&markup, Some(&fixture("projection", "shipment_schema.json"))).unwrap();
    let doc = load_markup(&markup).unwrap();
    let twice = convert(doc.root_element(), Some(&once)).unwrap();
    assert_eq!(once, twice);
}
