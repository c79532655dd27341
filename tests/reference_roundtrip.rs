#![allow(missing_docs)]

use stowage::{FileVariableReference, StorageKind};

#[test]
fn references_round_trip_for_every_backend_kind() {
    let samples = [
        FileVariableReference::new(StorageKind::Inline, "aGVsbG8=", "hello.txt", "text/plain"),
        FileVariableReference::new(
            StorageKind::TempFolder,
            "/tmp/stowage/report.pdf",
            "report.pdf",
            "application/pdf",
        ),
        FileVariableReference::new(
            StorageKind::Folder,
            "/srv/exchange/report.pdf",
            "report.pdf",
            "application/pdf",
        ),
        FileVariableReference::new(
            StorageKind::Repository,
            "doc-9f31c2ab",
            "contract.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        FileVariableReference::new(StorageKind::EngineNative, "var:files:17", "blob", "application/octet-stream"),
        FileVariableReference::new(
            StorageKind::Folder,
            "/srv/exchange/report-v2.pdf",
            "report-v2.pdf",
            "application/pdf",
        )
        .with_original_name("report final (2).pdf"),
    ];

    for reference in samples {
        let json = reference.to_json().expect("encode should succeed");
        let decoded = FileVariableReference::from_json(&json).expect("decode should succeed");
        assert_eq!(decoded, reference);
    }
}

#[test]
fn serialized_form_uses_the_documented_field_names() {
    let reference = FileVariableReference::new(
        StorageKind::TempFolder,
        "/tmp/stowage/a.txt",
        "a.txt",
        "text/plain",
    );
    let json = reference.to_json().expect("encode should succeed");

    assert!(json.contains(r#""kind":"TEMP_FOLDER""#));
    assert!(json.contains(r#""locator":"/tmp/stowage/a.txt""#));
    assert!(json.contains(r#""name":"a.txt""#));
    assert!(json.contains(r#""mimeType":"text/plain""#));
    // An unset original name stays off the wire entirely.
    assert!(!json.contains("originalName"));

    let json = reference
        .with_original_name("a-draft.txt")
        .to_json()
        .expect("encode should succeed");
    assert!(json.contains(r#""originalName":"a-draft.txt""#));
}

#[test]
fn decode_tolerates_unknown_fields_from_newer_writers() {
    let json = r#"{
        "kind": "FOLDER",
        "locator": "/srv/exchange/a.txt",
        "name": "a.txt",
        "mimeType": "text/plain",
        "checksum": "sha256:5891b5b5"
    }"#;
    let decoded = FileVariableReference::from_json(json).expect("decode should succeed");
    assert_eq!(decoded.kind, StorageKind::Folder);
    assert_eq!(decoded.name, "a.txt");
}

#[test]
fn malformed_json_is_rejected_with_context() {
    let err = FileVariableReference::from_json("{ not json").expect_err("decode should fail");
    assert!(err.to_string().contains("cannot decode file reference"));

    let err = FileVariableReference::from_json(r#"{"kind":"TELEPORT","locator":"x","name":"x","mimeType":"text/plain"}"#)
        .expect_err("unknown kind should fail");
    assert!(err.to_string().contains("cannot decode file reference"));
}
