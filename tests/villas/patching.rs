//! Partial updates: JSON Patch through the service, validate-then-commit.

use serde_json::json;
use villa_api::{apply_patch, op_name, ResultKind, ServiceError};

use crate::support::{patch, service_with_a, villa};

#[test]
fn replace_sqft_leaves_other_fields() {
    let service = service_with_a();
    let before = service.get(1).unwrap();

    service
        .patch(
            1,
            Some(patch(json!([{ "op": "replace", "path": "/sqft", "value": 600 }]))),
        )
        .unwrap();

    let after = service.get(1).unwrap();
    assert_eq!(after.sqft, 600);
    assert_eq!(after.id, before.id);
    assert_eq!(after.name, before.name);
    assert_eq!(after.rate, before.rate);
    assert_eq!(after.occupancy, before.occupancy);
    assert_eq!(after.details, before.details);
    assert_eq!(after.image_url, before.image_url);
    assert_eq!(after.amenities, before.amenities);
    assert_eq!(after.created_date, before.created_date);
}

#[test]
fn empty_name_is_rejected_and_record_unchanged() {
    let service = service_with_a();
    let before = service.get(1).unwrap();

    let err = service
        .patch(
            1,
            Some(patch(json!([{ "op": "replace", "path": "/name", "value": "" }]))),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ResultKind::BadRequest);
    assert!(err.field_errors().unwrap().contains_field("name"));
    assert_eq!(service.get(1).unwrap(), before);
}

#[test]
fn failed_test_leaves_record_unchanged() {
    let service = service_with_a();
    let before = service.get(1).unwrap();

    let err = service
        .patch(
            1,
            Some(patch(json!([
                { "op": "replace", "path": "/name", "value": "Renamed" },
                { "op": "replace", "path": "/occupancy", "value": 9 },
                { "op": "test", "path": "/sqft", "value": 123 }
            ]))),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ResultKind::BadRequest);
    assert!(err.field_errors().unwrap().contains_field("sqft"));
    assert_eq!(service.get(1).unwrap(), before);
}

#[test]
fn passing_test_guards_update() {
    let service = service_with_a();

    service
        .patch(
            1,
            Some(patch(json!([
                { "op": "test", "path": "/name", "value": "A" },
                { "op": "replace", "path": "/name", "value": "B" }
            ]))),
        )
        .unwrap();

    assert_eq!(service.get(1).unwrap().name, "B");
}

#[test]
fn later_operations_see_earlier_ones() {
    let service = service_with_a();

    service
        .patch(
            1,
            Some(patch(json!([
                { "op": "add", "path": "/details", "value": "sea breeze" },
                { "op": "copy", "from": "/details", "path": "/amenities" },
                { "op": "replace", "path": "/details", "value": "calm" }
            ]))),
        )
        .unwrap();

    let after = service.get(1).unwrap();
    assert_eq!(after.amenities, "sea breeze");
    assert_eq!(after.details.as_deref(), Some("calm"));
}

#[test]
fn rename_to_existing_name_is_rejected() {
    let service = service_with_a();
    service.create(Some(villa("B"))).unwrap();

    let err = service
        .patch(
            2,
            Some(patch(json!([{ "op": "replace", "path": "/name", "value": "a" }]))),
        )
        .unwrap_err();

    assert!(err.field_errors().unwrap().contains_field("name"));
    assert_eq!(service.get(2).unwrap().name, "B");
}

#[test]
fn unknown_target_is_bad_request() {
    let service = service_with_a();
    let err = service
        .patch(
            1,
            Some(patch(json!([{ "op": "replace", "path": "/pool", "value": true }]))),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ResultKind::BadRequest);
    assert!(err.field_errors().unwrap().contains_field("pool"));
}

#[test]
fn id_cannot_be_patched() {
    let service = service_with_a();
    let err = service
        .patch(
            1,
            Some(patch(json!([{ "op": "replace", "path": "/id", "value": 2 }]))),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ResultKind::BadRequest);
    assert!(service.get(1).is_ok());
    assert!(service.get(2).is_err());
}

#[test]
fn removing_required_field_fails_validation() {
    let service = service_with_a();
    let err = service
        .patch(1, Some(patch(json!([{ "op": "remove", "path": "/occupancy" }]))))
        .unwrap_err();

    assert!(err.field_errors().unwrap().contains_field("occupancy"));
    assert_eq!(service.get(1).unwrap().occupancy, 2);
}

#[test]
fn removing_optional_field_clears_it() {
    let service = service_with_a();
    service
        .patch(
            1,
            Some(patch(json!([{ "op": "add", "path": "/imageUrl", "value": "https://x/y.png" }]))),
        )
        .unwrap();
    service
        .patch(1, Some(patch(json!([{ "op": "remove", "path": "/imageUrl" }]))))
        .unwrap();

    assert_eq!(service.get(1).unwrap().image_url, None);
}

#[test]
fn mistyped_value_is_bad_request() {
    let service = service_with_a();
    let err = service
        .patch(
            1,
            Some(patch(json!([{ "op": "replace", "path": "/occupancy", "value": "many" }]))),
        )
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains_field("occupancy"));
}

#[test]
fn patch_missing_villa_is_not_found() {
    let service = service_with_a();
    let err = service
        .patch(
            7,
            Some(patch(json!([{ "op": "replace", "path": "/sqft", "value": 600 }]))),
        )
        .unwrap_err();
    assert_eq!(err, ServiceError::NotFound(7));
}

#[test]
fn patch_bumps_updated_date_only() {
    let service = service_with_a();
    let before = service.get(1).unwrap();

    service
        .patch(
            1,
            Some(patch(json!([{ "op": "replace", "path": "/rate", "value": 150.0 }]))),
        )
        .unwrap();

    let after = service.get(1).unwrap();
    assert_eq!(after.created_date, before.created_date);
    assert!(after.updated_date >= before.updated_date);
}

#[test]
fn engine_builds_candidate_without_touching_store() {
    let service = service_with_a();
    let stored = service.get(1).unwrap();
    let ops = patch(json!([
        { "op": "test", "path": "/sqft", "value": 500 },
        { "op": "replace", "path": "/sqft", "value": 600 }
    ]));

    let candidate = apply_patch(&stored, &ops).unwrap();
    assert_eq!(candidate.sqft, 600);
    assert_eq!(candidate.id, stored.id);
    assert_eq!(service.get(1).unwrap().sqft, 500);

    let names: Vec<_> = ops.0.iter().map(op_name).collect();
    assert_eq!(names, vec!["test", "replace"]);
}
