//! Property tests for id assignment and name uniqueness.

use proptest::prelude::*;
use serde_json::json;

use villa_api::{ResultKind, Villa};

use crate::support::{patch, service};

fn villa_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z ]{0,12}").unwrap()
}

/// Flip the case of every ASCII letter.
fn swap_case(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: ids from successive creates strictly increase and never repeat,
    /// even with deletes interleaved.
    #[test]
    fn property_created_ids_strictly_increase(
        deletes in proptest::collection::vec(any::<bool>(), 1..24)
    ) {
        let service = service();
        let mut last_id = 0;
        let mut seen = std::collections::HashSet::new();

        for (i, delete_previous) in deletes.iter().enumerate() {
            let created = service
                .create(Some(Villa::new(format!("Villa {}", i), 10.0, 100, 2)))
                .unwrap();
            let id = created.villa.id;

            prop_assert!(id > last_id, "id {} not greater than {}", id, last_id);
            prop_assert!(seen.insert(id));
            last_id = id;

            // Deleting anything but the newest record must not affect the next id
            if *delete_previous && id > 1 {
                let _ = service.delete(id - 1);
            }
        }
    }

    /// PROPERTY: a name differing only by case is rejected at create and
    /// never committed.
    #[test]
    fn property_case_insensitive_collision_rejected_at_create(name in villa_name()) {
        let service = service();
        service.create(Some(Villa::new(name.clone(), 10.0, 100, 2))).unwrap();

        for variant in [name.to_lowercase(), name.to_uppercase(), swap_case(&name)] {
            let err = service
                .create(Some(Villa::new(variant, 10.0, 100, 2)))
                .unwrap_err();
            prop_assert_eq!(err.kind(), ResultKind::BadRequest);
        }
        prop_assert_eq!(service.list().unwrap().len(), 1);
    }

    /// PROPERTY: renaming onto another villa's name (any case) is rejected by
    /// both replace and patch, and the target record keeps its name.
    #[test]
    fn property_case_insensitive_collision_rejected_on_rename(name in villa_name()) {
        let service = service();
        service.create(Some(Villa::new(name.clone(), 10.0, 100, 2))).unwrap();
        let other = service
            .create(Some(Villa::new("zz-other-zz", 10.0, 100, 2)))
            .unwrap()
            .villa;

        let variant = swap_case(&name);

        let err = service
            .replace(other.id, Some(Villa { name: variant.clone(), ..other.clone() }))
            .unwrap_err();
        prop_assert_eq!(err.kind(), ResultKind::BadRequest);

        let err = service
            .patch(
                other.id,
                Some(patch(json!([{ "op": "replace", "path": "/name", "value": variant }]))),
            )
            .unwrap_err();
        prop_assert_eq!(err.kind(), ResultKind::BadRequest);

        prop_assert_eq!(service.get(other.id).unwrap().name, "zz-other-zz");
    }
}
