//! Concurrent writers sharing one store.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use serde_json::json;
use villa_api::{ResultKind, VillaService};

use crate::support::{patch, service, service_with_a, villa};

const WRITERS: usize = 8;

/// Run `f(i)` on `WRITERS` threads released together.
fn race<T, F>(service: &VillaService, f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(&VillaService, usize) -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(WRITERS));
    let f = Arc::new(f);

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let service = service.clone();
            let barrier = barrier.clone();
            let f = f.clone();
            thread::spawn(move || {
                barrier.wait();
                f(&service, i)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn same_name_creates_have_one_winner() {
    let service = service();

    let results = race(&service, |service, i| {
        // Same name, different case per writer
        let name = if i % 2 == 0 { "Sea Breeze" } else { "SEA BREEZE" };
        service.create(Some(villa(name)))
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.kind(), ResultKind::BadRequest);
    }
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn distinct_creates_get_unique_ids() {
    let service = service();

    let results = race(&service, |service, i| {
        service
            .create(Some(villa(&format!("Villa {}", i))))
            .map(|created| created.villa.id)
    });

    let ids: HashSet<i64> = results.into_iter().map(|r| r.unwrap()).collect();
    let expected: HashSet<i64> = (1..=WRITERS as i64).collect();
    assert_eq!(ids, expected);
}

#[test]
fn concurrent_renames_to_one_name_have_one_winner() {
    let service = service_with_a();
    for i in 1..WRITERS {
        service.create(Some(villa(&format!("Villa {}", i)))).unwrap();
    }

    // Villas 1..=WRITERS each try to take the same new name
    let results = race(&service, |service, i| {
        service.patch(
            i as i64 + 1,
            Some(patch(json!([{ "op": "replace", "path": "/name", "value": "Summit" }]))),
        )
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let holders = service
        .list()
        .unwrap()
        .into_iter()
        .filter(|v| v.name == "Summit")
        .count();
    assert_eq!(holders, 1);
}

#[test]
fn readers_never_see_partial_writes() {
    let service = service_with_a();

    let results = race(&service, |service, i| {
        if i % 2 == 0 {
            for n in 0..50 {
                let sqft = 600 + n;
                let _ = service.patch(
                    1,
                    Some(patch(json!([
                        { "op": "replace", "path": "/sqft", "value": sqft },
                        { "op": "replace", "path": "/occupancy", "value": sqft }
                    ]))),
                );
            }
            true
        } else {
            // Both fields always move together
            (0..50).all(|_| {
                let villa = service.get(1).unwrap();
                villa.sqft == villa.occupancy || (villa.sqft == 500 && villa.occupancy == 2)
            })
        }
    });

    assert!(results.into_iter().all(|ok| ok));
}
