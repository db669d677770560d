// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Duration, Utc};
use violeta_audit::{Actor, AuditAction, AuditFilter, AuditRecord, EntityKind, MAX_PAGE_SIZE};

use crate::tests::helpers::{create_test_actor, create_test_client, new_store};
use crate::Persistence;

fn record(action: AuditAction, entity_id: i64) -> AuditRecord {
    AuditRecord::new(
        create_test_actor(),
        action,
        EntityKind::Order,
        Some(entity_id),
        serde_json::json!({"n": entity_id}),
        create_test_client(),
    )
}

#[test]
fn test_audit_record_round_trips_through_the_store() {
    let mut store: Persistence = new_store();
    let appended: AuditRecord = record(AuditAction::Create, 1);

    let audit_id: i64 = store.append_audit(&appended).unwrap();

    let loaded: Vec<AuditRecord> = store.query_audit(&AuditFilter::default()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].audit_id, Some(audit_id));
    assert_eq!(loaded[0].action, AuditAction::Create);
    assert_eq!(loaded[0].entity_kind, EntityKind::Order);
    assert_eq!(loaded[0].entity_id, Some(1));
    assert_eq!(loaded[0].actor.name, "Valentina");
    assert_eq!(loaded[0].details, serde_json::json!({"n": 1}));
    assert_eq!(loaded[0].client.ip.as_deref(), Some("192.168.1.10"));
}

#[test]
fn test_query_returns_newest_first() {
    let mut store: Persistence = new_store();
    store.append_audit(&record(AuditAction::Create, 1)).unwrap();
    store.append_audit(&record(AuditAction::Dispatch, 2)).unwrap();

    let loaded: Vec<AuditRecord> = store.query_audit(&AuditFilter::default()).unwrap();

    assert_eq!(loaded[0].action, AuditAction::Dispatch);
    assert_eq!(loaded[1].action, AuditAction::Create);
}

#[test]
fn test_page_size_is_capped() {
    let mut store: Persistence = new_store();
    for n in 0..60 {
        store.append_audit(&record(AuditAction::Edit, n)).unwrap();
    }

    let filter: AuditFilter = AuditFilter {
        page_size: 500,
        ..AuditFilter::default()
    };
    let loaded: Vec<AuditRecord> = store.query_audit(&filter).unwrap();

    assert_eq!(loaded.len(), usize::try_from(MAX_PAGE_SIZE).unwrap());
}

#[test]
fn test_pagination_advances_through_the_log() {
    let mut store: Persistence = new_store();
    for n in 0..5 {
        store.append_audit(&record(AuditAction::Edit, n)).unwrap();
    }

    let first_page: Vec<AuditRecord> = store
        .query_audit(&AuditFilter {
            page_size: 2,
            ..AuditFilter::default()
        })
        .unwrap();
    let second_page: Vec<AuditRecord> = store
        .query_audit(&AuditFilter {
            page: 1,
            page_size: 2,
            ..AuditFilter::default()
        })
        .unwrap();

    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].entity_id, Some(4));
    assert_eq!(second_page[0].entity_id, Some(2));
}

#[test]
fn test_filter_by_action_and_actor() {
    let mut store: Persistence = new_store();
    store.append_audit(&record(AuditAction::Create, 1)).unwrap();
    store.append_audit(&record(AuditAction::Cancel, 1)).unwrap();
    store
        .append_audit(&AuditRecord::new(
            Actor::system(),
            AuditAction::Reclassify,
            EntityKind::Order,
            Some(1),
            serde_json::json!({}),
            create_test_client(),
        ))
        .unwrap();

    let cancels: Vec<AuditRecord> = store
        .query_audit(&AuditFilter {
            action: Some(AuditAction::Cancel),
            ..AuditFilter::default()
        })
        .unwrap();
    assert_eq!(cancels.len(), 1);

    let by_valentina: Vec<AuditRecord> = store
        .query_audit(&AuditFilter {
            actor_id: Some(1),
            ..AuditFilter::default()
        })
        .unwrap();
    assert_eq!(by_valentina.len(), 2);
}

#[test]
fn test_filter_by_date_range() {
    let mut store: Persistence = new_store();
    store.append_audit(&record(AuditAction::Create, 1)).unwrap();
    let now: DateTime<Utc> = Utc::now();

    let recent: Vec<AuditRecord> = store
        .query_audit(&AuditFilter {
            from: Some(now - Duration::minutes(5)),
            to: Some(now + Duration::minutes(5)),
            ..AuditFilter::default()
        })
        .unwrap();
    assert_eq!(recent.len(), 1);

    let future: Vec<AuditRecord> = store
        .query_audit(&AuditFilter {
            from: Some(now + Duration::minutes(5)),
            ..AuditFilter::default()
        })
        .unwrap();
    assert!(future.is_empty());
}
