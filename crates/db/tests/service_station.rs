//! Integration tests for matrix persistence.
//!
//! - `ServiceStationRepo` list/upsert/delete
//! - Transactional upsert rolls back on a bad row
//! - `PgMatrixBackend` behind a full `MatrixSession` load/edit/save cycle

use assert_matches::assert_matches;
use salon_core::matrix::{
    BackendError, CellKey, MatrixBackend, MatrixCell, MatrixRow, MatrixSession, PageSizes,
};
use salon_db::models::service::CreateService;
use salon_db::models::station::{CreateStation, UpdateStation};
use salon_db::repositories::{ServiceRepo, ServiceStationRepo, StationRepo};
use salon_db::PgMatrixBackend;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    services: Vec<i64>,
    stations: Vec<i64>,
}

/// Two services and two active stations, with (service 0, station 0)
/// supported at 90 minutes, +10.
async fn seed(pool: &PgPool) -> Fixture {
    let mut services = Vec::new();
    for (name, price) in [("Full groom", 80), ("Nail trim", 15)] {
        let s = ServiceRepo::create(
            pool,
            &CreateService {
                name: name.to_string(),
                description: None,
                base_price: price,
                is_active: None,
            },
        )
        .await
        .unwrap();
        services.push(s.id);
    }

    let mut stations = Vec::new();
    for (i, name) in ["Tub", "Table"].into_iter().enumerate() {
        let s = StationRepo::create(
            pool,
            &CreateStation {
                name: name.to_string(),
                is_active: None,
                display_order: Some(i as i32),
            },
        )
        .await
        .unwrap();
        stations.push(s.id);
    }

    ServiceStationRepo::upsert_many(pool, &[row(services[0], stations[0], 90, 10)])
        .await
        .unwrap();

    Fixture { services, stations }
}

fn row(service_id: i64, station_id: i64, d: i32, p: i32) -> MatrixRow {
    MatrixRow {
        service_id,
        station_id,
        duration_minutes: d,
        price_adjustment: p,
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_overwrites_existing_row(pool: PgPool) {
    let f = seed(&pool).await;
    let saved = ServiceStationRepo::upsert_many(
        &pool,
        &[
            row(f.services[0], f.stations[0], 30, -5),
            row(f.services[1], f.stations[1], 20, 0),
        ],
    )
    .await
    .unwrap();
    assert_eq!(saved.len(), 2);

    let rows = ServiceStationRepo::list_for(&pool, &f.services, &f.stations)
        .await
        .unwrap();
    let pairs: Vec<_> = rows
        .iter()
        .map(|r| (r.service_id, r.station_id, r.duration_minutes, r.price_adjustment))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (f.services[0], f.stations[0], 30, -5),
            (f.services[1], f.stations[1], 20, 0),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_many_is_atomic(pool: PgPool) {
    let f = seed(&pool).await;
    let result = ServiceStationRepo::upsert_many(
        &pool,
        &[
            row(f.services[1], f.stations[0], 20, 0),
            row(f.services[1], f.stations[1], -1, 0),
        ],
    )
    .await;
    assert!(result.is_err(), "negative duration violates the check constraint");

    let rows = ServiceStationRepo::list_for(&pool, &[f.services[1]], &f.stations)
        .await
        .unwrap();
    assert!(rows.is_empty(), "first row should have been rolled back");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_filters_both_id_sets(pool: PgPool) {
    let f = seed(&pool).await;
    let rows = ServiceStationRepo::list_for(&pool, &f.services, &[f.stations[1]])
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_reports_missing_rows(pool: PgPool) {
    let f = seed(&pool).await;
    assert!(ServiceStationRepo::delete(&pool, f.services[0], f.stations[0])
        .await
        .unwrap());
    assert!(!ServiceStationRepo::delete(&pool, f.services[0], f.stations[0])
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_backend_skips_inactive_stations(pool: PgPool) {
    let f = seed(&pool).await;
    StationRepo::update(
        &pool,
        f.stations[1],
        &UpdateStation {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let backend = PgMatrixBackend::new(pool.clone());
    let stations = backend.list_active_stations().await.unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].id, f.stations[0]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_backend_delete_of_missing_row_is_not_found(pool: PgPool) {
    let f = seed(&pool).await;
    let backend = PgMatrixBackend::new(pool.clone());
    let err = backend
        .delete_matrix_row(f.services[1], f.stations[1])
        .await
        .unwrap_err();
    assert_matches!(err, BackendError::NotFound { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_round_trip(pool: PgPool) {
    let f = seed(&pool).await;
    let mut session = MatrixSession::new(PgMatrixBackend::new(pool.clone()), PageSizes::default());
    session.load().await.unwrap();

    let kept = CellKey::new(f.services[0], f.stations[0]);
    assert_eq!(session.store().cell(kept), MatrixCell::supported(90, 10));

    // Turn off the supported cell, enable a new one, then save.
    assert!(session.toggle_cell(f.services[0], f.stations[0]));
    assert!(session.toggle_cell(f.services[1], f.stations[1]));
    assert!(session.set_duration(f.services[1], f.stations[1], "25"));
    let report = session.save().await.unwrap();
    assert_eq!(report.deleted, 1);
    assert_eq!(report.changed, 2);

    let rows = ServiceStationRepo::list_for(&pool, &f.services, &f.stations)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].service_id, f.services[1]);
    assert_eq!(rows[0].duration_minutes, 25);

    assert!(session.store().diff().is_noop());
    assert!(!session.store().cell(kept).supported);
}
