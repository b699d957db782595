//! Router tests: health endpoints, generation against the configured
//! store, and the stateless solve endpoint.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use timetable_solver::server::build_router;
use timetable_solver::store::Catalog;

fn catalog_json() -> Value {
    json!({
        "teachers": [
            {"id": "t1", "name": "Sarah Johnson", "max_classes_per_day": 6, "subjects": ["math"]},
            {"id": "t2", "name": "Raj Patel", "max_classes_per_day": 4, "subjects": []}
        ],
        "classrooms": [
            {"id": "r1", "room_number": "A-101", "capacity": 45, "section": "Block A"},
            {"id": "r2", "room_number": "A-102", "capacity": 30, "section": "Block A"}
        ],
        "subjects": [
            {"id": "math", "name": "Advanced Mathematics", "classes_per_week": 3, "duration_per_class": 90},
            {"id": "cs", "name": "Programming", "classes_per_week": 2, "duration_per_class": 60}
        ],
        "batches": [
            {"id": "cs-2024", "name": "Computer Science 2024", "subjects": ["math", "cs"], "sections": ["A", "B"]},
            {"id": "it-2024", "name": "Information Technology 2024", "subjects": ["cs"], "sections": ["A"]}
        ]
    })
}

fn test_router() -> Router {
    let catalog: Catalog = serde_json::from_value(catalog_json()).unwrap();
    build_router(Arc::new(catalog))
}

async fn send(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoints_report_healthy() {
    let (status, body) = send(test_router(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(test_router(), "GET", "/v1/timetable/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "timetable");

    let (status, body) = send(test_router(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn generate_schedules_requested_batches() {
    let request = json!({
        "batch_ids": ["cs-2024", "it-2024"],
        "start_date": "2024-01-15",
        "end_date": "2024-01-19",
        "start_time": "09:00",
        "end_time": "12:00"
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/generate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Timetable generated successfully");
    assert!(body["conflicts"].as_array().unwrap().is_empty());

    let timetable = body["timetable"].as_array().unwrap();
    // cs-2024: (3 math + 2 cs) x 2 sections; it-2024: 2 cs x 1 section.
    assert_eq!(timetable.len(), 12);
    let first = &timetable[0];
    assert_eq!(first["batch_id"], "cs-2024");
    assert_eq!(first["subject_id"], "math");
    assert_eq!(first["teacher_id"], "t1");
    assert_eq!(first["classroom_id"], "r1");
    assert_eq!(first["day"], "Monday");
    assert_eq!(first["date"], "2024-01-15");
    assert_eq!(first["start_time"], "09:00");
    assert_eq!(first["end_time"], "10:00");
    assert_eq!(first["section"], "A");
    assert_eq!(timetable[1]["section"], "B");
    assert_eq!(timetable[1]["start_time"], "09:00");
}

#[tokio::test]
async fn generate_reports_attempt_conflicts_without_failing() {
    // A single slot and a single teacher: cs-2024 takes it, it-2024 cannot.
    let mut catalog = catalog_json();
    catalog["teachers"] = json!([
        {"id": "t1", "name": "Sarah Johnson", "max_classes_per_day": 6, "subjects": []}
    ]);
    let input = json!({
        "catalog": catalog,
        "request": {
            "batch_ids": ["cs-2024", "it-2024"],
            "start_date": "2024-01-15",
            "end_date": "2024-01-15",
            "working_days": ["Monday"],
            "start_time": "09:00",
            "end_time": "10:00"
        }
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/solve", Some(input)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Timetable generated with conflicts");
    assert_eq!(body["timetable"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["conflicts"],
        json!(["No available teacher for Programming at 09:00 on Monday"])
    );
}

#[tokio::test]
async fn malformed_request_aborts_with_single_conflict() {
    let request = json!({
        "batch_ids": ["cs-2024"],
        "start_date": "2024-13-40",
        "end_date": "2024-01-19"
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/generate", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["timetable"].as_array().unwrap().is_empty());
    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert!(
        conflicts[0]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate timetable: invalid request: start_date")
    );
}

#[tokio::test]
async fn invalid_record_discards_everything() {
    let mut catalog = catalog_json();
    catalog["batches"][1]["sections"] = json!([]);
    let input = json!({
        "catalog": catalog,
        "request": {
            "batch_ids": ["cs-2024", "it-2024"],
            "start_date": "2024-01-15",
            "end_date": "2024-01-19"
        }
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/solve", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["timetable"].as_array().unwrap().is_empty());
    assert_eq!(
        body["conflicts"],
        json!(["Failed to generate timetable: invalid batch record it-2024: sections must not be empty"])
    );
}

#[tokio::test]
async fn unknown_batches_produce_an_empty_schedule() {
    let request = json!({
        "batch_ids": ["does-not-exist"],
        "start_date": "2024-01-15",
        "end_date": "2024-01-19"
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/generate", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["timetable"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_fields_are_rejected_by_the_extractor() {
    let request = json!({"start_date": "2024-01-15", "end_date": "2024-01-19"});
    let (status, _) = send(test_router(), "POST", "/v1/timetable/generate", Some(request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn undecodable_solve_body_gets_a_failed_timetable() {
    let mut catalog = catalog_json();
    catalog["classrooms"][0]["capacity"] = json!("large");
    let input = json!({
        "catalog": catalog,
        "request": {
            "batch_ids": ["cs-2024"],
            "start_date": "2024-01-15",
            "end_date": "2024-01-19"
        }
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/solve", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["timetable"].as_array().unwrap().is_empty());
    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert!(
        conflicts[0]
            .as_str()
            .unwrap()
            .starts_with("Failed to generate timetable: invalid request:")
    );

    let (status, body) = send(test_router(), "POST", "/v1/timetable/solve", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["conflicts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_range_classroom_capacity_aborts_the_call() {
    let mut catalog = catalog_json();
    catalog["classrooms"][1]["capacity"] = json!(500);
    let input = json!({
        "catalog": catalog,
        "request": {
            "batch_ids": ["cs-2024"],
            "start_date": "2024-01-15",
            "end_date": "2024-01-19"
        }
    });

    let (status, body) = send(test_router(), "POST", "/v1/timetable/solve", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["timetable"].as_array().unwrap().is_empty());
    assert_eq!(
        body["conflicts"],
        json!(["Failed to generate timetable: invalid classroom record r2: capacity must be between 1 and 200, got 500"])
    );
}

#[tokio::test]
async fn break_duration_does_not_change_the_schedule() {
    let base = json!({
        "batch_ids": ["cs-2024"],
        "start_date": "2024-01-15",
        "end_date": "2024-01-19",
        "break_duration": 0
    });
    let mut long_break = base.clone();
    long_break["break_duration"] = json!(120);

    let (_, a) = send(test_router(), "POST", "/v1/timetable/generate", Some(base)).await;
    let (_, b) = send(test_router(), "POST", "/v1/timetable/generate", Some(long_break)).await;

    assert_eq!(a["timetable"], b["timetable"]);
    assert_eq!(a["conflicts"], b["conflicts"]);
}
