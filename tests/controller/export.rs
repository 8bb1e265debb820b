//! Tests for the CSV and PNG download endpoints.
//!
//! Verifies file contents and headers, the download audit row, and that a failing or slow
//! audit write never blocks the file.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use harvest::{
    model::api::{EMPTY_SELECTION_MESSAGE, NO_DATA_MESSAGE},
    server::controller::export::{download_chart, download_csv},
};
use serde_json::json;

use super::*;

fn peru_rows(test: &mut TestContext, expected_requests: usize) -> mockito::Mock {
    test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Peru",
        &["Region", "2020", "2021"],
        vec![vec![Some("Peru"), Some("1000000"), None]],
        expected_requests,
    )
}

/// Expect the raw table as a CSV attachment and one audit row.
#[tokio::test]
async fn csv_attachment_with_audit_row() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _rows = peru_rows(&mut test, 1);
    let audit = test
        .server
        .mock("POST", "/api/v2/statements")
        .match_body(mockito::Matcher::PartialJson(json!({
            "statement": INSERT_EVENT_SQL,
            "bindings": {
                "1": { "type": "TEXT", "value": "Download" },
                "2": { "type": "TEXT", "value": "CSV file" },
                "3": { "type": "TEXT", "value": "Peru" },
                "5": { "type": "TEXT", "value": "AGRICULTURE_APP" },
            },
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(result_body(&["number of rows inserted"], vec![vec![Some("1")]]).to_string())
        .expect(1)
        .create();

    let result = download_csv(
        State(test.into_app_state()),
        test.session.clone(),
        Query(region_params(&["Peru"])),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"gross_agricultural_production.csv\""
    );
    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert_eq!(body, "2020,2021\n1000000,\n");
    wait_until_matched(&audit).await;
    audit.assert();

    Ok(())
}

/// Expect the CSV even when the audit insert fails.
#[tokio::test]
async fn csv_delivered_when_audit_fails() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _rows = peru_rows(&mut test, 1);
    let audit = test
        .warehouse()
        .with_failing_statement_endpoint(INSERT_EVENT_SQL, 500, 1);

    let result = download_csv(
        State(test.into_app_state()),
        test.session.clone(),
        Query(region_params(&["Peru"])),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_bytes(resp).await.is_empty());
    wait_until_matched(&audit).await;
    audit.assert();

    Ok(())
}

/// Expect the CSV while the audit insert is still executing.
#[tokio::test]
async fn csv_delivered_while_audit_pending() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _rows = peru_rows(&mut test, 1);
    let audit = test
        .warehouse()
        .with_accepted_statement_endpoint(INSERT_EVENT_SQL, "pending-insert", 1);
    let _status = test
        .warehouse()
        .with_pending_statement_status_endpoint("pending-insert");

    let result = tokio::time::timeout(
        Duration::from_secs(3),
        download_csv(
            State(test.into_app_state()),
            test.session.clone(),
            Query(region_params(&["Peru"])),
        ),
    )
    .await
    .expect("CSV withheld until the audit insert finished");

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert_eq!(body, "2020,2021\n1000000,\n");
    wait_until_matched(&audit).await;
    audit.assert();

    Ok(())
}

/// Expect a PNG attachment recorded with the joined region names.
#[tokio::test]
async fn png_attachment_with_audit_row() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _peru = peru_rows(&mut test, 1);
    let _chile = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Chile",
        &["Region", "2020", "2021"],
        vec![vec![Some("Chile"), Some("2000000"), Some("2500000")]],
        1,
    );
    let audit = test
        .server
        .mock("POST", "/api/v2/statements")
        .match_body(mockito::Matcher::PartialJson(json!({
            "statement": INSERT_EVENT_SQL,
            "bindings": {
                "2": { "type": "TEXT", "value": "PNG file" },
                "3": { "type": "TEXT", "value": "Peru, Chile" },
            },
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(result_body(&["number of rows inserted"], vec![vec![Some("1")]]).to_string())
        .expect(1)
        .create();

    let result = download_chart(
        State(test.into_app_state()),
        test.session.clone(),
        Query(region_params(&["Peru", "Chile"])),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"chart.png\""
    );
    let body = body_bytes(resp).await;
    assert_eq!(&body[1..4], b"PNG");
    wait_until_matched(&audit).await;
    audit.assert();

    Ok(())
}

/// Expect 404 and no audit row when the selection has no rows.
#[tokio::test]
async fn not_found_without_rows() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let _session = test.warehouse().with_session_endpoint("4711", 1);
    let _rows = test.warehouse().with_bound_statement_endpoint(
        REGION_ROWS_SQL,
        "Atlantis",
        &["Region", "2020"],
        vec![],
        1,
    );
    let audit = test
        .warehouse()
        .with_failing_statement_endpoint(INSERT_EVENT_SQL, 500, 0);

    let result = download_csv(
        State(test.into_app_state()),
        test.session.clone(),
        Query(region_params(&["Atlantis"])),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await)?;
    assert_eq!(body["error"], NO_DATA_MESSAGE);
    audit.assert();

    Ok(())
}

/// Expect 400 without any warehouse traffic for an empty selection.
#[tokio::test]
async fn bad_request_for_empty_selection() -> Result<(), TestError> {
    let mut test = TestBuilder::new().build().await?;
    let session = test.warehouse().with_session_endpoint("4711", 0);

    let result = download_chart(
        State(test.into_app_state()),
        test.session.clone(),
        Query(Vec::new()),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await)?;
    assert_eq!(body["error"], EMPTY_SELECTION_MESSAGE);
    session.assert();

    Ok(())
}
