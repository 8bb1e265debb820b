//! Mock Snowflake SQL API endpoints.

use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

/// Path statements are submitted to
pub const STATEMENTS_PATH: &str = "/api/v2/statements";

/// Statement used to verify a new session
pub const CURRENT_SESSION_STATEMENT: &str = "SELECT CURRENT_SESSION() AS SESSION_ID";

/// Builds a successful single-partition statement response
pub fn result_body(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> Value {
    let row_type: Vec<Value> = columns
        .iter()
        .map(|name| json!({ "name": name, "type": "text", "nullable": true }))
        .collect();

    json!({
        "resultSetMetaData": {
            "numRows": rows.len(),
            "format": "jsonv2",
            "rowType": row_type,
            "partitionInfo": [{ "rowCount": rows.len() }],
        },
        "data": rows,
        "code": "090001",
        "statementHandle": "01b2c3d4-0000-0000-0000-000000000001",
        "message": "Statement executed successfully.",
    })
}

/// Builds an error body as returned by the SQL API
pub fn error_body(code: &str, message: &str) -> Value {
    json!({
        "code": code,
        "message": message,
        "sqlState": "42000",
        "statementHandle": "01b2c3d4-0000-0000-0000-0000000000ff",
    })
}

/// Waits up to five seconds for `mock` to receive its expected requests
///
/// Used for requests sent from background tasks the test cannot await directly.
pub async fn wait_until_matched(mock: &Mock) {
    for _ in 0..100 {
        if mock.matched_async().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Mock endpoint builders bound to a test's mock server
pub struct WarehouseMocks<'a> {
    server: &'a mut ServerGuard,
}

impl<'a> WarehouseMocks<'a> {
    pub fn new(server: &'a mut ServerGuard) -> Self {
        Self { server }
    }

    /// Successful session verification returning `session_id`
    pub fn with_session_endpoint(&mut self, session_id: &str, expected_requests: usize) -> Mock {
        self.with_statement_endpoint(
            CURRENT_SESSION_STATEMENT,
            &["SESSION_ID"],
            vec![vec![Some(session_id)]],
            expected_requests,
        )
    }

    /// Session verification failing with `status`
    pub fn with_failing_session_endpoint(&mut self, status: usize, expected_requests: usize) -> Mock {
        self.with_failing_statement_endpoint(CURRENT_SESSION_STATEMENT, status, expected_requests)
    }

    /// Successful response for the exact statement text `statement`
    pub fn with_statement_endpoint(
        &mut self,
        statement: &str,
        columns: &[&str],
        rows: Vec<Vec<Option<&str>>>,
        expected_requests: usize,
    ) -> Mock {
        self.statement_mock(json!({ "statement": statement }))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(result_body(columns, rows).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Successful response for `statement` whose first binding equals `value`
    pub fn with_bound_statement_endpoint(
        &mut self,
        statement: &str,
        value: &str,
        columns: &[&str],
        rows: Vec<Vec<Option<&str>>>,
        expected_requests: usize,
    ) -> Mock {
        self.statement_mock(json!({
            "statement": statement,
            "bindings": { "1": { "type": "TEXT", "value": value } },
        }))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(result_body(columns, rows).to_string())
        .expect(expected_requests)
        .create()
    }

    /// Error response with `status` for the exact statement text `statement`
    pub fn with_failing_statement_endpoint(
        &mut self,
        statement: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.statement_mock(json!({ "statement": statement }))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body("002003", "SQL compilation error").to_string())
            .expect(expected_requests)
            .create()
    }

    /// Asynchronous acceptance of `statement`, answered later at the statement handle
    pub fn with_accepted_statement_endpoint(
        &mut self,
        statement: &str,
        handle: &str,
        expected_requests: usize,
    ) -> Mock {
        self.statement_mock(json!({ "statement": statement }))
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": "333334",
                    "message": "Asynchronous execution in progress.",
                    "statementHandle": handle,
                    "statementStatusUrl": format!("{STATEMENTS_PATH}/{handle}"),
                })
                .to_string(),
            )
            .expect(expected_requests)
            .create()
    }

    /// Completed result served at the statement handle
    pub fn with_statement_status_endpoint(
        &mut self,
        handle: &str,
        columns: &[&str],
        rows: Vec<Vec<Option<&str>>>,
        expected_requests: usize,
    ) -> Mock {
        self.server
            .mock("GET", format!("{STATEMENTS_PATH}/{handle}").as_str())
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(result_body(columns, rows).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Status of the statement `handle` that stays pending on every poll
    pub fn with_pending_statement_status_endpoint(&mut self, handle: &str) -> Mock {
        self.server
            .mock("GET", format!("{STATEMENTS_PATH}/{handle}").as_str())
            .match_query(Matcher::Missing)
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": "333334",
                    "message": "Asynchronous execution in progress.",
                    "statementHandle": handle,
                })
                .to_string(),
            )
            .create()
    }

    /// Additional result partition `partition` of the statement `handle`
    pub fn with_partition_endpoint(
        &mut self,
        handle: &str,
        partition: usize,
        rows: Vec<Vec<Option<&str>>>,
        expected_requests: usize,
    ) -> Mock {
        self.server
            .mock("GET", format!("{STATEMENTS_PATH}/{handle}").as_str())
            .match_query(Matcher::UrlEncoded(
                "partition".to_string(),
                partition.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": rows }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Raw `body` answered with `status` for the exact statement text `statement`
    pub fn with_statement_response(
        &mut self,
        statement: &str,
        status: usize,
        body: Value,
        expected_requests: usize,
    ) -> Mock {
        self.statement_mock(json!({ "statement": statement }))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    fn statement_mock(&mut self, body: Value) -> Mock {
        self.server
            .mock("POST", STATEMENTS_PATH)
            .match_header("authorization", Matcher::Regex("^Bearer .+".to_string()))
            .match_header("x-snowflake-authorization-token-type", "KEYPAIR_JWT")
            .match_body(Matcher::PartialJson(body))
    }
}
