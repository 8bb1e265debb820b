use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use reqwest::{header, RequestBuilder, Response, StatusCode};

use crate::server::{
    config::{Config, QUERY_TAG},
    error::{warehouse::WarehouseError, Error},
    warehouse::{
        auth::KeyPairAuth,
        statement::{
            ErrorResponse, PartitionResponse, ResultSet, Statement, StatementParameters,
            StatementRequest, StatementResponse,
        },
    },
};

/// Path of the SQL API statements endpoint
pub const STATEMENTS_PATH: &str = "/api/v2/statements";
/// Statement used to verify a new session and read its identifier
pub const CURRENT_SESSION_SQL: &str = "SELECT CURRENT_SESSION() AS SESSION_ID";
/// Column holding the session identifier in the verification result
pub const SESSION_ID_COLUMN: &str = "SESSION_ID";
/// Server-side timeout of every statement
pub const STATEMENT_TIMEOUT_SECS: u64 = 60;
/// Delay between polls of a statement still executing asynchronously
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";
const TOKEN_TYPE: &str = "KEYPAIR_JWT";

/// Client for the Snowflake SQL API
///
/// Cheap to clone; clones share the HTTP connection pool and signing key.
#[derive(Clone)]
pub struct SnowflakeClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    auth: KeyPairAuth,
    database: String,
    schema: String,
    warehouse: String,
    role: String,
}

/// An authenticated warehouse session
///
/// Holds the signed token used for every statement and the server-issued session identifier
/// reported when the session was verified.
#[derive(Clone)]
pub struct WarehouseSession {
    client: SnowflakeClient,
    token: Arc<str>,
    token_expires_at: DateTime<Utc>,
    session_id: String,
}

impl SnowflakeClient {
    /// Builds a client from the loaded configuration
    ///
    /// Decrypts the private key up front so an unusable key fails at startup.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let auth = KeyPairAuth::new(
            &config.account,
            &config.user,
            &config.private_key,
            &config.private_key_passphrase,
        )?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("harvest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url(),
                auth,
                database: config.database.clone(),
                schema: config.schema.clone(),
                warehouse: config.warehouse.clone(),
                role: config.role.clone(),
            }),
        })
    }

    /// Creates a session: signs a fresh token and verifies it with a round trip
    ///
    /// The server-issued session identifier is logged for diagnostics only.
    pub async fn connect(&self) -> Result<WarehouseSession, Error> {
        let issued = self.inner.auth.issue_token(Utc::now())?;
        let token: Arc<str> = Arc::from(issued.token);

        let result = self
            .execute(&token, &Statement::new(CURRENT_SESSION_SQL))
            .await?;
        let session_id = result
            .first_value(SESSION_ID_COLUMN)?
            .ok_or_else(|| {
                WarehouseError::InvalidResponse("session verification returned no rows".to_string())
            })?
            .to_string();

        tracing::info!("Session ID: {}", session_id);

        Ok(WarehouseSession {
            client: self.clone(),
            token,
            token_expires_at: issued.expires_at,
            session_id,
        })
    }

    async fn execute(&self, token: &str, statement: &Statement) -> Result<ResultSet, Error> {
        let inner = &self.inner;
        let body = StatementRequest {
            statement: statement.sql(),
            timeout: STATEMENT_TIMEOUT_SECS,
            database: &inner.database,
            schema: &inner.schema,
            warehouse: &inner.warehouse,
            role: &inner.role,
            bindings: statement.binding_map(),
            parameters: StatementParameters {
                query_tag: QUERY_TAG,
            },
        };

        tracing::debug!(
            "Executing statement with {} binding(s): {}",
            statement.bindings().len(),
            statement.sql()
        );

        let url = format!("{}{}", inner.base_url, STATEMENTS_PATH);
        let mut response = self
            .authorize(inner.http.post(url), token)
            .json(&body)
            .send()
            .await?;

        loop {
            let status = response.status();

            if status == StatusCode::ACCEPTED {
                let pending: StatementResponse = response.json().await?;
                let handle = pending.statement_handle.ok_or_else(|| {
                    WarehouseError::InvalidResponse(
                        "asynchronous statement without a statement handle".to_string(),
                    )
                })?;

                tokio::time::sleep(POLL_INTERVAL).await;

                response = self
                    .authorize(inner.http.get(self.handle_url(&handle)), token)
                    .send()
                    .await?;
                continue;
            }

            if !status.is_success() {
                return Err(statement_error(response).await.into());
            }

            let completed: StatementResponse = response.json().await?;
            return self.collect_partitions(token, completed).await;
        }
    }

    /// Gathers the rows of every result partition into one result set
    async fn collect_partitions(
        &self,
        token: &str,
        response: StatementResponse,
    ) -> Result<ResultSet, Error> {
        let metadata = response.result_set_meta_data.ok_or_else(|| {
            WarehouseError::InvalidResponse("statement result without metadata".to_string())
        })?;

        let columns = metadata.row_type.into_iter().map(|c| c.name).collect();
        let mut rows = response.data;

        if metadata.partition_info.len() > 1 {
            let handle = response.statement_handle.ok_or_else(|| {
                WarehouseError::InvalidResponse(
                    "partitioned result without a statement handle".to_string(),
                )
            })?;
            let total: u64 = metadata.partition_info.iter().map(|p| p.row_count).sum();

            tracing::debug!(
                "Fetching {} result partitions ({} rows) for statement {}",
                metadata.partition_info.len(),
                total,
                handle
            );

            for partition in 1..metadata.partition_info.len() {
                let response = self
                    .authorize(self.inner.http.get(self.handle_url(&handle)), token)
                    .query(&[("partition", partition)])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(statement_error(response).await.into());
                }

                let page: PartitionResponse = response.json().await?;
                rows.extend(page.data);
            }
        }

        Ok(ResultSet { columns, rows })
    }

    fn handle_url(&self, handle: &str) -> String {
        format!("{}{}/{}", self.inner.base_url, STATEMENTS_PATH, handle)
    }

    fn authorize(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header(TOKEN_TYPE_HEADER, TOKEN_TYPE)
            .header(header::ACCEPT, "application/json")
    }
}

impl WarehouseSession {
    /// Server-issued identifier of the session
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Instant after which the session token is rejected
    pub fn token_expires_at(&self) -> DateTime<Utc> {
        self.token_expires_at
    }

    /// Executes `statement` and returns its complete result set
    pub async fn execute(&self, statement: &Statement) -> Result<ResultSet, Error> {
        self.client.execute(&self.token, statement).await
    }
}

/// Converts a non-success response into a statement error
async fn statement_error(response: Response) -> WarehouseError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let ErrorResponse { code, message } = serde_json::from_str(&text).unwrap_or_default();
    let message = if message.is_empty() { text } else { message };

    WarehouseError::Statement {
        status,
        code,
        message,
    }
}
