//! Direct Postgres transport. Each procedure row is turned into JSON inside the
//! database (`to_jsonb`) so both transports hand the same payload shape to
//! [`RpcResponse::from_payload`].

use super::{
    procedure::{AuthService, ProcedureCall},
    response::RpcResponse,
};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool, Row};
use std::time::Duration;
use tracing::{debug, error, instrument, Instrument};

#[derive(Clone, Debug)]
pub struct PgAuthService {
    pool: PgPool,
}

impl PgAuthService {
    /// Connect lazily; the first call opens the first connection.
    ///
    /// # Errors
    /// Returns an error if the DSN cannot be parsed.
    pub fn connect_lazy(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect_lazy(dsn)
            .context("Failed to configure database pool")?;

        Ok(Self { pool })
    }

    /// Ping the database.
    ///
    /// # Errors
    /// Returns an error if no connection can be acquired or the ping fails.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;

        conn.ping().await.context("Failed to ping database")
    }
}

/// `SELECT to_jsonb(r) AS record FROM name(p_a => $1, p_b => $2) AS r`
///
/// # Errors
/// Returns an error if the procedure or a parameter name is not a plain identifier.
pub fn procedure_sql(call: &ProcedureCall) -> Result<String> {
    if !is_identifier(call.name()) {
        return Err(anyhow!("invalid procedure name: {}", call.name()));
    }

    let mut args = Vec::with_capacity(call.params().len());
    for (index, (name, _)) in call.params().iter().enumerate() {
        if !is_identifier(name) {
            return Err(anyhow!("invalid parameter name: {name}"));
        }
        args.push(format!("{name} => ${}", index + 1));
    }

    Ok(format!(
        "SELECT to_jsonb(r) AS record FROM {}({}) AS r",
        call.name(),
        args.join(", ")
    ))
}

/// Shape row values the way the REST endpoint answers: a set-returning
/// procedure gives one value per row, while a scalar `json` result that is
/// itself an array comes back as that array.
fn rows_payload(mut records: Vec<Value>) -> Value {
    if matches!(records.as_slice(), [Value::Array(_)]) {
        if let Some(array) = records.pop() {
            return array;
        }
    }

    Value::Array(records)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl AuthService for PgAuthService {
    #[instrument(skip(self, call), fields(procedure = call.name()))]
    async fn call(&self, call: ProcedureCall) -> RpcResponse {
        let sql = match procedure_sql(&call) {
            Ok(sql) => sql,
            Err(err) => {
                error!("{}", err);

                return RpcResponse::Error(None);
            }
        };

        let mut query = sqlx::query(&sql);
        for (_, value) in call.params() {
            query = query.bind(value.expose().map(ToString::to_string));
        }

        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = call.name()
        );

        match query.fetch_all(&self.pool).instrument(span).await {
            Ok(rows) => {
                debug!("{} returned {} row(s)", call.name(), rows.len());

                let mut records = Vec::with_capacity(rows.len());
                for row in &rows {
                    match row.try_get::<Option<Value>, _>("record") {
                        Ok(Some(record)) => records.push(record),
                        Ok(None) => {}
                        Err(err) => error!("Error decoding row from {}: {}", call.name(), err),
                    }
                }

                RpcResponse::from_payload(rows_payload(records))
            }

            Err(sqlx::Error::Database(err)) => {
                error!("Database error calling {}: {}", call.name(), err);

                RpcResponse::Error(Some(err.message().to_string()))
            }

            Err(err) => {
                error!("Error calling {}: {}", call.name(), err);

                RpcResponse::Error(Some(err.to_string()))
            }
        }
    }
}
