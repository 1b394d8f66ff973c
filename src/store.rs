use crate::{
    db::{PgConnectionManager, PgPool},
    intake,
    models::Person,
};
use anyhow::{anyhow, Context, Result};
use bb8::{PooledConnection, RunError};
use serde_json::{json, Map, Value};
use tokio_postgres::SimpleQueryMessage;

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT,
    dob TEXT
)";

/// Access to the relational store through the shared connection pool. Each
/// operation performs at most one round-trip.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One-time idempotent schema bootstrap; a no-op when the table exists.
    pub async fn ensure_schema(&self) -> Result<()> {
        let conn = self.connection().await?;
        conn.batch_execute(CREATE_USERS_TABLE)
            .await
            .context("failed to create users table")?;
        Ok(())
    }

    /// Persists all records through one multi-row INSERT and returns the
    /// affected-row count reported by the store.
    pub async fn bulk_insert(&self, people: &[Person]) -> Result<u64> {
        let conn = self.connection().await?;
        let statement = intake::bulk_insert_statement(people.len());
        let params = intake::bulk_insert_params(people);
        let inserted = conn.execute(statement.as_str(), &params).await?;
        Ok(inserted)
    }

    /// Runs a client-authored statement verbatim over the simple-query
    /// protocol and serializes whatever the store produced.
    pub async fn execute_raw(&self, statement: &str) -> Result<Value> {
        let conn = self.connection().await?;
        let messages = conn.simple_query(statement).await?;
        Ok(serialize_messages(messages))
    }

    async fn connection(&self) -> Result<PooledConnection<'_, PgConnectionManager>> {
        self.pool.get().await.map_err(|err| match err {
            RunError::User(err) => err,
            RunError::TimedOut => anyhow!("timed out waiting for a pooled database connection"),
        })
    }
}

/// Row sets become an array of column-name → text objects; statements that
/// return no row set report the affected-row count instead.
fn serialize_messages(messages: Vec<SimpleQueryMessage>) -> Value {
    let mut rows = Vec::new();
    let mut affected = 0;
    let mut produced_rows = false;

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(_) => produced_rows = true,
            SimpleQueryMessage::Row(row) => {
                produced_rows = true;
                let mut object = Map::with_capacity(row.columns().len());
                for (idx, column) in row.columns().iter().enumerate() {
                    let value = row
                        .get(idx)
                        .map(|text| Value::String(text.to_string()))
                        .unwrap_or(Value::Null);
                    object.insert(column.name().to_string(), value);
                }
                rows.push(Value::Object(object));
            }
            SimpleQueryMessage::CommandComplete(count) => affected = count,
            _ => {}
        }
    }

    if produced_rows {
        Value::Array(rows)
    } else {
        json!({ "affectedRows": affected })
    }
}
