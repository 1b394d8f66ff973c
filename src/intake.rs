//! Statement intake: the prefix allowlist applied to client-authored
//! statements and the shaping of person batches into one multi-row INSERT.

use crate::models::Person;
use tokio_postgres::types::ToSql;

pub const ALLOWED_PREFIXES: [&str; 2] = ["SELECT", "INSERT"];

/// Literal prefix allowlist over the untouched statement text. No trimming,
/// no case folding, no statement parsing: ` SELECT 1` and `select 1` are both
/// rejected, and stacked statements after an allowed prefix pass through.
/// This mirrors the deployed behavior; see DESIGN.md before changing it.
pub fn statement_allowed(statement: &str) -> bool {
    !statement.is_empty()
        && ALLOWED_PREFIXES
            .iter()
            .any(|prefix| statement.starts_with(prefix))
}

/// Builds one parameterized INSERT covering `rows` records, so an arbitrarily
/// large batch still costs a single store round-trip.
pub fn bulk_insert_statement(rows: usize) -> String {
    let mut sql = String::from("INSERT INTO users (name, dob) VALUES ");
    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("(${}, ${})", row * 2 + 1, row * 2 + 2));
    }
    sql
}

/// Parameter slice matching [`bulk_insert_statement`], row-major (name, dob).
pub fn bulk_insert_params(people: &[Person]) -> Vec<&(dyn ToSql + Sync)> {
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(people.len() * 2);
    for person in people {
        params.push(&person.name);
        params.push(&person.dob);
    }
    params
}
