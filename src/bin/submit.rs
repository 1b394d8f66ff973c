//! CLI submitter: one HTTP call per invocation against a running gateway.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use sqlgate::{intake, models::Person};

#[derive(Parser)]
#[command(name = "submit")]
#[command(about = "Submits person batches or SQL statements to a sqlgate endpoint")]
#[command(version)]
struct Cli {
    /// Base URL of the gateway
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send the fixed sample batch to /insert
    Insert,
    /// Run a SELECT or INSERT statement through /query
    Query {
        /// Statement text; SELECT is issued as GET, INSERT as POST
        statement: String,
    },
}

fn sample_people() -> Vec<Person> {
    vec![
        Person::new("Alice Johnson", "1990-05-15"),
        Person::new("Bob Smith", "1985-10-22"),
        Person::new("Charlie Brown", "2000-07-08"),
        Person::new("Diana Ross", "1995-12-30"),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Command::Insert => {
            let response = client
                .post(format!("{}/insert", cli.endpoint))
                .json(&serde_json::json!({ "people": sample_people() }))
                .send()
                .await
                .context("insert request failed")?;
            let body: serde_json::Value =
                response.json().await.context("response was not JSON")?;
            println!("{body}");
        }
        Command::Query { statement } => {
            let statement = statement.trim().to_string();
            if statement.is_empty() {
                bail!("please enter a query");
            }
            // Advisory only; the gateway re-validates.
            if !intake::statement_allowed(&statement) {
                bail!("only SELECT and INSERT queries are allowed");
            }

            let request = if statement.starts_with("SELECT") {
                client
                    .get(format!("{}/query", cli.endpoint))
                    .query(&[("query", statement.as_str())])
            } else {
                client
                    .post(format!("{}/query", cli.endpoint))
                    .json(&serde_json::json!({ "query": statement }))
            };

            let response = request.send().await.context("query request failed")?;
            let body: serde_json::Value =
                response.json().await.context("response was not JSON")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
