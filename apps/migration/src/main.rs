//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` and applies, rolls back or inspects the Yatube
//! schema migrations, e.g. `cargo run -p migration -- up`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    cli::run_cli(migration::Migrator).await;
}
