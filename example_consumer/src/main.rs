//! Example consumer: loads a resource config document, registers its resources and runs
//! the index pipeline for each one.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Set `DATABASE_URL` to query PostgreSQL; otherwise a small in-memory data set is used.

use serde_json::json;
use std::sync::Arc;
use talon_resource::config::schema_refs;
use talon_resource::{
    load_from_path, resolve, run_pipeline, Action, MemoryRepository, Params, PgRepository, Query, RepoRef,
    Services, StaticConcerns,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("talon_resource=info")),
        )
        .init();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "example_consumer/blog.json".into());
    let config = load_from_path(&config_path).await?;
    let schemas = schema_refs(&config);

    let repo: RepoRef = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await?;
            Arc::new(schemas.iter().cloned().fold(PgRepository::new(pool), PgRepository::with_schema))
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory data");
            let mut repo = MemoryRepository::new();
            for schema in &schemas {
                let rows = match schema.short_name() {
                    "Author" => vec![json!({"id": 1, "email": "ada@example.com", "name": "Ada"})],
                    "BlogPost" => vec![
                        json!({"id": 1, "title": "Ownership", "body": "moves and borrows", "author_id": 1}),
                        json!({"id": 2, "title": "Traits", "body": "shared behaviour", "author_id": 1}),
                    ],
                    _ => Vec::new(),
                };
                repo = repo.with_rows(schema.clone(), rows);
            }
            Arc::new(repo)
        }
    };

    let concerns = StaticConcerns::from_configs(&config.concerns).with_repository("MyBlog", repo);
    let registry = resolve(&config, &concerns, &Services::default())?;

    let params = Params::new().with("order", json!("-id"));
    for resource in registry.iter() {
        let descriptor = resource.descriptor();
        if let Some(meta) = registry.meta(descriptor.route_name()) {
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
        let query = Query::from_schema(descriptor.schema().clone());
        let listing = run_pipeline(resource.as_ref(), query, &params, &Action::Index).await?;
        println!("{}", resource.header_title(&Action::Index, None));
        println!("{}", serde_json::to_string_pretty(&listing)?);
    }
    Ok(())
}
