#![deny(warnings)]

use persistence::{create_save, default_sqlite_url, init_db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| default_sqlite_url().to_string());
    if let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    let pool = init_db(&url).await?;
    let id = create_save(&pool, "default", Some("schema initialized")).await?;
    println!("database ready at {url} (save #{id})");
    Ok(())
}
