//! Checks the configured backends without starting the server.
//!
//! Also serves as the row-store keep-alive: each run issues a lightweight HEAD request so
//! an idle free-tier project is not paused. Unreachable backends are reported, not
//! treated as failures.

use cozy_store::infra::config::{self, AppConfig};
use cozy_store::storage::{GitHubStore, RowStore};
use cozy_store::CollectionKind;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads (all optional):\n\
           GITHUB_TOKEN, GITHUB_OWNER, GITHUB_REPO, GITHUB_BRANCH, GITHUB_API_URL\n\
           SUPABASE_URL, SUPABASE_ANON_KEY\n\
           SAVE_DELAY_SECS, CACHE_DIR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    cozy_store::infra::logging::init(config::log_json());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = AppConfig::from_env();
    println!("> Preflight:");
    println!("  SAVE_DELAY_SECS={}", config.save_delay.as_secs());
    println!("  CACHE_DIR={}", config.cache_dir.display());

    match &config.github {
        Some(gh) => {
            println!(
                "  GitHub: {}/{} (branch {}) via {}",
                gh.owner, gh.repo, gh.branch, gh.api_url
            );
            match GitHubStore::new(gh.clone()) {
                Ok(store) => {
                    if store.test_connection().await {
                        println!("  GitHub connection: ok");
                    } else {
                        println!("  GitHub connection: FAILED (check token and repository)");
                    }
                }
                Err(e) => println!("  GitHub client: {}", e),
            }
        }
        None => println!("  GitHub: not configured"),
    }

    match &config.row_store {
        Some(rs) => {
            println!("  Row store: {}", rs.url);
            match RowStore::new(rs.clone()) {
                Ok(store) => {
                    let tables: Vec<&str> =
                        CollectionKind::ALL.iter().map(|k| k.table_name()).collect();
                    match store.ping(&tables).await {
                        Some(table) => println!("  Row store keep-alive: ok (table {})", table),
                        None => println!("  Row store keep-alive: no table answered (tables not set up yet?)"),
                    }
                }
                Err(e) => println!("  Row store client: {}", e),
            }
        }
        None => println!("  Row store: not configured"),
    }

    println!("> Preflight OK");
    Ok(())
}
