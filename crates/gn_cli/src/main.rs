use clap::Parser;
use gn_client::{ArticleParams, ArticleViewController, FeedController, HttpNewsApi, NewsApi, ViewConfig};
use gn_core::{ApiKey, NewsCategory};
use gn_provider::newsapi::DEFAULT_BASE_URL;
use gn_web::ServerConfig;
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::duration::HumanDuration;

mod duration;
mod render;

const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
#[command(author, version, about = "News headlines proxy and terminal reader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the news proxy (/api/news and /api/article)
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,
        /// Upstream API root
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
        /// How long a fetched page is reused (e.g. 600, 10m); 0 disables caching
        #[arg(long, default_value = "10m")]
        cache_ttl: HumanDuration,
        /// Fetch and extract publisher pages instead of placeholder content
        #[arg(long)]
        extract_content: bool,
    },
    /// Show the homepage feed
    Feed {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
        #[arg(long)]
        category: Option<NewsCategory>,
        #[arg(long, conflicts_with = "category")]
        query: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one article with related articles
    Article {
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
        /// Canonical URL of the article
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "article")]
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        published_at: Option<String>,
        #[arg(long)]
        source_name: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List news categories
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let view_config = ViewConfig {
        interactive: std::io::stdout().is_terminal(),
    };

    match cli.command {
        Commands::Serve {
            addr,
            base_url,
            cache_ttl,
            extract_content,
        } => {
            let config = ServerConfig {
                addr,
                api_key: ApiKey::from_env(),
                base_url,
                cache_ttl: cache_ttl.0,
                extract_content,
            };
            info!(
                "📰 Starting news proxy (cache {}s, extraction {})",
                cache_ttl.0.as_secs(),
                extract_content
            );
            gn_web::serve(config).await?;
        }
        Commands::Feed {
            server,
            category,
            query,
            pages,
        } => {
            let api: Arc<dyn NewsApi> = Arc::new(HttpNewsApi::new(server));
            let mut feed = FeedController::new(api);

            match query {
                Some(query) => feed.search(query).await,
                None => feed.set_category(category).await,
            }

            let mut loaded = 1;
            while loaded < pages.max(1) && feed.load_more().await {
                loaded += 1;
            }

            println!("{}", render::feed(&feed.view(view_config), loaded, chrono::Utc::now()));
        }
        Commands::Article {
            server,
            source,
            slug,
            title,
            image,
            author,
            published_at,
            source_name,
            category,
        } => {
            let api: Arc<dyn NewsApi> = Arc::new(HttpNewsApi::new(server));
            let mut view = ArticleViewController::new(api);
            let params = ArticleParams {
                slug,
                source,
                title,
                image,
                author,
                published_at,
                source_name,
                category,
            };

            let state = view.open(&params).await;
            println!("{}", render::article(state, chrono::Utc::now()));
        }
        Commands::Categories => {
            println!("{}", render::categories());
        }
    }

    Ok(())
}
