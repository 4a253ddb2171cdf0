use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use ghstars::app::{DetailsSessions, LoadState, MainLoop, StarsController, StarsQuery};
use ghstars::github::{self, GithubClient, RepoSource};
use ghstars::util::{self, config::AppConfig, format};

#[derive(Parser, Debug)]
#[command(name = "ghstars", version, about = "Browse GitHub starred repositories")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub token (defaults to `gh auth token`, GITHUB_TOKEN or GH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Enable debug logging to file
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a user's starred repositories
    Stars {
        /// GitHub username (defaults to the configured one)
        username: Option<String>,

        /// Page size, 1-100
        #[arg(long)]
        per_page: Option<String>,
    },
    /// Show details for one or more repositories
    Repo {
        /// Repositories as owner/name
        #[arg(required = true)]
        full_names: Vec<String>,

        /// Open each repository's page in the browser
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let _guard = setup_logging(&config, cli.debug)?;

    info!("ghstars starting");

    let token = cli
        .token
        .clone()
        .or_else(github::auth::resolve_token)
        .unwrap_or_default();
    let client = GithubClient::new(&config.github.api_url, config.github.request_timeout())?;
    let source: Arc<dyn RepoSource> = Arc::new(client);

    match cli.command {
        Command::Stars { username, per_page } => {
            let query = StarsQuery {
                username: username.unwrap_or_else(|| config.github.username.clone()),
                token,
                per_page: per_page.unwrap_or_else(|| config.github.per_page.clone()),
            };
            run_stars(source, query).await
        }
        Command::Repo { full_names, open } => run_repo(source, &full_names, &token, open).await,
    }
}

async fn run_stars(source: Arc<dyn RepoSource>, query: StarsQuery) -> Result<()> {
    let mut main_loop = MainLoop::new();
    let controller = StarsController::new(source, main_loop.dispatcher());
    controller.set_query(query);
    controller.load();

    main_loop
        .run_until(|| controller.view().load_state.is_settled())
        .await;

    let view = controller.view();
    if view.load_state == LoadState::Failed {
        bail!("{}: {}", view.status, view.error);
    }

    for repo in controller.store().snapshot().iter() {
        println!(
            "{:<40} {:<12} {:>8}  {}  {}",
            repo.full_name,
            format::value_or_dash(&repo.language),
            repo.stars,
            format::format_date(repo.updated_at),
            format::value_or_dash(&repo.description),
        );
    }
    info!(count = view.repo_count, "Printed starred repos");
    Ok(())
}

async fn run_repo(
    source: Arc<dyn RepoSource>,
    full_names: &[String],
    token: &str,
    open: bool,
) -> Result<()> {
    let mut main_loop = MainLoop::new();
    let sessions = DetailsSessions::new(source, main_loop.dispatcher());

    // Repeated names share one session and one fetch.
    let controllers: Vec<_> = full_names
        .iter()
        .map(|name| sessions.open(name, token))
        .collect();

    main_loop
        .run_until(|| {
            controllers
                .iter()
                .all(|c| c.view().load_state.is_settled())
        })
        .await;

    let mut failed = 0;
    for (i, controller) in controllers.iter().enumerate() {
        if controllers[..i]
            .iter()
            .any(|c| c.full_name() == controller.full_name())
        {
            continue;
        }

        let view = controller.view();
        if i > 0 {
            println!();
        }
        if view.load_state == LoadState::Failed {
            eprintln!("{}: {}", controller.full_name(), view.error);
            failed += 1;
            continue;
        }

        for (label, value) in view.fields.rows() {
            println!("{:<15} {}", label, value);
        }
        if open {
            util::browser::open_url(&view.fields.html_url)?;
        }
    }

    for name in full_names {
        sessions.close(name);
    }

    if failed > 0 {
        bail!("{} repositories failed to load", failed);
    }
    Ok(())
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    if !debug {
        return Ok(None);
    }

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "ghstars.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("ghstars=debug")
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
