mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use query_defs::{LocalLoader, Loader, QueryType};
use query_defs_remote::{GithubLoader, GithubLoaderConfig, UrlLoader};
use tracing_subscriber::EnvFilter;

use crate::config::SourceType;

#[derive(Parser)]
#[command(name = "query-defs")]
#[command(about = "List and read query definitions from local, GitHub, or manifest sources")]
struct Cli {
    /// Read queries from a local directory
    #[arg(long, global = true, conflicts_with_all = ["github", "url", "source"])]
    local: Option<PathBuf>,

    /// Read queries from a GitHub repository (`owner/repo`)
    #[arg(long, global = true, conflicts_with_all = ["url", "source"])]
    github: Option<String>,

    /// Only list files under this repository directory
    #[arg(long, global = true, requires = "github")]
    subdir: Option<String>,

    /// Branch, tag, or commit to read (defaults to the pinned default branch)
    #[arg(long = "ref", global = true, requires = "github")]
    git_ref: Option<String>,

    /// Read queries listed in a remote manifest
    #[arg(long, global = true, conflicts_with = "source")]
    url: Option<String>,

    /// Use a named source from the config file
    #[arg(long, global = true)]
    source: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List query files in the source
    List {
        /// Filter by query type (sparql, tpf, json)
        #[arg(long)]
        kind: Option<QueryType>,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a query by name (with or without its suffix)
    Show {
        name: String,
        /// Print only the query text
        #[arg(long)]
        raw: bool,
    },
    /// Print the provenance URI of the source
    Uri,
    /// Print metadata the source publishes about itself
    Info,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Split `owner/repo`.
fn parse_repo_slug(slug: &str) -> Result<(String, String)> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_owned(), repo.to_owned()))
        }
        _ => bail!("expected owner/repo, got {slug:?}"),
    }
}

/// Pick the source from command-line flags, falling back to the config file.
fn resolve_source(cli: &Cli) -> Result<SourceType> {
    if let Some(path) = &cli.local {
        return Ok(SourceType::Local { path: path.clone() });
    }
    if let Some(slug) = &cli.github {
        let (owner, repo) = parse_repo_slug(slug)?;
        return Ok(SourceType::GitHubRepo {
            owner,
            repo,
            subdir: cli.subdir.clone(),
            git_ref: cli.git_ref.clone(),
        });
    }
    if let Some(url) = &cli.url {
        return Ok(SourceType::Url {
            manifest_url: url.clone(),
        });
    }

    let app_config = config::load_config();
    let entry = match &cli.source {
        Some(label) => app_config
            .find(label)
            .with_context(|| format!("no enabled source named {label:?} in config"))?,
        None => app_config.first_enabled().context(
            "no source given: pass --local, --github, or --url, or configure sources.toml",
        )?,
    };
    tracing::info!("using configured source [{}]", entry.label);
    Ok(entry.source_type.clone())
}

async fn build_loader(source: SourceType) -> Result<Box<dyn Loader>> {
    let loader: Box<dyn Loader> = match source {
        SourceType::Local { path } => Box::new(LocalLoader::new(path)),
        SourceType::GitHubRepo {
            owner,
            repo,
            subdir,
            git_ref,
        } => {
            let config = GithubLoaderConfig::new(owner, repo)
                .with_subdir(subdir)
                .with_ref(git_ref);
            Box::new(GithubLoader::connect(config).await?)
        }
        SourceType::Url { manifest_url } => Box::new(UrlLoader::new(manifest_url)),
    };
    Ok(loader)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = resolve_source(&cli)?;
    let loader = build_loader(source).await?;

    match cli.command {
        Command::List { kind, json } => commands::list::run(loader.as_ref(), kind, json).await,
        Command::Show { name, raw } => commands::show::run(loader.as_ref(), &name, raw).await,
        Command::Uri => commands::uri::run(loader.as_ref()),
        Command::Info => commands::info::run(loader.as_ref()).await,
    }
}
