//! Trovato navigation renderer
//!
//! Renders a navigation document to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trovato_nav::NavDocument;

#[derive(Parser, Debug)]
#[command(name = "trovato-nav", about = "Render a navigation document as markup.", version)]
struct Cli {
    /// Navigation document (.json, .yml, .yaml or .toml).
    document: PathBuf,

    /// Request path used for active-link styling.
    #[arg(long, value_name = "PATH")]
    current_path: Option<String>,

    /// Role of the current request; may be repeated.
    #[arg(long = "role", value_name = "ROLE")]
    roles: Vec<String>,

    /// Require every role to pass the access check.
    #[arg(long)]
    strict: bool,

    /// Cancel clicks on placeholder (`#`) links.
    #[arg(long)]
    return_false: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    let document = NavDocument::load_file(&cli.document)
        .with_context(|| format!("failed to load {}", cli.document.display()))?;
    let mut nav = document.into_nav();

    nav.add_roles(cli.roles);
    if cli.strict {
        nav.set_acl_strict(true);
    }
    if cli.return_false {
        nav.set_return_false(true);
    }
    if let Some(path) = cli.current_path {
        nav.set_current_path(path);
    }
    debug!(roles = nav.roles().len(), strict = nav.is_acl_strict(), "rendering navigation");

    let markup = nav.render().context("failed to build navigation")?;
    print!("{markup}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
