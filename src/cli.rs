use crate::config::{DEFAULT_CONFIG_FILE, SiteConfig, expand_tilde};
use crate::error::Result;
use crate::nav::{ExpansionState, Navigator};
use crate::search::{SearchEngine, SearchResults};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "docnav")]
#[command(author, version, long_about = None)]
#[command(about = "Search and navigate generated documentation sites")]
pub struct Cli {
    /// Site config file (defaults to ./docnav.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up documented names
    Search {
        query: String,
        /// Maximum rows (defaults to the configured max_results)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find a page in the navigation tree
    Locate {
        #[arg(value_name = "URL")]
        url: String,
        #[arg(short, long)]
        anchor: Option<String>,
    },
}

impl Cli {
    /// The explicit config, `./docnav.toml` if present, or the defaults.
    pub fn site_config(&self) -> Result<SiteConfig> {
        if let Some(path) = &self.config {
            let path = expand_tilde(path);
            return SiteConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()));
        }

        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            return SiteConfig::load(default).context("Failed to load ./docnav.toml");
        }

        tracing::debug!("No config file, using defaults");
        Ok(SiteConfig::default())
    }
}

/// Runs one command, writing its report to stdout.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = cli.site_config()?;

    match &cli.command {
        Commands::Search { query, limit, json } => {
            let engine = SearchEngine::load(&config.search)
                .await
                .context("Failed to load search index")?;
            let results = engine.search(query, limit.unwrap_or(engine.max_results()));
            if *json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print!("{}", format_results(&results));
            }
        }
        Commands::Locate { url, anchor } => {
            let navigator = Navigator::load(&config.navigation)
                .await
                .context("Failed to load navigation")?;
            print!(
                "{}",
                locate(&navigator, url, anchor.as_deref(), config.navigation.suggestions)?
            );
        }
    }

    Ok(())
}

fn format_results(results: &SearchResults) -> String {
    if results.is_empty() {
        return format!("No matches for '{}'\n", results.query);
    }

    let mut output = String::new();
    for hit in results {
        let group = hit
            .target
            .group_label
            .as_deref()
            .map(|group| format!(" ({})", group))
            .unwrap_or_default();
        output.push_str(&format!(
            "{:<9} {}{}  {}\n",
            format!("[{}]", hit.kind),
            hit.display_name,
            group,
            hit.target.href()
        ));
    }
    if results.truncated {
        output.push_str("... more results\n");
    }
    output
}

fn locate(
    navigator: &Navigator,
    url: &str,
    anchor: Option<&str>,
    suggestions: usize,
) -> Result<String> {
    let mut state = ExpansionState::new();
    match navigator.navigate(&mut state, url, anchor) {
        Ok(target) => {
            let tree = navigator.tree();
            let path = tree.path_of(target).unwrap_or_default();
            let mut output = format!("{}\n", path);
            for id in state.expanded() {
                if let Some(node) = tree.node(*id) {
                    let marker = if Some(*id) == state.highlighted() { ">" } else { " " };
                    output.push_str(&format!("{} {}\n", marker, node.label));
                }
            }
            Ok(output)
        }
        Err(e) => {
            let close = navigator.suggest(url, suggestions);
            if close.is_empty() {
                bail!(e);
            }
            let names: Vec<_> = close.iter().map(|s| s.key.as_str()).collect();
            bail!("{}; did you mean: {}", e, names.join(", "));
        }
    }
}
