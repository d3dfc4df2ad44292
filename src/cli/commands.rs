use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;

use crate::config::RouterConfig;
use crate::manifest::RouteManifest;
use crate::router::Router;

/// Command-line interface for Switchyard
#[derive(Debug, Parser)]
#[command(name = "switchyard")]
#[command(about = "Inspect Switchyard route manifests", long_about = None)]
pub struct Cli {
    /// Router settings in TOML; defaults come from the environment
    #[arg(long, global = true, env = "SWITCHYARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print every route and report shadowed ones
    Routes {
        /// Route manifest (TOML, or YAML by extension)
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Match a request against the manifest
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, optionally with a query string
        path: String,
        /// Route manifest (TOML, or YAML by extension)
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Generate the URL of a named route
    Url {
        /// Route name
        name: String,
        /// Parameters as key=value pairs
        params: Vec<String>,
        /// Route manifest (TOML, or YAML by extension)
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

/// Execute a parsed command, writing results to stdout.
///
/// # Errors
///
/// Fails if the configuration or manifest cannot be loaded, or the
/// requested route does not exist.
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            RouterConfig::from_toml_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RouterConfig::from_env(),
    };

    match cli.command {
        Commands::Routes { manifest } => {
            let router = load_router(&manifest, config)?;
            for line in router.describe_routes() {
                println!("{line}");
            }
            let shadowed = router.shadowed_routes();
            if !shadowed.is_empty() {
                println!();
                println!("⚠️  {} route(s) can never match:", shadowed.len());
                for s in shadowed {
                    println!(
                        "  {} {} (shadowed by {})",
                        s.shadowed.method(),
                        s.shadowed.template(),
                        s.by.template()
                    );
                }
            }
        }
        Commands::Match {
            method,
            path,
            manifest,
        } => {
            let router = load_router(&manifest, config)?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("invalid HTTP method '{method}'"))?;
            let path = path.split('?').next().unwrap_or_default();
            match router.match_route(&method, path) {
                Some(m) => {
                    println!(
                        "✅ {} {} → {} ({})",
                        method,
                        path,
                        m.route.template(),
                        m.route.handler().describe()
                    );
                    if let Some(name) = m.route.name() {
                        println!("   name: {name}");
                    }
                    for (key, value) in &m.path_params {
                        println!("   {key} = {value}");
                    }
                }
                None => bail!("no route matches {method} {path}"),
            }
        }
        Commands::Url {
            name,
            params,
            manifest,
        } => {
            let router = load_router(&manifest, config)?;
            let params = parse_params(&params)?;
            let url = router.url(&name, &params)?;
            println!("{url}");
        }
    }
    Ok(())
}

fn load_router(manifest: &Path, config: RouterConfig) -> Result<Router> {
    let mut router = Router::with_config(config);
    RouteManifest::from_path(manifest)?.register(&mut router)?;
    Ok(router)
}

/// Split `key=value` arguments. Later duplicates win.
pub(crate) fn parse_params(params: &[String]) -> Result<HashMap<String, String>> {
    params
        .iter()
        .map(|p| {
            p.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("expected key=value, got '{p}'"))
        })
        .collect()
}
