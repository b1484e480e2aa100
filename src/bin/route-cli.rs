use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use ice_router::config::load_config;
use ice_router::dispatch::PathParams;
use ice_router::routing::{Endpoint, Router};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect an ice-router route table offline", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "ice-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered routes
    Routes,
    /// Resolve one or more request paths
    Lookup {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Serialize)]
struct RouteView<'a> {
    id: i32,
    pattern: &'a str,
    params: Vec<&'a str>,
    flags: Value,
}

impl<'a> From<&'a Endpoint> for RouteView<'a> {
    fn from(ep: &'a Endpoint) -> Self {
        let flags: serde_json::Map<String, Value> = ep
            .flags()
            .map(|(k, v)| (k.to_string(), Value::Bool(v)))
            .collect();
        Self {
            id: ep.id(),
            pattern: ep.pattern(),
            params: ep.param_names().collect(),
            flags: Value::Object(flags),
        }
    }
}

#[derive(Serialize)]
struct LookupView<'a> {
    path: &'a str,
    route: Option<RouteView<'a>>,
    bound: Option<PathParams>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let router = Router::from_routes(&config.routes);

    let output = match &cli.command {
        Commands::Routes => {
            let routes: Vec<RouteView<'_>> = router.endpoints().into_iter().map(RouteView::from).collect();
            serde_json::to_value(routes)?
        }
        Commands::Lookup { paths } => {
            let results: Vec<LookupView<'_>> = paths
                .iter()
                .map(|path| {
                    let found = router.resolve(path);
                    LookupView {
                        path,
                        route: found.as_ref().map(|m| RouteView::from(m.endpoint())),
                        bound: found.as_ref().map(|m| m.params().collect()),
                    }
                })
                .collect();
            serde_json::to_value(results)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
