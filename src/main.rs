mod app;
mod cache;
mod catalog;
mod commands;
mod config;
mod event;
mod gateway;
mod logging;
mod movies;
mod query;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::movies::GatewayClient;

#[derive(Parser, Debug)]
#[command(name = "movieql")]
#[command(about = "GraphQL gateway for a movie catalog, with a terminal browser")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./movieql.yaml, then $XDG_CONFIG_HOME/movieql/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the GraphQL gateway
  Serve {
    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// Base URL of the upstream movie catalog
    #[arg(short, long)]
    upstream: Option<String>,
  },
  /// Browse movies in the terminal
  Browse {
    /// Gateway URL to query
    #[arg(short, long, conflicts_with = "embedded")]
    gateway: Option<String>,

    /// Run the gateway in-process instead of connecting to one
    #[arg(long)]
    embedded: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let mut config = config::Config::load(args.config.as_deref())?;

  match args.command {
    Command::Serve { bind, upstream } => {
      logging::init_stderr()?;

      if let Some(bind) = bind {
        config.gateway.bind = bind;
      }
      if let Some(upstream) = upstream {
        config.upstream.url = upstream;
      }

      gateway::server::serve(&config).await
    }
    Command::Browse { gateway, embedded } => {
      let _guard = logging::init_file()?;

      let client = if embedded {
        let catalog = CatalogClient::new(&config.upstream)?;
        GatewayClient::embedded(gateway::build_schema(Arc::new(catalog)))
      } else {
        let url = gateway.unwrap_or_else(|| config.client.gateway_url.clone());
        GatewayClient::remote(&url)?
      };

      let mut app = app::App::new(config, client);
      app.run().await
    }
  }
}
