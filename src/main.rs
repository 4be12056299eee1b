#[macro_use]
extern crate log;

mod buffer;
mod config;
mod cursor;
mod dump;
mod error;
mod handler;
mod protocol;
mod system;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use simple_logger::SimpleLogger;

use crate::config::{init_from_toml, Overrides};
use crate::handler::HandlerContext;
use crate::system::Result;

//dig @127.0.0.1 -p 2053 codecrafters.io
#[derive(Parser)]
#[command(name = "dns-relay")]
#[command(version = "0.1.0")]
#[command(about = "UDP DNS relay answering A queries locally or through an upstream resolver")]
struct Cli {
    /// Upstream resolver as host:port
    #[arg(long, value_name = "HOST:PORT")]
    resolver: Option<String>,

    /// Listening port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Forward the questions of one query concurrently
    #[arg(long)]
    parallel: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        error!("{}", e);
        eprintln!("dns-relay: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        bind: cli.bind,
        port: cli.port,
        resolver: cli.resolver,
        log_level: cli.log_level,
        parallel_forwarding: cli.parallel,
    };
    let config = init_from_toml(cli.config.as_deref(), overrides).await?;
    SimpleLogger::new().with_level(config.level_filter()?).init()?;

    let context = HandlerContext::from(&config).await?;
    match &config.resolver {
        Some(resolver) => info!("listening on {}, relaying to {}", context.local_addr()?, resolver),
        None => info!("listening on {}, answering locally", context.local_addr()?),
    }
    context.run().await
}
