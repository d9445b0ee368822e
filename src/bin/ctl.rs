use std::{net::TcpListener, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use remote_shell::{
    ControllerSession,
    config::{self, ControllerConfig},
    console::Console,
    logging,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Issue commands to a connected agent", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on (default 10000)
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON config file; flags override its values
    #[arg(short, long, env = "REMOTE_SHELL_CONFIG")]
    config: Option<PathBuf>,

    /// Give up on a silent agent after this many seconds
    #[arg(long)]
    read_timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config: ControllerConfig = config::load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.read_timeout_secs.is_some() {
        config.channel.read_timeout_secs = args.read_timeout_secs;
    }

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "waiting for an agent to connect");

    // exactly one agent per run
    let (stream, peer) = listener.accept().context("failed to accept agent connection")?;
    drop(listener);
    info!(%peer, "agent connected");

    let channel = config
        .channel
        .open(stream)
        .context("failed to configure agent connection")?;
    let session = ControllerSession::new(channel);

    let mut console = Console::stdio();
    let end = session.run(&mut console)?;

    info!(?end, "controller finished");
    Ok(())
}
