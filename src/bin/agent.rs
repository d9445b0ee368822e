use std::{net::TcpStream, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use remote_shell::{
    AgentSession,
    config::{self, AgentConfig},
    logging,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Connect to a controller and run the commands it sends", long_about = None)]
struct Args {
    /// Controller host (default 127.0.0.1)
    host: Option<String>,

    /// Controller port (default 10000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Shell used to run `exec` commands
    #[arg(long)]
    shell: Option<String>,

    /// Flag that makes the shell run its next argument (e.g. -c)
    #[arg(long, allow_hyphen_values = true)]
    shell_flag: Option<String>,

    /// JSON config file; flags override its values
    #[arg(short, long, env = "REMOTE_SHELL_CONFIG")]
    config: Option<PathBuf>,

    /// Give up on a silent controller after this many seconds
    #[arg(long)]
    read_timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config: AgentConfig = config::load_or_default(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(shell) = args.shell {
        config.shell = shell;
    }
    if let Some(flag) = args.shell_flag {
        config.shell_flag = flag;
    }
    if args.read_timeout_secs.is_some() {
        config.channel.read_timeout_secs = args.read_timeout_secs;
    }

    let addr = config.server_addr();
    info!(%addr, "connecting to controller");
    let stream = TcpStream::connect(&addr).with_context(|| format!("failed to connect to {addr}"))?;
    let peer = stream.peer_addr().context("connection has no peer address")?;
    info!(%peer, "connected");

    let channel = config
        .channel
        .open(stream)
        .context("failed to configure controller connection")?;
    let session = AgentSession::new(channel, config.executor());
    let end = session.run()?;

    info!(?end, "agent finished");
    Ok(())
}
