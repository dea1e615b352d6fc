mod config;

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;

use config::ClientConfig;
use tictactoe::{
    NetworkEndpoint, PlayerKind, RemoteHuman, Session, SessionConfig, SessionOutcome, Side,
};

#[derive(Parser)]
#[command(name = "tictactoe-client")]
#[command(about = "Challenges a tic-tac-toe host over UDP and plays O")]
struct Args {
    host: String,

    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    #[arg(long, help = "Let the engine play O instead of the console")]
    ai: bool,

    #[arg(
        short,
        long,
        default_value_t = tictactoe::DEFAULT_TURN_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Seconds the host has for each move"
    )]
    timeout: u64,

    #[arg(long, help = "Tag packets with a session id byte")]
    extended: bool,

    #[arg(long, default_value_t = tictactoe::PROTOCOL_VERSION)]
    protocol_version: u8,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ClientConfig {
        host: args.host,
        port: args.port,
        session: SessionConfig {
            protocol_version: args.protocol_version,
            turn_timeout: Duration::from_secs(args.timeout),
            extended: args.extended,
        },
        player: if args.ai {
            PlayerKind::Ai
        } else {
            PlayerKind::Human
        },
        session_id: std::process::id() as u8,
    };

    let server = resolve(&config.server_addr())?;
    let mut endpoint = NetworkEndpoint::bind("0.0.0.0:0").context("failed to bind a local port")?;
    log::info!("Client bound to {}", endpoint.local_addr());

    let mut session = Session::challenge(
        &mut endpoint,
        server,
        config.session.clone(),
        config.session_id,
    )
    .with_context(|| format!("failed to reach {}", server))?;

    let mut local = config.player.into_source();
    let mut remote = RemoteHuman::new();
    let outcome = session.play(&mut endpoint, local.as_mut(), &mut remote);

    println!("\n{}", session.board());
    match &outcome {
        SessionOutcome::Won { winner, mark } => match winner {
            Side::Local => println!("You ({}) win!", mark),
            Side::Remote => println!("{} wins, better luck next time.", mark),
        },
        SessionOutcome::Draw => println!("It's a draw."),
        SessionOutcome::PeerAbandoned => println!("The host stopped responding."),
        SessionOutcome::Aborted(e) => println!("Game aborted: {}", e),
    }

    if outcome.is_abort() {
        bail!("session with {} aborted", server);
    }
    Ok(())
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()
        .with_context(|| format!("failed to resolve {}", addr))?
        .find(SocketAddr::is_ipv4)
        .with_context(|| format!("no IPv4 address for {}", addr))
}
