mod config;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use config::ServerConfig;
use tictactoe::{Host, NetworkEndpoint, PlayerKind, SessionConfig, SessionEvent, SessionReport};

#[derive(Parser)]
#[command(name = "tictactoe-server")]
#[command(about = "Tic-tac-toe host: plays X against one UDP challenger at a time")]
struct Args {
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    #[arg(
        short,
        long,
        default_value_t = tictactoe::DEFAULT_TURN_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Seconds the challenger has for each move"
    )]
    timeout: u64,

    #[arg(long, help = "Play X from the console instead of the engine")]
    human: bool,

    #[arg(long, help = "Tag packets with a session id byte")]
    extended: bool,

    #[arg(long, default_value_t = tictactoe::PROTOCOL_VERSION)]
    protocol_version: u8,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
        session: SessionConfig {
            protocol_version: args.protocol_version,
            turn_timeout: Duration::from_secs(args.timeout),
            extended: args.extended,
        },
        player: if args.human {
            PlayerKind::Human
        } else {
            PlayerKind::Ai
        },
    };

    let endpoint = NetworkEndpoint::bind(config.bind_addr())
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    log::info!("Server started on {}", endpoint.local_addr());

    let mut host = Host::new(endpoint, config.session.clone());
    let mut local = config.player.into_source();
    log::info!("Playing X with the {} source", local.name());

    host.run(local.as_mut(), report_session)
}

fn report_session(report: &SessionReport, events: Vec<SessionEvent>) {
    for event in events {
        if let SessionEvent::DatagramDropped { from, reason } = event {
            log::debug!("Dropped datagram from {} during session: {}", from, reason);
        }
    }

    let tag = report
        .session_id
        .map(|id| format!(" #{}", id))
        .unwrap_or_default();
    log::info!(
        "Session{} with {} finished after {} moves in {:.1}s: {}",
        tag,
        report.peer,
        report.moves.len(),
        report.duration.as_secs_f32(),
        report.outcome
    );
}
