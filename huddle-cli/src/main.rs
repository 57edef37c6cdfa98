use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use huddle::mesh::{
    MediaConstraints, MediaDeviceGateway, MeshHandle, MeshNegotiator, NoCapture, PeerRegistry,
    PeerStatus, TransportConfig, spawn_silence,
};
use huddle::relay::{RoomManager, serve};
use huddle::LocalIdentity;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Full-mesh WebRTC rooms: signaling relay and headless participant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay
    Relay {
        #[arg(long, env = "HUDDLE_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },

    /// Join a room as a participant
    Join {
        #[arg(long, env = "HUDDLE_SERVER", default_value = "http://127.0.0.1:8080")]
        server: Url,

        #[arg(long, env = "HUDDLE_ROOM")]
        room: String,

        #[arg(long, env = "HUDDLE_NAME")]
        name: String,

        /// Join receive-only. Otherwise a silent audio track is sent
        #[arg(long)]
        no_media: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Relay { addr } => run_relay(&addr).await,
        Commands::Join {
            server,
            room,
            name,
            no_media,
        } => run_join(server, room, name, no_media).await,
    }
}

async fn run_relay(addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("{}", "📡 Huddle relay is up".green().bold());
    println!("   🔌 WebSocket: ws://{}/ws", listener.local_addr()?);
    println!("   📋 Roster:    http://{}/roster/<room>", listener.local_addr()?);

    tokio::select! {
        res = serve(listener, RoomManager::new()) => res.context("Relay stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down relay"),
    }
    Ok(())
}

async fn run_join(server: Url, room: String, name: String, no_media: bool) -> Result<()> {
    let mut session = MeshNegotiator::over_relay(&server, TransportConfig::from_env())?
        .with_identity(LocalIdentity::new(room.as_str(), name.as_str()))
        .on_error(|e| eprintln!("{} {}", "✖ Session ended:".red().bold(), e));
    // Камеры у CLI нет, поэтому только аудио, и оно кормится тишиной
    let gateway = if no_media {
        MediaDeviceGateway::new(Arc::new(NoCapture))
    } else {
        MediaDeviceGateway::default().with_constraints(MediaConstraints {
            audio: true,
            video: false,
        })
    };
    session = session.with_media_gateway(gateway);

    println!(
        "{}",
        format!("🚀 Joining room '{room}' as {name}...").green().bold()
    );
    session
        .initialize()
        .await
        .context("Failed to join room")?;

    let handle = session.handle();
    start_local_media(&handle);
    tokio::spawn(watch_peers(handle.registry().clone()));

    let mut task = tokio::spawn(session.run());
    tokio::select! {
        res = &mut task => {
            res.context("Session task panicked")??;
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            println!("{}", "👋 Leaving room...".cyan());
            handle.teardown().await;
        }
    }

    task.await.context("Session task panicked")??;
    println!("{}", "✨ Left the room".green().bold());
    Ok(())
}

fn start_local_media(handle: &MeshHandle) {
    match handle.local_media() {
        Some(media) if media.has_media_devices() => {
            let kinds: Vec<String> = media.tracks().iter().map(|t| t.kind().to_string()).collect();
            for track in media.tracks() {
                spawn_silence(track.clone());
            }
            println!("   🎙  Local media: {} (silence)", kinds.join(", "));
        }
        _ => println!("   {}", "🔇 No local media, receive only".yellow()),
    }
}

async fn watch_peers(registry: PeerRegistry) {
    let mut changes = registry.subscribe();
    while changes.changed().await.is_ok() {
        let peers = registry.snapshot();
        println!("{}", format!("👥 Peers ({})", peers.len()).cyan().bold());
        for (name, entry) in peers {
            let status = match entry.status {
                PeerStatus::Connecting => "connecting".yellow(),
                PeerStatus::Connected => "connected".green(),
                PeerStatus::Closed => "closed".red(),
            };
            let tracks = entry
                .stream
                .map(|s| {
                    s.tracks
                        .iter()
                        .map(|t| t.kind.to_string())
                        .collect::<Vec<_>>()
                        .join("+")
                })
                .unwrap_or_else(|| "-".to_owned());
            println!("   {:<16} {} {}", name.as_str(), status, tracks);
        }
    }
}
