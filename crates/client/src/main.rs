mod app;
mod input;
mod lobby;
mod tui;

use std::fs::File;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::KeyEvent;
use tokio::sync::{mpsc, oneshot, watch};

use app::App;
use netpong::{
    Bounds, GameConfig, GameState, InputEvent, Session, SessionMode, SessionStatus, SharedGame,
};
use tui::Tui;

#[derive(Parser)]
#[command(name = "netpong")]
#[command(about = "Two-player terminal pong, on one keyboard or over TCP")]
struct Args {
    #[arg(long, help = "Host a game and wait for one opponent")]
    host: bool,

    #[arg(
        short,
        long,
        value_name = "ID|ADDR",
        conflicts_with = "host",
        help = "Join a game by game id or ip:port"
    )]
    client: Option<String>,

    #[arg(short, long, default_value_t = netpong::DEFAULT_PORT)]
    port: u16,

    #[arg(short, long, default_value = "0.0.0.0")]
    bind: Ipv4Addr,

    #[arg(long, default_value_t = netpong::DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,

    #[arg(long, default_value_t = netpong::DEFAULT_SYNC_INTERVAL_MS)]
    sync_ms: u64,

    #[arg(long, default_value_t = netpong::DEFAULT_PADDLE_HEIGHT)]
    paddle_height: i32,

    #[arg(long, default_value_t = netpong::DEFAULT_BALL_SPEED, help = "Ticks per ball step")]
    ball_speed: u64,

    #[arg(long, help = "Write logs to this file (the terminal is taken by the game)")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn mode(&self) -> SessionMode {
        match (&self.client, self.host) {
            (Some(target), _) => SessionMode::Client {
                target: target.clone(),
            },
            (None, true) => SessionMode::Host,
            (None, false) => SessionMode::Local,
        }
    }

    fn game_config(&self) -> GameConfig {
        GameConfig {
            tick_interval: Duration::from_millis(self.tick_ms),
            sync_interval: Duration::from_millis(self.sync_ms),
            paddle_height: self.paddle_height,
            ball_speed: self.ball_speed,
            bind_addr: self.bind,
            port: self.port,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = args.game_config();
    if let Some(state) = run(args.mode(), config).await? {
        println!("Final score: {} - {}", state.score.p1, state.score.p2);
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Sets up the session behind a status screen, then plays until the player
/// quits. Returns `None` when the player left before the game started.
async fn run(mode: SessionMode, config: GameConfig) -> Result<Option<GameState>> {
    let tui = Tui::new()?;
    let (cols, rows) = crossterm::terminal::size()?;
    let bounds = Bounds::from_terminal(cols, rows);
    log::info!("Field is {}x{}", bounds.max_x, bounds.max_y);
    let config = config.fit_to(bounds);

    let shared = SharedGame::new(GameState::new(bounds, config.paddle_height));
    let mut keys = input::spawn_reader();

    let (status_tx, status_rx) = watch::channel(SessionStatus::Starting);
    let (stop_tx, stop_rx) = oneshot::channel();
    let display = lobby::spawn_status_display(tui, status_rx, stop_rx);

    let established = tokio::select! {
        result = Session::establish(mode, &config, shared, &status_tx) => Some(result),
        _ = wait_for_quit(&mut keys) => None,
    };

    let _ = stop_tx.send(());
    let mut tui = display.await??;

    let session = match established {
        Some(Ok(session)) => session,
        Some(Err(e)) => {
            log::error!("Session setup failed: {}", e);
            tui.draw_failure(&e.to_string())?;
            keys.recv().await;
            return Err(e.into());
        }
        None => {
            log::info!("Quit before the game started");
            return Ok(None);
        }
    };

    let result = App::new(&session, bounds, &config)
        .run(&mut tui, &mut keys)
        .await;

    if let Some(stats) = session.shutdown().await {
        log::info!(
            "Link closed after {} sync cycles ({} records in, {} out)",
            stats.cycles,
            stats.records_received,
            stats.records_sent
        );
    }
    tui.restore_terminal()?;

    result.map(Some)
}

async fn wait_for_quit(keys: &mut mpsc::UnboundedReceiver<KeyEvent>) {
    while let Some(key) = keys.recv().await {
        if input::map_key(key) == Some(InputEvent::Quit) {
            return;
        }
    }
    std::future::pending::<()>().await
}
