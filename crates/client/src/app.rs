use std::time::Duration;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::{self, error::TryRecvError};

use netpong::{Bounds, GameConfig, GameState, Intent, Session, Side, Simulation, TickCounter};

use crate::input;
use crate::tui::{Footer, Tui};

/// The fixed-rate main loop: fold input, advance one tick under the lock,
/// draw, sleep.
pub struct App<'a> {
    session: &'a Session,
    simulation: Simulation,
    ticks: TickCounter,
    tick_interval: Duration,
}

impl<'a> App<'a> {
    pub fn new(session: &'a Session, bounds: Bounds, config: &GameConfig) -> Self {
        Self {
            session,
            simulation: Simulation::with_config(bounds, config),
            ticks: TickCounter::new(),
            tick_interval: config.tick_interval,
        }
    }

    /// Runs until a quit key, returning the last state drawn.
    pub async fn run(
        &mut self,
        tui: &mut Tui,
        keys: &mut mpsc::UnboundedReceiver<KeyEvent>,
    ) -> anyhow::Result<GameState> {
        let shared = self.session.shared().clone();
        let owner = self.session.owned_side();
        let authoritative = self.session.is_authoritative();

        log::info!(
            "Game started ({} ticks of {:?})",
            if authoritative { "authoritative" } else { "following" },
            self.tick_interval
        );

        loop {
            let Some(intent) = Self::drain_input(keys, owner) else {
                break;
            };

            let tick = self.ticks.advance();
            let simulation = &self.simulation;
            let scored = shared
                .update(|state| simulation.advance(state, intent, tick, authoritative))
                .await;

            let state = shared.snapshot().await;
            if let Some(side) = scored {
                log::info!(
                    "Point for {} side, score {} - {}",
                    side.as_str(),
                    state.score.p1,
                    state.score.p2
                );
            }

            tui.draw_game(&state, &self.footer())?;
            tokio::time::sleep(self.tick_interval).await;
        }

        Ok(shared.snapshot().await)
    }

    /// Folds every key pressed since the last tick into a fresh intent, or
    /// returns `None` once the player asked to quit.
    fn drain_input(
        keys: &mut mpsc::UnboundedReceiver<KeyEvent>,
        owner: Option<Side>,
    ) -> Option<Intent> {
        let mut intent = Intent::default();
        loop {
            match keys.try_recv() {
                Ok(key) => {
                    let Some(event) = input::map_key(key) else {
                        continue;
                    };
                    if !intent.apply(event, owner) {
                        return None;
                    }
                }
                Err(TryRecvError::Empty) => return Some(intent),
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Keyboard input closed, leaving the game");
                    return None;
                }
            }
        }
    }

    fn footer(&self) -> Footer {
        Footer {
            role: self.session.role(),
            peer: self.session.peer_addr(),
            link: self.session.link_state(),
        }
    }
}
