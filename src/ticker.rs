use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::Rng;
use tracing::{info, trace, warn};

use crate::config::GameConfig;
use crate::game::{Command, GameHooks, GameSession, GameState};

/// Drives a session at a fixed rate. Commands are applied between ticks on the
/// same thread, so the ticker is the only writer of the game state.
pub struct Ticker<H, R> {
    session: GameSession<H, R>,
    commands: Receiver<Command>,
    period: Duration,
    min_sleep: Duration,
}

impl<H: GameHooks, R: Rng> Ticker<H, R> {
    pub fn new(session: GameSession<H, R>, commands: Receiver<Command>, config: &GameConfig) -> Self {
        Ticker {
            session,
            commands,
            period: config.tick_period(),
            min_sleep: config.min_sleep,
        }
    }

    /// Runs until the session is shut down or every command sender is gone.
    /// A slow tick delays the next one; missed ticks are never made up.
    pub fn run(mut self) -> Result<GameSession<H, R>> {
        info!(period_ms = self.period.as_millis() as u64, "ticker started");

        while self.session.state() != GameState::Destroyed {
            let begin = Instant::now();

            let outcome = self.session.tick();
            trace!(?outcome, "ticked");
            self.session.render()?;

            let taken = begin.elapsed();
            if taken > self.period {
                warn!(taken_ms = taken.as_millis() as u64, "tick overran its period");
            }

            let time_left = self.period.checked_sub(taken).unwrap_or_default().max(self.min_sleep);
            self.wait(time_left)?;
        }

        info!("ticker stopped");
        Ok(self.session)
    }

    fn wait(&mut self, time_left: Duration) -> Result<()> {
        let deadline = Instant::now() + time_left;

        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }

            match self.commands.recv_timeout(deadline - now) {
                Ok(command) => {
                    self.session.apply(command);
                    if self.session.state() == GameState::Destroyed {
                        return Ok(());
                    }
                    self.session.render()?;
                }
                Err(RecvTimeoutError::Timeout) => return Ok(()),
                Err(RecvTimeoutError::Disconnected) => {
                    self.session.shutdown();
                    return Ok(());
                }
            }
        }
    }
}
