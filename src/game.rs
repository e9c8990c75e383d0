use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::arena::{Arena, Collision};
use crate::config::GameConfig;
use crate::food::Food;
use crate::segment::Segment;
use crate::snake::{Direction, Snake};
use crate::Coords;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Initialized,
    Playing,
    Paused,
    GameOver,
    Destroyed,
}

/// How the last round ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    Crashed(Collision),
    Stopped,
    /// The snake fills the whole arena, there is nowhere left for food.
    BoardFull,
}

/// Input coming from the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Start a round, or pause/resume the running one
    StartPause,
    Stop,
    NewGame,
    ToggleMute,
    Shutdown,
}

/// Read-only picture of a session, handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub segments: Vec<Segment>,
    pub head: Coords,
    pub direction: Direction,
    pub food: Coords,
    pub state: GameState,
    pub score: u32,
    pub round_end: Option<RoundEnd>,
}

impl Frame {
    pub fn game_over(&self) -> bool {
        self.state == GameState::GameOver
    }
}

/// Collaborators for drawing and audio feedback. Notifications are fire and
/// forget; only rendering may fail.
pub trait GameHooks {
    fn render(&mut self, frame: &Frame) -> anyhow::Result<()>;
    fn on_eat(&mut self) {}
    fn on_die(&mut self) {}
    fn on_control_click(&mut self) {}
    fn score_changed(&mut self, _score: u32) {}
    fn toggle_mute(&mut self) {}
}

/// Result of a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, nothing happened
    Idle,
    Moved,
    Ate,
    Ended(RoundEnd),
}

/// All game state. Every mutation goes through here, so whoever owns the
/// session is the single writer.
pub struct GameSession<H, R = StdRng> {
    arena: Arena,
    snake: Snake,
    food: Food,
    score: u32,
    state: GameState,
    round_end: Option<RoundEnd>,
    hooks: H,
    rng: R,
}

impl<H: GameHooks, R: Rng> GameSession<H, R> {
    pub fn new(config: &GameConfig, hooks: H, mut rng: R) -> Self {
        let arena = config.arena();
        let snake = Snake::new(&arena, config.initial_length, config.exempt_segments, &mut rng);
        let mut food = Food::new((0, 0));
        food.regenerate_until(&arena, &mut rng, |cell| snake.contains(cell));

        GameSession {
            arena,
            snake,
            food,
            score: 0,
            state: GameState::Initialized,
            round_end: None,
            hooks,
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> Coords {
        self.food.cell()
    }

    #[cfg(test)]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => self.set_direction(direction),
            Command::StartPause => self.start_or_toggle(),
            Command::Stop => self.stop(),
            Command::NewGame => self.new_game(),
            Command::ToggleMute => {
                self.hooks.toggle_mute();
                self.hooks.on_control_click();
            }
            Command::Shutdown => self.shutdown(),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        // Turns pressed while paused or after a round ended are dropped, not queued
        if self.state == GameState::Playing {
            self.snake.set_direction(direction);
        }
    }

    /// Begins a fresh round. Only valid before the first round or after one ended.
    pub fn start(&mut self) {
        if !matches!(self.state, GameState::Initialized | GameState::GameOver) {
            return;
        }

        self.snake.regenerate(&self.arena, &mut self.rng);
        self.place_food();
        self.set_score(0);
        self.round_end = None;
        self.state = GameState::Playing;
        info!(head = ?self.snake.head(), direction = ?self.snake.direction(), "round started");
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
        debug!(state = ?self.state, "pause toggled");
    }

    /// The start/pause button: starts a round when none is running,
    /// otherwise pauses or resumes it.
    pub fn start_or_toggle(&mut self) {
        match self.state {
            GameState::Initialized | GameState::GameOver => self.start(),
            GameState::Playing | GameState::Paused => self.toggle_pause(),
            GameState::Destroyed => return,
        }
        self.hooks.on_control_click();
    }

    pub fn stop(&mut self) {
        if !matches!(self.state, GameState::Playing | GameState::Paused) {
            return;
        }

        info!(score = self.score, "round stopped");
        self.end_round(RoundEnd::Stopped);
        self.set_score(0);
        self.hooks.on_control_click();
    }

    pub fn new_game(&mut self) {
        match self.state {
            GameState::Playing | GameState::Paused => {
                self.end_round(RoundEnd::Stopped);
            }
            GameState::Destroyed => return,
            _ => {}
        }
        self.start();
        self.hooks.on_control_click();
    }

    pub fn shutdown(&mut self) {
        info!("session shutting down");
        self.state = GameState::Destroyed;
    }

    /// Advances the snake by one cell and resolves food and collisions.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Playing {
            return TickOutcome::Idle;
        }

        self.snake.update();
        let head = self.snake.head();
        trace!(?head, "tick");

        let ate = head == self.food.cell();
        if ate {
            self.hooks.on_eat();
            self.set_score(self.score + 1);

            if self.snake.len() >= self.arena.cell_count() {
                info!(score = self.score, "board full");
                self.end_round(RoundEnd::BoardFull);
                return TickOutcome::Ended(RoundEnd::BoardFull);
            }
            self.place_food();
        } else {
            self.snake.shrink();
        }

        if let Some(collision) = self.arena.collision(&self.snake) {
            info!(?collision, ?head, score = self.score, "game over");
            self.hooks.on_die();
            self.set_score(0);
            self.end_round(RoundEnd::Crashed(collision));
            return TickOutcome::Ended(RoundEnd::Crashed(collision));
        }

        if ate {
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            segments: self.snake.segments().copied().collect(),
            head: self.snake.head(),
            direction: self.snake.direction(),
            food: self.food.cell(),
            state: self.state,
            score: self.score,
            round_end: self.round_end,
        }
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let frame = self.frame();
        self.hooks.render(&frame)
    }

    fn place_food(&mut self) {
        let snake = &self.snake;
        let draws = self.food.regenerate_until(&self.arena, &mut self.rng, |cell| snake.contains(cell));
        debug!(food = ?self.food.cell(), draws, "food placed");
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
        self.hooks.score_changed(score);
    }

    fn end_round(&mut self, end: RoundEnd) {
        self.state = GameState::GameOver;
        self.round_end = Some(end);
    }
}
