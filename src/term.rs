use std::io::{stdout, Stdout, Write};

use anyhow::{bail, Context, Result};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::debug;

use crate::arena::Collision;
use crate::config::GameConfig;
use crate::game::{Frame, GameHooks, GameState, RoundEnd};
use crate::input::HELP_LINES;
use crate::snake::Direction::{self, *};
use crate::sound::{Sound, Speaker, Volume};
use crate::{Coords, GridInt, TermCoords, TermInt};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    columns: GridInt,
    rows: GridInt,
    cell_width: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    speaker: Speaker,
}

struct Message {
    top_left: TermCoords,
    width: TermInt,
    height: TermInt,
    lines: Vec<String>,
}

impl TermManager {
    pub fn new(config: &GameConfig, speaker: Speaker) -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;

        let needed_width = config.columns as usize * config.cell_width as usize + 2;
        let needed_height = config.rows as usize + 3;
        if (width as usize) < needed_width || (height as usize) < needed_height {
            bail!(
                "a {}x{} board needs a {}x{} terminal, this one is {}x{}; try smaller --columns/--rows",
                config.columns,
                config.rows,
                needed_width,
                needed_height,
                width,
                height
            );
        }

        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager {
            width,
            height,
            columns: config.columns,
            rows: config.rows,
            cell_width: config.cell_width,
            stdout: stdout(),
            screen,
            current_msg: None,
            speaker,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Failed to hide cursor")?;
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Failed to clear terminal")?;
        self.draw_borders()
    }

    fn draw_borders(&mut self) -> Result<()> {
        let width = self.board_width();
        let height = self.rows as TermInt + 2;
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    fn draw_board(&mut self, frame: &Frame) -> Result<()> {
        let mut glyphs = vec![' '; self.columns as usize * self.rows as usize];
        let body = if frame.game_over() {DEAD_SNAKE_CHAR} else {SNAKE_BODY_CHAR};

        if let Some(i) = self.glyph_index(frame.food) {
            glyphs[i] = FOOD_CHAR;
        }
        for cell in frame.segments.iter().flat_map(|seg| seg.cells()) {
            if let Some(i) = self.glyph_index(cell) {
                glyphs[i] = body;
            }
        }
        if let (false, Some(i)) = (frame.game_over(), self.glyph_index(frame.head)) {
            glyphs[i] = head_char(frame.direction);
        }

        for (i, &glyph) in glyphs.iter().enumerate() {
            let x = (i % self.columns as usize) as TermInt;
            let y = (i / self.columns as usize) as TermInt;
            let left = 1 + x * self.cell_width;
            let fill = if glyph == SNAKE_BODY_CHAR {glyph} else {' '};

            self.print_at((left, y + 1), glyph)?;
            for dx in 1..self.cell_width {
                self.print_at((left + dx, y + 1), fill)?;
            }
        }

        Ok(())
    }

    fn draw_status(&mut self, frame: &Frame) -> Result<()> {
        let sound = match self.speaker.volume() {
            Volume::Mute => "off",
            Volume::Low => "on",
        };
        let status = format!(
            "Score: {}  Snake: ({},{})  Sound: {}",
            frame.score, frame.head.0, frame.head.1, sound
        );

        let y = self.rows as TermInt + 2;
        let width = self.board_width() as usize;
        let padded = format!("{:<width$}", status, width = width);
        for (x, ch) in padded.chars().take(width).enumerate() {
            self.print_at((x as TermInt, y), ch)?;
        }

        Ok(())
    }

    fn sync_message(&mut self, frame: &Frame) -> Result<()> {
        let lines: Vec<String> = match frame.state {
            GameState::Initialized => {
                let mut lines = vec!["Snake hunting".to_string(), String::new()];
                lines.extend(HELP_LINES.iter().map(|line| line.to_string()));
                lines.extend(vec![String::new(), "Press Space to begin".to_string()]);
                lines
            }
            GameState::Paused => vec!["Paused".to_string(), "Press Space to resume".to_string()],
            GameState::GameOver => {
                let title = match frame.round_end {
                    Some(RoundEnd::BoardFull) => "You won!",
                    Some(RoundEnd::Stopped) => "Stopped",
                    Some(RoundEnd::Crashed(Collision::SelfBite)) => "GAME OVER! You bit yourself",
                    Some(RoundEnd::Crashed(Collision::Wall)) | None => "GAME OVER!",
                };
                vec![
                    title.to_string(),
                    String::new(),
                    "Press Space to play again,".to_string(),
                    "or Q to quit.".to_string(),
                ]
            }
            GameState::Playing | GameState::Destroyed => Vec::new(),
        };

        if lines.is_empty() {
            return self.hide_message();
        }
        if self.current_msg.as_ref().map(|msg| &msg.lines) == Some(&lines) {
            return Ok(());
        }
        self.show_message(lines)
    }

    fn show_message(&mut self, lines: Vec<String>) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.board_width() / 2, (self.rows as TermInt + 2) / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left, lines));
        Ok(())
    }

    fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(&ch) = self.screen.get(self.screen_index((x, y))) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        Ok(())
    }

    /// Draws a character, skipping cells that already show it. Cells covered
    /// by a message only update the buffer until the message goes away.
    fn print_at(&mut self, pos: TermCoords, ch: char) -> Result<()> {
        let idx = self.screen_index(pos);
        if pos.0 >= self.width || pos.1 >= self.height || self.screen[idx] == ch {
            return Ok(());
        }

        self.screen[idx] = ch;
        let covered = self.current_msg.as_ref().map_or(false, |msg| msg.covers(pos));
        if !covered {
            self.print_at_no_save(pos, ch)?;
        }
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: TermCoords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).context("Failed to draw")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }

    fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    fn board_width(&self) -> TermInt {
        self.columns as TermInt * self.cell_width + 2
    }

    fn screen_index(&self, pos: TermCoords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }

    fn glyph_index(&self, (x, y): Coords) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.columns || y >= self.rows {
            return None;
        }
        Some(y as usize * self.columns as usize + x as usize)
    }

    fn play(&mut self, sound: Sound) {
        self.speaker.play(sound, &mut self.stdout);
    }
}

impl GameHooks for TermManager {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.draw_board(frame)?;
        self.draw_status(frame)?;
        self.sync_message(frame)?;
        self.flush()
    }

    fn on_eat(&mut self) {
        self.play(Sound::Eat);
    }

    fn on_die(&mut self) {
        self.play(Sound::Die);
    }

    fn on_control_click(&mut self) {
        self.play(Sound::Click);
    }

    fn score_changed(&mut self, score: u32) {
        debug!(score, "score changed");
    }

    fn toggle_mute(&mut self) {
        self.speaker.toggle_mute();
    }
}

/// Leaves the game screen. Safe to call even if `setup` never ran.
pub fn restore() -> Result<()> {
    let mut stdout = stdout();
    terminal::disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(stdout, cursor::Show, cursor::EnableBlinking).context("Failed to show cursor")?;
    execute!(stdout, LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    Ok(())
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: TermCoords, lines: Vec<String>) -> Self {
        Message { width, height, top_left, lines }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> TermCoords {
        self.top_left
    }

    pub fn covers(&self, (x, y): TermCoords) -> bool {
        let (left, top) = self.top_left;
        x >= left && x < left + self.width && y >= top && y < top + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_covers_its_box() {
        let msg = Message::new(4, 3, (10, 5), vec!["hi".to_string()]);
        assert!(msg.covers((10, 5)));
        assert!(msg.covers((13, 7)));
        assert!(!msg.covers((14, 7)));
        assert!(!msg.covers((10, 8)));
        assert!(!msg.covers((9, 5)));
    }

    #[test]
    fn test_head_points_forward() {
        assert_eq!(head_char(Up), '^');
        assert_eq!(head_char(Down), 'v');
        assert_eq!(head_char(Left), '<');
        assert_eq!(head_char(Right), '>');
    }
}
