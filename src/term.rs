use std::io::{stdout, Stdout, Write};

use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal, Result};

use crate::game::GameState;
use crate::grid::{Cell, Grid};

const BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_CHAR: char = 'X';

/// Raw-mode terminal wrapper. Owns stdout for the life of the game and
/// restores the terminal on `restore` or, as a fallback, on drop.
pub struct TermManager {
    stdout: Stdout,
    restored: bool,
}

impl TermManager {
    pub fn new() -> Self {
        // Nothing to undo until setup() succeeds.
        TermManager { stdout: stdout(), restored: true }
    }

    /// Terminal size in character cells.
    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.restored = false;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.restored = true;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Redraws the whole frame: border, snake, food and the score line
    /// below the board.
    pub fn draw_frame(&mut self, state: &GameState) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        self.queue_border(&state.grid)?;

        let head_char = state.snake.head_char();
        for (i, cell) in state.snake.cells().enumerate() {
            let ch = if i == 0 { head_char } else { BODY_CHAR };
            self.queue_at(cell, ch)?;
        }

        self.queue_at(state.food, FOOD_CHAR)?;

        queue!(
            self.stdout,
            cursor::MoveTo(0, state.grid.height() as u16),
            style::Print(format!("Score: {}", state.score))
        )?;

        self.stdout.flush()?;
        Ok(())
    }

    /// Repaints the body with the dead glyph after a fatal tick.
    pub fn draw_dead_snake(&mut self, state: &GameState) -> Result<()> {
        for cell in state.snake.cells() {
            self.queue_at(cell, DEAD_CHAR)?;
        }
        self.stdout.flush()?;
        Ok(())
    }

    /// Prints a message box centered on the board.
    pub fn show_overlay(&mut self, grid: &Grid, lines: &[&str]) -> Result<()> {
        let box_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let box_height = lines.len() + 2;
        let left = (grid.width() as usize).saturating_sub(box_width) / 2;
        let top = (grid.height() as usize).saturating_sub(box_height) / 2;

        let blank = " ".repeat(box_width);
        for row in 0..box_height {
            queue!(
                self.stdout,
                cursor::MoveTo(left as u16, (top + row) as u16),
                style::Print(&blank)
            )?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^box_width$}");
            queue!(
                self.stdout,
                cursor::MoveTo(left as u16, (top + i + 1) as u16),
                style::Print(padded)
            )?;
        }

        self.stdout.flush()?;
        Ok(())
    }

    fn queue_border(&mut self, grid: &Grid) -> Result<()> {
        let end_x = (grid.width() - 1) as u16;
        let end_y = (grid.height() - 1) as u16;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            queue!(self.stdout, cursor::MoveTo(x, 0), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(x, end_y), style::Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.stdout, cursor::MoveTo(0, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(end_x, y), style::Print('|'))?;
        }

        Ok(())
    }

    fn queue_at(&mut self, cell: Cell, ch: char) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(cell.x as u16, cell.y as u16),
            style::Print(ch)
        )
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Error-path cleanup; the happy path went through restore().
        if !self.restored {
            let _ = self.restore();
        }
    }
}
