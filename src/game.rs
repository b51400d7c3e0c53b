use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::grid::{Cell, Grid};
use crate::input::{spawn_input_reader, InputMailbox};
use crate::snake::{Direction, Snake};
use crate::term::TermManager;

const INITIAL_SNAKE_LENGTH: usize = 3;
const INITIAL_HEADING: Direction = Direction::Right;
const SCORE_PER_FOOD: u64 = 5;

// Vertical ticks run slower because terminal cells are taller than
// they are wide.
const HORIZONTAL_TICK: Duration = Duration::from_millis(80);
const VERTICAL_TICK: Duration = Duration::from_millis(160);
const GAME_OVER_PAUSE: Duration = Duration::from_secs(2);

/// What a single tick did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Ate,
    HitWall,
    HitSelf,
}

impl TickOutcome {
    pub fn is_fatal(self) -> bool {
        matches!(self, TickOutcome::HitWall | TickOutcome::HitSelf)
    }
}

/// Everything one running game owns: the snake, the food cell and the
/// score. Mutated only from the update loop; there is no shared state.
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub food: Cell,
    pub score: u64,
}

impl GameState {
    pub fn new(grid: Grid, rng: &mut impl Rng) -> Self {
        let snake = Snake::new(grid.center(), INITIAL_SNAKE_LENGTH, INITIAL_HEADING);
        let food = place_food(&grid, &snake, rng).expect("a fresh board has free cells");
        GameState { grid, snake, food, score: 0 }
    }

    /// Classifies the candidate head cell without committing anything.
    /// Wall and body checks run before the food check, and the tail is
    /// not lethal on a non-growing tick since it vacates as the head
    /// arrives.
    pub fn classify(&self, next_head: Cell) -> TickOutcome {
        if !self.grid.interior_contains(next_head) {
            return TickOutcome::HitWall;
        }

        let growing = next_head == self.food;
        if self.snake.occupies_excluding_vacated(next_head, growing) {
            return TickOutcome::HitSelf;
        }

        if growing {
            TickOutcome::Ate
        } else {
            TickOutcome::Continue
        }
    }

    /// Runs one tick: classify the candidate head, then either commit
    /// the move (growing and rescoring on a meal) or commit nothing on
    /// a fatal outcome.
    pub fn tick(&mut self, rng: &mut impl Rng) -> TickOutcome {
        let outcome = self.classify(self.snake.next_head());

        match outcome {
            TickOutcome::Continue => {
                self.snake.advance(false);
            }
            TickOutcome::Ate => {
                self.snake.advance(true);
                self.score += SCORE_PER_FOOD;
                if let Some(cell) = place_food(&self.grid, &self.snake, rng) {
                    self.food = cell;
                }
            }
            TickOutcome::HitWall | TickOutcome::HitSelf => {}
        }

        outcome
    }

    /// True once the snake fills the whole playable interior.
    pub fn board_full(&self) -> bool {
        self.snake.len() >= self.grid.interior_area()
    }
}

/// Picks a random interior cell not occupied by the snake, by rejection
/// sampling. None once the board is full.
pub fn place_food(grid: &Grid, snake: &Snake, rng: &mut impl Rng) -> Option<Cell> {
    if snake.len() >= grid.interior_area() {
        return None;
    }

    loop {
        let cell = grid.random_interior_cell(rng);
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }
}

enum Ending {
    Quit,
    Dead,
    Won,
}

/// The update/render loop plus its terminal and input collaborators.
pub struct SnakeGame {
    grid: Grid,
    term: TermManager,
    mailbox: InputMailbox,
    rng: ThreadRng,
}

impl SnakeGame {
    pub fn new(grid: Grid) -> anyhow::Result<Self> {
        let mut term = TermManager::new();

        let (term_w, term_h) = term.size().context("could not read the terminal size")?;
        ensure!(
            term_w >= grid.width() as u16 && term_h > grid.height() as u16,
            "terminal is {}x{} but the board needs {}x{} plus a score line",
            term_w,
            term_h,
            grid.width(),
            grid.height()
        );

        term.setup().context("could not enter raw mode")?;

        let mailbox = InputMailbox::new();
        spawn_input_reader(mailbox.clone());

        Ok(SnakeGame { grid, term, mailbox, rng: rand::thread_rng() })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut state = GameState::new(self.grid, &mut self.rng);
        self.term.draw_frame(&state)?;

        let mut deadline = Instant::now() + tick_period(state.snake.heading());

        let ending = loop {
            sleep_until(deadline);

            if self.mailbox.quit_requested() {
                break Ending::Quit;
            }

            // At most one direction per tick, latest wins.
            if let Some(direction) = self.mailbox.take_direction() {
                state.snake.set_pending_direction(direction);
            }

            let outcome = state.tick(&mut self.rng);
            if outcome.is_fatal() {
                break Ending::Dead;
            }

            self.term.draw_frame(&state)?;

            if state.board_full() {
                break Ending::Won;
            }

            deadline += tick_period(state.snake.heading());
            let now = Instant::now();
            if deadline < now {
                // Fell behind (stalled terminal, suspended process);
                // re-anchor instead of firing a burst of catch-up ticks.
                deadline = now;
            }
        };

        match ending {
            Ending::Quit => {}
            Ending::Dead => {
                self.term.draw_dead_snake(&state)?;
                let score_line = format!("Score: {}", state.score);
                self.term.show_overlay(&state.grid, &["Game over!", &score_line])?;
                sleep(GAME_OVER_PAUSE);
            }
            Ending::Won => {
                let score_line = format!("Score: {}", state.score);
                self.term.show_overlay(&state.grid, &["You won!", &score_line])?;
                sleep(GAME_OVER_PAUSE);
            }
        }

        self.term.restore()?;
        Ok(())
    }
}

fn tick_period(heading: Direction) -> Duration {
    if heading.is_vertical() {
        VERTICAL_TICK
    } else {
        HORIZONTAL_TICK
    }
}

fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if deadline > now {
        sleep(deadline - now);
    }
}
