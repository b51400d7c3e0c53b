use std::collections::VecDeque;

use crate::grid::Cell;
use Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    /// Exact reversal on the same axis.
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left)
        )
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }
}

/// The snake body and heading. The body is ordered head-first and is
/// mutated only by `advance`, once per tick. The pending direction is
/// the player's latest unconsumed request, distinct from the committed
/// heading.
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Direction,
    pending: Option<Direction>,
}

impl Snake {
    /// Straight body of `length` cells laid out behind `head`, opposite
    /// the heading.
    pub fn new(head: Cell, length: usize, heading: Direction) -> Self {
        let (dx, dy) = heading.delta();
        let body = (0..length as i16)
            .map(|i| Cell::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { body, heading, pending: None }
    }

    /// Body from explicit cells, head first.
    pub fn from_body(cells: Vec<Cell>, heading: Direction) -> Self {
        debug_assert!(!cells.is_empty());
        Snake { body: cells.into(), heading, pending: None }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        *self.body.back().unwrap()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether moving the head to `cell` would run into the body. On a
    /// non-growing tick the tail vacates at the same instant the head
    /// arrives, so it does not count.
    pub fn occupies_excluding_vacated(&self, cell: Cell, growing: bool) -> bool {
        let kept = if growing { self.body.len() } else { self.body.len() - 1 };
        self.body.iter().take(kept).any(|&c| c == cell)
    }

    /// Records the player's latest request, overwriting any unconsumed
    /// previous one.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    /// The heading this tick will move along: the pending request
    /// unless it is an exact reversal of the current heading.
    pub fn resolved_heading(&self) -> Direction {
        match self.pending {
            Some(d) if !d.is_opposite(self.heading) => d,
            _ => self.heading,
        }
    }

    /// Candidate next head cell. Pure; nothing is committed until
    /// `advance`.
    pub fn next_head(&self) -> Cell {
        let (dx, dy) = self.resolved_heading().delta();
        let head = self.head();
        Cell::new(head.x + dx, head.y + dy)
    }

    /// Commits the tick: adopts the resolved heading, consumes the
    /// pending request, prepends the new head and drops the tail unless
    /// growing. Returns the vacated tail cell, if any.
    pub fn advance(&mut self, grow: bool) -> Option<Cell> {
        self.heading = self.resolved_heading();
        self.pending = None;

        let (dx, dy) = self.heading.delta();
        let head = self.head();
        self.body.push_front(Cell::new(head.x + dx, head.y + dy));

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }

    pub fn head_char(&self) -> char {
        match self.heading {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(snake: &Snake) -> Vec<Cell> {
        snake.cells().collect()
    }

    #[test]
    fn new_lays_body_behind_the_head() {
        let snake = Snake::new(Cell::new(5, 5), 3, Right);
        assert_eq!(
            body_of(&snake),
            vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]
        );

        let snake = Snake::new(Cell::new(5, 5), 3, Down);
        assert_eq!(
            body_of(&snake),
            vec![Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)]
        );
    }

    #[test]
    fn plain_step_drops_the_tail() {
        // Initial layout of the reference game: body perpendicular to
        // the heading. One tick moves the head right and drops (10,3).
        let mut snake = Snake::from_body(
            vec![Cell::new(10, 5), Cell::new(10, 4), Cell::new(10, 3)],
            Right,
        );

        assert_eq!(snake.next_head(), Cell::new(11, 5));
        let vacated = snake.advance(false);

        assert_eq!(vacated, Some(Cell::new(10, 3)));
        assert_eq!(
            body_of(&snake),
            vec![Cell::new(11, 5), Cell::new(10, 5), Cell::new(10, 4)]
        );
    }

    #[test]
    fn growing_step_keeps_the_tail() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right);
        let vacated = snake.advance(true);

        assert_eq!(vacated, None);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Cell::new(6, 5));
        assert_eq!(snake.tail(), Cell::new(3, 5));
    }

    #[test]
    fn orthogonal_requests_are_accepted() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right);
        snake.set_pending_direction(Up);

        assert_eq!(snake.resolved_heading(), Up);
        assert_eq!(snake.next_head(), Cell::new(5, 4));

        snake.advance(false);
        assert_eq!(snake.heading(), Up);
    }

    #[test]
    fn exact_reversal_is_rejected() {
        let mut snake = Snake::from_body(vec![Cell::new(5, 6), Cell::new(5, 5)], Down);
        snake.set_pending_direction(Up);

        assert_eq!(snake.resolved_heading(), Down);
        assert_eq!(snake.next_head(), Cell::new(5, 7));

        snake.advance(false);
        assert_eq!(snake.heading(), Down);
    }

    #[test]
    fn pending_request_is_consumed_by_advance() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right);
        snake.set_pending_direction(Down);
        snake.advance(false);

        // The slot is empty again: the snake keeps its new heading.
        assert_eq!(snake.resolved_heading(), Down);
        snake.advance(false);
        assert_eq!(snake.head(), Cell::new(5, 7));
    }

    #[test]
    fn latest_request_wins() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right);
        snake.set_pending_direction(Up);
        snake.set_pending_direction(Down);

        assert_eq!(snake.resolved_heading(), Down);
    }

    #[test]
    fn first_tick_uses_initial_heading() {
        let mut snake = Snake::new(Cell::new(5, 5), 3, Right);
        assert_eq!(snake.next_head(), Cell::new(6, 5));
        snake.advance(false);
        assert_eq!(snake.head(), Cell::new(6, 5));
    }

    #[test]
    fn tail_cell_not_lethal_on_non_growing_tick() {
        // 2x2 loop: the cell above the head is the current tail.
        let snake = Snake::from_body(
            vec![
                Cell::new(5, 6),
                Cell::new(6, 6),
                Cell::new(6, 5),
                Cell::new(5, 5),
            ],
            Left,
        );

        let tail = snake.tail();
        assert!(!snake.occupies_excluding_vacated(tail, false));
        assert!(snake.occupies_excluding_vacated(tail, true));
    }
}
