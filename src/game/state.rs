use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Convert a grid or pixel extent to a coordinate, saturating at `i32::MAX`
pub fn to_coord(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Segments still to be added; each move while positive keeps the tail
    pub pending_growth: u32,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let back = direction.opposite();
        let mut body = Vec::with_capacity(length.max(1));
        body.push(head);

        for i in 1..length {
            body.push(body[i - 1].moved_in_direction(back));
        }

        Self {
            body,
            direction,
            pending_growth: 0,
        }
    }

    /// Build a snake from explicit segments, head first
    #[cfg(test)]
    pub(crate) fn from_segments(body: Vec<Position>, direction: Direction) -> Self {
        Self {
            body,
            direction,
            pending_growth: 0,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Whether the next move keeps the tail in place
    pub fn is_growing(&self) -> bool {
        self.pending_growth > 0
    }

    /// Check whether moving the head onto `pos` would hit the body.
    ///
    /// The tail cell is vacated during a non-growing move, so it only
    /// counts while the snake is growing.
    pub fn blocks(&self, pos: Position) -> bool {
        let end = if self.is_growing() {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body[1..end.max(1)].contains(&pos)
    }

    /// Advance one cell in the current direction, consuming pending growth
    pub fn advance(&mut self) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake has at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

/// Type of collision that ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Halted by a collision until reset
    Over(CollisionType),
    /// The snake fills the board; no cell left for food
    Cleared,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub status: RunStatus,
}

impl GameState {
    /// Create a new running game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            status: RunStatus::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        usize::try_from(pos.x).is_ok_and(|x| x < self.grid_width)
            && usize::try_from(pos.y).is_ok_and(|y| y < self.grid_height)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// All cells not covered by the snake, in row-major order
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity(self.grid_width.saturating_mul(self.grid_height));
        for y in 0..self.grid_height {
            for x in 0..self.grid_width {
                let pos = Position::new(to_coord(x), to_coord(y));
                if !self.snake.contains(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}
