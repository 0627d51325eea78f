//! Go rules engine: move legality, capture, suicide and repetition checks,
//! and a navigable history of board positions.
//!
//! [`Game`] holds an ordered history of [`Position`] snapshots; the last
//! entry is always the current position. A move is resolved against a clone
//! of the current position (placement, capture pass, suicide check,
//! repetition check) and the clone is committed to history only once it
//! proves legal, so a rejected move leaves the game untouched.
//!
//! The liberty and capture analyses are worklist-based flood fills over
//! 4-connected same-color groups, bounded by the board area. The capture
//! check and the suicide check run the same analysis.

use log::debug;
use thiserror::Error;

use crate::position::{Cell, Color, Point, Position};

/// How repeated board positions are handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    /// Repetition is not checked.
    None,
    /// The new position must not equal the position two plies back
    /// (classic ko).
    #[default]
    Ko,
    /// The new position must not equal any earlier position
    /// (positional superko).
    Superko,
}

/// Why a move was rejected. [`Game::play`] commits nothing on any of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Coordinates outside the board.
    #[error("move is outside the board")]
    OutOfBoard,
    /// Target point already holds a stone and rewriting is disabled.
    #[error("field is already occupied")]
    FieldOccupied,
    /// The move captures nothing and leaves its own group without liberties.
    #[error("move would be suicide")]
    Suicide,
    /// The resulting position repeats a forbidden earlier one.
    #[error("position repeats an earlier position")]
    PositionRepeated,
}

/// Construction-time options for [`Game`].
#[derive(Copy, Clone, Debug)]
pub struct GameOptions {
    /// Board edge length.
    pub size: usize,
    /// Repetition rule to enforce.
    pub repeat: RepeatPolicy,
    /// Allow playing onto an occupied point (setup/editing mode).
    pub allow_rewrite: bool,
    /// Allow self-capture: the played group is removed immediately and the
    /// capture is credited to the opponent.
    pub allow_suicide: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            size: 19,
            repeat: RepeatPolicy::Ko,
            allow_rewrite: false,
            allow_suicide: false,
        }
    }
}

/// A fully resolved but not yet committed move.
struct Resolved {
    position: Position,
    captured: Vec<Point>,
    placed: Color,
    credited: Color,
}

/// The rules engine.
#[derive(Clone, Debug)]
pub struct Game {
    size: usize,
    repeat: RepeatPolicy,
    allow_rewrite: bool,
    allow_suicide: bool,
    history: Vec<Position>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A 19×19 game with classic ko, rewriting and suicide disallowed.
    pub fn new() -> Self {
        Self::with_options(GameOptions::default())
    }

    /// A game with the given options, starting from an empty board.
    pub fn with_options(options: GameOptions) -> Self {
        Self {
            size: options.size,
            repeat: options.repeat,
            allow_rewrite: options.allow_rewrite,
            allow_suicide: options.allow_suicide,
            history: vec![Position::new(options.size)],
        }
    }

    /// Board edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The current position: always the last history entry.
    pub fn current_position(&self) -> &Position {
        self.history.last().expect("history is never empty")
    }

    fn current_mut(&mut self) -> &mut Position {
        self.history.last_mut().expect("history is never empty")
    }

    /// Number of positions in history; 1 for a fresh game.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// True when `(x, y)` lies within the board.
    pub fn is_on_board(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    /// Stone at `(x, y)`, or `None` when the coordinate is off the board.
    /// `Some(None)` is an empty on-board point.
    pub fn stone(&self, x: usize, y: usize) -> Option<Cell> {
        if self.is_on_board(x, y) {
            Some(self.current_position().get(x, y))
        } else {
            None
        }
    }

    /// Stones captured by `color` so far.
    pub fn capture_count(&self, color: Color) -> usize {
        self.current_position().capture_count(color)
    }

    /// Play a stone at `(x, y)`.
    ///
    /// `color` defaults to the side to move. On success the new position is
    /// committed to history and the coordinates of every captured stone are
    /// returned; on rejection nothing changes.
    pub fn play(
        &mut self,
        x: usize,
        y: usize,
        color: Option<Color>,
    ) -> Result<Vec<Point>, MoveError> {
        match self.resolve(x, y, color) {
            Ok(Resolved {
                mut position,
                captured,
                placed,
                credited,
            }) => {
                position.set_turn(placed.opposite());
                position.add_captures(credited, captured.len());
                self.history.push(position);
                debug!("{placed} played ({x}, {y}), captured {}", captured.len());
                Ok(captured)
            }
            Err(err) => {
                debug!("rejected move at ({x}, {y}): {err}");
                Err(err)
            }
        }
    }

    /// Check move legality without touching game state.
    pub fn is_valid(&self, x: usize, y: usize, color: Option<Color>) -> bool {
        self.resolve(x, y, color).is_ok()
    }

    /// Everything [`Game::play`] does short of committing: placement,
    /// capture pass, suicide check, repetition check.
    fn resolve(&self, x: usize, y: usize, color: Option<Color>) -> Result<Resolved, MoveError> {
        if !self.is_on_board(x, y) {
            return Err(MoveError::OutOfBoard);
        }
        let current = self.current_position();
        if !self.allow_rewrite && current.get(x, y).is_some() {
            return Err(MoveError::FieldOccupied);
        }

        let placed = color.unwrap_or_else(|| current.turn());
        let mut position = current.clone();
        position.set(x, y, Some(placed));

        // Each opponent neighbor group is probed independently; a group
        // without liberties is removed in full before the next probe sees
        // the board.
        let opponent = placed.opposite();
        let mut captured = Vec::new();
        for (nx, ny) in neighbors(x, y, self.size) {
            capture_if_dead(&mut position, nx, ny, opponent, &mut captured);
        }

        let mut credited = placed;
        if captured.is_empty() && !has_liberties(&position, x, y, placed) {
            if self.allow_suicide {
                credited = opponent;
                capture_group(&mut position, x, y, placed, &mut captured);
            } else {
                return Err(MoveError::Suicide);
            }
        }

        if self.repeats(&position, x, y) {
            return Err(MoveError::PositionRepeated);
        }

        Ok(Resolved {
            position,
            captured,
            placed,
            credited,
        })
    }

    /// Repetition check for a candidate position per the active policy.
    /// `(x, y)` is the just-touched coordinate; comparing it first
    /// short-circuits most full-grid comparisons.
    fn repeats(&self, next: &Position, x: usize, y: usize) -> bool {
        let len = self.history.len();
        let candidates = match self.repeat {
            RepeatPolicy::None => return false,
            RepeatPolicy::Ko => {
                if len < 2 {
                    return false;
                }
                &self.history[len - 2..len - 1]
            }
            RepeatPolicy::Superko => &self.history[..len - 1],
        };
        candidates
            .iter()
            .rev()
            .any(|past| past.get(x, y) == next.get(x, y) && past == next)
    }

    /// Play a pass: the turn flips, nothing else changes. Always legal.
    pub fn pass(&mut self, color: Option<Color>) {
        let passed = color.unwrap_or_else(|| self.current_position().turn());
        let mut position = self.current_position().clone();
        position.set_turn(passed.opposite());
        self.history.push(position);
    }

    /// Insert a stone into the current position without rules checking
    /// (setup mode). Fails off the board or on an occupied point. No
    /// history entry is pushed.
    pub fn add_stone(&mut self, x: usize, y: usize, color: Color) -> bool {
        if self.is_on_board(x, y) && self.current_position().get(x, y).is_none() {
            self.current_mut().set(x, y, Some(color));
            true
        } else {
            false
        }
    }

    /// Remove a stone from the current position (setup mode). Fails off the
    /// board or on an empty point.
    pub fn remove_stone(&mut self, x: usize, y: usize) -> bool {
        if self.is_on_board(x, y) && self.current_position().get(x, y).is_some() {
            self.current_mut().set(x, y, None);
            true
        } else {
            false
        }
    }

    /// Overwrite a point of the current position unconditionally (setup
    /// mode). Fails only off the board.
    pub fn set_stone(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        if self.is_on_board(x, y) {
            self.current_mut().set(x, y, cell);
            true
        } else {
            false
        }
    }

    /// Append `position` (or a clone of the current one) to history,
    /// making it current.
    pub fn push_position(&mut self, position: Option<Position>) {
        let position = position.unwrap_or_else(|| self.current_position().clone());
        self.history.push(position);
    }

    /// Drop the current position, restoring the previous one.
    ///
    /// Returns `None` without mutating anything when only the initial
    /// position remains.
    pub fn pop_position(&mut self) -> Option<Position> {
        if self.history.len() > 1 {
            self.history.pop()
        } else {
            None
        }
    }

    /// Reset history to a single fresh empty position, discarding
    /// everything played so far.
    pub fn first_position(&mut self) {
        self.history = vec![Position::new(self.size)];
    }

    /// Resolve a board assembled via the setup mutators: sweep every point
    /// in row/column order and capture any neighboring group left without
    /// liberties, crediting the counters by the scanning stone's color.
    /// Rewrites the current position in place; no history entry is pushed.
    pub fn validate_position(&mut self) -> Vec<Point> {
        let mut resolved = self.current_position().clone();
        let mut captured = Vec::new();
        let mut black = 0;
        let mut white = 0;
        for x in 0..self.size {
            for y in 0..self.size {
                let Some(color) = self.current_position().get(x, y) else {
                    continue;
                };
                let before = captured.len();
                for (nx, ny) in neighbors(x, y, self.size) {
                    capture_if_dead(&mut resolved, nx, ny, color.opposite(), &mut captured);
                }
                match color {
                    Color::Black => black += captured.len() - before,
                    Color::White => white += captured.len() - before,
                }
            }
        }
        let current = self.current_mut();
        for &(cx, cy) in &captured {
            current.set(cx, cy, None);
        }
        current.add_captures(Color::Black, black);
        current.add_captures(Color::White, white);
        captured
    }
}

/// Orthogonal neighbors of `(x, y)` within the board, probed in
/// left, right, up, down order.
fn neighbors(x: usize, y: usize, size: usize) -> impl Iterator<Item = Point> {
    let mut v = Vec::with_capacity(4);
    if x > 0 {
        v.push((x - 1, y));
    }
    if x + 1 < size {
        v.push((x + 1, y));
    }
    if y > 0 {
        v.push((x, y - 1));
    }
    if y + 1 < size {
        v.push((x, y + 1));
    }
    v.into_iter()
}

/// Capture the `color` group at `(x, y)` if it has no liberties.
fn capture_if_dead(
    position: &mut Position,
    x: usize,
    y: usize,
    color: Color,
    captured: &mut Vec<Point>,
) {
    if position.get(x, y) == Some(color) && !has_liberties(position, x, y, color) {
        capture_group(position, x, y, color, captured);
    }
}

/// Liberty probe for the `color` group containing `(x, y)`.
///
/// Flood fill over the 4-connected same-color region with an explicit
/// worklist; true as soon as any group stone touches an empty point.
/// Off-board never counts as a liberty.
fn has_liberties(position: &Position, x: usize, y: usize, color: Color) -> bool {
    let size = position.size();
    let mut visited = vec![false; size * size];
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        let i = cy * size + cx;
        if visited[i] {
            continue;
        }
        visited[i] = true;
        if position.get(cx, cy) != Some(color) {
            continue;
        }
        for (nx, ny) in neighbors(cx, cy, size) {
            match position.get(nx, ny) {
                None => return true,
                Some(c) if c == color && !visited[ny * size + nx] => stack.push((nx, ny)),
                _ => {}
            }
        }
    }
    false
}

/// Remove the whole `color` group containing `(x, y)`, recording every
/// cleared coordinate. Assumes the group was already confirmed to have no
/// liberties; they are not re-checked.
fn capture_group(
    position: &mut Position,
    x: usize,
    y: usize,
    color: Color,
    captured: &mut Vec<Point>,
) {
    let size = position.size();
    let mut stack = vec![(x, y)];
    while let Some((cx, cy)) = stack.pop() {
        if position.get(cx, cy) != Some(color) {
            continue;
        }
        position.set(cx, cy, None);
        captured.push((cx, cy));
        for n in neighbors(cx, cy, size) {
            stack.push(n);
        }
    }
}
