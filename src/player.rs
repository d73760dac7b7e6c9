use crate::caster::direction;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: [f32; 2], // world units
    pub angle: f32,    // degrees, not wrapped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
}

impl Player {
    pub fn new(pos: [f32; 2], angle: f32) -> Self {
        Self { pos, angle }
    }

    pub fn turn(&mut self, degrees: f32) {
        self.angle += degrees;
    }

    /// Offset for moving `amount` units along the heading (negative = back).
    pub fn step_delta(&self, amount: f32) -> [f32; 2] {
        let [dx, dy] = direction(self.angle);
        [dx * amount, dy * amount]
    }

    /// Single-point test of the destination. Both axes are checked together,
    /// so a diagonal step into a wall is rejected even if one axis is free.
    pub fn can_move_to(&self, grid: &Grid, dx: f32, dy: f32) -> bool {
        !grid.is_wall_at(self.pos[0] + dx, self.pos[1] + dy)
    }

    /// Moves along the heading. With a grid the move is all or nothing.
    /// Returns whether the player moved.
    pub fn advance(&mut self, amount: f32, grid: Option<&Grid>) -> bool {
        let [dx, dy] = self.step_delta(amount);
        if let Some(grid) = grid
            && !self.can_move_to(grid, dx, dy)
        {
            return false;
        }
        self.pos[0] += dx;
        self.pos[1] += dy;
        true
    }

    /// Applies one command scaled by the given turn/move amounts.
    pub fn apply(&mut self, cmd: Command, turn: f32, amount: f32, grid: Option<&Grid>) {
        match cmd {
            Command::TurnLeft => self.turn(-turn),
            Command::TurnRight => self.turn(turn),
            Command::Forward => {
                self.advance(amount, grid);
            }
            Command::Backward => {
                self.advance(-amount, grid);
            }
        }
    }
}
