use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::config::{KeyScheme, Movement};
use crate::grid::Grid;
use crate::player::{Command, Player};

impl KeyScheme {
    pub fn command(self, key: KeyCode) -> Option<Command> {
        match (self, key) {
            (KeyScheme::Arrows, KeyCode::ArrowLeft) | (KeyScheme::Wasd, KeyCode::KeyA) => {
                Some(Command::TurnLeft)
            }
            (KeyScheme::Arrows, KeyCode::ArrowRight) | (KeyScheme::Wasd, KeyCode::KeyD) => {
                Some(Command::TurnRight)
            }
            (KeyScheme::Arrows, KeyCode::ArrowUp) | (KeyScheme::Wasd, KeyCode::KeyW) => {
                Some(Command::Forward)
            }
            (KeyScheme::Arrows, KeyCode::ArrowDown) | (KeyScheme::Wasd, KeyCode::KeyS) => {
                Some(Command::Backward)
            }
            _ => None,
        }
    }
}

/// Drives the player from keyboard input under one movement model.
pub struct Controller {
    movement: Movement,
    keys: KeyScheme,
    turn_first: bool,
    collide: bool,
    keys_down: HashSet<KeyCode>,
}

impl Controller {
    pub fn new(movement: Movement, keys: KeyScheme, turn_first: bool, collide: bool) -> Self {
        Self {
            movement,
            keys,
            turn_first,
            collide,
            keys_down: HashSet::new(),
        }
    }

    /// Key press or release. Discrete movement acts here, once per press
    /// (auto-repeat included).
    pub fn key_event(
        &mut self,
        key: KeyCode,
        pressed: bool,
        player: &mut Player,
        grid: Option<&Grid>,
    ) {
        if !pressed {
            self.keys_down.remove(&key);
            return;
        }
        self.keys_down.insert(key);

        if let Movement::Discrete {
            turn_step,
            move_step,
        } = self.movement
            && let Some(cmd) = self.keys.command(key)
        {
            player.apply(cmd, turn_step, move_step, self.gate(grid));
        }
    }

    /// One fixed update. Continuous movement samples held keys here.
    pub fn tick(&self, player: &mut Player, grid: Option<&Grid>) {
        let Movement::Continuous {
            turn_rate,
            move_rate,
        } = self.movement
        else {
            return;
        };

        const TURNS: [Command; 2] = [Command::TurnLeft, Command::TurnRight];
        const MOVES: [Command; 2] = [Command::Forward, Command::Backward];
        let order = if self.turn_first {
            [TURNS, MOVES]
        } else {
            [MOVES, TURNS]
        };

        for cmd in order.into_iter().flatten() {
            if self.is_held(cmd) {
                player.apply(cmd, turn_rate, move_rate, self.gate(grid));
            }
        }
    }

    pub fn is_held(&self, cmd: Command) -> bool {
        self.keys_down
            .iter()
            .any(|&k| self.keys.command(k) == Some(cmd))
    }

    /// Drop held keys, e.g. when focus is lost and releases would go missing.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    fn gate<'a>(&self, grid: Option<&'a Grid>) -> Option<&'a Grid> {
        if self.collide { grid } else { None }
    }
}
