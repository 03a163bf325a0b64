//! Player controller
//!
//! The player is a regular moving body; all the platformer feel comes from
//! which forces get applied each tick. The state is recomputed from the
//! body's sensors and their history every tick, so a jump pressed a couple
//! of ticks after leaving a ledge or a wall is still honoured.

use glam::Vec2;

use crate::physics::{Aabb, Body, Entity, MaxVelocity, PosExt};
use crate::settings::PlayerTuning;

/// Abstract player inputs (key bindings live outside the core)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Still,
    Walk,
    Run,
    Jump,
    Fall,
    WallSlide,
    WallJump,
    /// Pushing away from a wall; the wall holds for a few ticks
    OutOfWallSlide,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub tuning: PlayerTuning,

    pub left: bool,
    pub right: bool,
    pub run: bool,
    /// Jump key held
    pub jumping: bool,
    /// Jump accepted this tick
    pub just_jumped: bool,

    pub facing: Facing,
    pub state: PlayerState,
    /// Ticks spent in the current state
    pub state_duration: u32,
    /// Blink ticks left after a respawn
    pub respawn: u32,
    pub visible: bool,
    pub has_ak47: bool,
}

impl Player {
    pub fn new(start: Vec2, tuning: PlayerTuning, respawn: bool) -> Self {
        let max = tuning.max_velocity;
        let body = Body::new(Aabb::new(start, tuning.size))
            .with_max_velocity(MaxVelocity::new(Some(max.x), Some(max.y)));
        Self {
            body,
            tuning,
            left: false,
            right: false,
            run: false,
            jumping: false,
            just_jumped: false,
            facing: Facing::Right,
            state: PlayerState::Still,
            state_duration: 0,
            respawn: if respawn { tuning.respawn_blink } else { 0 },
            visible: true,
            has_ak47: false,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(Action::Left) => self.left = true,
            InputEvent::Pressed(Action::Right) => self.right = true,
            InputEvent::Pressed(Action::Jump) => {
                let b = &self.body;
                if b.collide_right || b.collide_left || b.collide_down {
                    self.jumping = true;
                    self.just_jumped = true;
                }
            }
            InputEvent::Pressed(Action::Run) => self.run = true,
            InputEvent::Released(Action::Left) => self.left = false,
            InputEvent::Released(Action::Right) => self.right = false,
            InputEvent::Released(Action::Jump) => self.jumping = false,
            InputEvent::Released(Action::Run) => self.run = false,
        }
    }

    /// -1, 0 or 1 from the held direction keys
    fn direction(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    fn near_left_wall(&self) -> bool {
        self.body.last_collide_left < self.tuning.input_tolerance
    }

    fn near_right_wall(&self) -> bool {
        self.body.last_collide_right < self.tuning.input_tolerance
    }

    fn compute_state(&self) -> PlayerState {
        let near_wall = self.near_left_wall() || self.near_right_wall();

        if self.body.collide_down {
            if self.just_jumped {
                if near_wall {
                    PlayerState::WallSlide
                } else {
                    PlayerState::Jump
                }
            } else if self.left == self.right {
                PlayerState::Still
            } else if self.run {
                PlayerState::Run
            } else {
                PlayerState::Walk
            }
        } else if near_wall {
            if self.just_jumped {
                PlayerState::WallJump
            } else if (self.near_left_wall() && self.right) || (self.near_right_wall() && self.left) {
                PlayerState::OutOfWallSlide
            } else {
                PlayerState::WallSlide
            }
        } else if self.jumping && self.body.velocity.y < 0.0 {
            PlayerState::Jump
        } else {
            PlayerState::Fall
        }
    }

    fn vertical_logic(&mut self, gravity: Vec2) {
        let t = self.tuning;
        let jump = Vec2::new(0.0, -t.jump_force);
        match self.state {
            PlayerState::Still | PlayerState::Walk | PlayerState::Run | PlayerState::Fall => {}
            PlayerState::Jump => {
                if self.just_jumped {
                    self.body.apply_force(jump);
                } else {
                    // Holding jump cancels part of gravity: higher jump
                    self.body.apply_force(-t.jump_gravity_factor * gravity.vertical());
                }
            }
            PlayerState::WallSlide | PlayerState::OutOfWallSlide => {
                if self.just_jumped {
                    self.body.apply_force(jump);
                } else {
                    self.body.apply_force(-t.wall_slide_gravity * gravity.vertical());
                }
            }
            PlayerState::WallJump => self.body.apply_force(jump),
        }
    }

    /// Push in the held direction with speed-proportional drag
    fn walk(&mut self, force: f32) {
        let friction = -self.tuning.feet_friction * self.body.velocity.horizontal();
        self.body.apply_force(Vec2::new(self.direction() * force, 0.0));
        self.body.apply_force(friction);
    }

    fn horizontal_logic(&mut self) {
        let t = self.tuning;
        match self.state {
            PlayerState::Still => {
                let brake = -self.body.velocity.horizontal() / t.frames_to_still;
                self.body.apply_force(brake);
            }
            PlayerState::Walk => self.walk(t.walk_force),
            PlayerState::Run => self.walk(t.run_force),
            PlayerState::Fall | PlayerState::Jump => {
                if self.direction() != 0.0 {
                    self.walk(t.walk_force);
                } else if self.body.velocity.x.abs() > t.walk_force / t.feet_friction {
                    let friction = -t.feet_friction * self.body.velocity.horizontal();
                    self.body.apply_force(friction);
                }
            }
            PlayerState::WallSlide => {}
            PlayerState::WallJump => {
                let away = if self.body.collide_right { -1.0 } else { 1.0 };
                let boost = if self.run { 1.5 } else { 1.0 };
                self.body.velocity = Vec2::ZERO;
                self.body.apply_force(Vec2::new(away * t.jump_force * boost, 0.0));
            }
            PlayerState::OutOfWallSlide => {
                if self.state_duration >= t.wall_sticky_frames {
                    self.walk(t.walk_force);
                }
            }
        }
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn internal_logic(&mut self, gravity: Vec2) {
        if self.respawn > 0 {
            self.visible = !self.visible;
            self.respawn -= 1;
        } else {
            self.visible = true;
        }

        let new_state = self.compute_state();
        if new_state == self.state {
            self.state_duration += 1;
        } else {
            self.state_duration = 0;
        }
        self.state = new_state;

        self.vertical_logic(gravity);
        self.horizontal_logic();

        self.just_jumped = false;
        if self.body.velocity.x < 0.0 {
            self.facing = Facing::Left;
        } else if self.body.velocity.x > 0.0 {
            self.facing = Facing::Right;
        }
    }
}
