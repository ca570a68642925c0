// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Animation flags and positions
//!
//! Only state lives here. Drawing is left to whatever renders the terminal;
//! its frame loop calls [`AnimationState::tick_train`] and
//! [`AnimationState::tick_pet`] and is the sole writer of positions.

use crate::command::AnimationKind;

/// Half the pet sprite, used to centre it and keep it inside the viewport.
pub const PET_HALF_SIZE: f32 = 32.0;
/// Pixels the pet moves per frame while chasing the pointer.
pub const PET_SPEED: f32 = 5.0;
/// Distance at which the pet stops chasing.
pub const PET_REST_DISTANCE: f32 = 5.0;

/// Train start offset, in percent of the viewport width.
pub const TRAIN_START: f32 = 100.0;
/// Offset change per frame.
pub const TRAIN_STEP: f32 = 2.0;
/// The train is gone once its offset drops below this.
pub const TRAIN_END: f32 = -150.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PetMotion {
    #[default]
    Idle,
    Running,
}

/// Ephemeral visual state of one terminal session.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    width: f32,
    height: f32,
    pet_visible: bool,
    pet_position: Point,
    /// Latest pointer position; written by input events, read by the frame loop
    pet_target: Option<Point>,
    pet_motion: PetMotion,
    /// `Some` while the train is on screen
    train_position: Option<f32>,
    matrix: bool,
    aquarium: bool,
    dashboard: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        let terminal = crate::config::TerminalConfig::default();
        Self::new(terminal.viewport_width, terminal.viewport_height)
    }
}

impl AnimationState {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pet_visible: false,
            pet_position: Point::default(),
            pet_target: None,
            pet_motion: PetMotion::Idle,
            train_position: None,
            matrix: false,
            aquarium: false,
            dashboard: false,
        }
    }

    /// Flip pet visibility, re-centring it. Returns the new visibility.
    pub fn toggle_pet(&mut self) -> bool {
        self.pet_position = Point::new(
            self.width / 2.0 - PET_HALF_SIZE,
            self.height / 2.0 - PET_HALF_SIZE,
        );
        self.pet_target = None;
        self.pet_motion = PetMotion::Idle;
        self.pet_visible = !self.pet_visible;
        self.pet_visible
    }

    /// Start a triggered animation.
    pub fn trigger(&mut self, kind: AnimationKind) {
        match kind {
            AnimationKind::Pet => {
                self.toggle_pet();
            }
            AnimationKind::Train => self.train_position = Some(TRAIN_START),
            AnimationKind::Matrix => self.matrix = true,
            AnimationKind::Aquarium => self.aquarium = true,
            AnimationKind::Dashboard => self.dashboard = true,
        }
    }

    /// Advance the train one frame. Returns whether it is still on screen.
    pub fn tick_train(&mut self) -> bool {
        self.train_position = match self.train_position {
            Some(position) => {
                let next = position - TRAIN_STEP;
                (next >= TRAIN_END).then_some(next)
            }
            None => None,
        };
        self.train_position.is_some()
    }

    /// Hide the until-dismissed overlays. Returns whether any was showing.
    pub fn dismiss_overlays(&mut self) -> bool {
        let was_active = self.any_overlay_active();
        self.matrix = false;
        self.aquarium = false;
        self.dashboard = false;
        was_active
    }

    pub fn any_overlay_active(&self) -> bool {
        self.matrix || self.aquarium || self.dashboard
    }

    pub fn is_active(&self, kind: AnimationKind) -> bool {
        match kind {
            AnimationKind::Pet => self.pet_visible,
            AnimationKind::Train => self.train_position.is_some(),
            AnimationKind::Matrix => self.matrix,
            AnimationKind::Aquarium => self.aquarium,
            AnimationKind::Dashboard => self.dashboard,
        }
    }

    pub fn pet_visible(&self) -> bool {
        self.pet_visible
    }

    pub fn pet_position(&self) -> Point {
        self.pet_position
    }

    pub fn pet_motion(&self) -> PetMotion {
        self.pet_motion
    }

    pub fn train_position(&self) -> Option<f32> {
        self.train_position
    }

    /// Record where the pointer is. Does not move the pet.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pet_target = Some(Point::new(x, y));
    }

    /// Move the pet one frame towards the pointer.
    pub fn tick_pet(&mut self) {
        if !self.pet_visible {
            return;
        }
        let Some(target) = self.pet_target else {
            self.pet_motion = PetMotion::Idle;
            return;
        };

        let target = Point::new(self.clamp_x(target.x), self.clamp_y(target.y));
        let dx = target.x - self.pet_position.x;
        let dy = target.y - self.pet_position.y;
        if (dx * dx + dy * dy).sqrt() < PET_REST_DISTANCE {
            self.pet_motion = PetMotion::Idle;
            return;
        }

        let angle = dy.atan2(dx);
        self.pet_position = Point::new(
            self.clamp_x(self.pet_position.x + angle.cos() * PET_SPEED),
            self.clamp_y(self.pet_position.y + angle.sin() * PET_SPEED),
        );
        self.pet_motion = PetMotion::Running;
    }

    fn clamp_x(&self, x: f32) -> f32 {
        x.min(self.width - PET_HALF_SIZE).max(PET_HALF_SIZE)
    }

    fn clamp_y(&self, y: f32) -> f32 {
        y.min(self.height - PET_HALF_SIZE).max(PET_HALF_SIZE)
    }
}
