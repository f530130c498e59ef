//! Room dimensions and descriptor placement.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use crate::paint::Color;

use super::descriptor::{ObjectKind, PlacedObject, Wall};
use super::geometry::MeshData;

pub const ROOM_WIDTH: f32 = 6.0;
pub const ROOM_DEPTH: f32 = 6.0;
pub const ROOM_HEIGHT: f32 = 3.0;
pub const WALL_THICKNESS: f32 = 0.15;

/// Distance of a hung frame from the wall center plane.
pub const FRAME_WALL_OFFSET: f32 = WALL_THICKNESS / 2.0 + 0.02;

pub const FRAME_HEIGHT: f32 = 0.8;
const FRAME_DEPTH: f32 = 0.02;
const DECORATION_SIZE: f32 = 0.5;

/// Default height of a wall item whose `position_y` is unset.
const DEFAULT_WALL_Y: f32 = ROOM_HEIGHT / 2.0;

pub const PLACEHOLDER_COLOR: u32 = 0xcccccc;

/// How a leaf is attached to the room.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Anchor {
    /// Centered on its position.
    Wall,
    /// Bottom face rests on the position.
    Floor,
}

/// World placement of one descriptor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation_y: f32,
    pub anchor: Anchor,
}

impl Placement {
    pub fn of(obj: &PlacedObject) -> Self {
        let or = |v: f32, fallback: f32| if v == 0.0 || !v.is_finite() { fallback } else { v };

        match obj.wall {
            Some(Wall::Left) => Self {
                position: Vec3::new(
                    -ROOM_WIDTH / 2.0 + FRAME_WALL_OFFSET,
                    or(obj.position_y, DEFAULT_WALL_Y),
                    or(obj.position_z, 0.0),
                ),
                rotation_y: FRAC_PI_2,
                anchor: Anchor::Wall,
            },
            Some(Wall::Back) => Self {
                position: Vec3::new(
                    or(obj.position_x, 0.0),
                    or(obj.position_y, DEFAULT_WALL_Y),
                    -ROOM_DEPTH / 2.0 + FRAME_WALL_OFFSET,
                ),
                rotation_y: 0.0,
                anchor: Anchor::Wall,
            },
            None => Self {
                position: Vec3::new(or(obj.position_x, 0.0), 0.0, or(obj.position_z, 0.0)),
                rotation_y: or(obj.rotation_y, 0.0),
                anchor: Anchor::Floor,
            },
        }
    }

    /// Model matrix for a mesh centered on its local origin.
    pub fn model(&self, half_extents: Vec3) -> Mat4 {
        let lift = match self.anchor {
            Anchor::Wall => Vec3::ZERO,
            Anchor::Floor => Vec3::new(0.0, half_extents.y, 0.0),
        };
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.rotation_y), self.position + lift)
    }
}

/// Width / height of the frame for a wall item.
pub fn frame_aspect(kind: ObjectKind) -> f32 {
    match kind {
        ObjectKind::Bib => 1.3,
        ObjectKind::Medal | ObjectKind::Decoration => 1.0,
    }
}

/// Neutral stand-in geometry shown until the asset resolves.
pub fn placeholder_mesh(obj: &PlacedObject) -> MeshData {
    match (obj.kind, obj.wall) {
        (ObjectKind::Decoration, _) | (_, None) => MeshData::cuboid(DECORATION_SIZE, DECORATION_SIZE, DECORATION_SIZE),
        (kind, Some(_)) => MeshData::cuboid(FRAME_HEIGHT * frame_aspect(kind), FRAME_HEIGHT, FRAME_DEPTH),
    }
}

pub fn placeholder_color() -> Color {
    Color::from_hex(PLACEHOLDER_COLOR)
}
