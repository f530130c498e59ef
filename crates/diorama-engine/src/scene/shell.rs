//! Static room shell: floor and the two visible walls.

use glam::Vec3;

use crate::paint::Color;

use super::geometry::MeshData;
use super::placement::{Anchor, Placement, ROOM_DEPTH, ROOM_HEIGHT, ROOM_WIDTH, WALL_THICKNESS};

pub const FLOOR_COLOR: u32 = 0xc9a87c;
pub const LEFT_WALL_COLOR: u32 = 0xfaedcd;
pub const BACK_WALL_COLOR: u32 = 0xfefae0;
pub const BACKGROUND_COLOR: u32 = 0xf0ead6;

#[derive(Debug, Clone)]
pub struct ShellPart {
    pub name: &'static str,
    pub mesh: MeshData,
    pub placement: Placement,
    pub color: Color,
}

fn part(name: &'static str, size: Vec3, center: Vec3, color: u32) -> ShellPart {
    ShellPart {
        name,
        mesh: MeshData::cuboid(size.x, size.y, size.z),
        placement: Placement {
            position: center,
            rotation_y: 0.0,
            anchor: Anchor::Wall,
        },
        color: Color::from_hex(color),
    }
}

pub fn room_shell() -> Vec<ShellPart> {
    let half_h = ROOM_HEIGHT / 2.0;
    vec![
        part(
            "floor",
            Vec3::new(ROOM_WIDTH, WALL_THICKNESS, ROOM_DEPTH),
            Vec3::new(0.0, -WALL_THICKNESS / 2.0, 0.0),
            FLOOR_COLOR,
        ),
        part(
            "left wall",
            Vec3::new(WALL_THICKNESS, ROOM_HEIGHT, ROOM_DEPTH),
            Vec3::new(-ROOM_WIDTH / 2.0, half_h, 0.0),
            LEFT_WALL_COLOR,
        ),
        part(
            "back wall",
            Vec3::new(ROOM_WIDTH, ROOM_HEIGHT, WALL_THICKNESS),
            Vec3::new(0.0, half_h, -ROOM_DEPTH / 2.0),
            BACK_WALL_COLOR,
        ),
    ]
}
