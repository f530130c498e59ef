//! Wall slot grid for placing new frames without overlap.

use super::descriptor::{PlacedObject, Wall};
use super::placement::{ROOM_DEPTH, ROOM_HEIGHT, ROOM_WIDTH};

const COLUMNS: usize = 9;
const ROWS: usize = 6;
const MARGIN: f32 = 0.3;
const SLOT_WALL_OFFSET: f32 = 0.30;
const OCCUPIED_TOLERANCE: f32 = 0.2;

pub const SLOTS_PER_WALL: usize = COLUMNS * ROWS;

/// A free position on one of the walls.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Slot {
    pub wall: Wall,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Slot {
    fn occupied_by(&self, obj: &PlacedObject) -> bool {
        obj.wall == Some(self.wall)
            && (obj.position_x - self.x).abs() < OCCUPIED_TOLERANCE
            && (obj.position_y - self.y).abs() < OCCUPIED_TOLERANCE
            && (obj.position_z - self.z).abs() < OCCUPIED_TOLERANCE
    }

    fn is_free(&self, existing: &[PlacedObject]) -> bool {
        !existing.iter().any(|o| self.occupied_by(o))
    }
}

/// All slots of `wall`, row by row from the top, left to right.
pub fn wall_slots(wall: Wall) -> Vec<Slot> {
    let usable_w = ROOM_DEPTH - 2.0 * MARGIN;
    let usable_h = ROOM_HEIGHT - 2.0 * MARGIN;
    let col_step = usable_w / (COLUMNS - 1) as f32;
    let row_step = usable_h / (ROWS - 1) as f32;

    let mut slots = Vec::with_capacity(SLOTS_PER_WALL);
    for row in 0..ROWS {
        let y = ROOM_HEIGHT - MARGIN - row as f32 * row_step;
        for col in 0..COLUMNS {
            let axis = -usable_w / 2.0 + col as f32 * col_step;
            slots.push(match wall {
                Wall::Left => Slot { wall, x: -ROOM_WIDTH / 2.0 + SLOT_WALL_OFFSET, y, z: axis },
                Wall::Back => Slot { wall, x: axis, y, z: -ROOM_DEPTH / 2.0 + SLOT_WALL_OFFSET },
            });
        }
    }
    slots
}

/// First free slot, filling the left wall before the back wall.
pub fn next_free_slot(existing: &[PlacedObject]) -> Option<Slot> {
    [Wall::Left, Wall::Back]
        .into_iter()
        .flat_map(wall_slots)
        .find(|s| s.is_free(existing))
}

pub fn is_wall_full(existing: &[PlacedObject], wall: Wall) -> bool {
    wall_slots(wall).iter().all(|s| !s.is_free(existing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectKind;
    use approx::assert_relative_eq;

    fn fill(slot: Slot, n: usize) -> PlacedObject {
        PlacedObject::on_wall(format!("s{n}"), ObjectKind::Medal, slot.wall, "x").at(slot.x, slot.y, slot.z)
    }

    #[test]
    fn grid_layout() {
        let left = wall_slots(Wall::Left);
        assert_eq!(left.len(), 54);
        assert!(left.iter().all(|s| s.x == -3.0 + 0.3));

        assert_relative_eq!(left[0].y, 2.7);
        assert_relative_eq!(left[0].z, -2.7);
        assert_relative_eq!(left[8].z, 2.7, epsilon = 1e-5);
        assert_relative_eq!(left[53].y, 0.3, epsilon = 1e-5);

        let back = wall_slots(Wall::Back);
        assert!(back.iter().all(|s| s.z == -3.0 + 0.3));
    }

    #[test]
    fn fills_left_then_back_then_none() {
        let mut items = Vec::new();
        for n in 0..SLOTS_PER_WALL {
            let slot = next_free_slot(&items).unwrap();
            assert_eq!(slot.wall, Wall::Left, "slot {n}");
            items.push(fill(slot, n));
        }
        assert!(is_wall_full(&items, Wall::Left));
        assert!(!is_wall_full(&items, Wall::Back));

        for n in 0..SLOTS_PER_WALL {
            let slot = next_free_slot(&items).unwrap();
            assert_eq!(slot.wall, Wall::Back);
            items.push(fill(slot, 100 + n));
        }
        assert!(next_free_slot(&items).is_none());
    }

    #[test]
    fn nearby_item_occupies_slot() {
        let first = wall_slots(Wall::Left)[0];
        let near = fill(Slot { z: first.z + 0.15, ..first }, 0);
        let next = next_free_slot(&[near]).unwrap();
        assert_ne!(next, first);

        // same coordinates on the other wall do not count
        let other_wall = PlacedObject { wall: Some(Wall::Back), ..fill(first, 1) };
        assert_eq!(next_free_slot(&[other_wall]), Some(first));
    }
}
