//! Retained scene graph.
//!
//! Responsibilities:
//! - describe placed objects and where they sit in the room
//! - own per-leaf GPU handles and release them deterministically
//! - produce ordered draw items and answer tap hit-tests

mod descriptor;
mod geometry;
mod graph;
mod hit;
mod key;
mod node;
mod placement;
mod shell;
mod slots;

pub use descriptor::{ObjectId, ObjectKind, PlacedObject, Wall};
pub use geometry::{MeshData, Vertex};
pub use graph::SceneGraph;
pub use hit::ray_box_distance;
pub use key::{RenderLayer, SortKey};
pub use node::SceneNode;
pub use placement::{
    Anchor, Placement, frame_aspect, placeholder_color, placeholder_mesh, ROOM_DEPTH, ROOM_HEIGHT,
    ROOM_WIDTH,
};
pub use shell::{BACKGROUND_COLOR, ShellPart, room_shell};
pub use slots::{SLOTS_PER_WALL, Slot, is_wall_full, next_free_slot, wall_slots};
