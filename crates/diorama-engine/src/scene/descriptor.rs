use serde::Deserialize;

/// Identifier of a placed object, owned by the surrounding application.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Square frame hung on a wall.
    Medal,
    /// Landscape (1.3:1) frame hung on a wall.
    Bib,
    /// Model standing on the floor.
    Decoration,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    Left,
    /// Stored as "right" by older room records.
    #[serde(alias = "right")]
    Back,
}

/// One positioned object, supplied by the application on every content update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    #[serde(default)]
    pub wall: Option<Wall>,
    #[serde(default)]
    pub position_x: f32,
    #[serde(default)]
    pub position_y: f32,
    #[serde(default)]
    pub position_z: f32,
    #[serde(default)]
    pub rotation_y: f32,
    /// External asset reference (path or URL) resolved by the asset loader.
    pub resource: String,
    #[serde(default = "default_interactive")]
    pub interactive: bool,
}

fn default_interactive() -> bool {
    true
}

impl PlacedObject {
    /// Wall-mounted frame with the common defaults.
    pub fn on_wall(id: impl Into<String>, kind: ObjectKind, wall: Wall, resource: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(id),
            kind,
            wall: Some(wall),
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
            rotation_y: 0.0,
            resource: resource.into(),
            interactive: true,
        }
    }

    /// Floor-standing decoration.
    pub fn on_floor(id: impl Into<String>, x: f32, z: f32, resource: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(id),
            kind: ObjectKind::Decoration,
            wall: None,
            position_x: x,
            position_y: 0.0,
            position_z: z,
            rotation_y: 0.0,
            resource: resource.into(),
            interactive: true,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position_x = x;
        self.position_y = y;
        self.position_z = z;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_room_item_json() {
        let json = r#"[
            {"id": "a", "kind": "medal", "wall": "left", "positionY": 1.5, "positionZ": -1.2, "resource": "medal.png"},
            {"id": "b", "kind": "bib", "wall": "right", "positionX": 0.7, "resource": "bib.jpg", "interactive": false},
            {"id": "c", "kind": "decoration", "positionX": 1.0, "positionZ": 2.0, "rotationY": 0.5, "resource": "plant.glb"}
        ]"#;

        let items: Vec<PlacedObject> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].wall, Some(Wall::Left));
        assert!(items[0].interactive);
        assert_eq!(items[1].wall, Some(Wall::Back));
        assert!(!items[1].interactive);
        assert_eq!(items[2].wall, None);
        assert_eq!(items[2].rotation_y, 0.5);
        assert_eq!(items[2].id.as_str(), "c");
    }
}
