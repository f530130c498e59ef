use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use diorama_engine::content::{AssetLoader, FileAssetLoader};
use diorama_engine::core::SceneEvents;
use diorama_engine::scene::{ObjectId, PlacedObject};
use diorama_engine::window::SceneHost;

/// Room description file: a bare array of placed objects, or
/// `{ "objects": [ ... ] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomFile {
    List(Vec<PlacedObject>),
    Room {
        #[serde(default)]
        objects: Vec<PlacedObject>,
    },
}

impl RoomFile {
    fn into_objects(self) -> Vec<PlacedObject> {
        match self {
            Self::List(objects) | Self::Room { objects } => objects,
        }
    }
}

pub fn load_room(path: &Path) -> Result<Vec<PlacedObject>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read room {}", path.display()))?;
    let room: RoomFile =
        serde_json::from_str(&text).with_context(|| format!("invalid room {}", path.display()))?;
    Ok(room.into_objects())
}

/// Hosts one room file. Asset references resolve against the file's directory.
pub struct RoomHost {
    path: PathBuf,
    asset_root: PathBuf,
    objects: Vec<PlacedObject>,
}

impl RoomHost {
    pub fn open(path: PathBuf) -> Result<Self> {
        let objects = load_room(&path)?;
        let asset_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        log::info!("room {}: {} objects", path.display(), objects.len());
        Ok(Self {
            path,
            asset_root,
            objects,
        })
    }
}

impl SceneHost for RoomHost {
    type Events = TapLogger;

    fn content(&mut self) -> Vec<PlacedObject> {
        self.objects.clone()
    }

    fn asset_loader(&mut self) -> Result<Box<dyn AssetLoader>> {
        let loader = FileAssetLoader::new(self.asset_root.clone()).context("failed to start asset loader")?;
        Ok(Box::new(loader))
    }

    fn events(&mut self) -> TapLogger {
        TapLogger
    }

    fn reload(&mut self) -> Option<Vec<PlacedObject>> {
        match load_room(&self.path) {
            Ok(objects) => {
                self.objects = objects;
                Some(self.objects.clone())
            }
            Err(e) => {
                log::warn!("reload failed, keeping current room: {e:#}");
                None
            }
        }
    }
}

pub struct TapLogger;

impl SceneEvents for TapLogger {
    fn on_object_tapped(&mut self, id: &ObjectId) {
        log::info!("tapped {id}");
    }

    fn on_context_lost(&mut self) {
        log::warn!("graphics context lost");
    }
}
