use crate::camera::{OrbitConfig, ProjectionKind};
use crate::paint::Color;
use crate::schedule::SchedulerConfig;
use crate::scene::BACKGROUND_COLOR;

/// Everything tunable about a mounted scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub orbit: OrbitConfig,
    pub schedule: SchedulerConfig,
    pub projection: ProjectionKind,
    pub clear_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            orbit: OrbitConfig::default(),
            schedule: SchedulerConfig::default(),
            projection: ProjectionKind::default(),
            clear_color: Color::from_hex(BACKGROUND_COLOR),
        }
    }
}
