use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use diorama_engine::camera::ProjectionKind;
use diorama_engine::core::SceneConfig;
use diorama_engine::device::{GpuInit, PowerPreference, PresentMode};
use diorama_engine::logging::LoggingConfig;
use diorama_engine::schedule::SchedulerConfig;
use diorama_engine::window::RuntimeConfig;

/// Optional viewer settings file. Every field falls back to the engine default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewerConfig {
    pub title: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// `env_logger` filter, e.g. "debug" or "diorama_engine=trace".
    pub log: Option<String>,
    pub idle_interval_ms: Option<u64>,
    pub active_interval_ms: Option<u64>,
    pub projection: Option<ProjectionSetting>,
    pub high_performance: bool,
    pub vsync: Option<bool>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProjectionSetting {
    Perspective {
        #[serde(rename = "fovYDegrees")]
        fov_y_degrees: f32,
    },
    Orthographic {
        #[serde(rename = "frustumHeight")]
        frustum_height: f32,
    },
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..LoggingConfig::default()
        }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        let mut runtime = RuntimeConfig::default();
        if let Some(title) = &self.title {
            runtime.title = title.clone();
        }
        if let Some(width) = self.width {
            runtime.initial_size.width = width;
        }
        if let Some(height) = self.height {
            runtime.initial_size.height = height;
        }
        runtime
    }

    pub fn gpu(&self) -> GpuInit {
        let mut init = GpuInit::default();
        if self.high_performance {
            init.power_preference = PowerPreference::HighPerformance;
        }
        if self.vsync == Some(false) {
            init.present_mode = PresentMode::AutoNoVsync;
        }
        init
    }

    pub fn scene(&self) -> SceneConfig {
        let defaults = SchedulerConfig::default();
        let schedule = SchedulerConfig {
            idle_interval: self
                .idle_interval_ms
                .map_or(defaults.idle_interval, Duration::from_millis),
            active_interval: self
                .active_interval_ms
                .map_or(defaults.active_interval, Duration::from_millis),
        };

        let projection = match self.projection {
            Some(ProjectionSetting::Perspective { fov_y_degrees }) => {
                ProjectionKind::Perspective { fov_y_degrees }
            }
            Some(ProjectionSetting::Orthographic { frustum_height }) => {
                ProjectionKind::Orthographic { frustum_height }
            }
            None => ProjectionKind::default(),
        };

        SceneConfig {
            schedule: schedule.validated(),
            projection,
            ..SceneConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_engine_defaults() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.scene(), SceneConfig::default());
        assert_eq!(config.runtime().title, RuntimeConfig::default().title);
    }

    #[test]
    fn overrides_map_onto_engine_configs() {
        let config: ViewerConfig = serde_json::from_str(
            r#"{
                "title": "trophy room",
                "width": 640,
                "idleIntervalMs": 500,
                "activeIntervalMs": 16,
                "projection": { "kind": "orthographic", "frustumHeight": 8.0 }
            }"#,
        )
        .unwrap();

        let scene = config.scene();
        assert_eq!(scene.schedule.idle_interval, Duration::from_millis(500));
        assert_eq!(scene.schedule.active_interval, Duration::from_millis(16));
        assert_eq!(
            scene.projection,
            ProjectionKind::Orthographic { frustum_height: 8.0 }
        );

        let runtime = config.runtime();
        assert_eq!(runtime.title, "trophy room");
        assert_eq!(runtime.initial_size.width, 640.0);
    }

    #[test]
    fn zero_intervals_fall_back() {
        let config: ViewerConfig = serde_json::from_str(r#"{ "idleIntervalMs": 0 }"#).unwrap();
        assert_eq!(
            config.scene().schedule.idle_interval,
            SchedulerConfig::default().idle_interval
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ViewerConfig>(r#"{ "fps": 60 }"#).is_err());
    }
}
