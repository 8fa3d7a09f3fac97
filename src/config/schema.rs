//! Configuration schema types for `curtain.toml`
//!
//! Defines the structure of the show configuration file using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::effect::shapes::StarPointDef;
use crate::export::{ComplexityBounds, ExportOptions};
use crate::scene::CurtainLayout;

/// Curtain geometry and simulation clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Number of side-by-side curtain panels
    #[serde(default = "default_panels")]
    pub panels: u32,
    /// Seconds per simulation tick
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Seconds of animation per file
    #[serde(default = "default_duration")]
    pub duration: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            panels: default_panels(),
            time_step: default_time_step(),
            duration: default_duration(),
        }
    }
}

impl SceneConfig {
    pub fn layout(&self) -> CurtainLayout {
        CurtainLayout::new(self.panels)
    }

    /// Whole ticks that fit in `duration`.
    pub fn ticks(&self) -> usize {
        // tolerate durations that are not an exact multiple in binary
        let ticks = (self.duration / self.time_step + 1e-9).floor();
        if ticks > 0.0 {
            ticks as usize
        } else {
            0
        }
    }
}

fn default_panels() -> u32 {
    1
}

fn default_time_step() -> f64 {
    0.2
}

fn default_duration() -> f64 {
    9.0
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output path; numbered when more than one file is wanted
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Milliseconds per frame (defaults to the scene time step)
    #[serde(default)]
    pub frame_duration_ms: Option<u32>,
    /// Animation repeats, 0 = forever
    #[serde(default)]
    pub loop_count: u16,
    /// Accepted complexity range `[min, max]`
    #[serde(default)]
    pub complexity: Option<[u64; 2]>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            frame_duration_ms: None,
            loop_count: 0,
            complexity: None,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("curtain.gif")
}

/// Which effects a show launches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowKind {
    /// Ring-burst fireworks
    #[default]
    Firework,
    /// Heart-shaped bursts
    Lovework,
    /// Pixel-art bursts
    Spritework,
    /// Fireflies, snow and rain, no mortars
    Ambient,
}

impl std::fmt::Display for ShowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShowKind::Firework => "firework",
            ShowKind::Lovework => "lovework",
            ShowKind::Spritework => "spritework",
            ShowKind::Ambient => "ambient",
        };
        f.write_str(name)
    }
}

/// Spawn policy of the show driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowConfig {
    #[serde(default)]
    pub kind: ShowKind,
    /// Seed for a reproducible show; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Accepted files wanted
    #[serde(default = "default_count")]
    pub count: u32,
    /// Scenes rendered before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Chance per tick of launching another mortar
    #[serde(default = "default_launch_probability")]
    pub launch_probability: f64,
    /// No launches during the last `launch_cutoff` seconds
    #[serde(default = "default_launch_cutoff")]
    pub launch_cutoff: f64,
    #[serde(default = "default_sparkle_probability")]
    pub sparkle_probability: f64,
    #[serde(default = "default_firefly_probability")]
    pub firefly_probability: f64,
    #[serde(default)]
    pub snowflake_probability: f64,
    #[serde(default = "default_raindrop_probability")]
    pub raindrop_probability: f64,
    /// Custom spritework table; empty uses the built-in rocket
    #[serde(default)]
    pub star_map: Vec<StarPointDef>,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            kind: ShowKind::default(),
            seed: None,
            count: default_count(),
            max_attempts: default_max_attempts(),
            launch_probability: default_launch_probability(),
            launch_cutoff: default_launch_cutoff(),
            sparkle_probability: default_sparkle_probability(),
            firefly_probability: default_firefly_probability(),
            snowflake_probability: 0.0,
            raindrop_probability: default_raindrop_probability(),
            star_map: Vec::new(),
        }
    }
}

fn default_count() -> u32 {
    1
}

fn default_max_attempts() -> u32 {
    50
}

fn default_launch_probability() -> f64 {
    0.1
}

fn default_launch_cutoff() -> f64 {
    7.0
}

fn default_sparkle_probability() -> f64 {
    0.15
}

fn default_firefly_probability() -> f64 {
    0.2
}

fn default_raindrop_probability() -> f64 {
    0.8
}

/// Complete curtain.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurtainConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub show: ShowConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "show.launch_probability")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "curtain.toml: '{}' {}", self.field, self.message)
    }
}

impl CurtainConfig {
    /// Export settings for one file of this show.
    pub fn export_options(&self) -> ExportOptions {
        let frame_duration_ms = self
            .export
            .frame_duration_ms
            .unwrap_or_else(|| (self.scene.time_step * 1000.0).round().max(1.0) as u32);
        ExportOptions {
            frame_duration_ms,
            loop_count: self.export.loop_count,
            complexity_bounds: self
                .export
                .complexity
                .map(|[min, max]| ComplexityBounds::new(min, max)),
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut fail = |field: &str, message: &str| {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: message.to_string(),
            });
        };

        // Validate scene
        if self.scene.panels == 0 {
            fail("scene.panels", "must be a positive integer");
        }
        if !positive(self.scene.time_step) {
            fail("scene.time_step", "must be a positive number of seconds");
        }
        if !positive(self.scene.duration) {
            fail("scene.duration", "must be a positive number of seconds");
        }

        // Validate export
        if self.export.frame_duration_ms == Some(0) {
            fail("export.frame_duration_ms", "must be a positive integer");
        }
        if let Some([min, max]) = self.export.complexity {
            if min > max {
                fail("export.complexity", "minimum must not exceed maximum");
            }
        }

        // Validate show
        if self.show.count == 0 {
            fail("show.count", "must be a positive integer");
        }
        if self.show.max_attempts < self.show.count {
            fail("show.max_attempts", "must be at least show.count");
        }
        if !(self.show.launch_cutoff.is_finite() && self.show.launch_cutoff >= 0.0) {
            fail("show.launch_cutoff", "must be zero or a positive number of seconds");
        }
        let probabilities = [
            ("show.launch_probability", self.show.launch_probability),
            ("show.sparkle_probability", self.show.sparkle_probability),
            ("show.firefly_probability", self.show.firefly_probability),
            ("show.snowflake_probability", self.show.snowflake_probability),
            ("show.raindrop_probability", self.show.raindrop_probability),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                fail(field, "must be between 0 and 1");
            }
        }

        errors
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CurtainConfig = toml::from_str("").unwrap();
        assert_eq!(config, CurtainConfig::default());
        assert_eq!(config.scene.panels, 1);
        assert_eq!(config.show.kind, ShowKind::Firework);
        assert_eq!(config.show.max_attempts, 50);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml_str = r#"
[scene]
panels = 3
time_step = 0.1
duration = 12.0

[export]
output = "out/show.gif"
loop_count = 2
complexity = [1000, 4000]

[show]
kind = "spritework"
seed = 42
count = 4

[[show.star_map]]
x = 0.0
y = 1.0
color = [255, 0, 0, 255]

[[show.star_map]]
x = 1.0
y = 0.0
"#;
        let config: CurtainConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scene.panels, 3);
        assert_eq!(config.export.output, PathBuf::from("out/show.gif"));
        assert_eq!(config.export.complexity, Some([1000, 4000]));
        assert_eq!(config.show.kind, ShowKind::Spritework);
        assert_eq!(config.show.seed, Some(42));
        assert_eq!(config.show.star_map.len(), 2);
        assert_eq!(config.show.star_map[1].color, None);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        assert!(toml::from_str::<CurtainConfig>("[show]\nkind = \"confetti\"").is_err());
    }

    #[test]
    fn test_export_options() {
        let mut config = CurtainConfig::default();
        let options = config.export_options();
        assert_eq!(options.frame_duration_ms, 200);
        assert_eq!(options.complexity_bounds, None);

        config.export.frame_duration_ms = Some(50);
        config.export.complexity = Some([10, 20]);
        let options = config.export_options();
        assert_eq!(options.frame_duration_ms, 50);
        assert_eq!(options.complexity_bounds, Some(ComplexityBounds::new(10, 20)));
    }

    #[test]
    fn test_ticks() {
        let scene = SceneConfig::default();
        assert_eq!(scene.ticks(), 45);
        let short = SceneConfig { duration: 0.1, ..SceneConfig::default() };
        assert_eq!(short.ticks(), 0);
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let mut config = CurtainConfig::default();
        config.scene.panels = 0;
        config.scene.time_step = -0.2;
        config.export.complexity = Some([10, 5]);
        config.show.sparkle_probability = 1.5;
        config.show.count = 0;

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"scene.panels".to_string()));
        assert!(fields.contains(&"scene.time_step".to_string()));
        assert!(fields.contains(&"export.complexity".to_string()));
        assert!(fields.contains(&"show.sparkle_probability".to_string()));
        assert!(fields.contains(&"show.count".to_string()));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "scene.panels".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "curtain.toml: 'scene.panels' must be a positive integer");
    }
}
