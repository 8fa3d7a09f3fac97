//! Show driver: fills scenes with effects and keeps the files that pass the gate.
//!
//! One scene is one attempt. Every attempt starts with a sparkle layer and,
//! unless the show is ambient, a mortar at t = 0. Each tick the driver rolls
//! for another launch (only while there is time left for it to pop and fade)
//! and for decorations, then steps the scene once. Finished scenes are
//! exported with the configured complexity bounds; rejected attempts cost one
//! unit of the attempt budget.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::{CurtainConfig, ShowKind};
use crate::effect::{Effect, Extent, Mortar, MortarOptions, ShapeBurst, Sparkles, StarPoint};
use crate::error::Result;
use crate::export::ExportOutcome;
use crate::scene::Scene;

/// What a show run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowReport {
    /// Final paths of accepted files, in the order they were written
    pub accepted: Vec<PathBuf>,
    /// Complexity of every rejected attempt
    pub rejected: Vec<u64>,
    pub attempts: u32,
}

impl ShowReport {
    pub fn is_complete(&self, wanted: u32) -> bool {
        self.accepted.len() >= wanted as usize
    }
}

/// Simulate one scene according to the show configuration.
///
/// Effects get their own random streams seeded from `rng`, so the same
/// driver seed always yields the same frames.
pub fn render_scene(config: &CurtainConfig, rng: &mut StdRng) -> Result<Scene> {
    let mut scene = Scene::for_layout(config.scene.layout(), config.scene.time_step)?;
    let extent = scene.physical_size();
    let show = &config.show;

    let sparkles = scene.add_effect(Sparkles::new(extent, child_rng(rng)));
    if show.kind != ShowKind::Ambient {
        scene.add_effect(launch(config, extent, rng));
    }

    let last_launch = config.scene.duration - show.launch_cutoff;
    for _ in 0..config.scene.ticks() {
        if show.kind != ShowKind::Ambient
            && scene.elapsed() < last_launch
            && rng.gen::<f64>() < show.launch_probability
        {
            scene.add_effect(launch(config, extent, rng));
        }

        if let Some(fx) = scene.effect_mut(sparkles).and_then(Effect::as_sparkles_mut) {
            if rng.gen::<f64>() < show.sparkle_probability {
                fx.add_sparkle();
            }
            if show.kind == ShowKind::Ambient {
                if rng.gen::<f64>() < show.firefly_probability {
                    fx.add_firefly();
                }
                if rng.gen::<f64>() < show.snowflake_probability {
                    fx.add_snowflake();
                }
                if rng.gen::<f64>() < show.raindrop_probability {
                    fx.add_raindrop();
                }
            }
        }

        scene.tick();
    }

    tracing::debug!(
        kind = %show.kind,
        frames = scene.frames().len(),
        effects = scene.effects().len(),
        "rendered scene"
    );
    Ok(scene)
}

/// Render scenes until `show.count` files are accepted or the attempt budget
/// runs out.
pub fn run_show(config: &CurtainConfig) -> Result<ShowReport> {
    let mut rng = match config.show.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let options = config.export_options();
    let mut report = ShowReport::default();

    while !report.is_complete(config.show.count) {
        if report.attempts >= config.show.max_attempts {
            tracing::warn!(
                attempts = report.attempts,
                accepted = report.accepted.len(),
                wanted = config.show.count,
                "attempt budget exhausted"
            );
            break;
        }
        report.attempts += 1;

        let scene = render_scene(config, &mut rng)?;
        let path = indexed_path(&config.export.output, report.accepted.len());
        match scene.export(&path, &options)? {
            ExportOutcome::Accepted { path, .. } => report.accepted.push(path),
            ExportOutcome::Rejected { complexity } => report.rejected.push(complexity),
        }
    }

    Ok(report)
}

/// `dir/show.gif` -> `dir/show_007.gif`.
pub fn indexed_path(output: &Path, index: usize) -> PathBuf {
    let stem = output.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    output.with_file_name(format!("{}_{:03}.gif", stem, index))
}

fn launch(config: &CurtainConfig, extent: Extent, rng: &mut StdRng) -> Mortar {
    let options = MortarOptions::default();
    let rng = child_rng(rng);
    match config.show.kind {
        ShowKind::Lovework => Mortar::lovework(extent, &options, rng),
        ShowKind::Spritework => Mortar::spritework(extent, &options, custom_shape(config), rng),
        ShowKind::Firework | ShowKind::Ambient => Mortar::firework(extent, &options, rng),
    }
}

fn custom_shape(config: &CurtainConfig) -> Option<ShapeBurst> {
    if config.show.star_map.is_empty() {
        return None;
    }
    Some(ShapeBurst {
        points: config.show.star_map.iter().map(StarPoint::from).collect(),
        ..ShapeBurst::rocket()
    })
}

fn child_rng(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.gen())
}
