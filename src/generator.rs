// src/generator.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::biome::Biome;
use crate::config::{MapSettings, WaterLevel};
use crate::error::MapGenError;
use crate::flood::{jump_flood, paint};
use crate::heightmap::{Heightmap, generate_heightmap};
use crate::noise::PerlinNoise;
use crate::raster::Raster;
use crate::rng::{SeedInput, SequenceGenerator};
use crate::seeds::{moisture_noise, scatter_seeds};

/// Сводка по одной сгенерированной карте (пишется в JSON рядом с PNG)
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    /// Числовой сид, по которому карту можно воспроизвести
    pub seed: i32,
    pub water_level: WaterLevel,
    pub width: u32,
    pub height: u32,
    pub seed_count: u32,
    /// Доля суши на карте высот
    pub land_fraction: f32,
    pub flood_rounds: u32,
    /// Клетки, до которых заливка не дошла (должно быть 0)
    pub unresolved_cells: usize,
    /// Сколько точек получил каждый биом
    pub biome_counts: BTreeMap<Biome, usize>,
}

impl GenerationSummary {
    pub fn save_as_json(&self, path: impl AsRef<Path>) -> Result<(), MapGenError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub raster: Raster,
    pub heightmap: Heightmap,
    pub seed: i32,
    pub summary: GenerationSummary,
}

/// Генерирует карту стандартного размера 1780×1288.
///
/// `seed` может быть числом, строкой или отсутствовать; итоговый числовой сид
/// возвращается в [`GeneratedMap::seed`].
pub fn generate_map(
    seed: impl Into<SeedInput>,
    water_level: WaterLevel,
) -> Result<GeneratedMap, MapGenError> {
    generate_map_with(&MapSettings::default(), seed, water_level)
}

pub fn generate_map_with(
    settings: &MapSettings,
    seed: impl Into<SeedInput>,
    water_level: WaterLevel,
) -> Result<GeneratedMap, MapGenError> {
    let mut rng = SequenceGenerator::new(seed);
    generate(settings, &mut rng, water_level)
}

/// Полный конвейер: карта высот → точки с биомами → заливка → растр.
///
/// Всё состояние (карта высот, точки, сетка владельцев) создаётся заново на
/// каждый вызов. Генератор последовательностей продвигается на `2 × (seed_count + 1)`
/// чисел.
#[instrument(skip_all, fields(seed = rng.seed(), water_level = %water_level))]
pub fn generate(
    settings: &MapSettings,
    rng: &mut SequenceGenerator,
    water_level: WaterLevel,
) -> Result<GeneratedMap, MapGenError> {
    settings.validate()?;
    let seed = rng.seed();

    // === 1. Карта высот ===
    let (field_width, field_height) = settings.heightmap_size();
    let heightmap = generate_heightmap(
        &PerlinNoise::new(seed),
        field_width,
        field_height,
        water_level,
    );
    let land_fraction = heightmap.land_fraction();
    debug!(field_width, field_height, land_fraction, "heightmap ready");

    // === 2. Точки и биомы ===
    let seeds = scatter_seeds(
        rng,
        &heightmap,
        &moisture_noise(seed),
        settings,
        water_level.offset(),
    )?;
    debug!(count = seeds.len(), "seeds scattered");

    // === 3. Заливка ===
    let outcome = jump_flood(settings.width, settings.height, &seeds);
    let (raster, unresolved_cells) = paint(&outcome.owners, &seeds);

    let mut biome_counts = BTreeMap::new();
    for seed_point in &seeds[1..] {
        *biome_counts.entry(seed_point.color.biome).or_insert(0) += 1;
    }

    info!(rounds = outcome.rounds, unresolved_cells, "map generated");

    Ok(GeneratedMap {
        raster,
        heightmap,
        seed,
        summary: GenerationSummary {
            seed,
            water_level,
            width: settings.width,
            height: settings.height,
            seed_count: settings.seed_count,
            land_fraction,
            flood_rounds: outcome.rounds,
            unresolved_cells,
            biome_counts,
        },
    })
}
