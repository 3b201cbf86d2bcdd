use crate::biome::{BiomeColor, classify};
use crate::config::{HEIGHTMAP_SCALE, MapSettings};
use crate::error::MapGenError;
use crate::heightmap::Heightmap;
use crate::noise::PerlinNoise;
use crate::rng::SequenceGenerator;

/// Сдвиг сида для шума влажности, чтобы он не повторял шум высот
pub const MOISTURE_SEED_OFFSET: i32 = 10_173;

const MOISTURE_OCTAVES: u32 = 4;

/// Точка, из которой растёт область одного цвета
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPoint {
    pub x: u32,
    pub y: u32,
    pub color: BiomeColor,
}

/// Шум влажности для данного сида карты
#[must_use]
pub fn moisture_noise(map_seed: i32) -> PerlinNoise {
    PerlinNoise::new(map_seed.wrapping_add(MOISTURE_SEED_OFFSET))
}

/// Раскидывает `seed_count + 1` точек по растру.
///
/// Для каждой точки из генератора берутся сначала `x`, затем `y`. Высота
/// читается из карты высот в уменьшенных координатах, влажность из
/// `moisture`. Точка с индексом 0 служебная: она тоже расходует числа
/// генератора, но на карту не ставится.
pub fn scatter_seeds(
    rng: &mut SequenceGenerator,
    heightmap: &Heightmap,
    moisture: &PerlinNoise,
    settings: &MapSettings,
    water_level: i32,
) -> Result<Vec<SeedPoint>, MapGenError> {
    let width = settings.width;
    let height = settings.height;
    let width_f = width as f32;
    let height_f = height as f32;
    let range_x = i32::try_from(width)
        .map_err(|_| MapGenError::InvalidSettings(format!("width {width} is too large")))?;
    let range_y = i32::try_from(height)
        .map_err(|_| MapGenError::InvalidSettings(format!("height {height} is too large")))?;

    (0..=settings.seed_count)
        .map(|_| {
            let x = rng.next(range_x)? as u32;
            let y = rng.next(range_y)? as u32;

            let altitude = heightmap.get(x / HEIGHTMAP_SCALE, y / HEIGHTMAP_SCALE);
            let wetness = moisture.octave(
                x as f32 / width_f,
                y as f32 / height_f,
                height_f / width_f,
                MOISTURE_OCTAVES,
            );
            let color = classify(
                (altitude * 255.0) as i32,
                (wetness * 255.0) as i32,
                water_level,
            );
            Ok(SeedPoint { x, y, color })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::config::WaterLevel;
    use crate::heightmap::generate_heightmap;

    fn small_settings() -> MapSettings {
        MapSettings {
            width: 200,
            height: 120,
            seed_count: 300,
        }
    }

    fn scatter(seed: i32, water_level: WaterLevel) -> Vec<SeedPoint> {
        let settings = small_settings();
        let (hw, hh) = settings.heightmap_size();
        let heightmap = generate_heightmap(&PerlinNoise::new(seed), hw, hh, water_level);
        let mut rng = SequenceGenerator::from_seed(seed);
        scatter_seeds(
            &mut rng,
            &heightmap,
            &moisture_noise(seed),
            &settings,
            water_level.offset(),
        )
        .unwrap()
    }

    #[test]
    fn creates_one_extra_point() {
        let seeds = scatter(5, WaterLevel::Default);
        assert_eq!(seeds.len(), 301);
        assert!(seeds.iter().all(|s| s.x < 200 && s.y < 120));
    }

    #[test]
    fn positions_follow_the_sequence() {
        let seeds = scatter(42, WaterLevel::Default);
        let mut rng = SequenceGenerator::from_seed(42);
        for seed in seeds.iter().take(20) {
            assert_eq!(seed.x as i32, rng.next(200).unwrap());
            assert_eq!(seed.y as i32, rng.next(120).unwrap());
        }
    }

    #[test]
    fn scattering_is_deterministic() {
        assert_eq!(
            scatter(77, WaterLevel::Island),
            scatter(77, WaterLevel::Island)
        );
    }

    #[test]
    fn points_off_the_island_are_water() {
        let settings = small_settings();
        let (hw, hh) = settings.heightmap_size();
        let heightmap = generate_heightmap(&PerlinNoise::new(3), hw, hh, WaterLevel::Default);
        let mut rng = SequenceGenerator::from_seed(3);
        let seeds =
            scatter_seeds(&mut rng, &heightmap, &moisture_noise(3), &settings, 0).unwrap();
        for seed in &seeds {
            if heightmap.get(seed.x / 4, seed.y / 4) == 0.0 {
                assert_eq!(seed.color.biome, Biome::Ocean);
            }
        }
    }

    #[test]
    fn moisture_seed_wraps() {
        assert_eq!(moisture_noise(i32::MAX).seed(), i32::MIN + 10_172);
    }
}
