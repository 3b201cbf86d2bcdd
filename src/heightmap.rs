use crate::config::WaterLevel;
use crate::error::MapGenError;
use crate::noise::PerlinNoise;
use image::{GrayImage, ImageBuffer, Luma};
use std::path::Path;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Константы острова заданы для карты высот в 322 строки и масштабируются под её высоту
const REFERENCE_ROWS: f64 = 322.0;
const BASE_RADIUS: f32 = 100.0;
const RADIUS_VARIATION: f32 = 50.0;
const MAX_RAY: f64 = 231.0;
/// Остров вытянут по горизонтали
const X_STRETCH: f64 = 1.3;

/// Полный оборот обхода границы. Чуть меньше 2π, последний луч не повторяет первый
const FULL_TURN: f64 = 6.28;
const ANGLE_STEP: f64 = 0.007;
const RAY_STEP: f64 = 0.1;

const BOUNDARY_OCTAVES: u32 = 10;
const ALTITUDE_OCTAVES: u32 = 4;

/// Двумерная карта высот: значения от 0.0 (океан вокруг острова) до 1.0 (высокие горы)
#[derive(Debug, Clone)]
pub struct Heightmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<f32>,
}

impl Heightmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        self.data[(y * self.width + x) as usize] = value;
    }

    pub fn to_luma_image(&self) -> GrayImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Luma([(self.get(x, y).clamp(0.0, 1.0) * 255.0) as u8])
        })
    }

    pub fn save_as_png(&self, path: impl AsRef<Path>) -> Result<(), MapGenError> {
        self.to_luma_image().save(path)?;
        Ok(())
    }

    /// Доля клеток с ненулевой высотой
    pub fn land_fraction(&self) -> f32 {
        let land = self.data.iter().filter(|&&h| h > 0.0).count();
        land as f32 / self.data.len().max(1) as f32
    }
}

/// Высота в клетке `(x, y)`: четыре октавы шума в нормированных координатах
fn altitude(noise: &PerlinNoise, x: u32, y: u32, width: u32, height: u32) -> f32 {
    noise.octave(
        x as f32 / width as f32,
        y as f32 / height as f32,
        height as f32 / width as f32,
        ALTITUDE_OCTAVES,
    )
}

/// Строит карту высот.
///
/// Для суши без острова шум заполняет всю карту. Иначе высоты пишутся только
/// внутри овала, граница которого возмущена шумом, всё снаружи остаётся 0.
pub fn generate_heightmap(
    noise: &PerlinNoise,
    width: u32,
    height: u32,
    water_level: WaterLevel,
) -> Heightmap {
    if water_level.has_coastline() {
        let mut heightmap = Heightmap::new(width, height);
        trace_island(noise, &mut heightmap);
        heightmap
    } else {
        fill_landlocked(noise, width, height)
    }
}

fn fill_landlocked(noise: &PerlinNoise, width: u32, height: u32) -> Heightmap {
    let sample = |i: u32| altitude(noise, i % width, i / width, width, height);

    #[cfg(feature = "parallel")]
    let data: Vec<f32> = (0..(width * height)).into_par_iter().map(sample).collect();
    #[cfg(not(feature = "parallel"))]
    let data: Vec<f32> = (0..(width * height)).map(sample).collect();

    Heightmap {
        width,
        height,
        data,
    }
}

/// Обходит границу острова лучами из центра.
///
/// На каждом угле радиус острова задаёт шум; луч идёт от центра до этого радиуса
/// и записывает высоты во все клетки на пути. Луч, вышедший за край карты
/// (включая нулевые строку и столбец), обрывается.
fn trace_island(noise: &PerlinNoise, heightmap: &mut Heightmap) {
    let width = heightmap.width;
    let height = heightmap.height;
    let scale = f64::from(height) / REFERENCE_ROWS;
    let center_x = f64::from(width / 2);
    let center_y = f64::from(height / 2);
    let max_ray = MAX_RAY * scale;

    // Высота клетки зависит только от её координат, поэтому каждую считаем один раз
    let mut filled = vec![false; heightmap.data.len()];

    let mut theta = 0.0_f64;
    while theta < FULL_TURN {
        let (sin, cos) = theta.sin_cos();
        let boundary = noise.octave(1.0 + cos as f32, 1.0 + sin as f32, 1.0, BOUNDARY_OCTAVES);
        let radius = f64::from(BASE_RADIUS + RADIUS_VARIATION * boundary) * scale;

        let mut r = 0.0_f64;
        while r < max_ray && r < radius {
            let x = (r * X_STRETCH * cos + center_x).floor();
            let y = (r * sin + center_y).floor();
            if x <= 0.0 || x >= f64::from(width) || y <= 0.0 || y >= f64::from(height) {
                break;
            }

            let (x, y) = (x as u32, y as u32);
            let idx = (y * width + x) as usize;
            if !filled[idx] {
                filled[idx] = true;
                heightmap.set(x, y, altitude(noise, x, y, width, height));
            }
            r += RAY_STEP;
        }
        theta += ANGLE_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: u32 = 445;
    const HEIGHT: u32 = 322;

    /// Расстояние до центра с учётом вытянутости острова
    fn stretched_distance(x: u32, y: u32) -> f64 {
        let dx = (f64::from(x) + 0.5 - f64::from(WIDTH / 2)) / X_STRETCH;
        let dy = f64::from(y) + 0.5 - f64::from(HEIGHT / 2);
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn landlocked_covers_every_cell() {
        let noise = PerlinNoise::new(1234);
        let map = generate_heightmap(&noise, WIDTH, HEIGHT, WaterLevel::Landlocked);
        assert_eq!(map.data.len(), (WIDTH * HEIGHT) as usize);
        assert!(map.data.iter().all(|&h| h > 0.0 && h <= 1.0));
        assert_eq!(map.get(10, 20), altitude(&noise, 10, 20, WIDTH, HEIGHT));
    }

    #[test]
    fn island_has_water_border() {
        let noise = PerlinNoise::new(1234);
        let map = generate_heightmap(&noise, WIDTH, HEIGHT, WaterLevel::Default);
        for x in 0..WIDTH {
            assert_eq!(map.get(x, 0), 0.0);
            assert_eq!(map.get(x, HEIGHT - 1), 0.0);
        }
        for y in 0..HEIGHT {
            assert_eq!(map.get(0, y), 0.0);
            assert_eq!(map.get(WIDTH - 1, y), 0.0);
        }
        let land = map.land_fraction();
        assert!(land > 0.2 && land < 0.8, "land fraction {land}");
    }

    #[test]
    fn island_core_is_solid_and_bounded() {
        let noise = PerlinNoise::new(1234);
        let map = generate_heightmap(&noise, WIDTH, HEIGHT, WaterLevel::Island);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let distance = stretched_distance(x, y);
                let h = map.get(x, y);
                if distance < 95.0 {
                    assert!(h > 0.0, "hole inside the island at ({x}, {y})");
                    assert_eq!(h, altitude(&noise, x, y, WIDTH, HEIGHT));
                }
                if distance > 152.0 {
                    assert_eq!(h, 0.0, "land outside the island at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn island_shape_depends_on_seed() {
        let a = generate_heightmap(&PerlinNoise::new(1), WIDTH, HEIGHT, WaterLevel::Default);
        let b = generate_heightmap(&PerlinNoise::new(2), WIDTH, HEIGHT, WaterLevel::Default);
        let a_mask: Vec<bool> = a.data.iter().map(|&h| h > 0.0).collect();
        let b_mask: Vec<bool> = b.data.iter().map(|&h| h > 0.0).collect();
        assert_ne!(a_mask, b_mask);
    }

    #[test]
    fn small_maps_scale_the_island() {
        let noise = PerlinNoise::new(99);
        let map = generate_heightmap(&noise, 40, 30, WaterLevel::Default);
        assert!(map.get(20, 15) > 0.0);
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(39, 29), 0.0);
    }

    #[test]
    fn grayscale_export_matches_size() {
        let mut map = Heightmap::new(3, 2);
        map.set(1, 1, 1.0);
        map.set(2, 0, 0.5);
        let img = map.to_luma_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.into_raw(), vec![0, 0, 127, 0, 255, 0]);
    }

    #[test]
    fn png_export_round_trips_through_map_error() {
        let mut map = Heightmap::new(4, 3);
        map.set(3, 2, 1.0);
        map.set(1, 0, 0.5);

        let dir = std::env::temp_dir().join(format!("floodmap-heightmap-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("heights.png");
        map.save_as_png(&path).unwrap();
        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(3, 2).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [127]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        std::fs::remove_dir_all(&dir).unwrap();

        let missing = dir.join("no-such-dir").join("heights.png");
        assert!(matches!(
            map.save_as_png(missing),
            Err(MapGenError::Image(_))
        ));
    }
}
