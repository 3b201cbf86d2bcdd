//! Градиентный шум Перлина с октавами
//!
//! Шум полностью определяется сидом: градиент в каждом узле сетки выбирается
//! хешем от координат узла, сида и номера октавы. Тот же потоковый хеш
//! используется генератором последовательностей для строковых сидов.

use std::fmt::Write;

use crate::rng::TextHasher;

/// Число ячеек сетки на единицу входной координаты
const GRID_DENSITY: f32 = 5.0;

/// Во сколько раз падает амплитуда каждой следующей октавы
const PERSISTENCE: f32 = 0.351;

const GRADIENTS: [(f32, f32); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (0.0, 1.0),
    (1.0, 0.0),
    (0.0, -1.0),
    (-1.0, 0.0),
];

/// Сглаживающая кривая `6t⁵ − 15t⁴ + 10t³`: без неё на шуме видны линии сетки
#[inline]
fn fade(t: f32) -> f32 {
    6.0 * t * t * t * t * t - 15.0 * t * t * t * t + 10.0 * t * t * t
}

#[inline]
fn blend(v0: f32, v1: f32, t: f32) -> f32 {
    v0 + fade(t) * (v1 - v0)
}

/// Генератор шума. Хранит только сид, своего регистра случайных чисел у него нет.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerlinNoise {
    seed: i32,
}

impl PerlinNoise {
    #[must_use]
    pub fn new(seed: i32) -> Self {
        Self { seed }
    }

    #[must_use]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Сумма `octaves` слоёв шума, нормированная в `[0, 1]`.
    ///
    /// Частота удваивается, амплитуда умножается на 0.351 с каждым слоем.
    /// `ratio` = высота / ширина области выборки, чтобы ячейки сетки оставались
    /// квадратными. Без октав возвращается нейтральное 0.5.
    #[must_use]
    pub fn octave(&self, x: f32, y: f32, ratio: f32, octaves: u32) -> f32 {
        if octaves == 0 {
            return 0.5;
        }

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max = 0.0;
        for layer in 0..octaves {
            total += self.layer(x * frequency, y * frequency, ratio, layer) * amplitude;
            max += amplitude;
            amplitude *= PERSISTENCE;
            frequency *= 2.0;
        }
        total / max
    }

    /// Один слой шума в диапазоне `[0, 1]`
    fn layer(&self, x: f32, y: f32, ratio: f32, layer: u32) -> f32 {
        let x = x * GRID_DENSITY;
        let y = y * (GRID_DENSITY * ratio);
        let cell_x = x.floor() as i32;
        let cell_y = y.floor() as i32;
        let fx = x % 1.0;
        let fy = y % 1.0;

        // На больших координатах `floor` насыщается до `i32::MAX`, соседний узел заворачивается
        let next_x = cell_x.wrapping_add(1);
        let next_y = cell_y.wrapping_add(1);

        let corners = [
            (cell_x, cell_y, fx, fy),
            (next_x, cell_y, fx - 1.0, fy),
            (cell_x, next_y, fx, fy - 1.0),
            (next_x, next_y, fx - 1.0, fy - 1.0),
        ];
        let dots = corners.map(|(cx, cy, dx, dy)| {
            let (gx, gy) = GRADIENTS[self.corner_hash(cx, cy, layer) as usize % GRADIENTS.len()];
            gx * dx + gy * dy
        });

        let bottom = blend(dots[0], dots[1], fx);
        let top = blend(dots[2], dots[3], fx);
        (blend(bottom, top, fy) + 1.0) / 2.0
    }

    /// Хеш узла сетки: текст `"{x}{seed}{layer}{y}"`, взятый по модулю
    fn corner_hash(&self, x: i32, y: i32, layer: u32) -> u32 {
        let mut hasher = TextHasher::new();
        // Запись в хешер не может завершиться ошибкой
        let _ = write!(hasher, "{x}{}{layer}{y}", self.seed);
        hasher.finish().unsigned_abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::hash_text;
    use rand::{Rng, SeedableRng};

    #[test]
    fn fade_keeps_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert!((fade(1.0) - 1.0).abs() < 1e-6);
        assert!((fade(0.5) - 0.5).abs() < 1e-6);
        // Не линейная интерполяция
        assert!(fade(0.25) < 0.25);
    }

    #[test]
    fn corner_hash_uses_concatenated_text() {
        let noise = PerlinNoise::new(1234);
        assert_eq!(
            noise.corner_hash(-3, 17, 2),
            hash_text("-31234217").unsigned_abs()
        );
    }

    #[test]
    fn origin_is_neutral() {
        for seed in [0, 1, -99, 1234, i32::MAX] {
            let noise = PerlinNoise::new(seed);
            for octaves in 1..6 {
                assert!((noise.octave(0.0, 0.0, 1.0, octaves) - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn octave_stays_in_unit_range() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20_000 {
            let noise = PerlinNoise::new(rng.r#gen());
            let x = rng.gen_range(0.0..3.0);
            let y = rng.gen_range(0.0..3.0);
            let ratio = rng.gen_range(0.3..2.0);
            let octaves = rng.gen_range(1..=10);
            let value = noise.octave(x, y, ratio, octaves);
            assert!(
                (0.0..=1.0).contains(&value),
                "octave({x}, {y}, {ratio}, {octaves}) = {value}"
            );
        }
    }

    #[test]
    fn many_octaves_and_far_coordinates_stay_in_range() {
        let noise = PerlinNoise::new(1234);
        for (x, y, octaves) in [
            (1.0, 1.0, 32),
            (0.4, 0.7, 29),
            (5.0e8, 0.5, 1),
            (0.5, 5.0e8, 4),
            (5.0e8, 5.0e8, 32),
        ] {
            let value = noise.octave(x, y, 1.0, octaves);
            assert!(
                (0.0..=1.0).contains(&value),
                "octave({x}, {y}, 1.0, {octaves}) = {value}"
            );
        }
    }

    #[test]
    fn same_seed_same_value() {
        let a = PerlinNoise::new(5555);
        let b = PerlinNoise::new(5555);
        let c = PerlinNoise::new(5556);
        let samples: Vec<(f32, f32)> = (0..50)
            .map(|i| (i as f32 * 0.037, 1.0 - i as f32 * 0.011))
            .collect();
        assert!(
            samples
                .iter()
                .all(|&(x, y)| a.octave(x, y, 0.72, 4) == b.octave(x, y, 0.72, 4))
        );
        assert!(
            samples
                .iter()
                .any(|&(x, y)| a.octave(x, y, 0.72, 4) != c.octave(x, y, 0.72, 4))
        );
    }

    #[test]
    fn zero_octaves_is_neutral() {
        assert_eq!(PerlinNoise::new(3).octave(0.4, 0.2, 1.0, 0), 0.5);
    }

    #[test]
    fn neighbouring_samples_are_smooth() {
        let noise = PerlinNoise::new(42);
        let step = 0.0005;
        for i in 0..2000 {
            let x = i as f32 * step;
            let delta = (noise.octave(x + step, 0.3, 1.0, 1) - noise.octave(x, 0.3, 1.0, 1)).abs();
            assert!(delta < 0.05, "jump of {delta} at x = {x}");
        }
    }
}
