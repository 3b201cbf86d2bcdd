use serde::{Deserialize, Serialize};

/// Цвет воды
pub const OCEAN_RGB: [u8; 3] = [65, 105, 225];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Sand,
    Marsh,
    Forest,
    Hills,
    Mountain,
    Snow,
    Lava,
}

/// Биом точки и его конкретный цвет (внутри полосы цвет плавно меняется)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeColor {
    pub biome: Biome,
    pub rgb: [u8; 3],
}

impl BiomeColor {
    fn new(biome: Biome, r: i32, g: i32, b: i32) -> Self {
        Self {
            biome,
            rgb: [channel(r), channel(g), channel(b)],
        }
    }

    fn grey(biome: Biome, value: i32) -> Self {
        Self::new(biome, value, value, value)
    }
}

fn channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Назначает биом по высоте и влажности (обе в `0..=255`) и сдвигу уровня воды.
///
/// Каждая полоса сдвигается уровнем воды по-своему: полностью, на 9/10 и на 4/5.
/// Из-за этого на границах полос цвета скачут, так и задумано.
#[must_use]
pub fn classify(height: i32, moisture: i32, water_level: i32) -> BiomeColor {
    let height = height.clamp(0, 255);
    let moisture = moisture.clamp(0, 255);

    if height + water_level < 100 {
        let [r, g, b] = OCEAN_RGB;
        return BiomeColor::new(Biome::Ocean, r.into(), g.into(), b.into());
    }

    if height + water_level < 125 {
        let shifted = height + water_level;
        return if moisture < 128 {
            let green = if shifted < 150 { shifted + 105 } else { 255 };
            BiomeColor::new(Biome::Sand, 255 - moisture / 3, green, 128)
        } else {
            BiomeColor::new(
                Biome::Marsh,
                74 + (shifted - 100),
                70 + moisture / 3,
                70 - moisture / 9,
            )
        };
    }

    if height + water_level * 9 / 10 < 175 {
        return if moisture > 108 {
            BiomeColor::new(Biome::Forest, height / 4, moisture / 2 + 20, height / 4)
        } else {
            BiomeColor::new(Biome::Hills, 75 + moisture / 2, 46 + moisture / 2, 4)
        };
    }

    if height + water_level * 4 / 5 < 190 {
        return BiomeColor::grey(Biome::Mountain, (height - 175) + moisture);
    }

    let shifted = height + water_level;
    if moisture > 145 {
        BiomeColor::grey(Biome::Snow, (shifted - 175) + moisture + 50)
    } else {
        BiomeColor::new(Biome::Lava, 255, moisture, 0)
    }
}
