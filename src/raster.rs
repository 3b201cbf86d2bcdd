use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::error::MapGenError;

/// Итоговое цветное изображение карты, строки подряд
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<[u8; 3]>,
}

impl Raster {
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.data[(y * self.width + x) as usize]
    }

    /// Пиксели по периметру карты: верхняя и нижняя строки, затем крайние столбцы
    pub fn border(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        let rows = (0..self.width).flat_map(move |x| {
            let bottom = (self.height > 1).then(|| self.get(x, self.height - 1));
            std::iter::once(self.get(x, 0)).chain(bottom)
        });
        let columns = (1..self.height.saturating_sub(1)).flat_map(move |y| {
            let right = (self.width > 1).then(|| self.get(self.width - 1, y));
            std::iter::once(self.get(0, y)).chain(right)
        });
        rows.chain(columns)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y)))
    }

    pub fn save_as_png(&self, path: impl AsRef<Path>) -> Result<(), MapGenError> {
        self.to_rgb_image().save(path)?;
        Ok(())
    }
}
