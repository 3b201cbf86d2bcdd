// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет параметры, управляющие генерацией:
//! - Уровень воды (обычная карта, архипелаг, суша без острова)
//! - Размеры растра и число точек-сидов
//! - Сид генератора
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::MapGenError;
use crate::rng::SeedInput;

/// Ширина итогового растра по умолчанию
pub const DEFAULT_WIDTH: u32 = 1780;
/// Высота итогового растра по умолчанию
pub const DEFAULT_HEIGHT: u32 = 1288;
/// Число цветных точек (плюс одна служебная с индексом 0)
pub const DEFAULT_SEED_COUNT: u32 = 18_000;

/// Во сколько раз карта высот меньше итогового растра по каждой оси
pub const HEIGHTMAP_SCALE: u32 = 4;

/// Режим уровня воды
///
/// Определяет, есть ли у карты форма острова и насколько сдвигаются пороги биомов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaterLevel {
    /// Остров в океане
    #[default]
    Default,
    /// Архипелаг: тот же остров, но вода поднята, суша распадается на острова
    Island,
    /// Суша на всю карту, без береговой маски
    Landlocked,
}

impl WaterLevel {
    /// Сдвиг, прибавляемый к высоте при назначении биома.
    ///
    /// # Примеры
    /// ```
    /// use floodmap::config::WaterLevel;
    /// assert_eq!(WaterLevel::Default.offset(), 0);
    /// assert_eq!(WaterLevel::Island.offset(), -50);
    /// assert_eq!(WaterLevel::Landlocked.offset(), 10);
    /// ```
    #[must_use]
    pub fn offset(self) -> i32 {
        match self {
            WaterLevel::Default => 0,
            WaterLevel::Island => -50,
            WaterLevel::Landlocked => 10,
        }
    }

    /// Нужна ли береговая маска (форма острова) на карте высот
    #[must_use]
    pub fn has_coastline(self) -> bool {
        !matches!(self, WaterLevel::Landlocked)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WaterLevel::Default => "default",
            WaterLevel::Island => "island",
            WaterLevel::Landlocked => "landlocked",
        }
    }
}

impl fmt::Display for WaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaterLevel {
    type Err = MapGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(WaterLevel::Default),
            "island" | "archipelago" => Ok(WaterLevel::Island),
            "landlocked" => Ok(WaterLevel::Landlocked),
            _ => Err(MapGenError::UnknownWaterLevel(s.to_owned())),
        }
    }
}

/// Размеры карты и плотность точек
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Ширина растра в пикселях (по умолчанию 1780)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота растра в пикселях (по умолчанию 1288)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Количество цветных точек (по умолчанию 18000)
    #[serde(default = "default_seed_count")]
    pub seed_count: u32,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}
fn default_seed_count() -> u32 {
    DEFAULT_SEED_COUNT
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed_count: DEFAULT_SEED_COUNT,
        }
    }
}

impl MapSettings {
    /// Проверяет, что с такими размерами карту можно построить.
    ///
    /// Размеры должны помещаться в `i32` (через них идут запросы к генератору
    /// последовательностей), а индексы точек в `u32`.
    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapGenError::InvalidSettings(format!(
                "map must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(MapGenError::InvalidSettings(format!(
                "map {}x{} is too large",
                self.width, self.height
            )));
        }
        if u64::from(self.width) * u64::from(self.height) > u64::from(u32::MAX) {
            return Err(MapGenError::InvalidSettings(format!(
                "map {}x{} has too many pixels",
                self.width, self.height
            )));
        }
        if self.seed_count == 0 || self.seed_count == u32::MAX {
            return Err(MapGenError::InvalidSettings(format!(
                "seed count must be in 1..{}, got {}",
                u32::MAX,
                self.seed_count
            )));
        }
        Ok(())
    }

    /// Размер карты высот: растр, уменьшенный в 4 раза с округлением вверх
    #[must_use]
    pub fn heightmap_size(&self) -> (u32, u32) {
        (
            self.width.div_ceil(HEIGHTMAP_SCALE),
            self.height.div_ceil(HEIGHTMAP_SCALE),
        )
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация для одного запуска. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationParams {
    /// Сид: число или строка. Если не задан, берётся из времени суток
    #[serde(default, deserialize_with = "deserialize_seed")]
    pub seed: Option<String>,

    /// Уровень воды (по умолчанию `default`)
    #[serde(default)]
    pub water_level: WaterLevel,

    /// Размеры карты и число точек
    #[serde(flatten)]
    pub map: MapSettings,
}

/// Принимает сид и как число (`seed = 42`), и как строку (`seed = "42"`)
fn deserialize_seed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSeed {
        Number(i64),
        Text(String),
    }

    Ok(
        Option::<RawSeed>::deserialize(deserializer)?.map(|raw| match raw {
            RawSeed::Number(n) => n.to_string(),
            RawSeed::Text(text) => text,
        }),
    )
}

impl GenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Аргументы
    /// * `path` - путь к файлу конфигурации в формате TOML
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = "hello"
    /// water_level = "island"
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, MapGenError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, MapGenError> {
        let params: Self = toml::from_str(contents)?;
        params.map.validate()?;
        Ok(params)
    }

    /// Сид в виде, пригодном для генератора последовательностей
    #[must_use]
    pub fn seed_input(&self) -> SeedInput {
        self.seed.as_deref().into()
    }
}
