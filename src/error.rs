//! Ошибки генератора карт

/// Все ошибки, которые может вернуть библиотека
#[derive(thiserror::Error, Debug)]
pub enum MapGenError {
    /// `SequenceGenerator::next` вызван с неположительным диапазоном
    #[error("random range must be positive, got {range}")]
    InvalidRange { range: i32 },

    /// Параметры карты, с которыми генерация невозможна
    #[error("invalid map settings: {0}")]
    InvalidSettings(String),

    #[error("unknown water level `{0}` (expected default, island or landlocked)")]
    UnknownWaterLevel(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
