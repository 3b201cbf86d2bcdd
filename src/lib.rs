pub mod biome;
pub mod config;
pub mod error;
pub mod flood;
pub mod generator;
pub mod heightmap;
pub mod noise;
pub mod raster;
pub mod rng;
pub mod seeds;

pub use config::{GenerationParams, MapSettings, WaterLevel};
pub use error::MapGenError;
pub use generator::{GeneratedMap, GenerationSummary, generate_map, generate_map_with};
pub use raster::Raster;
pub use rng::{SeedInput, SequenceGenerator};
