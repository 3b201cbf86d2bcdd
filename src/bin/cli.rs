use clap::Parser;
use floodmap::{GenerationParams, WaterLevel, generate_map_with};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор карт: острова, архипелаги и материки из шума и заливки Вороного
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид: число или любая строка (по умолчанию берётся из времени суток)
    #[arg(short, long)]
    seed: Option<String>,

    /// Уровень воды: default, island или landlocked
    #[arg(short, long)]
    water_level: Option<WaterLevel>,

    /// Путь для сохранения карты (по умолчанию: ./map.png)
    #[arg(short, long, default_value = "map.png")]
    output: PathBuf,

    /// Дополнительно сохранить карту высот в PNG
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Дополнительно сохранить сводку генерации в JSON
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации...");
            GenerationParams::from_toml_file(path)?
        }
        None => GenerationParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = Some(seed);
    }
    if let Some(water_level) = cli.water_level {
        params.water_level = water_level;
    }

    println!(
        "Генерация карты (размер: {}×{}, уровень воды: {})...",
        params.map.width, params.map.height, params.water_level
    );
    let map = generate_map_with(&params.map, params.seed_input(), params.water_level)?;
    // Сид печатается всегда, чтобы карту можно было повторить
    println!("Сид карты: {}", map.seed);

    println!("Сохранение в {:?}", cli.output);
    map.raster.save_as_png(&cli.output)?;

    if let Some(path) = &cli.heightmap {
        println!("Сохранение карты высот в {path:?}");
        map.heightmap.save_as_png(path)?;
    }
    if let Some(path) = &cli.summary {
        println!("Сохранение сводки в {path:?}");
        map.summary.save_as_json(path)?;
    }

    if map.summary.unresolved_cells > 0 {
        println!(
            "⚠ {} пикселей остались без области и закрашены фоном",
            map.summary.unresolved_cells
        );
    }

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
