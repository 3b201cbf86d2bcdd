//! Рост областей методом прыгающей заливки (jump flooding)
//!
//! Приближает диаграмму Вороного за `O(N log W)` вместо перебора всех точек для
//! каждого пикселя. Каждая клетка хранит индекс точки-владельца в массиве точек;
//! индекс 0 означает «ничья».
//!
//! Раунды строго последовательны, а внутри раунда клетки обновляются на месте в
//! порядке списка активных точек, поэтому результат воспроизводится побайтно.
//! Точность не гарантируется: отдельные пиксели у границ могут достаться не
//! ближайшей точке, а при очень редких точках часть клеток может остаться ничьей.

use tracing::{debug, warn};

use crate::raster::Raster;
use crate::seeds::SeedPoint;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Цвет клеток, до которых заливка не добралась
pub const BACKGROUND_RGB: [u8; 3] = [0, 0, 0];

/// Соседи на расстоянии шага: по `x` снаружи, по `y` внутри, без нулевого сдвига
const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Индексы владельцев по клеткам растра, строки подряд
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerGrid {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

impl OwnerGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, owner: u32) {
        self.data[(y * self.width + x) as usize] = owner;
    }

    /// Сколько клеток так и осталось без владельца
    pub fn unresolved(&self) -> usize {
        self.data.iter().filter(|&&owner| owner == 0).count()
    }
}

#[derive(Debug, Clone)]
pub struct FloodOutcome {
    pub owners: OwnerGrid,
    /// Число выполненных раундов (по одному на размер шага)
    pub rounds: u32,
}

fn distance_sq(cell: (u32, u32), origin: (u32, u32)) -> i64 {
    let dx = i64::from(cell.0) - i64::from(origin.0);
    let dy = i64::from(cell.1) - i64::from(origin.1);
    dx * dx + dy * dy
}

/// Забирает ли претендент клетку у текущего владельца.
///
/// Претендент побеждает, если его точка не дальше точки владельца: при равных
/// расстояниях клетка переходит к претенденту.
#[must_use]
pub fn challenger_wins(cell: (u32, u32), incumbent: (u32, u32), challenger: (u32, u32)) -> bool {
    distance_sq(cell, incumbent) >= distance_sq(cell, challenger)
}

/// Выращивает области из точек `seeds[1..]` на сетке `width × height`.
///
/// Точка с индексом 0 не ставится. При совпадении позиций клетку получает точка
/// с большим индексом. Точки за пределами сетки пропускаются.
///
/// Список активных точек сначала содержит позиции точек, а после каждого раунда
/// пополняется клетками, захваченными в этом раунде. Шаг начинается с половины
/// ширины и делится пополам до нуля.
pub fn jump_flood(width: u32, height: u32, seeds: &[SeedPoint]) -> FloodOutcome {
    let mut owners = OwnerGrid::new(width, height);
    let mut active: Vec<(u32, u32)> = Vec::with_capacity(owners.data.len() + seeds.len());

    for (index, seed) in seeds.iter().enumerate().skip(1) {
        if seed.x >= width || seed.y >= height {
            warn!(index, x = seed.x, y = seed.y, "seed outside the grid, skipped");
            continue;
        }
        owners.set(seed.x, seed.y, index as u32);
        active.push((seed.x, seed.y));
    }

    let origin = |owner: u32| {
        let seed = &seeds[owner as usize];
        (seed.x, seed.y)
    };

    let mut claimed = Vec::new();
    let mut step = width / 2;
    let mut rounds = 0;
    while step > 0 {
        let reach = i64::from(step);
        for &(x, y) in &active {
            let current = owners.get(x, y);
            for (dx, dy) in NEIGHBOUR_OFFSETS {
                let nx = i64::from(x) + dx * reach;
                let ny = i64::from(y) + dy * reach;
                if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                    continue;
                }
                let cell = (nx as u32, ny as u32);

                let incumbent = owners.get(cell.0, cell.1);
                if incumbent == current {
                    continue;
                }
                if incumbent == 0 {
                    owners.set(cell.0, cell.1, current);
                    claimed.push(cell);
                } else if challenger_wins(cell, origin(incumbent), origin(current)) {
                    owners.set(cell.0, cell.1, current);
                }
            }
        }

        debug!(step, active = active.len(), claimed = claimed.len(), "flood round");
        active.append(&mut claimed);
        rounds += 1;
        step /= 2;
    }

    FloodOutcome { owners, rounds }
}

/// Раскрашивает растр цветами владельцев.
///
/// Возвращает растр и число клеток без владельца (они получают [`BACKGROUND_RGB`]).
pub fn paint(owners: &OwnerGrid, seeds: &[SeedPoint]) -> (Raster, usize) {
    let colour = |&owner: &u32| {
        if owner == 0 {
            BACKGROUND_RGB
        } else {
            seeds[owner as usize].color.rgb
        }
    };

    #[cfg(feature = "parallel")]
    let data: Vec<[u8; 3]> = owners.data.par_iter().map(colour).collect();
    #[cfg(not(feature = "parallel"))]
    let data: Vec<[u8; 3]> = owners.data.iter().map(colour).collect();

    let unresolved = owners.unresolved();
    if unresolved > 0 {
        warn!(unresolved, "cells left without an owner, painted as background");
    }

    (
        Raster {
            width: owners.width,
            height: owners.height,
            data,
        },
        unresolved,
    )
}
