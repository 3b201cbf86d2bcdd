//! Детерминированный генератор последовательностей
//!
//! Сид задаётся числом, произвольной строкой или не задаётся вовсе (тогда он
//! берётся из времени суток). Один и тот же числовой сид всегда даёт одну и ту же
//! последовательность, а значит и одну и ту же карту.

use std::fmt;

use chrono::{Local, Timelike};

use crate::error::MapGenError;

const HASH_START: i32 = 6217;
const HASH_PRIME: i32 = 1_385_953;

const LCG_MODULUS: i32 = 38_912_897;
const LCG_MULTIPLIER: i32 = 132_049;
const LCG_INCREMENT: i32 = 11_213;

const MS_PER_DAY: i64 = 86_400_000;

/// Потоковый хеш текста: XOR с кодом символа, затем умножение на простое число.
///
/// Символы подаются как UTF-16 единицы; `'\0'` завершает строку, всё после него
/// игнорируется. Реализует [`fmt::Write`], поэтому `write!` хеширует числа без
/// промежуточной строки.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextHasher {
    acc: i32,
    terminated: bool,
}

impl TextHasher {
    pub(crate) fn new() -> Self {
        Self {
            acc: HASH_START,
            terminated: false,
        }
    }

    fn feed(&mut self, unit: u16) {
        if self.terminated {
            return;
        }
        if unit == 0 {
            self.terminated = true;
            return;
        }
        self.acc ^= i32::from(unit);
        self.acc = self.acc.wrapping_mul(HASH_PRIME);
    }

    pub(crate) fn finish(self) -> i32 {
        self.acc
    }
}

impl fmt::Write for TextHasher {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for unit in s.encode_utf16() {
            self.feed(unit);
        }
        Ok(())
    }
}

/// Хеширует строку в знаковое 32-битное число (результат может быть отрицательным)
#[must_use]
pub fn hash_text(text: &str) -> i32 {
    let mut hasher = TextHasher::new();
    for unit in text.encode_utf16() {
        hasher.feed(unit);
    }
    hasher.finish()
}

/// Миллисекунды, прошедшие с полуночи *вчерашнего* дня по местному времени
fn time_of_day_seed() -> i32 {
    let now = Local::now().time();
    let millis = i64::from(now.num_seconds_from_midnight()) * 1000
        + i64::from((now.nanosecond() / 1_000_000).min(999));
    (MS_PER_DAY + millis) as i32
}

/// Входной сид в том виде, в котором его передаёт пользователь
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedInput {
    /// Сид не задан: берётся из текущего времени
    #[default]
    Absent,
    /// Текст из поля ввода: число или произвольная строка
    Text(String),
    Number(i32),
}

impl SeedInput {
    /// Приводит вход к числовому сиду.
    ///
    /// Пустой текст равносилен отсутствию сида. Текст, который разбирается как
    /// `i32` (пробелы по краям и знак допускаются), используется как есть, иначе
    /// берётся [`hash_text`].
    #[must_use]
    pub fn resolve(&self) -> i32 {
        match self {
            SeedInput::Absent => time_of_day_seed(),
            SeedInput::Number(n) => *n,
            SeedInput::Text(text) if text.is_empty() => time_of_day_seed(),
            SeedInput::Text(text) => text
                .trim()
                .parse::<i32>()
                .unwrap_or_else(|_| hash_text(text)),
        }
    }
}

impl From<i32> for SeedInput {
    fn from(value: i32) -> Self {
        SeedInput::Number(value)
    }
}

impl From<&str> for SeedInput {
    fn from(value: &str) -> Self {
        SeedInput::Text(value.to_owned())
    }
}

impl From<String> for SeedInput {
    fn from(value: String) -> Self {
        SeedInput::Text(value)
    }
}

impl From<Option<&str>> for SeedInput {
    fn from(value: Option<&str>) -> Self {
        value.map_or(SeedInput::Absent, SeedInput::from)
    }
}

/// Простой линейно-конгруэнтный генератор с явным состоянием.
///
/// Один экземпляр на одну карту; общего глобального генератора нет.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    register: i32,
}

impl SequenceGenerator {
    pub fn new(input: impl Into<SeedInput>) -> Self {
        Self::from_seed(input.into().resolve())
    }

    #[must_use]
    pub fn from_seed(seed: i32) -> Self {
        Self { register: seed }
    }

    /// Текущее значение регистра. До первого вызова [`Self::next`] совпадает с сидом.
    #[must_use]
    pub fn seed(&self) -> i32 {
        self.register
    }

    /// Возвращает число в `0..range` и продвигает регистр.
    ///
    /// Переполнение при обновлении регистра допустимо и не является ошибкой.
    pub fn next(&mut self, range: i32) -> Result<i32, MapGenError> {
        if range <= 0 {
            return Err(MapGenError::InvalidRange { range });
        }
        let output = (self.register % range).abs();
        self.register = (self.register % LCG_MODULUS)
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        Ok(output)
    }
}
