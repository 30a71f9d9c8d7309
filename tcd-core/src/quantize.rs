//! Quantization tables
//!
//! A DMX channel has 256 levels but most display fields only have a handful
//! of states. Each table maps a raw level to a discrete bucket. Buckets are
//! contiguous and non-decreasing; their widths are tuned by hand so that the
//! breakpoints land on values that are easy to hit from a lighting desk,
//! which is why some buckets are one level wider than their neighbours.
//!
//! Tables are built at compile time from their breakpoint lists: bucket `n`
//! starts at `breaks[n - 1]`.

use crate::traits::{AmPm, ColonMode};

/// A 256-entry lookup table from raw channel level to bucket index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable {
    name: &'static str,
    table: [u8; 256],
}

impl QuantTable {
    const fn new(name: &'static str, table: [u8; 256]) -> Self {
        Self { name, table }
    }

    /// Bucket for a raw level
    pub const fn get(&self, raw: u8) -> u8 {
        self.table[raw as usize]
    }

    /// Highest bucket this table produces
    pub const fn max(&self) -> u8 {
        self.table[255]
    }

    /// Table name (for diagnostics)
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Build a table from ascending breakpoints
const fn from_breaks<const B: usize>(breaks: [u8; B]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut raw = 0;
    let mut bucket = 0;
    while raw < 256 {
        while bucket < B && raw >= breaks[bucket] as usize {
            bucket += 1;
        }
        table[raw] = bucket as u8;
        raw += 1;
    }
    table
}

/// Build a table of equal-width buckets, capped at `max`
const fn from_width(width: usize, max: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut raw = 0;
    while raw < 256 {
        let bucket = raw / width;
        table[raw] = if bucket > max as usize { max } else { bucket as u8 };
        raw += 1;
    }
    table
}

/// Speed: level 0 is blank, 1..=255 spread over 1..=100
const fn speed_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut raw = 1;
    while raw < 256 {
        table[raw] = ((raw - 1) * 100 / 255 + 1) as u8;
        raw += 1;
    }
    table
}

/// Month: 0 = blank, 1..=12 = JAN..DEC
pub static MONTH: QuantTable = QuantTable::new(
    "month",
    from_breaks([20, 40, 60, 79, 99, 119, 138, 158, 178, 197, 217, 237]),
);

/// Day: 0 = blank, 1..=31
pub static DAY: QuantTable = QuantTable::new("day", from_width(8, 31));

/// One year digit: 0 = blank, 1..=10 = digits 0..9
pub static YEAR_DIGIT: QuantTable = QuantTable::new(
    "year digit",
    from_breaks([24, 47, 70, 94, 117, 140, 163, 187, 210, 233]),
);

/// Hour: zero-based bucket 0..=13
pub static HOUR: QuantTable = QuantTable::new(
    "hour",
    from_breaks([19, 37, 55, 73, 91, 109, 127, 145, 163, 181, 199, 217, 235]),
);

/// Hour in 24-hour mode: zero-based bucket 0..=23
pub static HOUR_24: QuantTable = QuantTable::new("hour 24h", from_width(11, 23));

/// Minute: zero-based bucket 0..=60
pub static MINUTE: QuantTable = QuantTable::new(
    "minute",
    from_breaks([
        5, 9, 13, 17, 21, 26, 30, 34, 38, 42, 47, 51, 55, 59, 63, 68, 72, 76, 80, 84, 89, 93, 97,
        101, 105, 110, 114, 118, 122, 126, 131, 135, 139, 143, 147, 152, 156, 160, 164, 168, 173,
        177, 181, 185, 189, 194, 198, 202, 206, 210, 215, 219, 223, 227, 231, 236, 240, 244, 248,
        252,
    ]),
);

/// Brightness: 0 = unit off, 1..=16 = levels 0..=15
pub static BRIGHTNESS: QuantTable = QuantTable::new("brightness", from_width(15, 16));

/// Speed: 0 = blank, 1..=100 = speeds 0..=99
pub static SPEED: QuantTable = QuantTable::new("speed", speed_table());

/// Every table, for diagnostics and property tests
pub static ALL_TABLES: [&QuantTable; 8] = [
    &MONTH,
    &DAY,
    &YEAR_DIGIT,
    &HOUR,
    &HOUR_24,
    &MINUTE,
    &BRIGHTNESS,
    &SPEED,
];

/// Highest level that still selects AM
pub const AMPM_AM_MAX: u8 = 127;

/// Highest level that turns the colon off
pub const COLON_OFF_MAX: u8 = 85;

/// Highest level that turns the colon on steadily; above this it blinks
pub const COLON_ON_MAX: u8 = 170;

/// AM/PM channel: 0..=127 is AM, 128..=255 is PM
pub const fn ampm_from_raw(raw: u8) -> AmPm {
    if raw <= AMPM_AM_MAX {
        AmPm::Am
    } else {
        AmPm::Pm
    }
}

/// Colon channel: 0..=85 off, 86..=170 on, 171..=255 blink
pub const fn colon_from_raw(raw: u8) -> ColonMode {
    if raw <= COLON_OFF_MAX {
        ColonMode::Off
    } else if raw <= COLON_ON_MAX {
        ColonMode::On
    } else {
        ColonMode::Blink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ranges() {
        assert_eq!(MONTH.max(), 12);
        assert_eq!(DAY.max(), 31);
        assert_eq!(YEAR_DIGIT.max(), 10);
        assert_eq!(HOUR.max(), 13);
        assert_eq!(MINUTE.max(), 60);
        assert_eq!(BRIGHTNESS.max(), 16);
        assert_eq!(SPEED.max(), 100);
    }

    #[test]
    fn test_zero_level_is_first_bucket() {
        for table in ALL_TABLES {
            assert_eq!(table.get(0), 0, "{}", table.name());
        }
    }

    #[test]
    fn test_hour_24_covers_the_day() {
        assert_eq!(HOUR_24.max(), 23);
        assert_eq!(HOUR_24.get(10), 0);
        assert_eq!(HOUR_24.get(11), 1);
        assert_eq!(HOUR_24.get(252), 22);
        assert_eq!(HOUR_24.get(253), 23);
        assert_eq!(HOUR_24.get(255), 23);
    }

    #[test]
    fn test_month_breakpoints() {
        assert_eq!(MONTH.get(19), 0);
        assert_eq!(MONTH.get(20), 1);
        assert_eq!(MONTH.get(78), 3);
        assert_eq!(MONTH.get(79), 4);
        assert_eq!(MONTH.get(236), 11);
        assert_eq!(MONTH.get(237), 12);
    }

    #[test]
    fn test_minute_168_is_bucket_40() {
        assert_eq!(MINUTE.get(167), 39);
        assert_eq!(MINUTE.get(168), 40);
        assert_eq!(MINUTE.get(251), 59);
        assert_eq!(MINUTE.get(252), 60);
    }

    #[test]
    fn test_day_is_level_over_eight() {
        assert_eq!(DAY.get(7), 0);
        assert_eq!(DAY.get(8), 1);
        assert_eq!(DAY.get(255), 31);
    }

    #[test]
    fn test_brightness_buckets() {
        assert_eq!(BRIGHTNESS.get(14), 0);
        assert_eq!(BRIGHTNESS.get(15), 1);
        assert_eq!(BRIGHTNESS.get(239), 15);
        assert_eq!(BRIGHTNESS.get(240), 16);
        assert_eq!(BRIGHTNESS.get(255), 16);
    }

    #[test]
    fn test_speed_endpoints() {
        assert_eq!(SPEED.get(0), 0);
        assert_eq!(SPEED.get(1), 1);
        assert_eq!(SPEED.get(255), 100);
    }

    #[test]
    fn test_ampm_split() {
        assert_eq!(ampm_from_raw(0), AmPm::Am);
        assert_eq!(ampm_from_raw(127), AmPm::Am);
        assert_eq!(ampm_from_raw(128), AmPm::Pm);
        assert_eq!(ampm_from_raw(255), AmPm::Pm);
    }

    #[test]
    fn test_colon_ranges() {
        assert_eq!(colon_from_raw(0), ColonMode::Off);
        assert_eq!(colon_from_raw(85), ColonMode::Off);
        assert_eq!(colon_from_raw(86), ColonMode::On);
        assert_eq!(colon_from_raw(170), ColonMode::On);
        assert_eq!(colon_from_raw(171), ColonMode::Blink);
        assert_eq!(colon_from_raw(200), ColonMode::Blink);
    }
}
