use serde::{Deserialize, Serialize};

pub const MIN_WORK_SECS: u32 = 1;
pub const MIN_PAUSE_SECS: u32 = 1;
pub const MIN_DELAY_START_SECS: u32 = 0;
pub const MIN_WARNING_SECS: u32 = 1;
pub const MIN_CYCLES: u32 = 1;

/// Durations and repetition count for one workout.
///
/// Every constructor clamps its inputs to the field minimums, so a value of
/// this type is always valid. `warning_secs` should not exceed the shortest
/// non-zero phase, otherwise the warning cue never fires in that phase; that
/// is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIntervalConfig", into = "RawIntervalConfig")]
pub struct IntervalConfig {
    work_secs: u32,
    pause_secs: u32,
    delay_start_secs: u32,
    warning_secs: u32,
    cycles: u32,
}

impl IntervalConfig {
    pub fn new(
        work_secs: u32,
        pause_secs: u32,
        delay_start_secs: u32,
        warning_secs: u32,
        cycles: u32,
    ) -> Self {
        Self {
            work_secs: work_secs.max(MIN_WORK_SECS),
            pause_secs: pause_secs.max(MIN_PAUSE_SECS),
            delay_start_secs: delay_start_secs.max(MIN_DELAY_START_SECS),
            warning_secs: warning_secs.max(MIN_WARNING_SECS),
            cycles: cycles.max(MIN_CYCLES),
        }
    }

    /// Build a config from free-form form input.
    ///
    /// Each field is read like a number typed into a settings box: leading
    /// digits are taken, anything unparseable or below the minimum becomes
    /// the minimum.
    pub fn from_text(
        work: &str,
        pause: &str,
        delay_start: &str,
        warning: &str,
        cycles: &str,
    ) -> Self {
        Self {
            work_secs: clamp_text(work, MIN_WORK_SECS),
            pause_secs: clamp_text(pause, MIN_PAUSE_SECS),
            delay_start_secs: clamp_text(delay_start, MIN_DELAY_START_SECS),
            warning_secs: clamp_text(warning, MIN_WARNING_SECS),
            cycles: clamp_text(cycles, MIN_CYCLES),
        }
    }

    pub fn work_secs(&self) -> u32 {
        self.work_secs
    }

    pub fn pause_secs(&self) -> u32 {
        self.pause_secs
    }

    pub fn delay_start_secs(&self) -> u32 {
        self.delay_start_secs
    }

    pub fn warning_secs(&self) -> u32 {
        self.warning_secs
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn with_work_secs(mut self, secs: u32) -> Self {
        self.work_secs = secs.max(MIN_WORK_SECS);
        self
    }

    /// Seconds a complete run takes from `start()` to `Complete`.
    pub fn total_secs(&self) -> u64 {
        let per_cycle =
            u64::from(self.delay_start_secs) + u64::from(self.work_secs) + u64::from(self.pause_secs);
        per_cycle.saturating_mul(u64::from(self.cycles))
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            work_secs: 30,
            pause_secs: 15,
            delay_start_secs: 5,
            warning_secs: 3,
            cycles: 3,
        }
    }
}

/// Unvalidated wire/file form of [`IntervalConfig`].
///
/// Missing fields take the default; negative or out-of-range values clamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIntervalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_start_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<i64>,
}

impl From<RawIntervalConfig> for IntervalConfig {
    fn from(raw: RawIntervalConfig) -> Self {
        let defaults = IntervalConfig::default();
        Self {
            work_secs: clamp_int(raw.work_secs, defaults.work_secs, MIN_WORK_SECS),
            pause_secs: clamp_int(raw.pause_secs, defaults.pause_secs, MIN_PAUSE_SECS),
            delay_start_secs: clamp_int(
                raw.delay_start_secs,
                defaults.delay_start_secs,
                MIN_DELAY_START_SECS,
            ),
            warning_secs: clamp_int(raw.warning_secs, defaults.warning_secs, MIN_WARNING_SECS),
            cycles: clamp_int(raw.cycles, defaults.cycles, MIN_CYCLES),
        }
    }
}

impl From<IntervalConfig> for RawIntervalConfig {
    fn from(config: IntervalConfig) -> Self {
        Self {
            work_secs: Some(config.work_secs.into()),
            pause_secs: Some(config.pause_secs.into()),
            delay_start_secs: Some(config.delay_start_secs.into()),
            warning_secs: Some(config.warning_secs.into()),
            cycles: Some(config.cycles.into()),
        }
    }
}

/// Quick-pick values offered next to each settings field.
#[derive(Debug, Clone, Serialize)]
pub struct Presets {
    pub work_secs: &'static [u32],
    pub pause_secs: &'static [u32],
    pub delay_start_secs: &'static [u32],
    pub cycles: &'static [u32],
}

pub const PRESETS: Presets = Presets {
    work_secs: &[15, 30, 60],
    pause_secs: &[15, 30, 60],
    delay_start_secs: &[0, 5, 10],
    cycles: &[3, 5, 8, 10],
};

fn clamp_int(value: Option<i64>, default: u32, min: u32) -> u32 {
    match value {
        Some(v) => u32::try_from(v.max(i64::from(min))).unwrap_or(u32::MAX),
        None => default,
    }
}

fn clamp_text(input: &str, min: u32) -> u32 {
    match leading_int(input) {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX).max(min),
        _ => min,
    }
}

/// Parse an optional sign followed by leading digits, ignoring any trailing
/// text ("12s" -> 12, "3.7" -> 3). Returns `None` when no digits lead.
fn leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_workout() {
        let c = IntervalConfig::default();
        assert_eq!(c.work_secs(), 30);
        assert_eq!(c.pause_secs(), 15);
        assert_eq!(c.delay_start_secs(), 5);
        assert_eq!(c.warning_secs(), 3);
        assert_eq!(c.cycles(), 3);
    }

    #[test]
    fn new_clamps_to_minimums() {
        let c = IntervalConfig::new(0, 0, 0, 0, 0);
        assert_eq!(c.work_secs(), 1);
        assert_eq!(c.pause_secs(), 1);
        assert_eq!(c.delay_start_secs(), 0);
        assert_eq!(c.warning_secs(), 1);
        assert_eq!(c.cycles(), 1);
    }

    #[test]
    fn text_input_takes_leading_digits() {
        let c = IntervalConfig::from_text("45s", " 20", "3.9", "2", "+4");
        assert_eq!(c, IntervalConfig::new(45, 20, 3, 2, 4));
    }

    #[test]
    fn text_input_falls_back_to_minimum() {
        let c = IntervalConfig::from_text("abc", "", "-5", "0", "-1");
        assert_eq!(c, IntervalConfig::new(1, 1, 0, 1, 1));
    }

    #[test]
    fn raw_missing_fields_use_defaults() {
        let raw = RawIntervalConfig {
            work_secs: Some(60),
            ..Default::default()
        };
        let c = IntervalConfig::from(raw);
        assert_eq!(c.work_secs(), 60);
        assert_eq!(c.pause_secs(), 15);
    }

    #[test]
    fn raw_negative_values_clamp() {
        let c: IntervalConfig =
            serde_json::from_str(r#"{"work_secs": -3, "delay_start_secs": -1, "cycles": 0}"#)
                .unwrap();
        assert_eq!(c.work_secs(), 1);
        assert_eq!(c.delay_start_secs(), 0);
        assert_eq!(c.cycles(), 1);
    }

    #[test]
    fn total_secs_of_two_cycle_example() {
        let c = IntervalConfig::new(30, 15, 5, 3, 2);
        assert_eq!(c.total_secs(), 100);
    }
}
