//! The simulated HR backend behind the tools.
//!
//! Tools never read the wall clock or draw random numbers themselves; they
//! ask an [`HrDataSource`]. Production wiring uses [`SimulatedSource`] on the
//! system clock, tests pin it with a [`FixedClock`] and fixed draws.

use chrono::{DateTime, FixedOffset, Local, Utc};
use hrdesk_config::SimulationConfig;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Anything that can say what time it is locally.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host clock in the host's time zone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant.
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Local hours during which an employee counts as clocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workday {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Workday {
    /// `start_hour <= hour < end_hour`
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

impl Default for Workday {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 18,
        }
    }
}

/// Values reported for data the simulation does not model.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholders {
    pub employee_name: String,
    pub weekly_hours: f64,
    pub overtime_hours: f64,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            employee_name: "John Doe".into(),
            weekly_hours: 38.5,
            overtime_hours: 2.5,
        }
    }
}

/// Supplier of time, identifiers and random draws for the tools.
pub trait HrDataSource: Send + Sync {
    /// Local wall-clock time.
    fn now(&self) -> DateTime<FixedOffset>;

    /// A fresh `PREFIX-NNNNNN` identifier, never repeated in this process.
    fn next_id(&self, prefix: &str) -> String;

    /// Hours an employee worked on a finished day.
    fn hours_worked(&self) -> u32;

    fn workday(&self) -> Workday;

    fn placeholders(&self) -> &Placeholders;
}

#[derive(Debug, Clone, Copy)]
enum HoursDraw {
    Uniform { min: u32, max: u32 },
    Fixed(u32),
}

/// The default data source: configurable clock, uniform hours draw and
/// millisecond-derived identifiers.
pub struct SimulatedSource {
    clock: Box<dyn Clock>,
    hours: HoursDraw,
    workday: Workday,
    placeholders: Placeholders,
    last_id_millis: AtomicI64,
}

impl SimulatedSource {
    /// System clock, 09-18 workday, 6-9 hours worked.
    pub fn new() -> Self {
        Self {
            clock: Box::new(SystemClock),
            hours: HoursDraw::Uniform { min: 6, max: 9 },
            workday: Workday::default(),
            placeholders: Placeholders::default(),
            last_id_millis: AtomicI64::new(0),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new()
            .with_workday(Workday {
                start_hour: config.workday_start_hour,
                end_hour: config.workday_end_hour,
            })
            .with_hours_range(config.min_hours_worked, config.max_hours_worked)
            .with_placeholders(Placeholders {
                employee_name: config.employee_name.clone(),
                weekly_hours: config.weekly_hours,
                overtime_hours: config.overtime_hours,
            })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Always report `hours` for a finished day.
    pub fn with_fixed_hours(mut self, hours: u32) -> Self {
        self.hours = HoursDraw::Fixed(hours);
        self
    }

    pub fn with_hours_range(mut self, min: u32, max: u32) -> Self {
        self.hours = HoursDraw::Uniform {
            min: min.min(max),
            max: max.max(min),
        };
        self
    }

    pub fn with_workday(mut self, workday: Workday) -> Self {
        self.workday = workday;
        self
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Claim a millisecond stamp strictly greater than every earlier claim.
    fn claim_millis(&self) -> i64 {
        let now = self.clock.now().with_timezone(&Utc).timestamp_millis();
        let mut last = self.last_id_millis.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self.last_id_millis.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HrDataSource for SimulatedSource {
    fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{:06}", self.claim_millis().rem_euclid(1_000_000))
    }

    fn hours_worked(&self) -> u32 {
        match self.hours {
            HoursDraw::Fixed(h) => h,
            HoursDraw::Uniform { min, max } => rand::rng().random_range(min..=max),
        }
    }

    fn workday(&self) -> Workday {
        self.workday
    }

    fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn at(hour: u32) -> FixedClock {
        let offset = FixedOffset::east_opt(0).unwrap();
        FixedClock(offset.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap())
    }

    #[test]
    fn ids_are_unique_on_a_stopped_clock() {
        let source = SimulatedSource::new().with_clock(at(10));
        let ids: HashSet<String> = (0..500).map(|_| source.next_id("EMP")).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn ids_are_prefix_plus_six_digits() {
        let source = SimulatedSource::new();
        let id = source.next_id("CTR");
        let (prefix, digits) = id.split_once('-').unwrap();
        assert_eq!(prefix, "CTR");
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn ids_come_from_the_clock_millis() {
        // 2024-03-04T10:00:00Z = 1709546400000 ms
        let source = SimulatedSource::new().with_clock(at(10));
        assert_eq!(source.next_id("EMP"), "EMP-400000");
        assert_eq!(source.next_id("EMP"), "EMP-400001");
    }

    #[test]
    fn hours_draw_stays_in_range() {
        let source = SimulatedSource::new();
        for _ in 0..200 {
            let h = source.hours_worked();
            assert!((6..=9).contains(&h), "drew {h}");
        }
        assert_eq!(SimulatedSource::new().with_fixed_hours(7).hours_worked(), 7);
    }

    #[test]
    fn workday_bounds() {
        let day = Workday::default();
        assert!(!day.contains(8));
        assert!(day.contains(9));
        assert!(day.contains(17));
        assert!(!day.contains(18));
    }

    #[test]
    fn from_config_applies_simulation_table() {
        let config = SimulationConfig {
            workday_start_hour: 8,
            employee_name: "Jane Roe".into(),
            min_hours_worked: 4,
            max_hours_worked: 4,
            ..SimulationConfig::default()
        };
        let source = SimulatedSource::from_config(&config);
        assert_eq!(source.workday().start_hour, 8);
        assert_eq!(source.placeholders().employee_name, "Jane Roe");
        assert_eq!(source.hours_worked(), 4);
    }
}
