//! Daily forecast aggregation
//!
//! Turns the provider's 3-hourly measurement feed into one summary per day:
//! a morning, midday and night temperature picked at fixed slot hours, plus
//! the mean humidity of those picked samples.

use chrono::{Datelike, Days, NaiveDate, Timelike};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::data::Measurement;

/// Number of forecast days shown by default
pub const DEFAULT_HORIZON_DAYS: usize = 5;

/// Longest accepted horizon; the provider never forecasts further ahead
pub const MAX_HORIZON_DAYS: usize = 16;

/// Default hour of the morning reading
pub const DEFAULT_MORNING_HOUR: u32 = 6;

/// Default hour of the midday reading
pub const DEFAULT_MIDDAY_HOUR: u32 = 12;

/// Default hour of the night reading
pub const DEFAULT_NIGHT_HOUR: u32 = 21;

/// Format of day labels, e.g. "Fri Oct 16 2026"
pub const LABEL_FORMAT: &str = "%a %b %d %Y";

/// Errors raised when configuring the aggregator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForecastError {
    /// The horizon is outside 1..=MAX_HORIZON_DAYS
    #[error("Invalid forecast horizon {0}: expected 1 to {max} days", max = MAX_HORIZON_DAYS)]
    InvalidHorizon(usize),

    /// Slot hours must be distinct hours of the day
    #[error("Invalid slot hours ({morning}, {midday}, {night}): expected three distinct hours in 0-23")]
    InvalidSlotHours { morning: u32, midday: u32, night: u32 },
}

/// The three readings taken for each day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Morning,
    Midday,
    Night,
}

/// Hours of the day whose samples represent the morning, midday and night readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotHours {
    morning: u32,
    midday: u32,
    night: u32,
}

impl SlotHours {
    /// Creates a validated set of slot hours
    ///
    /// # Returns
    /// * `Ok(SlotHours)` if all hours are in 0-23 and distinct
    /// * `Err(ForecastError::InvalidSlotHours)` otherwise
    pub fn new(morning: u32, midday: u32, night: u32) -> Result<Self, ForecastError> {
        let in_range = morning < 24 && midday < 24 && night < 24;
        let distinct = morning != midday && midday != night && morning != night;

        if !in_range || !distinct {
            return Err(ForecastError::InvalidSlotHours {
                morning,
                midday,
                night,
            });
        }

        Ok(Self {
            morning,
            midday,
            night,
        })
    }

    pub fn morning(&self) -> u32 {
        self.morning
    }

    pub fn midday(&self) -> u32 {
        self.midday
    }

    pub fn night(&self) -> u32 {
        self.night
    }

    /// Returns the slot a sample taken at `hour` stands for, if any
    pub fn slot_for(&self, hour: u32) -> Option<Slot> {
        if hour == self.morning {
            Some(Slot::Morning)
        } else if hour == self.midday {
            Some(Slot::Midday)
        } else if hour == self.night {
            Some(Slot::Night)
        } else {
            None
        }
    }
}

impl Default for SlotHours {
    fn default() -> Self {
        Self {
            morning: DEFAULT_MORNING_HOUR,
            midday: DEFAULT_MIDDAY_HOUR,
            night: DEFAULT_NIGHT_HOUR,
        }
    }
}

/// Temperatures picked for a day; a field is `None` when no sample hit its slot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayTemperature {
    pub morning: Option<f64>,
    pub midday: Option<f64>,
    pub night: Option<f64>,
}

impl DayTemperature {
    /// Stores a reading, overwriting any earlier one for the same slot
    pub fn set(&mut self, slot: Slot, temperature: f64) {
        match slot {
            Slot::Morning => self.morning = Some(temperature),
            Slot::Midday => self.midday = Some(temperature),
            Slot::Night => self.night = Some(temperature),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_none() && self.midday.is_none() && self.night.is_none()
    }
}

/// Aggregated forecast for a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// Human-readable date, e.g. "Fri Oct 16 2026"
    pub label: String,
    /// Calendar date the label was formatted from
    pub date: NaiveDate,
    /// Morning, midday and night temperatures in Celsius
    pub temperature: DayTemperature,
    /// Mean humidity of the slot samples, rounded; `None` when there were none
    pub humidity: Option<u8>,
}

/// Ordered per-day summaries, day-offset 0 first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastResult {
    pub days: Vec<DaySummary>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DaySummary> {
        self.days.iter()
    }
}

impl<'a> IntoIterator for &'a ForecastResult {
    type Item = &'a DaySummary;
    type IntoIter = std::slice::Iter<'a, DaySummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

/// Aggregator configured with a horizon and slot hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastAggregator {
    horizon_days: usize,
    slots: SlotHours,
}

impl Default for ForecastAggregator {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            slots: SlotHours::default(),
        }
    }
}

impl ForecastAggregator {
    /// Creates an aggregator
    ///
    /// # Returns
    /// * `Err(ForecastError::InvalidHorizon)` if `horizon_days` is zero or
    ///   above [`MAX_HORIZON_DAYS`]
    pub fn new(horizon_days: usize, slots: SlotHours) -> Result<Self, ForecastError> {
        if !(1..=MAX_HORIZON_DAYS).contains(&horizon_days) {
            return Err(ForecastError::InvalidHorizon(horizon_days));
        }
        Ok(Self {
            horizon_days,
            slots,
        })
    }

    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    pub fn slots(&self) -> SlotHours {
        self.slots
    }

    /// Aggregates a feed; see [`aggregate`]
    pub fn aggregate(&self, feed: &[Measurement], today: NaiveDate) -> ForecastResult {
        aggregate(feed, self.horizon_days, self.slots, today)
    }
}

/// Aggregates a chronologically ordered feed into one summary per day.
///
/// Buckets are anchored to the day-of-month of the first measurement, while
/// labels are anchored to `today`. A non-empty feed always yields exactly
/// `horizon_days` summaries; an empty feed yields none. Horizons above
/// [`MAX_HORIZON_DAYS`] are clamped to it.
///
/// Bucketing subtracts days of the month, so a feed crossing into a new month
/// puts the next month's samples at negative offsets and drops them. That
/// case is logged as a warning but not corrected.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use checkurweather::data::Measurement;
/// use checkurweather::forecast::{aggregate, SlotHours};
///
/// let feed = vec![Measurement::parse("2024-07-15 12:00:00", 20.0, 40.0).unwrap()];
/// let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
///
/// let result = aggregate(&feed, 5, SlotHours::default(), today);
/// assert_eq!(result.len(), 5);
/// assert_eq!(result.days[0].temperature.midday, Some(20.0));
/// assert_eq!(result.days[0].humidity, Some(40));
/// ```
pub fn aggregate(
    feed: &[Measurement],
    horizon_days: usize,
    slots: SlotHours,
    today: NaiveDate,
) -> ForecastResult {
    let Some(first) = feed.first() else {
        return ForecastResult::default();
    };

    if spans_month_boundary(feed) {
        warn!(
            "Forecast feed crosses a month boundary ({} to {}); days after the boundary are not bucketed",
            first.timestamp,
            feed.last().map(|m| m.timestamp).unwrap_or(first.timestamp)
        );
    }

    if horizon_days > MAX_HORIZON_DAYS {
        warn!(
            "Clamping forecast horizon of {} days to {}",
            horizon_days, MAX_HORIZON_DAYS
        );
    }
    let horizon_days = horizon_days.min(MAX_HORIZON_DAYS);

    let anchor_day = first.timestamp.day();
    let mut buckets: Vec<Vec<&Measurement>> = vec![Vec::new(); horizon_days];

    for measurement in feed {
        let offset = i64::from(measurement.timestamp.day()) - i64::from(anchor_day);
        let bucket = usize::try_from(offset)
            .ok()
            .and_then(|index| buckets.get_mut(index));

        match bucket {
            Some(bucket) => bucket.push(measurement),
            None => debug!(
                "Dropping measurement at {} (day offset {})",
                measurement.timestamp, offset
            ),
        }
    }

    let days = buckets
        .iter()
        .enumerate()
        .map(|(offset, bucket)| summarize_day(bucket, day_date(today, offset), slots))
        .collect();

    ForecastResult { days }
}

/// Builds the summary of one bucket
fn summarize_day(bucket: &[&Measurement], date: NaiveDate, slots: SlotHours) -> DaySummary {
    let mut temperature = DayTemperature::default();
    let mut humidity_values = Vec::with_capacity(3);

    for measurement in bucket {
        if let Some(slot) = slots.slot_for(measurement.timestamp.hour()) {
            temperature.set(slot, measurement.temperature);
            humidity_values.push(measurement.humidity);
        }
    }

    DaySummary {
        label: date.format(LABEL_FORMAT).to_string(),
        date,
        temperature,
        humidity: mean_humidity(&humidity_values),
    }
}

/// Mean of the values rounded half up, or `None` for no values
fn mean_humidity(values: &[f64]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(mean.round() as u8)
}

/// Calendar date of the label for a day offset
fn day_date(today: NaiveDate, offset: usize) -> NaiveDate {
    today
        .checked_add_days(Days::new(offset as u64))
        .unwrap_or(NaiveDate::MAX)
}

fn spans_month_boundary(feed: &[Measurement]) -> bool {
    match (feed.first(), feed.last()) {
        (Some(first), Some(last)) => {
            first.timestamp.year() != last.timestamp.year()
                || first.timestamp.month() != last.timestamp.month()
        }
        _ => false,
    }
}
