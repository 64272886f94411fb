//! Trip records consumed by the matcher and the service-map builder.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Monday to Friday.
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Saturday and Sunday.
pub const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

/// Where a trip record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripSource {
    /// Static timetable data.
    Schedule,
    /// Live vehicle data.
    Realtime,
}

/// Days of the week a trip runs on, one flag per day.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDays {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl ServiceDays {
    /// Runs every day of the week.
    #[must_use]
    pub const fn every_day() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }

    /// Runs exactly on `days`.
    #[must_use]
    pub fn only(days: &[Weekday]) -> Self {
        days.iter().fold(Self::default(), |acc, day| acc.with(*day))
    }

    /// Copy with `day` switched on.
    #[must_use]
    pub const fn with(mut self, day: Weekday) -> Self {
        *self.flag_mut(day) = true;
        self
    }

    /// Whether the trip runs on `day`.
    #[must_use]
    pub const fn runs_on(self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Whether the trip runs on at least one of `days`.
    #[must_use]
    pub fn runs_on_any(self, days: &[Weekday]) -> bool {
        days.iter().any(|day| self.runs_on(*day))
    }

    const fn flag_mut(&mut self, day: Weekday) -> &mut bool {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

/// One trip of a route.
///
/// Times are seconds after midnight of the service day and may exceed one
/// day for trips running past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub route_id: String,
    /// `Some(true)` marks the inbound direction; those trips are reversed
    /// before stitching.
    #[serde(default)]
    pub direction_id: Option<bool>,
    #[serde(default)]
    pub days: ServiceDays,
    #[serde(default)]
    pub start_time: Option<u32>,
    #[serde(default)]
    pub end_time: Option<u32>,
    pub stop_ids: Vec<String>,
}

impl Trip {
    /// Stop ids facing the route's canonical direction.
    #[must_use]
    pub fn oriented_stops(&self) -> Vec<&str> {
        let mut stops: Vec<&str> = self.stop_ids.iter().map(String::as_str).collect();
        if self.direction_id == Some(true) {
            stops.reverse();
        }
        stops
    }
}
