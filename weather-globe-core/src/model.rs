use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::conditions::{self, ConditionInfo};

/// WMO weather interpretation code as reported by the forecast service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub u16);

impl WeatherCode {
    pub fn condition(self) -> &'static ConditionInfo {
        conditions::lookup(self)
    }
}

/// First geocoding match for a city query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub country: String,
    /// IANA timezone id, e.g. "Europe/Paris".
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub wind_kph: f64,
    pub code: WeatherCode,
    /// Observation time in the location's local timezone.
    pub observed_at: NaiveDateTime,
}

impl CurrentWeather {
    pub fn local_hour(&self) -> u32 {
        self.observed_at.hour()
    }

    pub fn is_daytime(&self) -> bool {
        is_daytime_hour(self.local_hour())
    }
}

/// Hours strictly between 6 and 20 count as day; 6 and 20 themselves are night.
pub fn is_daytime_hour(hour: u32) -> bool {
    hour > 6 && hour < 20
}
