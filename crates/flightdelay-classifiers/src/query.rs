//! The flight query a user submits and its fixed-choice fields.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::validate_day;
use crate::error::PredictionError;

/// Years offered by the form unless the configuration says otherwise.
pub const DEFAULT_YEARS: [i32; 2] = [2024, 2025];

/// Lower-case a choice and fold `-`/`_` into spaces so CLI slugs such as
/// `early-morning` or `skywest_airlines_inc` match the display names.
fn normalize_choice(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .replace('.', "")
}

/// Scheduled departure interval. Variant order matches the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartureTimeBlock {
    #[serde(rename = "Night")]
    Night,
    #[serde(rename = "Early Morning")]
    EarlyMorning,
    #[serde(rename = "Evening")]
    Evening,
    #[serde(rename = "Morning")]
    Morning,
    #[serde(rename = "Afternoon")]
    Afternoon,
    #[serde(rename = "Early Afternoon")]
    EarlyAfternoon,
}

impl DepartureTimeBlock {
    pub const ALL: [DepartureTimeBlock; 6] = [
        DepartureTimeBlock::Night,
        DepartureTimeBlock::EarlyMorning,
        DepartureTimeBlock::Evening,
        DepartureTimeBlock::Morning,
        DepartureTimeBlock::Afternoon,
        DepartureTimeBlock::EarlyAfternoon,
    ];

    /// Display name, also the category value the encoder was fitted on.
    pub fn label(&self) -> &'static str {
        match self {
            DepartureTimeBlock::Night => "Night",
            DepartureTimeBlock::EarlyMorning => "Early Morning",
            DepartureTimeBlock::Evening => "Evening",
            DepartureTimeBlock::Morning => "Morning",
            DepartureTimeBlock::Afternoon => "Afternoon",
            DepartureTimeBlock::EarlyAfternoon => "Early Afternoon",
        }
    }

    /// Clock interval shown in the legend.
    pub fn hours(&self) -> &'static str {
        match self {
            DepartureTimeBlock::Night => "8:00 PM - 11:59 PM",
            DepartureTimeBlock::EarlyMorning => "12:00 AM - 6:00 AM",
            DepartureTimeBlock::Morning => "6:00 AM - 12:00 PM",
            DepartureTimeBlock::EarlyAfternoon => "12:00 PM - 3:00 PM",
            DepartureTimeBlock::Afternoon => "3:00 PM - 6:00 PM",
            DepartureTimeBlock::Evening => "6:00 PM - 8:00 PM",
        }
    }

    /// Blocks in chronological order, as the legend lists them.
    pub fn chronological() -> [DepartureTimeBlock; 6] {
        [
            DepartureTimeBlock::Night,
            DepartureTimeBlock::EarlyMorning,
            DepartureTimeBlock::Morning,
            DepartureTimeBlock::EarlyAfternoon,
            DepartureTimeBlock::Afternoon,
            DepartureTimeBlock::Evening,
        ]
    }
}

impl fmt::Display for DepartureTimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DepartureTimeBlock {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        DepartureTimeBlock::ALL
            .into_iter()
            .find(|b| normalize_choice(b.label()) == wanted)
            .ok_or_else(|| PredictionError::InvalidChoice {
                field: "departure time block",
                value: s.to_string(),
            })
    }
}

/// Operating carrier. Variant order matches the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    #[serde(rename = "Southwest Airlines Co.")]
    Southwest,
    #[serde(rename = "United Air Lines Inc.")]
    United,
    #[serde(rename = "American Airlines Inc.")]
    American,
    #[serde(rename = "Spirit Air Lines")]
    Spirit,
    #[serde(rename = "SkyWest Airlines Inc.")]
    SkyWest,
    #[serde(rename = "Delta Air Lines Inc.")]
    Delta,
    #[serde(rename = "Endeavor Air Inc.")]
    Endeavor,
    #[serde(rename = "PSA Airlines Inc.")]
    Psa,
    #[serde(rename = "Envoy Air")]
    Envoy,
    #[serde(rename = "Hawaiian Airlines Inc.")]
    Hawaiian,
    #[serde(rename = "Republic Airline")]
    Republic,
    #[serde(rename = "JetBlue Airways")]
    JetBlue,
    #[serde(rename = "Allegiant Air")]
    Allegiant,
    #[serde(rename = "Frontier Airlines Inc.")]
    Frontier,
    #[serde(rename = "Alaska Airlines Inc.")]
    Alaska,
}

impl Carrier {
    pub const ALL: [Carrier; 15] = [
        Carrier::Southwest,
        Carrier::United,
        Carrier::American,
        Carrier::Spirit,
        Carrier::SkyWest,
        Carrier::Delta,
        Carrier::Endeavor,
        Carrier::Psa,
        Carrier::Envoy,
        Carrier::Hawaiian,
        Carrier::Republic,
        Carrier::JetBlue,
        Carrier::Allegiant,
        Carrier::Frontier,
        Carrier::Alaska,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Carrier::Southwest => "Southwest Airlines Co.",
            Carrier::United => "United Air Lines Inc.",
            Carrier::American => "American Airlines Inc.",
            Carrier::Spirit => "Spirit Air Lines",
            Carrier::SkyWest => "SkyWest Airlines Inc.",
            Carrier::Delta => "Delta Air Lines Inc.",
            Carrier::Endeavor => "Endeavor Air Inc.",
            Carrier::Psa => "PSA Airlines Inc.",
            Carrier::Envoy => "Envoy Air",
            Carrier::Hawaiian => "Hawaiian Airlines Inc.",
            Carrier::Republic => "Republic Airline",
            Carrier::JetBlue => "JetBlue Airways",
            Carrier::Allegiant => "Allegiant Air",
            Carrier::Frontier => "Frontier Airlines Inc.",
            Carrier::Alaska => "Alaska Airlines Inc.",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Carrier {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_choice(s);
        Carrier::ALL
            .into_iter()
            .find(|c| normalize_choice(c.label()) == wanted)
            .ok_or_else(|| PredictionError::InvalidChoice {
                field: "carrier",
                value: s.to_string(),
            })
    }
}

/// One validated form submission.
///
/// Fields are private so a `FlightQuery` always holds a day that exists in
/// its month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlightQuery {
    year: i32,
    month: u32,
    day: u32,
    departure_time_block: DepartureTimeBlock,
    carrier: Carrier,
}

impl FlightQuery {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        departure_time_block: DepartureTimeBlock,
        carrier: Carrier,
    ) -> Result<Self, PredictionError> {
        validate_day(year, month, day)?;
        Ok(Self {
            year,
            month,
            day,
            departure_time_block,
            carrier,
        })
    }

    /// Build a query from raw strings as submitted by a form or a CSV row.
    pub fn parse(
        year: &str,
        month: &str,
        day: &str,
        departure_time_block: &str,
        carrier: &str,
    ) -> Result<Self, PredictionError> {
        let year = year.trim().parse::<i32>().map_err(|_| PredictionError::InvalidChoice {
            field: "year",
            value: year.to_string(),
        })?;
        let month = month.trim().parse::<u32>().map_err(|_| PredictionError::InvalidChoice {
            field: "month",
            value: month.to_string(),
        })?;
        let day = day.trim().parse::<u32>().map_err(|_| PredictionError::InvalidChoice {
            field: "day",
            value: day.to_string(),
        })?;
        Self::new(
            year,
            month,
            day,
            departure_time_block.parse()?,
            carrier.parse()?,
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn departure_time_block(&self) -> DepartureTimeBlock {
        self.departure_time_block
    }

    pub fn carrier(&self) -> Carrier {
        self.carrier
    }
}
