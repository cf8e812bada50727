//! Named-column feature records handed to a `Preprocessor`.
use crate::query::FlightQuery;

pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const DAY: &str = "Day";
pub const DEP_TIME_BLOCK: &str = "Dep_Time_Block_Group";
pub const CARRIER: &str = "Carrier";

/// Column order of a frame built from flight queries.
pub const QUERY_COLUMNS: [&str; 5] = [YEAR, MONTH, DAY, DEP_TIME_BLOCK, CARRIER];

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// Column-major table of raw features, one row per query.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<(String, Vec<FeatureValue>)>,
    rows: usize,
}

impl FeatureFrame {
    /// Build the five-column frame for a batch of queries.
    pub fn from_queries(queries: &[FlightQuery]) -> Self {
        let mut year = Vec::with_capacity(queries.len());
        let mut month = Vec::with_capacity(queries.len());
        let mut day = Vec::with_capacity(queries.len());
        let mut block = Vec::with_capacity(queries.len());
        let mut carrier = Vec::with_capacity(queries.len());

        for q in queries {
            year.push(FeatureValue::Number(q.year() as f64));
            month.push(FeatureValue::Number(q.month() as f64));
            day.push(FeatureValue::Number(q.day() as f64));
            block.push(FeatureValue::Category(
                q.departure_time_block().label().to_string(),
            ));
            carrier.push(FeatureValue::Category(q.carrier().label().to_string()));
        }

        Self {
            columns: vec![
                (YEAR.to_string(), year),
                (MONTH.to_string(), month),
                (DAY.to_string(), day),
                (DEP_TIME_BLOCK.to_string(), block),
                (CARRIER.to_string(), carrier),
            ],
            rows: queries.len(),
        }
    }

    /// Single-row frame, the shape every form submission uses.
    pub fn from_query(query: &FlightQuery) -> Self {
        Self::from_queries(std::slice::from_ref(query))
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[FeatureValue]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }
}
