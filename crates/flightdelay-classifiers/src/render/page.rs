use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::models::{DelayLabel, Prediction};
use crate::query::{Carrier, DepartureTimeBlock, FlightQuery};
use crate::render::message;

const STYLE: &str = "
body { background-color: #f0f4f8; color: #333; font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; }
.header { background: #007BFF; color: white; padding: 15px; text-align: center; border-radius: 10px; }
.description { text-align: center; font-size: 1.1em; margin: 20px 0; }
.container { margin: 20px auto; max-width: 720px; }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 10px 20px; }
.fields label { display: flex; flex-direction: column; font-weight: bold; }
.result { font-size: 18px; font-weight: bold; padding: 10px; border-radius: 5px; border: 2px solid; text-align: center; }
.positive-result { background-color: #d4edda; border-color: #c3e6cb; color: #155724; }
.negative-result { background-color: #f8d7da; border-color: #f5c6cb; color: #721c24; }
.error { background-color: #fff3cd; border: 1px solid #ffe69c; color: #664d03; padding: 10px; border-radius: 5px; margin: 10px 0; }
.legend { padding: 15px; background: #e9ecef; border-radius: 10px; border: 1px solid #ced4da; margin-top: 20px; }
footer { text-align: center; margin-top: 20px; font-size: 0.8em; color: #888888; }
@media (max-width: 768px) { .fields { grid-template-columns: 1fr; } }
";

/// Raw form fields as submitted. Kept as strings so the page can re-select
/// whatever the user picked, valid or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub year: String,
    pub month: String,
    pub day: String,
    pub dep_time_block: String,
    pub carrier: String,
}

impl FormState {
    pub fn to_query(&self) -> Result<FlightQuery, PredictionError> {
        FlightQuery::parse(
            &self.year,
            &self.month,
            &self.day,
            &self.dep_time_block,
            &self.carrier,
        )
    }
}

impl From<&FlightQuery> for FormState {
    fn from(q: &FlightQuery) -> Self {
        Self {
            year: q.year().to_string(),
            month: q.month().to_string(),
            day: q.day().to_string(),
            dep_time_block: q.departure_time_block().label().to_string(),
            carrier: q.carrier().label().to_string(),
        }
    }
}

/// Everything the form page shows.
pub struct FormPage<'a> {
    pub years: &'a [i32],
    pub state: Option<&'a FormState>,
    pub outcome: Option<&'a Result<Prediction, PredictionError>>,
    pub load_errors: &'a [PredictionError],
}

fn select(name: &str, label: &str, help: &str, choices: &[String], current: Option<&str>) -> Markup {
    html! {
        label title=(help) {
            (label)
            select name=(name) {
                @for choice in choices {
                    option value=(choice) selected[current == Some(choice.as_str())] { (choice) }
                }
            }
        }
    }
}

/// Result region: the styled message, or the error that stopped the submission.
pub fn render_outcome(outcome: &Result<Prediction, PredictionError>) -> Markup {
    html! {
        @match outcome {
            Ok(prediction) => {
                @let class = match prediction.label {
                    DelayLabel::Delayed => "result negative-result",
                    DelayLabel::NotDelayed => "result positive-result",
                };
                p class=(class) data-label=(prediction.label.as_u8()) { (message(prediction.label)) }
                @if let Some(probability) = prediction.probability {
                    p.description { "Estimated probability of delay: " (format!("{:.1}%", probability * 100.0)) }
                }
            }
            Err(e) => {
                div.error role="alert" { (e.to_string()) }
            }
        }
    }
}

fn legend() -> Markup {
    html! {
        div.legend {
            h3 { "Departure Time Block Legend" }
            ul {
                @for block in DepartureTimeBlock::chronological() {
                    li { b { (block.label()) ":" } " " (block.hours()) }
                }
            }
        }
    }
}

/// Full HTML page: load errors, the five-field form, result region, legend.
pub fn render_page(page: &FormPage<'_>) -> Markup {
    let years: Vec<String> = page.years.iter().map(|y| y.to_string()).collect();
    let months: Vec<String> = (1..=12).map(|m: u32| m.to_string()).collect();
    let days: Vec<String> = (1..=31).map(|d: u32| d.to_string()).collect();
    let blocks: Vec<String> = DepartureTimeBlock::ALL
        .iter()
        .map(|b| b.label().to_string())
        .collect();
    let carriers: Vec<String> = Carrier::ALL.iter().map(|c| c.label().to_string()).collect();
    let current = |f: fn(&FormState) -> &str| page.state.map(f);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Flight Delay Prediction" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div.header { h1 { "Flight Delay Prediction" } }
                div.container {
                    @for err in page.load_errors {
                        div.error role="alert" { (err.to_string()) }
                    }
                    p.description {
                        "Enter flight details to predict if it will be delayed upon arrival by 15 minutes or more."
                    }
                    form method="post" action="/predict" {
                        div.fields {
                            (select("year", "Year", "Select the year in which the flight is scheduled to take place.", &years, current(|s| s.year.as_str())))
                            (select("dep_time_block", "Departure Time Block", "Select the time block when the flight is scheduled to depart.", &blocks, current(|s| s.dep_time_block.as_str())))
                            (select("month", "Month", "Choose a number from 1 (January) to 12 (December).", &months, current(|s| s.month.as_str())))
                            (select("carrier", "Carrier", "Select the airline carrier for the flight.", &carriers, current(|s| s.carrier.as_str())))
                            (select("day", "Day", "Ensure the day is valid for the chosen month and year.", &days, current(|s| s.day.as_str())))
                        }
                        p { button type="submit" { "Predict" } }
                    }
                    @if let Some(outcome) = page.outcome {
                        div #result { (render_outcome(outcome)) }
                    }
                    (legend())
                }
                footer { "Flight delay prediction form" }
            }
        }
    }
}
