//! Plain-text listing of every value the form accepts.
use std::fmt::Write;

use flightdelay_classifiers::{Carrier, DepartureTimeBlock};

pub fn render_choices(years: &[i32]) -> String {
    let mut out = String::new();
    let years: Vec<String> = years.iter().map(|y| y.to_string()).collect();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Year: {}", years.join(", "));
    let _ = writeln!(out, "Month: 1-12 (1 = January, 12 = December)");
    let _ = writeln!(out, "Day: 1-31 (must exist in the chosen month and year)");
    let _ = writeln!(out, "Departure Time Block:");
    for block in DepartureTimeBlock::ALL {
        let _ = writeln!(out, "  {:<16} {}", block.label(), block.hours());
    }
    let _ = writeln!(out, "Carrier:");
    for carrier in Carrier::ALL {
        let _ = writeln!(out, "  {}", carrier.label());
    }
    out
}
