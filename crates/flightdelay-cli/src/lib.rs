//! flightdelay-cli: command line and form server around `flightdelay-classifiers`.
pub mod choices;
pub mod config;
pub mod predict;
pub mod serve;
