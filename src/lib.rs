//! Stepwise - statistical tables for coded user-study sessions
//!
//! Aggregates the coded transcripts and per-task measurements of a two-arm
//! user study: step transition matrices, time spent per step, iteration
//! efficiency, and inter-rater reliability (Cohen's Kappa) of the coding.

pub mod agreement;
pub mod cli;
pub mod config;
pub mod csv_input;
pub mod csv_output;
pub mod error;
pub mod format;
pub mod iteration;
pub mod json_output;
pub mod record;
pub mod step_duration;
pub mod steps;
pub mod study;
pub mod table;
pub mod task_table;
pub mod text_output;
pub mod time_value;
pub mod transition;
