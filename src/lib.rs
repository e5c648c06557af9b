#![forbid(unsafe_code)]

pub mod age_gate;
pub mod browser;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod detail;
pub mod dimension;
pub mod error;
pub mod export;
pub mod formats;
pub mod listing;
pub mod logging;
pub mod navigator;
pub mod progress;
pub mod session;
pub mod site;
pub mod wait;
