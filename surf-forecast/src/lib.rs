pub mod browser;
#[cfg(feature = "chrome")]
pub mod chrome;
pub mod config;
pub mod date_range;
pub mod error;
pub mod extractor;
pub mod navigator;
pub mod observation;
pub mod retry;
pub mod selectors;
pub mod session;

#[cfg(test)]
mod fake;
