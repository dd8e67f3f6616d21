#[path = "../common/mod.rs"]
mod common;

#[cfg(feature = "umya")]
mod round_trip;
