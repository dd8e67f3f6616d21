#[path = "../common/mod.rs"]
mod common;

#[cfg(feature = "calamine")]
mod dates;
