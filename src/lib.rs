pub mod config;
pub mod controller;
pub mod gateway;
pub mod router;
pub mod storage;
pub mod theme;
pub mod transcript;
pub mod types;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
