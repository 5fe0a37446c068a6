// Library exports for the physio-coach CLI
// This allows testing of internal modules

pub mod api;
pub mod camera;
pub mod commands;
pub mod config;
pub mod runner;
pub mod ui;
