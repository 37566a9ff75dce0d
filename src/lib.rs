pub mod config;
pub mod console;
pub mod excel;
pub mod gradebook;
pub mod logging;
pub mod portal;
pub mod steps;
pub mod workflow;
