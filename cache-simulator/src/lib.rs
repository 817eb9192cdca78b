// Cache Simulator Library

pub mod cli;
pub mod generator;
pub mod input;
pub mod models;
pub mod runner;
pub mod stats;
