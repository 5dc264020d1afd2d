pub mod application;
pub mod commands;
pub mod domain;
pub mod generator;
pub mod infra;
