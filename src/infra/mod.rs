//! Infrastructure layer (adapters/implementations).
//!
//! This module contains the IO-facing pieces: snapshot storage, the system
//! clipboard and the config file.

pub mod app_config;
pub mod clipboard;
pub mod storage;
