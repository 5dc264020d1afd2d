//! Application layer (use-cases, policies).
//!
//! Binds the tab domain to storage and drives document generation, without
//! depending on any particular front end.

pub mod editor;
pub mod tabs;
