//! # Providers
//!
//! Interfaces to the external collaborators: the generation provider (`ai`) and the
//! knowledge-base and lead stores (`db`).

pub mod ai;
pub mod db;
