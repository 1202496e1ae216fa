//! Domain logic

pub mod listings;
