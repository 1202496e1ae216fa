//! Data access layer

pub mod upstream;
