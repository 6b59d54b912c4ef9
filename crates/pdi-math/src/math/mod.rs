//! Core math modules.

pub mod gamma;
pub mod moments;
pub mod stable;
