//! Colors and semantic styles shared by all widgets

pub mod palette;
pub mod styles;
