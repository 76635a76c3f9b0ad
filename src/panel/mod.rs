pub mod geometry;
pub mod panel;
