pub mod attacks;
pub mod generation;
