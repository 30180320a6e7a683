pub mod extract;
pub mod geometry;
pub mod mapping;
pub mod resample;
pub mod selection;
pub mod stroke;
