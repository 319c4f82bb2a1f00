pub mod catalog;
pub mod tryon;
pub mod vision;
