pub mod annotation;
pub mod video;
