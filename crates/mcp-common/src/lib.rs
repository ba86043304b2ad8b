pub mod duration;
pub mod error;
pub mod redis;
pub mod youtube;
