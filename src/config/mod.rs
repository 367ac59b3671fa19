pub mod jwt;
pub mod match_center;
pub mod redis;
pub mod settings;
