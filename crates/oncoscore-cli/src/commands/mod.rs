pub mod config;
pub mod diagnose;
pub mod evaluate;
pub mod tree;
