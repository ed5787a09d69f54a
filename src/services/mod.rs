// src/services/mod.rs
pub mod controller;
pub mod render;
pub mod transport;
