// src/handlers.rs

pub mod import;
