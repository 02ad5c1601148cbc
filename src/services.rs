// src/services.rs

pub mod auth;
pub mod import;
