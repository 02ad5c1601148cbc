// src/models.rs

pub mod auth;
pub mod crm;
pub mod finance;
pub mod import;
pub mod stock;
pub mod supplier;
