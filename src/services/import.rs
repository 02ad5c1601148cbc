// src/services/import.rs
//
// Motor de importação/reconciliação de planilhas:
// leitor → normalizador → resolvedor → gravador → relatório.

pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod resolver;
pub mod store;
pub mod template;
pub mod writer;

#[cfg(test)]
pub mod memory_store;

pub use pipeline::ImportEngine;
pub use store::ImportStore;
