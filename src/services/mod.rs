// src/services/mod.rs
//
// Shared services used across domain modules

pub mod correction;

// Re-export commonly used types for convenience
pub use correction::{Correction, CorrectionConfig, Corrector, OpenAICorrector};
