//! Orchestration layer for the scenario derivation core: configuration,
//! the optional LLM enhancement pass, and record assembly.

pub mod assembler;
pub mod client;
pub mod config;
pub mod enhancer;
pub mod formatter;

pub use assembler::ScenarioAssembler;
pub use client::HttpCompletionClient;
pub use config::{ConfigLoader, EngineConfig, EnhancementConfig};
pub use enhancer::{CompletionClient, CompletionError, LlmEnhancer};
pub use scenarist_core::protocol;
pub use scenarist_core::run_pipeline;
