//! ez - a CLI assistant over OpenAI-compatible chat models.
pub mod commands;
pub mod log;
pub mod ux;
