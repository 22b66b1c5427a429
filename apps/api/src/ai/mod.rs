// AI operations: text generation, image generation and editing, resume review.
// Every operation is quota-gated, makes one vendor round trip and appends one creation.

pub mod handlers;
pub mod prompts;
pub mod service;
pub mod upload;
