//! External collaborators: trait contracts and their HTTP clients

/// Collaborator traits and fixed implementations
pub mod collaborators;
/// Shared blocking HTTP helpers
pub mod http;
/// Hugging Face captioning and detection
pub mod huggingface;
/// OpenAI image editing and chat completion
pub mod openai;
