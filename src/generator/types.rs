//! Generation request and response types

/// A single generation request
///
/// Stateless: every request carries its full prompt pair, no conversation
/// state is kept between calls.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System prompt encoding the section-marker contract
    pub system_prompt: String,

    /// The user's website instruction, wrapped in the request template
    pub user_prompt: String,

    /// Maximum tokens for the response
    pub max_tokens: u32,
}

/// Raw text returned by the generator for one request
///
/// No guaranteed structure; the section parser decides what it means.
/// Discarded after parsing.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// The opaque response text
    pub text: String,

    /// Token accounting as reported by the provider
    pub usage: TokenUsage,
}

/// Token usage for one generation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
