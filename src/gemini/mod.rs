pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{GenerateContentRequest, GenerateContentResponse, Part};

/// Anything that can answer a `generateContent` call.
///
/// Implemented by [`GeminiClient`] and by canned mocks in tests.
pub trait ContentGenerator {
    async fn generate_content(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;
}
