//! Generator trait definition

use async_trait::async_trait;

use super::{GenerationRequest, GeneratorError, RawResponse};

/// Stateless content generator - each call is independent
///
/// This is the seam between the pipeline and whatever completion service
/// backs it. Each request carries its full prompt; no conversation state
/// is maintained between iterations.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send a single generation request (blocking until complete)
    async fn complete(&self, request: GenerationRequest) -> Result<RawResponse, GeneratorError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock generator for unit tests: replays queued results in order
    ///
    /// Queue entries may be errors, so failure paths like rate limiting
    /// can be scripted; an exhausted queue yields `InvalidResponse`.
    pub struct MockGenerator {
        results: Mutex<VecDeque<Result<RawResponse, GeneratorError>>>,
        call_count: AtomicUsize,
    }

    impl MockGenerator {
        pub fn new(results: Vec<Result<RawResponse, GeneratorError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Convenience constructor from plain response texts
        pub fn with_texts(texts: &[&str]) -> Self {
            Self::new(
                texts
                    .iter()
                    .map(|t| {
                        Ok(RawResponse {
                            text: t.to_string(),
                            usage: Default::default(),
                        })
                    })
                    .collect(),
            )
        }

        /// A generator whose every call fails, for failure-path tests
        pub fn failing() -> Self {
            Self::new(vec![])
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Generator for MockGenerator {
        async fn complete(&self, _request: GenerationRequest) -> Result<RawResponse, GeneratorError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockGenerator::complete: called");
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GeneratorError::InvalidResponse("no more mock responses".to_string())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_replays_responses_in_order() {
            let client = MockGenerator::with_texts(&["first", "second"]);

            let req = GenerationRequest {
                system_prompt: "test".to_string(),
                user_prompt: "go".to_string(),
                max_tokens: 100,
            };

            assert_eq!(client.complete(req.clone()).await.unwrap().text, "first");
            assert_eq!(client.complete(req.clone()).await.unwrap().text, "second");
            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_replays_queued_errors() {
            let client = MockGenerator::new(vec![Err(GeneratorError::Api {
                status: 500,
                message: "boom".to_string(),
            })]);

            let req = GenerationRequest {
                system_prompt: "test".to_string(),
                user_prompt: "go".to_string(),
                max_tokens: 100,
            };

            match client.complete(req).await {
                Err(GeneratorError::Api { status, .. }) => assert_eq!(status, 500),
                other => panic!("expected the queued API error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_mock_errors_when_exhausted() {
            let client = MockGenerator::failing();

            let req = GenerationRequest {
                system_prompt: "test".to_string(),
                user_prompt: "go".to_string(),
                max_tokens: 100,
            };

            assert!(client.complete(req).await.is_err());
        }
    }
}
