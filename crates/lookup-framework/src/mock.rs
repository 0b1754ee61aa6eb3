//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out a real `CacheClient<T>` whose requests are answered
//! from a queue of expectations instead of a running `CacheActor`. It lets you test logic
//! *around* a cache client (name resolution, row patching) deterministically, including
//! failure paths that are awkward to provoke with a real remote source.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (spawns fetch tasks) |
//! | **Determinism** | 100% Deterministic | Fetch completion order varies |
//! | **State** | No real state (expectations) | Real append-only cache |
//! | **Use Case** | Unit testing code that calls the client | Testing caching, coalescing, degradation |
//! | **Error Injection** | Easy (`return_err`) | Needs a failing context |
//!
//! ## Pattern 0: Fluent Expectations
//!
//! ```rust
//! use lookup_framework::mock::MockClient;
//! use lookup_framework::{LookupEntity, Resolved, Source};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Name(String);
//! #[derive(Debug, thiserror::Error)] #[error("Name error")] struct NameError;
//!
//! #[async_trait]
//! impl LookupEntity for Name {
//!     type Key = String; type Context = (); type Error = NameError;
//!     async fn fetch(_: &String, _: &()) -> Result<Self, Self::Error> { Err(NameError) }
//!     fn placeholder(key: &String) -> Self { Name(key.clone()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Name>::new();
//!     mock.expect_resolve("C1".to_string())
//!         .return_ok(Resolved::new(Name("Acme".into()), Source::Remote));
//!
//!     let client = mock.client();
//!     let resolved = client.resolve("C1".to_string()).await.unwrap();
//!     assert_eq!(resolved.value, Name("Acme".into()));
//!     mock.verify();
//! }
//! ```
//!
//! ## Pattern 1: Manual Channel Inspection
//!
//! Use [`create_mock_client`] to get a client and the raw receiver, then answer each
//! request yourself with [`expect_resolve`] / [`expect_peek`]. This is useful when the test
//! needs to control *when* a response arrives.
//!
//! ## Testing Failure Scenarios
//!
//! ```rust
//! use lookup_framework::mock::MockClient;
//! use lookup_framework::{FrameworkError, LookupEntity};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Name(String);
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct NameError;
//!
//! #[async_trait]
//! impl LookupEntity for Name {
//!     type Key = u32; type Context = (); type Error = NameError;
//!     async fn fetch(_: &u32, _: &()) -> Result<Self, Self::Error> { Err(NameError) }
//!     fn placeholder(key: &u32) -> Self { Name(key.to_string()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Name>::new();
//!     let client = mock.client();
//!
//!     // Simulate the actor going away mid-session
//!     mock.expect_resolve(1).return_err(FrameworkError::ActorClosed);
//!
//!     let result = client.resolve(1).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//! }
//! ```

use crate::client::CacheClient;
use crate::entity::LookupEntity;
use crate::error::FrameworkError;
use crate::message::{CacheRequest, Resolved, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request to the mock client and the response to give it.
enum Expectation<T: LookupEntity> {
    Peek {
        key: T::Key,
        response: Result<Option<T>, FrameworkError>,
    },
    Resolve {
        key: T::Key,
        response: Result<Resolved<T>, FrameworkError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request whose kind or key does not match the
/// next expectation is answered with [`FrameworkError::Unexpected`] and recorded, so
/// [`verify`](MockClient::verify) fails afterwards.
pub struct MockClient<T: LookupEntity> {
    client: CacheClient<T>,
    expectations: Expectations<T>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: LookupEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LookupEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CacheRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let mismatches_clone = mismatches.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        CacheRequest::Peek { key, respond_to },
                        Some(Expectation::Peek {
                            key: expected,
                            response,
                        }),
                    ) if key == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CacheRequest::Resolve { key, respond_to },
                        Some(Expectation::Resolve {
                            key: expected,
                            response,
                        }),
                    ) if key == expected => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        let description = format!("{request:?}");
                        mismatches_clone.lock().unwrap().push(description.clone());
                        reject(request, description);
                    }
                }
            }
        });

        Self {
            client: CacheClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> CacheClient<T> {
        self.client.clone()
    }

    /// Expects a `peek` operation.
    pub fn expect_peek(&mut self, key: T::Key) -> PeekExpectationBuilder<T> {
        PeekExpectationBuilder {
            key,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `resolve` operation.
    pub fn expect_resolve(&mut self, key: T::Key) -> ResolveExpectationBuilder<T> {
        ResolveExpectationBuilder {
            key,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met and no unexpected request arrived.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", *mismatches);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

fn reject<T: LookupEntity>(request: CacheRequest<T>, description: String) {
    fn fail<V>(respond_to: Response<V>, description: String) {
        let _ = respond_to.send(Err(FrameworkError::Unexpected(description)));
    }
    match request {
        CacheRequest::Peek { respond_to, .. } => fail(respond_to, description),
        CacheRequest::Resolve { respond_to, .. } => fail(respond_to, description),
        CacheRequest::Insert { respond_to, .. } => fail(respond_to, description),
        CacheRequest::Len { respond_to } => fail(respond_to, description),
    }
}

/// Builder for `peek` expectations.
pub struct PeekExpectationBuilder<T: LookupEntity> {
    key: T::Key,
    expectations: Expectations<T>,
}

impl<T: LookupEntity> PeekExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: Option<T>) {
        self.expectations.lock().unwrap().push_back(Expectation::Peek {
            key: self.key,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations.lock().unwrap().push_back(Expectation::Peek {
            key: self.key,
            response: Err(error),
        });
    }
}

/// Builder for `resolve` expectations.
pub struct ResolveExpectationBuilder<T: LookupEntity> {
    key: T::Key,
    expectations: Expectations<T>,
}

impl<T: LookupEntity> ResolveExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, resolved: Resolved<T>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Resolve {
                key: self.key,
                response: Ok(resolved),
            });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Resolve {
                key: self.key,
                response: Err(error),
            });
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// The test owns the receiver and answers each request by hand, which gives it full
/// control over response timing (e.g., completing lookups out of order).
pub fn create_mock_client<T: LookupEntity>(
    buffer_size: usize,
) -> (CacheClient<T>, mpsc::Receiver<CacheRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CacheClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Peek request
pub async fn expect_peek<T: LookupEntity>(
    receiver: &mut mpsc::Receiver<CacheRequest<T>>,
) -> Option<(T::Key, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(CacheRequest::Peek { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Resolve request
pub async fn expect_resolve<T: LookupEntity>(
    receiver: &mut mpsc::Receiver<CacheRequest<T>>,
) -> Option<(T::Key, Response<Resolved<T>>)> {
    match receiver.recv().await {
        Some(CacheRequest::Resolve { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}
