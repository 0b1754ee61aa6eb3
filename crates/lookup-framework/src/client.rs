//! # Generic Client
//!
//! This module defines the generic client for communicating with a cache actor.

use crate::entity::LookupEntity;
use crate::error::FrameworkError;
use crate::message::{CacheRequest, Resolved};
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `CacheActor`.
///
/// The client holds only a sender, so cloning is inexpensive and clones can be handed to
/// every task that needs to resolve keys. The actor stops once all clones are dropped.
pub struct CacheClient<T: LookupEntity> {
    sender: mpsc::Sender<CacheRequest<T>>,
}

impl<T: LookupEntity> Clone for CacheClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: LookupEntity> CacheClient<T> {
    pub fn new(sender: mpsc::Sender<CacheRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn peek(&self, key: T::Key) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Peek { key, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn resolve(&self, key: T::Key) -> Result<Resolved<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Resolve { key, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn insert(&self, key: T::Key, value: T) -> Result<bool, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Insert {
                key,
                value,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn len(&self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Len { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
