#![doc = include_str!("../README.md")]
#![forbid(missing_docs, rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, forbidden_lint_groups)]

#[macro_use]
extern crate tracing;

use enum_dispatch::enum_dispatch;
use futures_util::{stream::BoxStream, Stream};
use pin_project_lite::pin_project;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    error::Error,
    marker::PhantomData,
    pin::Pin,
    sync::Arc,
    task::{self, ready, Poll},
};

pub mod in_process;

/// Boxed error
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Result alias where the error defaults to [`BoxError`]
pub type Result<T, E = BoxError> = std::result::Result<T, E>;

/// Transport for serialised event payloads
#[enum_dispatch]
#[allow(async_fn_in_trait)] // Because of `enum_dispatch`
pub trait MessagingBackend {
    /// Hand a payload to everyone currently subscribed to the topic
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;

    /// Receive every payload published to the topic from now on
    async fn subscribe(&self, topic: &str) -> Result<BoxStream<'static, Result<Vec<u8>>>>;
}

/// Every supported backend
#[enum_dispatch(MessagingBackend)]
pub enum AnyMessagingBackend {
    /// Process-local backend
    InProcess(in_process::InProcessBackend),
}

fn decode<M>(mut payload: Vec<u8>) -> Result<M>
where
    M: DeserializeOwned,
{
    simd_json::from_slice(&mut payload).map_err(Into::into)
}

pin_project! {
    /// Stream of decoded events published to a single topic
    pub struct Subscription<M> {
        topic: String,
        #[pin]
        payloads: BoxStream<'static, Result<Vec<u8>>>,
        _event: PhantomData<fn() -> M>,
    }
}

impl<M> Subscription<M> {
    /// Topic this subscription listens on
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl<M> Stream for Subscription<M>
where
    M: DeserializeOwned,
{
    type Item = Result<M>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Option<Self::Item>> {
        let payload = ready!(self.project().payloads.poll_next(cx));
        Poll::Ready(payload.map(|payload| payload.and_then(decode)))
    }
}

/// Publisher of events of type `M` onto a single topic
pub struct MessageEmitter<M> {
    hub: MessagingHub,
    topic: String,
    _event: PhantomData<fn(M)>,
}

impl<M> Clone for MessageEmitter<M> {
    fn clone(&self) -> Self {
        Self {
            hub: self.hub.clone(),
            topic: self.topic.clone(),
            _event: PhantomData,
        }
    }
}

impl<M> MessageEmitter<M>
where
    M: Serialize,
{
    /// Topic the events are published to
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Serialise the event and publish it
    pub async fn emit(&self, event: &M) -> Result<()> {
        let payload = simd_json::to_vec(event)?;
        self.hub.backend.publish(&self.topic, payload).await
    }
}

/// Topic-addressed event bus
///
/// Cheap to clone. Clones share the backend, so they see the same topics.
#[derive(Clone)]
pub struct MessagingHub {
    backend: Arc<AnyMessagingBackend>,
}

impl MessagingHub {
    /// Create a hub on top of a backend
    pub fn new<B>(backend: B) -> Self
    where
        B: Into<AnyMessagingBackend>,
    {
        Self {
            backend: Arc::new(backend.into()),
        }
    }

    /// Emitter for events published to the topic
    #[must_use]
    pub fn emitter<M>(&self, topic: impl Into<String>) -> MessageEmitter<M>
    where
        M: Serialize,
    {
        MessageEmitter {
            hub: self.clone(),
            topic: topic.into(),
            _event: PhantomData,
        }
    }

    /// Subscribe to the events published to the topic
    ///
    /// Events published before the subscription was created are not delivered.
    pub async fn subscribe<M>(&self, topic: impl Into<String>) -> Result<Subscription<M>>
    where
        M: DeserializeOwned,
    {
        let topic = topic.into();
        let payloads = self.backend.subscribe(&topic).await?;

        Ok(Subscription {
            topic,
            payloads,
            _event: PhantomData,
        })
    }
}
