//! Contracts for the request/response transport and the push channel.

use thiserror::Error;
use warboard_core::PushEvent;

use crate::{RpcReply, RpcRequest};

/// Failures reported by a transport.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be delivered.
    #[error("request could not be delivered: {0}")]
    Unreachable(String),
    /// The server answered with a non-success HTTP status.
    #[error("server answered with status {0}")]
    Status(u16),
    /// The server answered with a JSON-RPC error object.
    #[error("remote call failed ({code}): {message}")]
    Remote {
        /// JSON-RPC error code.
        code: i64,
        /// Error message reported by the server.
        message: String,
    },
    /// The transport has been shut down.
    #[error("transport is closed")]
    Closed,
}

/// Non-blocking request/response channel to the game server.
///
/// `send` queues a request and returns immediately; replies are collected
/// later through `poll`, in the order the transport received them.
pub trait Transport {
    /// Queues `request` for delivery.
    fn send(&mut self, request: RpcRequest) -> Result<(), TransportError>;

    /// Drains every reply received since the previous poll.
    fn poll(&mut self) -> Vec<RpcReply>;
}

/// Real-time notification channel joined to the game room.
pub trait PushChannel {
    /// Drains every event received since the previous poll.
    fn poll(&mut self) -> Vec<PushEvent>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: RpcRequest) -> Result<(), TransportError> {
        (**self).send(request)
    }

    fn poll(&mut self) -> Vec<RpcReply> {
        (**self).poll()
    }
}

impl<P: PushChannel + ?Sized> PushChannel for Box<P> {
    fn poll(&mut self) -> Vec<PushEvent> {
        (**self).poll()
    }
}

/// Push channel that never delivers events.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentPushChannel;

impl PushChannel for SilentPushChannel {
    fn poll(&mut self) -> Vec<PushEvent> {
        Vec::new()
    }
}
