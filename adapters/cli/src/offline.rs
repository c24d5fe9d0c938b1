//! Offline stand-in for the game server.
//!
//! Serves a fixed board snapshot and logs every command it receives instead
//! of applying it.

use std::{collections::VecDeque, fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;
use warboard_core::Board;
use warboard_session::{RpcReply, RpcRequest, Transport, TransportError};

/// Transport answering board fetches from a snapshot loaded at start-up.
#[derive(Debug)]
pub(crate) struct OfflineServer {
    snapshot: Value,
    replies: VecDeque<RpcReply>,
    commands_received: u64,
    #[cfg(test)]
    received: Vec<String>,
}

impl OfflineServer {
    /// Creates a server that answers every fetch with `snapshot`.
    pub(crate) fn new(snapshot: Value) -> Self {
        Self {
            snapshot,
            replies: VecDeque::new(),
            commands_received: 0,
            #[cfg(test)]
            received: Vec::new(),
        }
    }

    /// Reads and validates the snapshot at `path`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let snapshot = read_snapshot(path)?;
        Ok(Self::new(snapshot))
    }

    /// Methods of the commands received so far, oldest first.
    #[cfg(test)]
    pub(crate) fn received(&self) -> &[String] {
        &self.received
    }
}

impl Transport for OfflineServer {
    fn send(&mut self, request: RpcRequest) -> Result<(), TransportError> {
        let result = if request.method == "game_board" {
            self.snapshot.clone()
        } else {
            self.commands_received += 1;
            #[cfg(test)]
            self.received.push(request.method.to_string());
            info!(
                method = request.method,
                params = %request.params,
                received = self.commands_received,
                "command received"
            );
            Value::Bool(true)
        };
        self.replies.push_back(RpcReply::success(request.id, result));
        Ok(())
    }

    fn poll(&mut self) -> Vec<RpcReply> {
        self.replies.drain(..).collect()
    }
}

/// Reads the snapshot at `path`, rejecting files that do not describe a board.
pub(crate) fn read_snapshot(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot at {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("snapshot at {} is not JSON", path.display()))?;
    let _ = Board::from_value(value.clone())
        .with_context(|| format!("snapshot at {} is not a valid board", path.display()))?;
    Ok(value)
}

/// Reads and parses the board snapshot at `path`.
pub(crate) fn load_board(path: &Path) -> Result<Board> {
    let value = read_snapshot(path)?;
    Board::from_value(value).context("failed to parse board snapshot")
}
