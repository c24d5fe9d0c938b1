#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Client session tying the board cache, the interaction systems and the
//! server transport together.
//!
//! A [`Session`] is the single context object adapters talk to. It owns the
//! latest board snapshot and the scene composed from it, forwards pointer
//! gestures to the dispatcher, submits the resulting commands without
//! waiting for them, and refetches the board whenever the server announces
//! a change.

mod cache;
mod chat;
pub mod rpc;
mod transport;

pub use cache::BoardCache;
pub use chat::{ChatLog, DEFAULT_CHAT_HISTORY};
pub use rpc::{RpcReply, RpcRequest};
pub use transport::{PushChannel, SilentPushChannel, Transport, TransportError};

use std::{collections::HashMap, rc::Rc};

use tracing::{debug, error, info, warn};
use uuid::Uuid;
use warboard_core::{Board, Command, Coord, CursorHint, PushEvent, UnitKind};
use warboard_rendering::{compose, Scene, SceneOptions};
use warboard_system_interaction::{self as interaction, Interaction, Modifiers, PointerAction};
use warboard_system_unit_creation::{CreationDialog, CreationError, UnitCreationFlow};

/// Settings a session is created with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Token identifying the game on the server.
    pub token: String,
    /// Options used when composing scenes.
    pub scene_options: SceneOptions,
    /// Number of chat lines retained.
    pub chat_history: usize,
}

impl SessionConfig {
    /// Creates a configuration with default options for the provided game.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scene_options: SceneOptions::default(),
            chat_history: DEFAULT_CHAT_HISTORY,
        }
    }
}

/// Board snapshot together with the scene composed from it.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardContext {
    /// Snapshot the scene was composed from.
    pub board: Rc<Board>,
    /// Composed scene.
    pub scene: Scene,
    /// Number of snapshots installed before and including this one.
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingRequest {
    FetchBoard,
    Command(&'static str),
}

/// Live client session for one game.
#[derive(Debug)]
pub struct Session<T, P> {
    config: SessionConfig,
    transport: T,
    push: P,
    cache: BoardCache,
    chat: ChatLog,
    pending: HashMap<Uuid, PendingRequest>,
    creation: UnitCreationFlow,
    context: Option<BoardContext>,
    closed: bool,
}

impl<T, P> Session<T, P>
where
    T: Transport,
    P: PushChannel,
{
    /// Creates a session that has not fetched a board yet.
    #[must_use]
    pub fn new(config: SessionConfig, transport: T, push: P) -> Self {
        let chat = ChatLog::new(config.chat_history);
        Self {
            config,
            transport,
            push,
            cache: BoardCache::new(),
            chat,
            pending: HashMap::new(),
            creation: UnitCreationFlow::new(),
            context: None,
            closed: false,
        }
    }

    /// Requests a fresh board snapshot.
    pub fn request_board(&mut self) {
        if self.closed {
            return;
        }
        let request = RpcRequest::fetch_board(&self.config.token);
        self.send(request, PendingRequest::FetchBoard);
    }

    /// Submits `command` without waiting for its outcome.
    pub fn submit(&mut self, command: Command) {
        if self.closed {
            debug!(?command, "session closed, command dropped");
            return;
        }
        let request = RpcRequest::command(&command, &self.config.token);
        let method = request.method;
        self.send(request, PendingRequest::Command(method));
    }

    /// Posts a chat line; blank lines are ignored.
    pub fn send_chat(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.submit(Command::SendChat {
            text: text.to_string(),
        });
    }

    fn send(&mut self, request: RpcRequest, kind: PendingRequest) {
        let id = request.id;
        let method = request.method;
        match self.transport.send(request) {
            Ok(()) => {
                let _ = self.pending.insert(id, kind);
            }
            Err(err) => error!(method, %err, "request could not be sent"),
        }
    }

    /// Processes push events and transport replies received since the last call.
    ///
    /// Returns `true` when a new board context was installed.
    pub fn pump(&mut self) -> bool {
        if self.closed {
            return false;
        }

        for event in self.push.poll() {
            self.handle_push(event);
        }

        let mut installed = false;
        for reply in self.transport.poll() {
            installed |= self.handle_reply(reply);
        }
        installed
    }

    fn handle_push(&mut self, event: PushEvent) {
        match event {
            PushEvent::Connected => info!(token = %self.config.token, "push channel connected"),
            PushEvent::Disconnected => info!("push channel disconnected"),
            PushEvent::BoardChanged => self.request_board(),
            PushEvent::ChatMessage(line) => self.chat.push(line),
        }
    }

    fn handle_reply(&mut self, reply: RpcReply) -> bool {
        let Some(kind) = self.pending.remove(&reply.id) else {
            warn!(id = %reply.id, "reply to an unknown request ignored");
            return false;
        };

        match (kind, reply.outcome) {
            (PendingRequest::FetchBoard, Ok(value)) => match Board::from_value(value) {
                Ok(board) => {
                    self.install(board);
                    true
                }
                Err(err) => {
                    warn!(%err, "board snapshot rejected, keeping the previous one");
                    false
                }
            },
            (PendingRequest::FetchBoard, Err(err)) => {
                error!(%err, "board fetch failed");
                false
            }
            (PendingRequest::Command(method), Ok(_)) => {
                debug!(method, "command acknowledged");
                false
            }
            (PendingRequest::Command(method), Err(err)) => {
                error!(method, %err, "command failed");
                false
            }
        }
    }

    fn install(&mut self, board: Board) {
        let board = self.cache.install(board);
        let scene = compose(&board, self.config.scene_options);
        debug!(
            width = board.width,
            height = board.height,
            primitives = scene.primitives.len(),
            "board context replaced"
        );
        self.context = Some(BoardContext {
            board,
            scene,
            generation: self.cache.generation(),
        });
    }

    /// Changes the scene options and recomposes the current board.
    pub fn set_scene_options(&mut self, options: SceneOptions) {
        self.config.scene_options = options;
        if let Some(context) = self.context.as_mut() {
            context.scene = compose(&context.board, options);
        }
    }

    /// Runs the dispatcher for a pointer gesture on the tile at `at`.
    pub fn pointer(&mut self, action: PointerAction, at: Coord, modifiers: Modifiers) {
        let Some(board) = self.cache.current() else {
            debug!("pointer input before the first board ignored");
            return;
        };
        if self.closed {
            return;
        }

        let mut out = Vec::new();
        interaction::dispatch(&board, action, at, modifiers, &mut out);
        for outcome in out {
            match outcome {
                Interaction::Command(command) => self.submit(command),
                Interaction::OpenUnitCreation { at, catalog } => {
                    if let Some(tile) = board.tile(at) {
                        let _ = self.creation.open(tile, catalog);
                    }
                }
            }
        }
    }

    /// Cursor affordance for the tile at `at`.
    #[must_use]
    pub fn hover(&self, at: Coord) -> CursorHint {
        self.cache
            .board()
            .map_or(CursorHint::Default, |board| interaction::hover_hint(board, at))
    }

    /// Open unit creation dialog, if any.
    #[must_use]
    pub const fn creation_dialog(&self) -> Option<&CreationDialog> {
        self.creation.dialog()
    }

    /// Confirms `kind` in the open creation dialog and submits the command.
    pub fn confirm_creation(&mut self, kind: UnitKind) -> Result<(), CreationError> {
        let command = self.creation.confirm(kind)?;
        self.submit(command);
        Ok(())
    }

    /// Dismisses the open creation dialog.
    pub fn cancel_creation(&mut self) {
        self.creation.cancel();
    }

    /// Current board context.
    #[must_use]
    pub const fn context(&self) -> Option<&BoardContext> {
        self.context.as_ref()
    }

    /// Current board snapshot.
    #[must_use]
    pub fn board(&self) -> Option<Rc<Board>> {
        self.cache.current()
    }

    /// Chat history.
    #[must_use]
    pub const fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Number of requests awaiting a reply.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Whether the session has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Underlying push channel, mutably.
    pub fn push_channel_mut(&mut self) -> &mut P {
        &mut self.push
    }

    /// Ends the session, tearing down the board context.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        info!(token = %self.config.token, "session closed");
        self.closed = true;
        self.context = None;
        self.cache.clear();
        self.pending.clear();
        self.creation.cancel();
        self.chat.clear();
    }
}
