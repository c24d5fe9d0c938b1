#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Warboard client.
//!
//! This crate defines the board snapshot delivered by the game server and the
//! message surface that connects adapters with the server. Adapters render
//! immutable [`Board`] snapshots, pure systems translate pointer input into
//! [`Command`] values, and the session forwards those commands to the server.
//! The server answers indirectly: it broadcasts [`PushEvent::BoardChanged`],
//! after which a fresh snapshot replaces the previous one wholesale.

mod board;
mod kinds;

pub use board::{
    ArmyStats, Board, BoardSummary, MapTile, SelectedTile, SnapshotError, Tile, Unit, UnitId,
    UnitStatus,
};
pub use kinds::{Army, ProductionDomain, TerrainKind, TerrainType, UnitKind, UnitType};

use serde::{Deserialize, Serialize};

/// Side length of a board tile in screen pixels.
pub const TILE_SIZE: u32 = 16;

/// Location of a single board tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Zero-based column index.
    pub x: u32,
    /// Zero-based row index.
    pub y: u32,
}

impl Coord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Converts a pixel position on the board surface into the tile beneath it.
    ///
    /// Returns `None` for negative or non-finite positions.
    #[must_use]
    pub fn from_pixel(px: f32, py: f32) -> Option<Self> {
        if !px.is_finite() || !py.is_finite() || px < 0.0 || py < 0.0 {
            return None;
        }
        let tile = TILE_SIZE as f32;
        Some(Self::new((px / tile).floor() as u32, (py / tile).floor() as u32))
    }
}

/// Commands the client may submit to the game server.
///
/// Every command is fire-and-forget: its effect is observed only through the
/// next board snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Posts a chat line to every participant of the game.
    SendChat {
        /// Literal message text.
        text: String,
    },
    /// Ends the active army's turn.
    EndTurn,
    /// Starts the game.
    StartGame,
    /// Ends the game.
    EndGame,
    /// Selects the unit standing at the provided tile.
    Select {
        /// Tile holding the unit to select.
        at: Coord,
    },
    /// Continues capturing the structure at the provided tile.
    Capture {
        /// Tile holding the capturing unit.
        at: Coord,
    },
    /// Ends the action of the unit at the provided tile without moving it.
    Wait {
        /// Tile holding the waiting unit.
        at: Coord,
    },
    /// Attacks from one tile into another.
    Attack {
        /// Tile holding the attacker.
        from: Coord,
        /// Tile holding the defender.
        to: Coord,
    },
    /// Loads a unit into the transport at another tile.
    Load {
        /// Tile holding the unit to load.
        from: Coord,
        /// Tile holding the transport.
        onto: Coord,
    },
    /// Unloads cargo from a transport onto a neighbouring tile.
    Unload {
        /// Tile holding the transport.
        from: Coord,
        /// Tile receiving the unloaded unit.
        onto: Coord,
        /// Cargo slot to unload.
        cargo_index: u8,
    },
    /// Merges a unit into another unit of the same kind.
    Join {
        /// Tile holding the joining unit.
        from: Coord,
        /// Tile holding the unit that absorbs it.
        into: Coord,
    },
    /// Moves a unit between two tiles.
    Move {
        /// Tile holding the unit.
        from: Coord,
        /// Destination tile.
        to: Coord,
    },
    /// Builds a new unit at a production structure.
    CreateUnit {
        /// Army that will own the unit.
        army: Army,
        /// Kind of unit to build.
        kind: UnitKind,
        /// Tile of the production structure.
        at: Coord,
    },
}

/// Notifications pushed by the server over the real-time channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushEvent {
    /// The push channel connected and joined the game room.
    Connected,
    /// The push channel lost its connection.
    Disconnected,
    /// The authoritative board changed; carries no payload.
    BoardChanged,
    /// A chat line was broadcast to the game room.
    ChatMessage(String),
}

/// Cursor affordance shown while hovering a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorHint {
    /// Nothing actionable under the pointer.
    #[default]
    Default,
    /// The selected unit may move here.
    Move,
    /// The selected unit may attack here.
    Attack,
    /// An own unit with remaining actions may be selected here.
    Select,
    /// An own production structure may build a unit here.
    Produce,
}
