//! Board snapshot delivered by the server's `game_board` operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Army, Coord, TerrainKind, TerrainType, UnitKind, UnitType, TILE_SIZE};

/// Default capture progress of a structure nobody is capturing.
const FULL_CAPTURE_HP: i32 = 20;

/// Errors raised when a snapshot cannot be accepted.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The payload is not a well-formed board snapshot.
    #[error("malformed board snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The grid does not hold exactly one tile per cell.
    #[error("board grid holds {actual} tiles, expected {expected} for {width}x{height}")]
    GridSize {
        /// Declared board width.
        width: u32,
        /// Declared board height.
        height: u32,
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of tiles received.
        actual: usize,
    },
    /// The board is too large to be drawn in pixel coordinates.
    #[error("board of {width}x{height} tiles exceeds the drawable pixel range")]
    Oversized {
        /// Declared board width.
        width: u32,
        /// Declared board height.
        height: u32,
    },
    /// A tile is stored at an index that does not match its coordinates.
    #[error("tile at grid index {index} reports coordinates ({x}, {y})")]
    MisplacedTile {
        /// Row-major index of the offending tile.
        index: usize,
        /// Column the tile reports.
        x: u32,
        /// Row the tile reports.
        y: u32,
    },
}

/// Identity token the server assigns to each unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a unit identifier from its token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token as issued by the server.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Volatile status of a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    /// Hit points in the range 0..=100.
    pub hp: i32,
    /// Remaining fuel.
    #[serde(default)]
    pub fuel: i32,
    /// Remaining primary-weapon ammunition.
    #[serde(default)]
    pub ammo: i32,
    /// Transport slots; each holds a loaded unit or nothing.
    #[serde(default)]
    pub cargo: Vec<Option<Unit>>,
}

impl Default for UnitStatus {
    fn default() -> Self {
        Self {
            hp: 100,
            fuel: 99,
            ammo: 9,
            cargo: Vec::new(),
        }
    }
}

impl UnitStatus {
    /// Whether any cargo slot holds a unit.
    #[must_use]
    pub fn is_carrying(&self) -> bool {
        self.cargo.iter().any(Option::is_some)
    }
}

/// Unit standing on a board tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Identity token used to recognise the selected unit.
    pub id: UnitId,
    /// Army owning the unit.
    pub army: Army,
    /// Kind of the unit.
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    /// Whether the unit may still move this turn.
    #[serde(default)]
    pub can_move: bool,
    /// Whether the unit may still attack this turn.
    #[serde(default)]
    pub can_attack: bool,
    /// Whether the unit may capture the structure it stands on.
    #[serde(default)]
    pub can_capture: bool,
    /// Hit points, supplies and cargo.
    #[serde(default)]
    pub status: UnitStatus,
}

impl Unit {
    /// Creates a fully supplied unit with every action still available.
    #[must_use]
    pub fn new(id: impl Into<String>, army: Army, kind: UnitKind) -> Self {
        Self {
            id: UnitId::new(id),
            army,
            unit_type: UnitType::Known(kind),
            can_move: true,
            can_attack: true,
            can_capture: kind.is_infantry_class(),
            status: UnitStatus::default(),
        }
    }

    /// Overrides the unit's action flags.
    #[must_use]
    pub fn with_actions(mut self, can_move: bool, can_attack: bool, can_capture: bool) -> Self {
        self.can_move = can_move;
        self.can_attack = can_attack;
        self.can_capture = can_capture;
        self
    }

    /// Overrides the unit's status block.
    #[must_use]
    pub fn with_status(mut self, status: UnitStatus) -> Self {
        self.status = status;
        self
    }

    /// Known kind of the unit, if the client recognises it.
    #[must_use]
    pub fn kind(&self) -> Option<UnitKind> {
        self.unit_type.kind()
    }

    /// Whether the unit has any action left this turn.
    #[must_use]
    pub const fn has_remaining_actions(&self) -> bool {
        self.can_move || self.can_attack || self.can_capture
    }

    /// Whether the unit can neither move nor attack and is drawn grayed out.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        !self.can_move && !self.can_attack
    }
}

/// Immutable terrain identity of a tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTile {
    /// Terrain kind.
    #[serde(rename = "type")]
    pub terrain: TerrainType,
    /// Owning army, absent for neutral terrain.
    #[serde(default)]
    pub army: Option<Army>,
}

impl MapTile {
    /// Creates a map tile of the provided terrain and owner.
    #[must_use]
    pub fn new(kind: TerrainKind, army: Option<Army>) -> Self {
        Self {
            terrain: TerrainType::Known(kind),
            army,
        }
    }

    /// Known terrain kind, if the client recognises it.
    #[must_use]
    pub fn kind(&self) -> Option<TerrainKind> {
        self.terrain.kind()
    }
}

/// Single cell of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Zero-based column.
    pub x: u32,
    /// Zero-based row.
    pub y: u32,
    /// Terrain identity.
    #[serde(rename = "mapTile")]
    pub map_tile: MapTile,
    /// Unit occupying the tile.
    #[serde(default)]
    pub unit: Option<Unit>,
    /// Whether the selected unit may move here.
    #[serde(default)]
    pub can_be_moved_to: bool,
    /// Whether the selected unit may attack here.
    #[serde(default)]
    pub can_be_attacked: bool,
    /// Remaining capture points of the structure.
    #[serde(default = "full_capture_hp")]
    pub capture_hp: i32,
}

fn full_capture_hp() -> i32 {
    FULL_CAPTURE_HP
}

impl Tile {
    /// Creates an empty tile without interaction flags.
    #[must_use]
    pub fn new(at: Coord, map_tile: MapTile) -> Self {
        Self {
            x: at.x,
            y: at.y,
            map_tile,
            unit: None,
            can_be_moved_to: false,
            can_be_attacked: false,
            capture_hp: FULL_CAPTURE_HP,
        }
    }

    /// Places a unit on the tile.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Overrides the server-computed interaction flags.
    #[must_use]
    pub fn with_flags(mut self, can_be_moved_to: bool, can_be_attacked: bool) -> Self {
        self.can_be_moved_to = can_be_moved_to;
        self.can_be_attacked = can_be_attacked;
        self
    }

    /// Overrides the capture progress.
    #[must_use]
    pub fn with_capture_hp(mut self, capture_hp: i32) -> Self {
        self.capture_hp = capture_hp;
        self
    }

    /// Coordinates of the tile.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Production domain of the tile's structure when the tile is unoccupied.
    #[must_use]
    pub fn vacant_production_domain(&self) -> Option<crate::ProductionDomain> {
        if self.unit.is_some() {
            return None;
        }
        self.map_tile.kind()?.production_domain()
    }
}

/// Reference to the currently selected unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTile {
    /// Column of the selected unit.
    pub x: u32,
    /// Row of the selected unit.
    pub y: u32,
    /// Selected unit as it was when selected, when the server includes it.
    #[serde(default)]
    pub unit: Option<Unit>,
}

/// Aggregate statistics of an army.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArmyStats {
    /// Units fielded.
    pub troops: u32,
    /// Properties owned.
    pub properties: u32,
    /// Available funds.
    pub funds: u32,
}

/// Information-panel summary of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSummary {
    /// Days elapsed.
    pub days: u32,
    /// Army whose turn it is.
    pub current_turn: Army,
    /// Whether the game is running.
    pub game_active: bool,
    /// Blue aggregate statistics.
    pub blue: ArmyStats,
    /// Red aggregate statistics.
    pub red: ArmyStats,
}

/// Full board snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Days elapsed.
    #[serde(default)]
    pub days: u32,
    /// Army whose turn it is.
    pub current_turn: Army,
    /// Whether the game is running.
    #[serde(default)]
    pub game_active: bool,
    /// Blue units fielded.
    #[serde(default)]
    pub total_blue_troops: u32,
    /// Blue properties owned.
    #[serde(default)]
    pub total_blue_properties: u32,
    /// Blue funds.
    #[serde(default)]
    pub blue_funds: u32,
    /// Red units fielded.
    #[serde(default)]
    pub total_red_troops: u32,
    /// Red properties owned.
    #[serde(default)]
    pub total_red_properties: u32,
    /// Red funds.
    #[serde(default)]
    pub red_funds: u32,
    /// Currently selected unit.
    #[serde(default)]
    pub selected: Option<SelectedTile>,
    /// Row-major tiles; length = width * height.
    pub grid: Vec<Tile>,
}

impl Board {
    /// Creates a board of plains with the provided dimensions.
    #[must_use]
    pub fn blank(width: u32, height: u32, current_turn: Army) -> Self {
        let grid = (0..height)
            .flat_map(|y| (0..width).map(move |x| Coord::new(x, y)))
            .map(|at| Tile::new(at, MapTile::new(TerrainKind::Plain, None)))
            .collect();
        Self {
            width,
            height,
            days: 0,
            current_turn,
            game_active: true,
            total_blue_troops: 0,
            total_blue_properties: 0,
            blue_funds: 0,
            total_red_troops: 0,
            total_red_properties: 0,
            red_funds: 0,
            selected: None,
            grid,
        }
    }

    /// Replaces the tile at the provided tile's coordinates.
    ///
    /// Tiles outside the board are ignored.
    #[must_use]
    pub fn with_tile(mut self, tile: Tile) -> Self {
        if let Some(index) = self.index_of(tile.coord()) {
            self.grid[index] = tile;
        }
        self
    }

    /// Marks the unit at the provided coordinates as selected.
    #[must_use]
    pub fn with_selected(mut self, at: Coord) -> Self {
        let unit = self.tile(at).and_then(|tile| tile.unit.clone());
        self.selected = Some(SelectedTile {
            x: at.x,
            y: at.y,
            unit,
        });
        self
    }

    /// Parses and validates a snapshot received from the server.
    pub fn from_json(payload: &str) -> Result<Self, SnapshotError> {
        let board: Board = serde_json::from_str(payload)?;
        board.validate()?;
        Ok(board)
    }

    /// Parses and validates a snapshot from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let board: Board = serde_json::from_value(value)?;
        board.validate()?;
        Ok(board)
    }

    /// Verifies that the grid holds exactly one correctly placed tile per cell.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let oversized = SnapshotError::Oversized {
            width: self.width,
            height: self.height,
        };
        if self.width.checked_mul(TILE_SIZE).is_none()
            || self.height.checked_mul(TILE_SIZE).is_none()
        {
            return Err(oversized);
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(oversized)?;
        if self.grid.len() != expected {
            return Err(SnapshotError::GridSize {
                width: self.width,
                height: self.height,
                expected,
                actual: self.grid.len(),
            });
        }

        for (index, tile) in self.grid.iter().enumerate() {
            let expected_x = (index % self.width as usize) as u32;
            let expected_y = (index / self.width as usize) as u32;
            if tile.x != expected_x || tile.y != expected_y {
                return Err(SnapshotError::MisplacedTile {
                    index,
                    x: tile.x,
                    y: tile.y,
                });
            }
        }

        Ok(())
    }

    fn index_of(&self, at: Coord) -> Option<usize> {
        if at.x >= self.width || at.y >= self.height {
            return None;
        }
        Some(at.y as usize * self.width as usize + at.x as usize)
    }

    /// Tile at the provided coordinates.
    #[must_use]
    pub fn tile(&self, at: Coord) -> Option<&Tile> {
        self.grid.get(self.index_of(at)?)
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.iter()
    }

    /// Army whose turn it is.
    #[must_use]
    pub const fn active_army(&self) -> Army {
        self.current_turn
    }

    /// Coordinates of the selected unit.
    #[must_use]
    pub fn selected(&self) -> Option<Coord> {
        self.selected
            .as_ref()
            .map(|selected| Coord::new(selected.x, selected.y))
    }

    /// The selected unit, preferring the copy embedded in the selection.
    #[must_use]
    pub fn selected_unit(&self) -> Option<&Unit> {
        let selected = self.selected.as_ref()?;
        selected.unit.as_ref().or_else(|| {
            self.tile(Coord::new(selected.x, selected.y))
                .and_then(|tile| tile.unit.as_ref())
        })
    }

    /// Whether the provided tile holds the selected unit.
    #[must_use]
    pub fn holds_selected_unit(&self, tile: &Tile) -> bool {
        let Some(unit) = tile.unit.as_ref() else {
            return false;
        };
        self.selected_unit()
            .is_some_and(|selected| selected.id == unit.id)
    }

    /// Aggregate statistics of the provided army, when the server tracks them.
    #[must_use]
    pub const fn stats(&self, army: Army) -> Option<ArmyStats> {
        match army {
            Army::Blue => Some(ArmyStats {
                troops: self.total_blue_troops,
                properties: self.total_blue_properties,
                funds: self.blue_funds,
            }),
            Army::Red => Some(ArmyStats {
                troops: self.total_red_troops,
                properties: self.total_red_properties,
                funds: self.red_funds,
            }),
            Army::Green | Army::Yellow | Army::Grey => None,
        }
    }

    /// Summary shown in the information panel.
    #[must_use]
    pub const fn summary(&self) -> BoardSummary {
        BoardSummary {
            days: self.days,
            current_turn: self.current_turn,
            game_active: self.game_active,
            blue: ArmyStats {
                troops: self.total_blue_troops,
                properties: self.total_blue_properties,
                funds: self.blue_funds,
            },
            red: ArmyStats {
                troops: self.total_red_troops,
                properties: self.total_red_properties,
                funds: self.red_funds,
            },
        }
    }
}
