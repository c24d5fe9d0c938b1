#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure interaction system translating pointer input into server commands.
//!
//! The dispatcher never mutates the board and never talks to the server. It
//! inspects the tile under the pointer together with the server-computed
//! flags of the current snapshot and appends the resulting [`Interaction`]s
//! to an output buffer supplied by the caller.

use std::time::{Duration, Instant};

use tracing::debug;
use warboard_core::{
    Board, Command, Coord, CursorHint, ProductionDomain, TerrainKind, Tile, Unit, UnitKind,
};

/// Default interval within which a second press on the same tile is a double click.
pub const DEFAULT_DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Modifier keys held while the pointer event occurred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Whether a ctrl key was held.
    pub ctrl: bool,
    /// Whether an alt key was held.
    pub alt: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self::new(false, false);

    /// Creates a modifier snapshot with explicit key states.
    #[must_use]
    pub const fn new(ctrl: bool, alt: bool) -> Self {
        Self { ctrl, alt }
    }
}

/// Discrete pointer gesture delivered to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Single press of the primary button.
    Click,
    /// Second press on the same tile within the double-click window.
    DoubleClick,
}

/// Outcome of a pointer gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// Command that should be submitted to the server.
    Command(Command),
    /// Request to open the unit creation dialog for a production structure.
    OpenUnitCreation {
        /// Tile of the production structure.
        at: Coord,
        /// Catalog offered by the structure.
        catalog: ProductionDomain,
    },
}

/// Dispatches a pointer gesture on the tile at `at`.
pub fn dispatch(
    board: &Board,
    action: PointerAction,
    at: Coord,
    modifiers: Modifiers,
    out: &mut Vec<Interaction>,
) {
    match action {
        PointerAction::Click => handle_click(board, at, modifiers, out),
        PointerAction::DoubleClick => handle_double_click(board, at, out),
    }
}

/// Interprets a single click on the tile at `at`.
///
/// Load or unload, attack, select, move and unit creation are evaluated in
/// that order. Loading and unloading are decided independently from
/// attacking, so one click may yield both.
pub fn handle_click(board: &Board, at: Coord, modifiers: Modifiers, out: &mut Vec<Interaction>) {
    let Some(tile) = board.tile(at) else {
        debug!(x = at.x, y = at.y, "click outside the board ignored");
        return;
    };
    let selected = board.selected();

    if modifiers.ctrl {
        match selected {
            Some(from) => out.push(Interaction::Command(Command::Load { from, onto: at })),
            None => debug!("load requested without a selected unit"),
        }
    } else if modifiers.alt {
        match selected {
            Some(from) => out.push(Interaction::Command(Command::Unload {
                from,
                onto: at,
                cargo_index: 0,
            })),
            None => debug!("unload requested without a selected unit"),
        }
    }

    if tile.can_be_attacked {
        match selected {
            Some(from) => out.push(Interaction::Command(Command::Attack { from, to: at })),
            None => debug!(x = at.x, y = at.y, "attackable tile clicked without a selected unit"),
        }
    } else if is_selectable(board, tile) {
        out.push(Interaction::Command(Command::Select { at }));
    }

    if tile.can_be_moved_to {
        match selected {
            Some(from) => out.push(Interaction::Command(Command::Move { from, to: at })),
            None => debug!(x = at.x, y = at.y, "movable tile clicked without a selected unit"),
        }
    } else if let Some(catalog) = own_vacant_production(board, tile) {
        out.push(Interaction::OpenUnitCreation { at, catalog });
    }
}

/// Interprets a double click on the tile at `at`.
///
/// An infantry-class unit able to capture the structure it stands on
/// captures; any other unit waits. Empty tiles yield nothing.
pub fn handle_double_click(board: &Board, at: Coord, out: &mut Vec<Interaction>) {
    let Some(tile) = board.tile(at) else {
        debug!(x = at.x, y = at.y, "double click outside the board ignored");
        return;
    };
    let Some(unit) = tile.unit.as_ref() else {
        return;
    };

    if can_capture_here(tile, unit) {
        out.push(Interaction::Command(Command::Capture { at }));
    } else {
        out.push(Interaction::Command(Command::Wait { at }));
    }
}

/// Cursor affordance for the tile at `at`.
#[must_use]
pub fn hover_hint(board: &Board, at: Coord) -> CursorHint {
    let Some(tile) = board.tile(at) else {
        return CursorHint::Default;
    };

    if tile.can_be_moved_to {
        CursorHint::Move
    } else if tile.can_be_attacked {
        CursorHint::Attack
    } else if is_selectable(board, tile) {
        CursorHint::Select
    } else if owns_production(board, tile).is_some() {
        CursorHint::Produce
    } else {
        CursorHint::Default
    }
}

fn is_selectable(board: &Board, tile: &Tile) -> bool {
    tile.unit
        .as_ref()
        .is_some_and(|unit| unit.army == board.active_army() && unit.has_remaining_actions())
}

fn owns_production(board: &Board, tile: &Tile) -> Option<ProductionDomain> {
    if tile.map_tile.army != Some(board.active_army()) {
        return None;
    }
    tile.map_tile.kind()?.production_domain()
}

fn own_vacant_production(board: &Board, tile: &Tile) -> Option<ProductionDomain> {
    if tile.map_tile.army != Some(board.active_army()) {
        return None;
    }
    tile.vacant_production_domain()
}

fn can_capture_here(tile: &Tile, unit: &Unit) -> bool {
    let capturable = tile
        .map_tile
        .kind()
        .is_some_and(TerrainKind::is_capturable);
    let infantry = unit.kind().is_some_and(UnitKind::is_infantry_class);
    capturable && unit.can_capture && infantry
}

/// Turns raw primary-button presses into clicks and double clicks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickClassifier {
    window: Duration,
    last_press: Option<(Coord, Instant)>,
}

impl ClickClassifier {
    /// Creates a classifier with the provided double-click window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
        }
    }

    /// Classifies a press on the tile at `at` occurring at `now`.
    ///
    /// A double click consumes the pending press, so a third rapid press
    /// starts a new click.
    pub fn press(&mut self, at: Coord, now: Instant) -> PointerAction {
        if let Some((previous, pressed_at)) = self.last_press.take() {
            let within_window = now.saturating_duration_since(pressed_at) <= self.window;
            if previous == at && within_window {
                return PointerAction::DoubleClick;
            }
        }
        self.last_press = Some((at, now));
        PointerAction::Click
    }
}

impl Default for ClickClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_WINDOW)
    }
}
