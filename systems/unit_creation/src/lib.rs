#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Unit creation dialog for production structures.
//!
//! The flow keeps at most one open dialog. Confirming a kind from the
//! dialog's catalog yields a [`Command::CreateUnit`] owned by the army that
//! holds the structure, which may differ from the army whose turn it is.

use thiserror::Error;
use tracing::debug;
use warboard_core::{Army, Command, Coord, ProductionDomain, Tile, UnitKind};

/// Units built by factories.
pub const GROUND_CATALOG: &[UnitKind] = &[
    UnitKind::Infantry,
    UnitKind::Mech,
    UnitKind::Recon,
    UnitKind::Tank,
    UnitKind::MediumTank,
    UnitKind::AntiAir,
    UnitKind::Artillery,
    UnitKind::Missile,
    UnitKind::Rocket,
    UnitKind::NeoTank,
    UnitKind::MegaTank,
    UnitKind::PipeRunner,
    UnitKind::Apc,
];

/// Units built by airports.
pub const AIR_CATALOG: &[UnitKind] = &[
    UnitKind::BCopter,
    UnitKind::TCopter,
    UnitKind::Fighter,
    UnitKind::Bomber,
];

/// Units built by ports.
pub const SEA_CATALOG: &[UnitKind] = &[
    UnitKind::Lander,
    UnitKind::Battleship,
    UnitKind::Cruiser,
    UnitKind::Sub,
    UnitKind::Carrier,
    UnitKind::BlackBoat,
];

/// Unit kinds offered by structures of the provided domain, in display order.
#[must_use]
pub const fn catalog(domain: ProductionDomain) -> &'static [UnitKind] {
    match domain {
        ProductionDomain::Ground => GROUND_CATALOG,
        ProductionDomain::Air => AIR_CATALOG,
        ProductionDomain::Sea => SEA_CATALOG,
    }
}

/// Reasons a confirmation cannot produce a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreationError {
    /// No dialog is open.
    #[error("no unit creation dialog is open")]
    NoDialog,
    /// The chosen kind is not offered by the structure.
    #[error("{kind} cannot be built at a {domain:?} structure")]
    NotInCatalog {
        /// Rejected unit kind.
        kind: UnitKind,
        /// Catalog of the open dialog.
        domain: ProductionDomain,
    },
    /// The structure has no owner to build for.
    #[error("structure at ({}, {}) has no owner", .at.x, .at.y)]
    Unowned {
        /// Tile of the structure.
        at: Coord,
    },
}

/// Dialog opened for a production structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationDialog {
    at: Coord,
    owner: Option<Army>,
    domain: ProductionDomain,
}

impl CreationDialog {
    /// Tile of the structure.
    #[must_use]
    pub const fn at(&self) -> Coord {
        self.at
    }

    /// Army owning the structure when the dialog opened.
    #[must_use]
    pub const fn owner(&self) -> Option<Army> {
        self.owner
    }

    /// Catalog selector of the dialog.
    #[must_use]
    pub const fn domain(&self) -> ProductionDomain {
        self.domain
    }

    /// Unit kinds offered by the dialog.
    #[must_use]
    pub const fn options(&self) -> &'static [UnitKind] {
        catalog(self.domain)
    }
}

/// State machine tracking the single unit creation dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitCreationFlow {
    dialog: Option<CreationDialog>,
}

impl UnitCreationFlow {
    /// Creates a flow with no open dialog.
    #[must_use]
    pub const fn new() -> Self {
        Self { dialog: None }
    }

    /// Opens the dialog for `tile`, discarding any unconfirmed dialog.
    pub fn open(&mut self, tile: &Tile, domain: ProductionDomain) -> &CreationDialog {
        if let Some(previous) = self.dialog.as_ref() {
            debug!(
                x = previous.at.x,
                y = previous.at.y,
                "discarding unconfirmed unit creation dialog"
            );
        }
        self.dialog.insert(CreationDialog {
            at: tile.coord(),
            owner: tile.map_tile.army,
            domain,
        })
    }

    /// Currently open dialog.
    #[must_use]
    pub const fn dialog(&self) -> Option<&CreationDialog> {
        self.dialog.as_ref()
    }

    /// Whether a dialog is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.dialog.is_some()
    }

    /// Confirms `kind`, closing the dialog and producing the creation command.
    ///
    /// The dialog stays open when the kind is not part of its catalog.
    pub fn confirm(&mut self, kind: UnitKind) -> Result<Command, CreationError> {
        let dialog = self.dialog.as_ref().ok_or(CreationError::NoDialog)?;
        if !dialog.options().contains(&kind) {
            return Err(CreationError::NotInCatalog {
                kind,
                domain: dialog.domain,
            });
        }
        let at = dialog.at;
        let owner = dialog.owner;
        self.dialog = None;

        let army = owner.ok_or(CreationError::Unowned { at })?;
        Ok(Command::CreateUnit { army, kind, at })
    }

    /// Closes the dialog without producing a command.
    pub fn cancel(&mut self) {
        self.dialog = None;
    }
}
