//! Sprite sheet coordinates for terrain, units and status badges.
//!
//! Every lookup goes through immutable tables that are built once on first
//! use. Keys missing from a table, including kinds the client does not
//! recognise, resolve to `None` so callers can skip the primitive.

use std::{collections::HashMap, sync::OnceLock};

use glam::Vec2;
use warboard_core::{Army, Coord, MapTile, TerrainKind, Tile, Unit, UnitKind, TILE_SIZE};

use crate::{RenderingError, ScreenRect, SourceRect, SpriteSheet};

/// Horizontal distance between a unit sprite and its grayed-out variant.
pub const UNAVAILABLE_SHIFT: u32 = 336;

const BADGE_SIZE: u32 = 8;
const AMMO_BADGE_SIZE: u32 = 6;
const HEALTH_DIGIT_STRIDE: u32 = BADGE_SIZE + 1;
const HEALTH_BADGE_THRESHOLD: i32 = 90;
const FUEL_BADGE_THRESHOLD: i32 = 30;
const AMMO_BADGE_THRESHOLD: i32 = 3;
const CAPTURE_BADGE_THRESHOLD: i32 = 19;

/// Region of a sprite sheet that depicts a single sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteRegion {
    /// Sheet holding the sprite.
    pub sheet: SpriteSheet,
    /// Pixel rectangle inside the sheet.
    pub source: SourceRect,
    /// Whether the sprite is two tiles tall and overhangs the row above.
    pub double_height: bool,
}

impl SpriteRegion {
    /// Creates a region, rejecting rectangles that leave the sheet.
    pub fn new(
        sheet: SpriteSheet,
        source: SourceRect,
        double_height: bool,
    ) -> Result<Self, RenderingError> {
        if !source.fits_within(sheet) {
            return Err(RenderingError::OutOfSheetBounds {
                sheet,
                region: source,
            });
        }
        Ok(Self {
            sheet,
            source,
            double_height,
        })
    }

    /// Board area covered when the sprite is anchored at the provided tile.
    #[must_use]
    pub fn destination(&self, at: Coord) -> ScreenRect {
        let tile = ScreenRect::tile(at.x, at.y);
        if self.double_height {
            let tile_size = TILE_SIZE as f32;
            ScreenRect::new(
                tile.origin - Vec2::new(0.0, tile_size),
                Vec2::new(tile_size, tile_size * 2.0),
            )
        } else {
            tile
        }
    }
}

/// Ownership row of the terrain sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OwnerColumn {
    /// Structures owned by the red army.
    Red,
    /// Structures owned by the blue army.
    Blue,
    /// Unowned structures and every army the sheet has no art for.
    Neutral,
}

impl OwnerColumn {
    /// Every ownership row.
    pub const ALL: [OwnerColumn; 3] = [OwnerColumn::Red, OwnerColumn::Blue, OwnerColumn::Neutral];

    /// Row used to draw terrain owned by the provided army.
    #[must_use]
    pub const fn of(owner: Option<Army>) -> Self {
        match owner {
            Some(Army::Red) => OwnerColumn::Red,
            Some(Army::Blue) => OwnerColumn::Blue,
            Some(Army::Green | Army::Yellow | Army::Grey) | None => OwnerColumn::Neutral,
        }
    }
}

#[derive(Clone, Copy)]
enum TerrainArt {
    Single {
        x: u32,
        y: u32,
        tall: bool,
    },
    Owned {
        x: u32,
        red: u32,
        blue: u32,
        neutral: u32,
        tall: bool,
    },
}

const fn flat(x: u32, y: u32) -> TerrainArt {
    TerrainArt::Single { x, y, tall: false }
}

const fn tall(x: u32, y: u32) -> TerrainArt {
    TerrainArt::Single { x, y, tall: true }
}

const fn owned(x: u32, red: u32, blue: u32, neutral: u32, tall: bool) -> TerrainArt {
    TerrainArt::Owned {
        x,
        red,
        blue,
        neutral,
        tall,
    }
}

const TERRAIN_ART: &[(TerrainKind, TerrainArt)] = &[
    (TerrainKind::Plain, flat(8, 64)),
    (TerrainKind::Wood, tall(352, 56)),
    (TerrainKind::Mountain, tall(25, 39)),
    (TerrainKind::RoadHorizontal, flat(42, 64)),
    (TerrainKind::RoadVertical, flat(59, 64)),
    (TerrainKind::RoadNorthWest, flat(42, 13)),
    (TerrainKind::RoadNorthEast, flat(76, 13)),
    (TerrainKind::RoadSouthEast, flat(76, 47)),
    (TerrainKind::RoadSouthWest, flat(42, 47)),
    (TerrainKind::RoadJunctionSwn, flat(156, 31)),
    (TerrainKind::RoadJunctionEsw, flat(59, 13)),
    (TerrainKind::RoadJunctionWne, flat(110, 47)),
    (TerrainKind::RoadJunctionNes, flat(110, 47)),
    (TerrainKind::RoadCross, flat(59, 30)),
    (TerrainKind::City, owned(87, 812, 847, 766, true)),
    (TerrainKind::Factory, owned(102, 818, 851, 772, false)),
    (TerrainKind::Airport, owned(120, 818, 851, 773, false)),
    (TerrainKind::Port, owned(137, 811, 844, 765, true)),
    (TerrainKind::ComTower, owned(154, 811, 844, 765, true)),
    (TerrainKind::BaseTower0, owned(1, 812, 845, 757, true)),
    (TerrainKind::BaseTower1, owned(1, 812, 845, 757, true)),
    (TerrainKind::BaseTower2, owned(38, 1040, 1073, 1218, true)),
    (TerrainKind::Lab, owned(171, 812, 845, 765, true)),
    (TerrainKind::RiverHorizontal, flat(386, 145)),
    (TerrainKind::RiverVertical, flat(420, 111)),
    (TerrainKind::RiverNorthEast, flat(369, 94)),
    (TerrainKind::RiverNorthWest, flat(403, 94)),
    (TerrainKind::RiverSouthEast, flat(403, 128)),
    (TerrainKind::RiverSouthWest, flat(369, 128)),
    (TerrainKind::RiverJunctionEsw, flat(161, 338)),
    (TerrainKind::RiverJunctionNes, flat(110, 251)),
    (TerrainKind::RiverJunctionWne, flat(160, 285)),
    (TerrainKind::RiverJunctionSwn, flat(160, 285)),
    (TerrainKind::BeachNorthEast, flat(333, 198)),
    (TerrainKind::BeachNorthWest, flat(282, 355)),
    (TerrainKind::BeachSouthWest, flat(350, 355)),
    (TerrainKind::BeachSouthEast, flat(333, 145)),
    (TerrainKind::BeachNorth, flat(265, 111)),
    (TerrainKind::BeachEast, flat(214, 321)),
    (TerrainKind::BeachSouth, flat(265, 304)),
    (TerrainKind::BeachWest, flat(231, 321)),
    (TerrainKind::BeachEndNorth, flat(248, 145)),
    (TerrainKind::BeachEndEast, flat(316, 111)),
    (TerrainKind::BeachEndSouth, flat(248, 128)),
    (TerrainKind::BeachEndWest, flat(316, 94)),
    (TerrainKind::PipeVertical, flat(212, 30)),
    (TerrainKind::PipeEndNorth, flat(178, 30)),
    (TerrainKind::PipeEndSouth, flat(178, 47)),
    (TerrainKind::PipeEndWest, flat(144, 64)),
    (TerrainKind::PipeEndEast, flat(161, 64)),
    (TerrainKind::PipeEndNorthEast, flat(161, 30)),
    (TerrainKind::PipeEndNorthWest, flat(144, 30)),
    (TerrainKind::PipeEndSouthWest, flat(144, 47)),
    (TerrainKind::PipeEndSouthEast, flat(161, 47)),
    (TerrainKind::PipeHorizontal, flat(195, 30)),
    (TerrainKind::Sea, flat(76, 94)),
    (TerrainKind::BridgeHorizontal, flat(76, 64)),
    (TerrainKind::BridgeVertical, flat(94, 64)),
    (TerrainKind::Reef, flat(224, 146)),
    (TerrainKind::MissileSilo, tall(188, 766)),
    (TerrainKind::EmptySilo, tall(205, 767)),
];

const ARMY_ORIGIN: [(Army, u32, u32); 5] = [
    (Army::Red, 4, 105),
    (Army::Blue, 393, 105),
    (Army::Green, 4, 672),
    (Army::Yellow, 393, 672),
    (Army::Grey, 4, 1240),
];

// Black bombs and stealth fighters have no art on the unit sheet.
const UNIT_ART: &[(UnitKind, u32, u32)] = &[
    (UnitKind::Infantry, 0, 0),
    (UnitKind::Mech, 0, 95),
    (UnitKind::Recon, 0, 190),
    (UnitKind::Tank, 0, 209),
    (UnitKind::MediumTank, 0, 228),
    (UnitKind::NeoTank, 0, 247),
    (UnitKind::Apc, 0, 265),
    (UnitKind::AntiAir, 0, 285),
    (UnitKind::Artillery, 0, 303),
    (UnitKind::Rocket, 0, 322),
    (UnitKind::Missile, 0, 342),
    (UnitKind::Fighter, 0, 361),
    (UnitKind::Bomber, 0, 380),
    (UnitKind::BCopter, 0, 400),
    (UnitKind::TCopter, 0, 418),
    (UnitKind::Battleship, 0, 437),
    (UnitKind::Cruiser, 0, 455),
    (UnitKind::Lander, 0, 475),
    (UnitKind::Sub, 0, 495),
    (UnitKind::Carrier, 0, 512),
    (UnitKind::BlackBoat, 17, 512),
    (UnitKind::MegaTank, 33, 512),
    (UnitKind::PipeRunner, 0, 538),
];

type TerrainTable = HashMap<(TerrainKind, OwnerColumn), SpriteRegion>;
type UnitTable = HashMap<(UnitKind, Army, bool), SpriteRegion>;

fn terrain_table() -> &'static TerrainTable {
    static TABLE: OnceLock<TerrainTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for &(kind, art) in TERRAIN_ART {
            for column in OwnerColumn::ALL {
                let (x, y, tall) = match art {
                    TerrainArt::Single { x, y, tall } => (x, y, tall),
                    TerrainArt::Owned {
                        x,
                        red,
                        blue,
                        neutral,
                        tall,
                    } => {
                        let y = match column {
                            OwnerColumn::Red => red,
                            OwnerColumn::Blue => blue,
                            OwnerColumn::Neutral => neutral,
                        };
                        (x, y, tall)
                    }
                };
                let source = if tall {
                    SourceRect::new(x, y.saturating_sub(TILE_SIZE / 2), TILE_SIZE, TILE_SIZE * 2)
                } else {
                    SourceRect::new(x, y, TILE_SIZE, TILE_SIZE)
                };
                // The sheet lacks a few owner rows; those keys stay unresolved.
                if let Ok(region) = SpriteRegion::new(SpriteSheet::Terrain, source, tall) {
                    let _ = table.insert((kind, column), region);
                }
            }
        }
        table
    })
}

fn unit_table() -> &'static UnitTable {
    static TABLE: OnceLock<UnitTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for (army, origin_x, origin_y) in ARMY_ORIGIN {
            for &(kind, offset_x, offset_y) in UNIT_ART {
                for available in [true, false] {
                    let shift = if available { 0 } else { UNAVAILABLE_SHIFT };
                    let source = SourceRect::new(
                        origin_x + offset_x + shift,
                        origin_y + offset_y,
                        TILE_SIZE,
                        TILE_SIZE,
                    );
                    if let Ok(region) = SpriteRegion::new(SpriteSheet::Units, source, false) {
                        let _ = table.insert((kind, army, available), region);
                    }
                }
            }
        }
        table
    })
}

/// Region depicting terrain of the provided kind and owner.
#[must_use]
pub fn terrain_region(kind: TerrainKind, owner: Option<Army>) -> Option<SpriteRegion> {
    terrain_table()
        .get(&(kind, OwnerColumn::of(owner)))
        .copied()
}

/// Region depicting the terrain of a map tile.
#[must_use]
pub fn resolve_terrain(map_tile: &MapTile) -> Option<SpriteRegion> {
    terrain_region(map_tile.kind()?, map_tile.army)
}

/// Region depicting a unit of the provided kind and army.
///
/// Unavailable units resolve to the grayed-out column of the sheet.
#[must_use]
pub fn unit_region(kind: UnitKind, army: Army, available: bool) -> Option<SpriteRegion> {
    unit_table().get(&(kind, army, available)).copied()
}

/// Region depicting the provided unit in its current availability.
#[must_use]
pub fn resolve_unit(unit: &Unit) -> Option<SpriteRegion> {
    unit_region(unit.kind()?, unit.army, !unit.is_exhausted())
}

/// Status indicator drawn over a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BadgeKind {
    /// Remaining hit points, drawn as a digit.
    Health,
    /// Fuel is running low.
    LowFuel,
    /// Ammunition is running low.
    LowAmmo,
    /// The structure beneath the unit is being captured.
    Capturing,
    /// The unit carries cargo.
    Carrying,
}

/// Badge resolved for a specific unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Badge {
    /// Indicator depicted by the badge.
    pub kind: BadgeKind,
    /// Region of the unit sheet holding the badge art.
    pub source: SourceRect,
    /// Top-left corner relative to the tile's top-left corner.
    pub offset: Vec2,
}

impl Badge {
    fn new(kind: BadgeKind, source: SourceRect, offset_x: f32, offset_y: f32) -> Self {
        Self {
            kind,
            source,
            offset: Vec2::new(offset_x, offset_y),
        }
    }

    /// Board area covered when the badge is drawn on the provided tile.
    #[must_use]
    pub fn destination(&self, at: Coord) -> ScreenRect {
        let tile = ScreenRect::tile(at.x, at.y);
        ScreenRect::new(
            tile.origin + self.offset,
            Vec2::new(self.source.width as f32, self.source.height as f32),
        )
    }
}

/// Sheet column holding the health digit for the provided hit points.
#[must_use]
pub fn health_digit(hp: i32) -> u32 {
    let tens = (hp.max(0) + 9) / 10;
    (tens - 1).clamp(0, 8) as u32
}

/// Badges to draw over the unit standing on `tile`, in drawing order.
#[must_use]
pub fn badges(unit: &Unit, tile: &Tile) -> Vec<Badge> {
    let half = (TILE_SIZE / 2) as f32;
    let mut out = Vec::new();
    let status = &unit.status;

    if status.hp <= HEALTH_BADGE_THRESHOLD {
        let row_start = if unit.can_move { 557 } else { 428 };
        let source = SourceRect::new(
            row_start + health_digit(status.hp) * HEALTH_DIGIT_STRIDE,
            1234,
            BADGE_SIZE,
            BADGE_SIZE,
        );
        out.push(Badge::new(BadgeKind::Health, source, half, half));
    }

    if status.fuel <= FUEL_BADGE_THRESHOLD {
        let source = SourceRect::new(651, 1241, BADGE_SIZE, BADGE_SIZE);
        out.push(Badge::new(BadgeKind::LowFuel, source, 0.0, 0.0));
    }

    let uses_ammo = unit.kind().is_some_and(UnitKind::uses_ammo);
    if uses_ammo && status.ammo <= AMMO_BADGE_THRESHOLD {
        let source = SourceRect::new(652, 1252, AMMO_BADGE_SIZE, AMMO_BADGE_SIZE);
        out.push(Badge::new(BadgeKind::LowAmmo, source, half + 1.0, 1.0));
    }

    if tile.capture_hp <= CAPTURE_BADGE_THRESHOLD {
        let source = SourceRect::new(530, 1233, BADGE_SIZE, BADGE_SIZE);
        out.push(Badge::new(BadgeKind::Capturing, source, 0.0, half));
    }

    if status.is_carrying() {
        let source = SourceRect::new(520, 1233, BADGE_SIZE, BADGE_SIZE);
        out.push(Badge::new(BadgeKind::Carrying, source, 0.0, half));
    }

    out
}
