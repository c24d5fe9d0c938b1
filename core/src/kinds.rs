//! Enumerations identifying armies, terrain and unit kinds.
//!
//! Kind names travel over the wire as the server's upper-case identifiers.
//! Terrain and unit names the client does not know are preserved verbatim in
//! [`TerrainType::Unrecognized`] and [`UnitType::Unrecognized`] so a single
//! unexpected tile never invalidates a whole snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Competing side that owns units and structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Army {
    /// Red army.
    Red,
    /// Blue army.
    Blue,
    /// Green army.
    Green,
    /// Yellow army.
    Yellow,
    /// Grey army.
    Grey,
}

impl Army {
    /// Every army, in sheet order.
    pub const ALL: [Army; 5] = [
        Army::Red,
        Army::Blue,
        Army::Green,
        Army::Yellow,
        Army::Grey,
    ];

    /// Upper-case name used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Army::Red => "RED",
            Army::Blue => "BLUE",
            Army::Green => "GREEN",
            Army::Yellow => "YELLOW",
            Army::Grey => "GREY",
        }
    }
}

impl fmt::Display for Army {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Domain of units a production structure builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductionDomain {
    /// Factories build ground units.
    Ground,
    /// Airports build air units.
    Air,
    /// Ports build sea units.
    Sea,
}

/// Terrain identity of a board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)] // Variants mirror the server's terrain identifiers one to one.
pub enum TerrainKind {
    Plain,
    Wood,
    Mountain,
    RoadHorizontal,
    RoadVertical,
    RoadNorthWest,
    RoadNorthEast,
    RoadSouthEast,
    RoadSouthWest,
    RoadJunctionSwn,
    RoadJunctionEsw,
    RoadJunctionWne,
    RoadJunctionNes,
    RoadCross,
    City,
    Factory,
    Airport,
    Port,
    ComTower,
    BaseTower0,
    BaseTower1,
    BaseTower2,
    Lab,
    RiverHorizontal,
    RiverVertical,
    RiverNorthEast,
    RiverNorthWest,
    RiverSouthEast,
    RiverSouthWest,
    RiverJunctionEsw,
    RiverJunctionNes,
    RiverJunctionWne,
    RiverJunctionSwn,
    BeachNorthEast,
    BeachNorthWest,
    BeachSouthWest,
    BeachSouthEast,
    BeachNorth,
    BeachEast,
    BeachSouth,
    BeachWest,
    BeachEndNorth,
    BeachEndEast,
    BeachEndSouth,
    BeachEndWest,
    PipeVertical,
    PipeEndNorth,
    PipeEndSouth,
    PipeEndWest,
    PipeEndEast,
    PipeEndNorthEast,
    PipeEndNorthWest,
    PipeEndSouthWest,
    PipeEndSouthEast,
    PipeHorizontal,
    Sea,
    BridgeHorizontal,
    BridgeVertical,
    Reef,
    MissileSilo,
    EmptySilo,
}

impl TerrainKind {
    /// Every terrain kind known to the client.
    pub const ALL: &'static [TerrainKind] = &[
        TerrainKind::Plain,
        TerrainKind::Wood,
        TerrainKind::Mountain,
        TerrainKind::RoadHorizontal,
        TerrainKind::RoadVertical,
        TerrainKind::RoadNorthWest,
        TerrainKind::RoadNorthEast,
        TerrainKind::RoadSouthEast,
        TerrainKind::RoadSouthWest,
        TerrainKind::RoadJunctionSwn,
        TerrainKind::RoadJunctionEsw,
        TerrainKind::RoadJunctionWne,
        TerrainKind::RoadJunctionNes,
        TerrainKind::RoadCross,
        TerrainKind::City,
        TerrainKind::Factory,
        TerrainKind::Airport,
        TerrainKind::Port,
        TerrainKind::ComTower,
        TerrainKind::BaseTower0,
        TerrainKind::BaseTower1,
        TerrainKind::BaseTower2,
        TerrainKind::Lab,
        TerrainKind::RiverHorizontal,
        TerrainKind::RiverVertical,
        TerrainKind::RiverNorthEast,
        TerrainKind::RiverNorthWest,
        TerrainKind::RiverSouthEast,
        TerrainKind::RiverSouthWest,
        TerrainKind::RiverJunctionEsw,
        TerrainKind::RiverJunctionNes,
        TerrainKind::RiverJunctionWne,
        TerrainKind::RiverJunctionSwn,
        TerrainKind::BeachNorthEast,
        TerrainKind::BeachNorthWest,
        TerrainKind::BeachSouthWest,
        TerrainKind::BeachSouthEast,
        TerrainKind::BeachNorth,
        TerrainKind::BeachEast,
        TerrainKind::BeachSouth,
        TerrainKind::BeachWest,
        TerrainKind::BeachEndNorth,
        TerrainKind::BeachEndEast,
        TerrainKind::BeachEndSouth,
        TerrainKind::BeachEndWest,
        TerrainKind::PipeVertical,
        TerrainKind::PipeEndNorth,
        TerrainKind::PipeEndSouth,
        TerrainKind::PipeEndWest,
        TerrainKind::PipeEndEast,
        TerrainKind::PipeEndNorthEast,
        TerrainKind::PipeEndNorthWest,
        TerrainKind::PipeEndSouthWest,
        TerrainKind::PipeEndSouthEast,
        TerrainKind::PipeHorizontal,
        TerrainKind::Sea,
        TerrainKind::BridgeHorizontal,
        TerrainKind::BridgeVertical,
        TerrainKind::Reef,
        TerrainKind::MissileSilo,
        TerrainKind::EmptySilo,
    ];

    /// Identifier used by the server for this terrain.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TerrainKind::Plain => "PLAIN",
            TerrainKind::Wood => "WOOD",
            TerrainKind::Mountain => "MOUNTAIN",
            TerrainKind::RoadHorizontal => "ROAD_HORT",
            TerrainKind::RoadVertical => "ROAD_VERT",
            TerrainKind::RoadNorthWest => "ROAD_NW",
            TerrainKind::RoadNorthEast => "ROAD_NE",
            TerrainKind::RoadSouthEast => "ROAD_SE",
            TerrainKind::RoadSouthWest => "ROAD_SW",
            TerrainKind::RoadJunctionSwn => "SWNRoad",
            TerrainKind::RoadJunctionEsw => "ESWRoad",
            TerrainKind::RoadJunctionWne => "WNERoad",
            TerrainKind::RoadJunctionNes => "NESRoad",
            TerrainKind::RoadCross => "CRoad",
            TerrainKind::City => "CITY",
            TerrainKind::Factory => "FACTORY",
            TerrainKind::Airport => "AIRPORT",
            TerrainKind::Port => "PORT",
            TerrainKind::ComTower => "COM_TOWER",
            TerrainKind::BaseTower0 => "BASE_TOWER_0",
            TerrainKind::BaseTower1 => "BASE_TOWER_1",
            TerrainKind::BaseTower2 => "BASE_TOWER_2",
            TerrainKind::Lab => "LAB",
            TerrainKind::RiverHorizontal => "RIVER_HORT",
            TerrainKind::RiverVertical => "RIVER_VERT",
            TerrainKind::RiverNorthEast => "RIVER_NE",
            TerrainKind::RiverNorthWest => "RIVER_NW",
            TerrainKind::RiverSouthEast => "RIVER_SE",
            TerrainKind::RiverSouthWest => "RIVER_SW",
            TerrainKind::RiverJunctionEsw => "ESWRiver",
            TerrainKind::RiverJunctionNes => "NESRiver",
            TerrainKind::RiverJunctionWne => "WNERiver",
            TerrainKind::RiverJunctionSwn => "SWNRiver",
            TerrainKind::BeachNorthEast => "BEACH_NE",
            TerrainKind::BeachNorthWest => "BEACH_NW",
            TerrainKind::BeachSouthWest => "BEACH_SW",
            TerrainKind::BeachSouthEast => "BEACH_SE",
            TerrainKind::BeachNorth => "BEACH_N",
            TerrainKind::BeachEast => "BEACH_E",
            TerrainKind::BeachSouth => "BEACH_S",
            TerrainKind::BeachWest => "BEACH_W",
            TerrainKind::BeachEndNorth => "BEACH_END_N",
            TerrainKind::BeachEndEast => "BEACH_END_E",
            TerrainKind::BeachEndSouth => "BEACH_END_S",
            TerrainKind::BeachEndWest => "BEACH_END_W",
            TerrainKind::PipeVertical => "PIPE_VERT",
            TerrainKind::PipeEndNorth => "PIPE_END_N",
            TerrainKind::PipeEndSouth => "PIPE_END_S",
            TerrainKind::PipeEndWest => "PIPE_END_W",
            TerrainKind::PipeEndEast => "PIPE_END_E",
            TerrainKind::PipeEndNorthEast => "PIPE_END_NE",
            TerrainKind::PipeEndNorthWest => "PIPE_END_NW",
            TerrainKind::PipeEndSouthWest => "PIPE_END_SW",
            TerrainKind::PipeEndSouthEast => "PIPE_END_SE",
            TerrainKind::PipeHorizontal => "PIPE_HORT",
            TerrainKind::Sea => "SEA",
            TerrainKind::BridgeHorizontal => "HBridge",
            TerrainKind::BridgeVertical => "VBridge",
            TerrainKind::Reef => "REEF",
            TerrainKind::MissileSilo => "MISSILE_SILO",
            TerrainKind::EmptySilo => "EMPTY_SILO",
        }
    }

    /// Looks up a terrain kind by its server identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether infantry-class units can capture this structure.
    #[must_use]
    pub const fn is_capturable(self) -> bool {
        matches!(
            self,
            TerrainKind::City
                | TerrainKind::BaseTower1
                | TerrainKind::Factory
                | TerrainKind::Port
                | TerrainKind::Airport
        )
    }

    /// Domain of units this structure produces, if it is a production structure.
    #[must_use]
    pub const fn production_domain(self) -> Option<ProductionDomain> {
        match self {
            TerrainKind::Factory => Some(ProductionDomain::Ground),
            TerrainKind::Airport => Some(ProductionDomain::Air),
            TerrainKind::Port => Some(ProductionDomain::Sea),
            _ => None,
        }
    }
}

/// Wire-level terrain identifier that tolerates names unknown to the client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TerrainType {
    /// A terrain kind the client knows how to present.
    Known(TerrainKind),
    /// A terrain name the client does not recognise.
    Unrecognized(String),
}

impl TerrainType {
    /// Known terrain kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<TerrainKind> {
        match self {
            TerrainType::Known(kind) => Some(*kind),
            TerrainType::Unrecognized(_) => None,
        }
    }

    /// Identifier as sent by the server.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TerrainType::Known(kind) => kind.name(),
            TerrainType::Unrecognized(name) => name,
        }
    }
}

impl From<TerrainKind> for TerrainType {
    fn from(kind: TerrainKind) -> Self {
        TerrainType::Known(kind)
    }
}

impl From<String> for TerrainType {
    fn from(name: String) -> Self {
        match TerrainKind::from_name(&name) {
            Some(kind) => TerrainType::Known(kind),
            None => TerrainType::Unrecognized(name),
        }
    }
}

impl From<TerrainType> for String {
    fn from(terrain: TerrainType) -> Self {
        match terrain {
            TerrainType::Known(kind) => kind.name().to_string(),
            TerrainType::Unrecognized(name) => name,
        }
    }
}

/// Kind of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)] // Variants mirror the server's unit identifiers one to one.
pub enum UnitKind {
    AntiAir,
    Apc,
    Artillery,
    BCopter,
    Battleship,
    BlackBoat,
    BlackBomb,
    Bomber,
    Carrier,
    Cruiser,
    Fighter,
    Infantry,
    Lander,
    MediumTank,
    Mech,
    MegaTank,
    Missile,
    NeoTank,
    PipeRunner,
    Recon,
    Rocket,
    Stealth,
    Sub,
    TCopter,
    Tank,
}

impl UnitKind {
    /// Every unit kind the server defines.
    pub const ALL: [UnitKind; 25] = [
        UnitKind::AntiAir,
        UnitKind::Apc,
        UnitKind::Artillery,
        UnitKind::BCopter,
        UnitKind::Battleship,
        UnitKind::BlackBoat,
        UnitKind::BlackBomb,
        UnitKind::Bomber,
        UnitKind::Carrier,
        UnitKind::Cruiser,
        UnitKind::Fighter,
        UnitKind::Infantry,
        UnitKind::Lander,
        UnitKind::MediumTank,
        UnitKind::Mech,
        UnitKind::MegaTank,
        UnitKind::Missile,
        UnitKind::NeoTank,
        UnitKind::PipeRunner,
        UnitKind::Recon,
        UnitKind::Rocket,
        UnitKind::Stealth,
        UnitKind::Sub,
        UnitKind::TCopter,
        UnitKind::Tank,
    ];

    /// Identifier used by the server for this unit kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnitKind::AntiAir => "ANTIAIR",
            UnitKind::Apc => "APC",
            UnitKind::Artillery => "ARTILLERY",
            UnitKind::BCopter => "BCOPTER",
            UnitKind::Battleship => "BATTLESHIP",
            UnitKind::BlackBoat => "BLACKBOAT",
            UnitKind::BlackBomb => "BLACKBOMB",
            UnitKind::Bomber => "BOMBER",
            UnitKind::Carrier => "CARRIER",
            UnitKind::Cruiser => "CRUISER",
            UnitKind::Fighter => "FIGHTER",
            UnitKind::Infantry => "INFANTRY",
            UnitKind::Lander => "LANDER",
            UnitKind::MediumTank => "MEDIUMTANK",
            UnitKind::Mech => "MECH",
            UnitKind::MegaTank => "MEGATANK",
            UnitKind::Missile => "MISSILE",
            UnitKind::NeoTank => "NEOTANK",
            UnitKind::PipeRunner => "PIPERUNNER",
            UnitKind::Recon => "RECON",
            UnitKind::Rocket => "ROCKET",
            UnitKind::Stealth => "STEALTH",
            UnitKind::Sub => "SUB",
            UnitKind::TCopter => "TCOPTER",
            UnitKind::Tank => "TANK",
        }
    }

    /// Looks up a unit kind by its server identifier, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Whether the unit belongs to the infantry class that may capture structures.
    #[must_use]
    pub const fn is_infantry_class(self) -> bool {
        matches!(self, UnitKind::Infantry | UnitKind::Mech)
    }

    /// Whether the unit's primary weapon draws from a limited ammo supply.
    #[must_use]
    pub const fn uses_ammo(self) -> bool {
        !matches!(
            self,
            UnitKind::Infantry
                | UnitKind::Apc
                | UnitKind::TCopter
                | UnitKind::Lander
                | UnitKind::BlackBoat
                | UnitKind::BlackBomb
        )
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire-level unit identifier that tolerates names unknown to the client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitType {
    /// A unit kind the client knows how to present.
    Known(UnitKind),
    /// A unit name the client does not recognise.
    Unrecognized(String),
}

impl UnitType {
    /// Known unit kind, if any.
    #[must_use]
    pub fn kind(&self) -> Option<UnitKind> {
        match self {
            UnitType::Known(kind) => Some(*kind),
            UnitType::Unrecognized(_) => None,
        }
    }

    /// Identifier as sent by the server.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            UnitType::Known(kind) => kind.name(),
            UnitType::Unrecognized(name) => name,
        }
    }
}

impl From<UnitKind> for UnitType {
    fn from(kind: UnitKind) -> Self {
        UnitType::Known(kind)
    }
}

impl From<String> for UnitType {
    fn from(name: String) -> Self {
        match UnitKind::from_name(&name) {
            Some(kind) => UnitType::Known(kind),
            None => UnitType::Unrecognized(name),
        }
    }
}

impl From<UnitType> for String {
    fn from(unit: UnitType) -> Self {
        match unit {
            UnitType::Known(kind) => kind.name().to_string(),
            UnitType::Unrecognized(name) => name,
        }
    }
}
