//! Battlefield collaborator interfaces.
//!
//! The engine never owns the map. It consumes a narrow read-only view
//! ([`MapView`]) plus a handful of ambient context enums, all supplied by
//! the host per resolution call. [`FlatMap`] is a minimal implementation
//! for tests and demos.

use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};

/// Terrain type of a single hex.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Clear ground.
    Open,
    /// Broken ground; no to-hit effect, slows movement (host's concern).
    Rough,
    /// Sparse trees.
    LightWoods,
    /// Dense trees.
    HeavyWoods,
    /// Surface water; depth carried on the hex.
    Water,
    /// Building rubble or standing structure.
    Building,
}

impl Terrain {
    /// Returns true for woods of either density.
    #[must_use]
    pub const fn is_woods(self) -> bool {
        matches!(self, Self::LightWoods | Self::HeavyWoods)
    }
}

/// One hex of battlefield state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    /// Terrain type.
    pub terrain: Terrain,
    /// Elevation in levels above the map floor.
    pub elevation: i32,
    /// Water depth in levels (zero for dry hexes).
    pub depth: i32,
    /// Cover rating granted by the hex (0 = none).
    pub cover: i32,
    /// Whether a unit currently occupies the hex.
    pub occupied: bool,
}

impl Hex {
    /// An open, dry, unoccupied hex at ground level.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            terrain: Terrain::Open,
            elevation: 0,
            depth: 0,
            cover: 0,
            occupied: false,
        }
    }
}

impl Default for Hex {
    fn default() -> Self {
        Self::open()
    }
}

/// Result of a line-of-sight query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOfSight {
    /// Whether the sight line is clear.
    pub clear: bool,
    /// Hexes that interrupt or degrade the line, in order.
    pub intervening: Vec<HexCoord>,
}

/// Read-only battlefield query interface supplied by the host.
///
/// The engine calls these during validation and to-hit calculation; it never
/// writes through this trait.
pub trait MapView {
    /// Returns the hex at a coordinate, or `None` when the coordinate is
    /// outside the battlefield (reported to callers as a not-found failure,
    /// never a panic).
    fn hex(&self, at: HexCoord) -> Option<Hex>;

    /// Hex distance between two coordinates.
    fn distance(&self, a: HexCoord, b: HexCoord) -> i32 {
        a.distance(b)
    }

    /// Line of sight between two coordinates.
    fn line_of_sight(&self, a: HexCoord, b: HexCoord) -> LineOfSight;
}

/// Rectangular all-open map.
///
/// Every in-bounds hex is open ground with clear line of sight. Suitable for
/// tests and for hosts that model terrain elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMap {
    width: i32,
    height: i32,
}

impl FlatMap {
    /// Creates a map covering `0..width` × `0..height` in axial coordinates.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl MapView for FlatMap {
    fn hex(&self, at: HexCoord) -> Option<Hex> {
        if (0..self.width).contains(&at.q) && (0..self.height).contains(&at.r) {
            Some(Hex::open())
        } else {
            None
        }
    }

    fn line_of_sight(&self, _a: HexCoord, _b: HexCoord) -> LineOfSight {
        LineOfSight {
            clear: true,
            intervening: Vec::new(),
        }
    }
}

/// Ambient weather for the current turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    /// No weather effects.
    Clear,
    /// Ground fog.
    Fog,
    /// Light rain.
    LightRain,
    /// Heavy rain.
    HeavyRain,
    /// Falling snow.
    Snow,
}

impl Weather {
    /// To-hit penalty contributed by the weather tier.
    #[must_use]
    pub const fn to_hit_penalty(self) -> i32 {
        match self {
            Self::Clear => 0,
            Self::Fog | Self::LightRain => 1,
            Self::HeavyRain | Self::Snow => 2,
        }
    }
}

/// Time of day for the current turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Full daylight.
    Day,
    /// Failing light.
    Dusk,
    /// Darkness.
    Night,
}

impl TimeOfDay {
    /// To-hit penalty contributed by the light level.
    #[must_use]
    pub const fn to_hit_penalty(self) -> i32 {
        match self {
            Self::Day => 0,
            Self::Dusk => 1,
            Self::Night => 2,
        }
    }
}

/// Current phase of the turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Movement phase.
    Movement,
    /// Combat phase.
    Combat,
    /// End-of-turn bookkeeping.
    End,
}

/// Read-only ambient context handed to every resolution call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleContext {
    /// Current weather.
    pub weather: Weather,
    /// Current time of day.
    pub time: TimeOfDay,
    /// Current turn phase.
    pub phase: Phase,
}

impl BattleContext {
    /// Clear daytime combat-phase context.
    #[must_use]
    pub const fn clear_day() -> Self {
        Self {
            weather: Weather::Clear,
            time: TimeOfDay::Day,
            phase: Phase::Combat,
        }
    }

    /// Combined weather + light to-hit penalty.
    #[must_use]
    pub const fn visibility_penalty(self) -> i32 {
        self.weather.to_hit_penalty() + self.time.to_hit_penalty()
    }
}

impl Default for BattleContext {
    fn default() -> Self {
        Self::clear_day()
    }
}
