//! World grid and tile types.

use serde::{Deserialize, Serialize};

/// A building that can occupy a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Building {
    /// Farm - yields income at the start of each day.
    Farm,
}

/// A defensive unit stationed on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Archer - destroys one incoming enemy and is consumed doing so.
    Archer,
}

/// A single tile of the strip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldTile {
    /// Wall strength. Each point absorbs one enemy.
    pub wall_level: u32,
    /// Building on this tile, if any.
    pub building: Option<Building>,
    /// Units garrisoned here, in the order they arrived.
    pub garrison: Vec<Unit>,
}

impl WorldTile {
    /// Create an empty tile.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            wall_level: 0,
            building: None,
            garrison: Vec::new(),
        }
    }

    /// Create a tile with a farm on it.
    #[must_use]
    pub const fn farm() -> Self {
        Self {
            wall_level: 0,
            building: Some(Building::Farm),
            garrison: Vec::new(),
        }
    }

    /// Check if at least one archer is stationed here.
    #[must_use]
    pub fn has_archer(&self) -> bool {
        self.garrison.contains(&Unit::Archer)
    }

    /// Number of archers stationed here.
    #[must_use]
    pub fn archer_count(&self) -> usize {
        self.garrison.iter().filter(|u| **u == Unit::Archer).count()
    }

    /// Remove the most recently stationed archer.
    ///
    /// Returns `false` if there was none.
    pub fn take_archer(&mut self) -> bool {
        match self.garrison.iter().rposition(|u| *u == Unit::Archer) {
            Some(idx) => {
                self.garrison.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Check if this tile holds a farm.
    #[must_use]
    pub fn is_farm(&self) -> bool {
        self.building == Some(Building::Farm)
    }
}

/// The strip of land: a fixed-length row of tiles indexed from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    tiles: Vec<WorldTile>,
}

impl World {
    /// Create a world of `len` empty tiles.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tiles: vec![WorldTile::new(); len],
        }
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the world has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get a tile by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WorldTile> {
        self.tiles.get(index)
    }

    /// Get a mutable tile by index.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut WorldTile> {
        self.tiles.get_mut(index)
    }

    /// Replace a tile. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, tile: WorldTile) {
        if let Some(slot) = self.tiles.get_mut(index) {
            *slot = tile;
        }
    }

    /// Iterate over `(index, tile)` pairs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &WorldTile)> {
        self.tiles.iter().enumerate()
    }

    /// Count tiles with a farm.
    #[must_use]
    pub fn farm_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_farm()).count()
    }

    /// Count archers across the whole strip.
    #[must_use]
    pub fn archer_count(&self) -> usize {
        self.tiles.iter().map(WorldTile::archer_count).sum()
    }

    /// Sum of all wall levels.
    #[must_use]
    pub fn wall_total(&self) -> u32 {
        self.tiles.iter().map(|t| t.wall_level).sum()
    }
}
