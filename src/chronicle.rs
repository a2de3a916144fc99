//! Daily flavor text.
//!
//! Tidings are cosmetic: they are logged and otherwise ignored. Providers may
//! fail for any reason; [`tell`] always comes back with something to print.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

use crate::game::GameState;

/// Text used whenever a provider fails.
pub const FALLBACK_TIDINGS: &str = "A strange silence falls over the land.";

/// Lines told by [`CannedChronicle`].
pub const CANNED_TIDINGS: [&str; 5] = [
    "A quiet day dawns over the kingdom.",
    "The wind whispers secrets through the trees.",
    "A travelling merchant passes by, but does not stop.",
    "Your subjects seem content today.",
    "Dark clouds gather on the horizon, a bad omen perhaps.",
];

/// What a provider gets to see of the kingdom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayContext {
    /// Current day.
    pub day: u32,
    /// Treasury.
    pub coins: u32,
    /// Idle peasants.
    pub peasants: u32,
    /// Farms on the board.
    pub farms: usize,
    /// Archers on the board.
    pub archers: usize,
}

impl DayContext {
    /// Capture the parts of a state a provider may see.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            day: state.day,
            coins: state.coins,
            peasants: state.peasants,
            farms: state.world.farm_count(),
            archers: state.world.archer_count(),
        }
    }
}

/// Provider failure. Never shown to the player.
#[derive(Debug, Error)]
pub enum ChronicleError {
    /// The provider is not set up (for example, missing credentials).
    #[error("chronicle provider unavailable: {0}")]
    Unavailable(String),
    /// The provider answered with nothing usable.
    #[error("chronicle provider returned no text")]
    Empty,
}

/// Source of daily flavor text.
pub trait ChronicleProvider: Send + Sync {
    /// Compose one or two sentences for the start of the day.
    ///
    /// # Errors
    ///
    /// Any failure; callers substitute [`FALLBACK_TIDINGS`].
    fn compose(&self, context: &DayContext) -> Result<String, ChronicleError>;
}

/// Offline provider that picks from [`CANNED_TIDINGS`].
#[derive(Debug)]
pub struct CannedChronicle {
    rng: Mutex<StdRng>,
}

impl CannedChronicle {
    /// Create a provider with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for CannedChronicle {
    fn default() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl ChronicleProvider for CannedChronicle {
    fn compose(&self, _context: &DayContext) -> Result<String, ChronicleError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ChronicleError::Unavailable("canned chronicle lock poisoned".into()))?;
        let line = CANNED_TIDINGS[rng.random_range(0..CANNED_TIDINGS.len())];
        Ok(line.to_string())
    }
}

/// Ask a provider for tidings, falling back to [`FALLBACK_TIDINGS`].
#[must_use]
pub fn tell(provider: &dyn ChronicleProvider, context: &DayContext) -> String {
    match provider.compose(context) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!(day = context.day, error = %ChronicleError::Empty, "chronicle failed");
            FALLBACK_TIDINGS.to_string()
        }
        Err(error) => {
            warn!(day = context.day, %error, "chronicle failed");
            FALLBACK_TIDINGS.to_string()
        }
    }
}
