//! Session configuration.
//!
//! Every tunable the client uses lives here: cascade layout, debounce
//! windows, optimistic TTL, starting life and card sizing. Defaults match the
//! reference table client.

use serde::{Deserialize, Serialize};

use super::clock::Millis;

/// Grid layout for cards cascaded from hand onto the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Distance between neighbouring slots, both axes.
    pub offset: f64,
    pub initial_x: f64,
    pub initial_y: f64,
    pub max_per_row: usize,
    /// A cascaded card still occupies its slot while within this distance.
    pub tolerance: f64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            offset: 15.0,
            initial_x: 10.0,
            initial_y: 10.0,
            max_per_row: 5,
            tolerance: 5.0,
        }
    }
}

/// Debounce windows for the three named timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Display refresh (~60fps).
    pub render_ms: Millis,
    /// Outbound full-state publish.
    pub transmit_ms: Millis,
    /// Tap/untap consensus.
    pub tap_toggle_ms: Millis,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            render_ms: 16,
            transmit_ms: 50,
            tap_toggle_ms: 100,
        }
    }
}

/// Bounds for the displayed card width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSizeConfig {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl Default for CardSizeConfig {
    fn default() -> Self {
        Self {
            min: 60,
            max: 200,
            step: 10,
            default: 80,
        }
    }
}

/// Complete client session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cascade: CascadeConfig,

    pub debounce: DebounceConfig,

    /// How long a local edit shields the player's own zones from snapshots.
    pub optimistic_ttl_ms: Millis,

    /// Life total before the first snapshot arrives.
    pub default_life: i32,

    pub card_size: CardSizeConfig,

    /// Where a card lands when it enters the battlefield without a position.
    pub battlefield_origin: (f64, f64),

    /// Per-card offset when a group is dropped at one point.
    pub group_drop_offset: f64,

    /// Seed for library shuffles and generated card IDs.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cascade: CascadeConfig::default(),
            debounce: DebounceConfig::default(),
            optimistic_ttl_ms: 2_000,
            default_life: 40,
            card_size: CardSizeConfig::default(),
            battlefield_origin: (50.0, 50.0),
            group_drop_offset: 15.0,
            seed: rand::random(),
        }
    }
}

impl SessionConfig {
    /// Use a fixed seed (deterministic shuffles and IDs).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_optimistic_ttl(mut self, ttl: Millis) -> Self {
        self.optimistic_ttl_ms = ttl;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_cascade(mut self, cascade: CascadeConfig) -> Self {
        self.cascade = cascade;
        self
    }

    #[must_use]
    pub fn with_default_life(mut self, life: i32) -> Self {
        self.default_life = life;
        self
    }
}
