//! Core client types: cards, players, clock, RNG, configuration, errors.

pub mod card;
pub mod player;
pub mod rng;
pub mod clock;
pub mod config;
pub mod error;

pub use card::{Card, CardId, Face, Rotation};
pub use player::PlayerId;
pub use rng::GameRng;
pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use config::{CardSizeConfig, CascadeConfig, DebounceConfig, SessionConfig};
pub use error::{Result, SessionError};
