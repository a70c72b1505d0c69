//! Grid placement for cards cascaded from hand onto the battlefield.
//!
//! Slot `n` sits at row `n / max_per_row`, column `n % max_per_row`. The
//! occupied-slot count is recomputed by walking the battlefield: a cascaded
//! card counts only while it still sits (within tolerance) on the slot its
//! cascade index implies, so dragging one away frees its slot.

use crate::core::card::Card;
use crate::core::config::CascadeConfig;
use crate::zones::{ZoneKind, ZoneStore};

/// Position of cascade slot `index`.
#[must_use]
pub fn slot_position(config: &CascadeConfig, index: usize) -> (f64, f64) {
    let per_row = config.max_per_row.max(1);
    let row = (index / per_row) as f64;
    let col = (index % per_row) as f64;
    (
        config.initial_x + col * config.offset,
        config.initial_y + row * config.offset,
    )
}

/// Count cascaded cards still on their implied slots.
#[must_use]
pub fn occupied_slots<'a>(
    config: &CascadeConfig,
    battlefield: impl IntoIterator<Item = &'a Card>,
) -> usize {
    let mut count = 0;
    for card in battlefield {
        if !card.from_hand_cascade {
            continue;
        }
        let Some((x, y)) = card.position() else {
            continue;
        };
        let (expected_x, expected_y) = slot_position(config, count);
        if (x - expected_x).abs() < config.tolerance && (y - expected_y).abs() < config.tolerance {
            count += 1;
        }
    }
    count
}

/// Recompute and store the battlefield's occupied-slot count.
pub fn refresh(store: &mut ZoneStore, config: &CascadeConfig) -> usize {
    let count = occupied_slots(config, store.get(ZoneKind::Battlefield).iter());
    store.set_cascade_count(count);
    count
}
