//! Counter arithmetic. Zero is never stored: it removes the field.

use std::num::NonZeroI32;

use crate::core::card::Card;
use crate::core::error::{Result, SessionError};

/// Add one counter. Returns `true` (the card always changes).
pub fn increment(card: &mut Card) -> bool {
    card.counters = NonZeroI32::new(card.counter_value().saturating_add(1));
    true
}

/// Remove one counter. A card without counters is left alone.
pub fn decrement(card: &mut Card) -> bool {
    let Some(current) = card.counters else {
        return false;
    };
    card.counters = NonZeroI32::new(current.get().saturating_sub(1));
    true
}

/// Set an explicit value; zero removes the field, negatives are kept.
///
/// Returns `true` if the card changed.
pub fn set(card: &mut Card, value: i32) -> bool {
    let next = NonZeroI32::new(value);
    if card.counters == next {
        return false;
    }
    card.counters = next;
    true
}

/// Parse player-entered counter text.
pub fn parse_input(input: &str) -> Result<i32> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| SessionError::MalformedCounter(input.to_owned()))
}

/// Confirmation for a bulk counter edit, or `None` if nothing changed.
#[must_use]
pub fn bulk_notice(value: i32, changed: usize) -> Option<String> {
    if changed == 0 {
        return None;
    }
    let plural = if changed == 1 { "" } else { "s" };
    Some(if value == 0 {
        format!("Removed counters from {changed} card{plural}.")
    } else {
        format!("Set counters to {value:+} on {changed} card{plural}.")
    })
}
