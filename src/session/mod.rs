//! The client session: one owned object per connection.
//!
//! `ClientSession` holds the zone store, optimistic tracker, reconciler,
//! transmitter and timers. The embedding event loop:
//! - feeds inbound messages to [`ClientSession::handle_server_message`]
//!   (or raw text to [`ClientSession::handle_wire`]),
//! - forwards player intents to the movement methods,
//! - calls [`ClientSession::tick`] when [`ClientSession::next_deadline`] passes,
//! - drains [`SessionOutput`]s and acts on them.
//!
//! All mutation happens synchronously inside one of those calls, so a
//! snapshot is never applied halfway through a local edit or vice versa.

use std::collections::VecDeque;

use crate::core::card::{CardId, Rotation};
use crate::core::clock::{Clock, Millis, SystemClock};
use crate::core::config::SessionConfig;
use crate::core::error::{Result, SessionError};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::movement::{cascade, counters, CardMovementEngine, MoveOutcome};
use crate::protocol::{
    ClientMessage, GameSnapshot, JoinRequest, RejoinRequest, SessionAccepted, ServerMessage,
};
use crate::sync::{
    MergeMode, MoveTransmitter, OptimisticActionTracker, OwnZonesOutcome, ReconciliationService,
    Scheduler, SpectatedBoard, SpectatedLibraryCache, TimerKind,
};
use crate::zones::{ZoneKind, ZoneStore, ZoneTarget};

/// Something the embedder must do.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutput {
    /// Put this message on the wire.
    Send(ClientMessage),
    /// Redraw the table.
    Render,
    /// Show the player a message.
    Notice(String),
}

pub struct ClientSession<C: Clock = SystemClock> {
    config: SessionConfig,
    clock: C,

    store: ZoneStore,
    tracker: OptimisticActionTracker,
    reconciler: ReconciliationService,
    transmitter: MoveTransmitter,
    timers: Scheduler,

    /// Reset shuffles.
    shuffle_rng: GameRng,
    /// Generated card IDs.
    id_rng: GameRng,

    room: Option<String>,
    player_id: Option<PlayerId>,
    /// Set by a rejoin; the next snapshot naming us is applied as a full resync.
    resync_pending: bool,
    snapshot: Option<GameSnapshot>,
    viewed_player: Option<PlayerId>,

    /// Latest tap/untap request, decided when the tap timer fires.
    pending_tap: Option<Vec<CardId>>,

    outbox: VecDeque<SessionOutput>,
}

impl ClientSession<SystemClock> {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> ClientSession<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            store: ZoneStore::new(config.default_life, config.card_size.default),
            tracker: OptimisticActionTracker::new(config.optimistic_ttl_ms),
            reconciler: ReconciliationService::new(SpectatedLibraryCache::new(
                rng.for_context("spectated-library"),
            )),
            transmitter: MoveTransmitter::new(),
            timers: Scheduler::new(&config.debounce),
            shuffle_rng: rng.for_context("reset"),
            id_rng: rng.for_context("card-ids"),
            room: None,
            player_id: None,
            resync_pending: false,
            snapshot: None,
            viewed_player: None,
            pending_tap: None,
            outbox: VecDeque::new(),
            config,
            clock,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    #[must_use]
    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    #[must_use]
    pub fn tracker(&self) -> &OptimisticActionTracker {
        &self.tracker
    }

    #[must_use]
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    #[must_use]
    pub fn player_id(&self) -> Option<&PlayerId> {
        self.player_id.as_ref()
    }

    #[must_use]
    pub fn is_resync_pending(&self) -> bool {
        self.resync_pending
    }

    /// Last snapshot received.
    #[must_use]
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn spectated(&self, player: &PlayerId) -> Option<&SpectatedBoard> {
        self.reconciler.spectated(player)
    }

    pub fn spectated_boards(&self) -> impl Iterator<Item = &SpectatedBoard> + '_ {
        self.reconciler.spectated_boards()
    }

    // === Timers and output ===

    /// Earliest pending timer deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Fire every due timer. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let due = self.timers.due(now);
        for timer in &due {
            log::debug!("timer {:?} fired at {}", timer, now);
            match timer {
                TimerKind::TapToggle => self.fire_tap_toggle(now),
                TimerKind::Transmit => self.fire_transmit(),
                TimerKind::Render => self.outbox.push_back(SessionOutput::Render),
            }
        }
        self.tracker.expire(now);
        due.len()
    }

    /// Take everything queued for the embedder.
    pub fn drain_output(&mut self) -> Vec<SessionOutput> {
        self.outbox.drain(..).collect()
    }

    fn fire_transmit(&mut self) {
        if self.player_id.is_none() || self.snapshot.is_none() {
            self.transmitter.discard();
            return;
        }
        let state = self.transmitter.publish(&self.store);
        self.outbox.push_back(SessionOutput::Send(ClientMessage::Move(state)));
    }

    fn fire_tap_toggle(&mut self, now: Millis) {
        let Some(ids) = self.pending_tap.take() else {
            return;
        };
        self.engine_at(now).apply_tap_toggle(&ids);
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.outbox.push_back(SessionOutput::Notice(message.into()));
    }

    fn request_render(&mut self) {
        let now = self.clock.now();
        self.timers.arm(TimerKind::Render, now);
    }

    // === Session commands ===

    /// Ask to join a room with a decklist.
    ///
    /// Names are trimmed; blank decklist lines are dropped.
    pub fn join(
        &mut self,
        room_name: &str,
        display_name: &str,
        decklist: &[String],
        commanders: &[String],
    ) -> Result<()> {
        let (room_name, display_name) = validate_names(room_name, display_name)?;
        let decklist = non_blank(decklist);
        if decklist.is_empty() {
            return Err(SessionError::EmptyDecklist);
        }
        let commanders = non_blank(commanders);

        log::info!("joining {} as {} with {} cards", room_name, display_name, decklist.len());
        self.outbox.push_back(SessionOutput::Send(ClientMessage::Join(JoinRequest {
            room_name,
            display_name,
            decklist,
            commanders,
        })));
        self.notice("Joining game...");
        Ok(())
    }

    /// Ask to rejoin a room after a disconnect. The next snapshot naming this
    /// player replaces local state wholesale.
    pub fn attempt_rejoin(&mut self, room_name: &str, display_name: &str) -> Result<()> {
        let (room_name, display_name) = validate_names(room_name, display_name)?;
        log::info!("rejoining {} as {}", room_name, display_name);
        self.resync_pending = true;
        self.outbox.push_back(SessionOutput::Send(ClientMessage::Rejoin(RejoinRequest {
            room_name,
            display_name,
        })));
        Ok(())
    }

    pub fn end_turn(&mut self) {
        self.outbox.push_back(SessionOutput::Send(ClientMessage::EndTurn));
    }

    pub fn pick_turn_order(&mut self) {
        self.outbox.push_back(SessionOutput::Send(ClientMessage::PickTurnOrder));
        self.notice("Picking random turn order...");
    }

    // === Inbound ===

    /// Decode and handle one inbound message.
    pub fn handle_wire(&mut self, text: &str) -> Result<()> {
        let message = ServerMessage::from_json(text)?;
        self.handle_server_message(message);
        Ok(())
    }

    pub fn handle_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::JoinSuccess(accepted) => {
                log::info!("joined {} as {}", accepted.room_name, accepted.player_id);
                let message = format!("Welcome! Joined room: {}", accepted.room_name);
                self.seat(accepted);
                self.notice(message);
            }
            ServerMessage::RejoinSuccess(accepted) => {
                log::info!("rejoined {} as {}", accepted.room_name, accepted.player_id);
                let message = format!("Welcome back! Rejoined room: {}", accepted.room_name);
                self.seat(accepted);
                self.resync_pending = true;
                self.reconciler.reset();
                self.notice(message);
            }
            ServerMessage::JoinError(rejected) => {
                log::warn!("join rejected: {}", rejected.message);
                self.notice(SessionError::JoinRejected(rejected.message).to_string());
            }
            ServerMessage::RejoinError(rejected) => {
                log::warn!("rejoin rejected: {}", rejected.message);
                self.resync_pending = false;
                self.notice(SessionError::RejoinRejected(rejected.message).to_string());
            }
            ServerMessage::State(snapshot) => {
                self.apply_snapshot(snapshot);
            }
            ServerMessage::Disconnect(disconnected) => {
                log::info!("disconnected: {}", disconnected.reason);
                if self.player_id.is_some() {
                    self.notice(format!(
                        "Disconnected from server: {}. Attempting to reconnect...",
                        disconnected.reason
                    ));
                }
            }
        }
    }

    fn seat(&mut self, accepted: SessionAccepted) {
        self.room = Some(accepted.room_name);
        self.viewed_player = Some(accepted.player_id.clone());
        self.player_id = Some(accepted.player_id);
    }

    /// Merge an authoritative snapshot, or fully resync after a rejoin.
    pub fn apply_snapshot(&mut self, snapshot: GameSnapshot) -> OwnZonesOutcome {
        let now = self.clock.now();
        let local = self.player_id.clone();

        let mode = match &local {
            Some(player) if self.resync_pending && snapshot.players.contains_key(player) => {
                MergeMode::FullResync
            }
            _ => MergeMode::Incremental,
        };

        self.tracker.expire(now);
        let outcome = self.reconciler.apply(
            &mut self.store,
            &snapshot,
            local.as_ref(),
            mode,
            &self.tracker,
            now,
        );
        if outcome == OwnZonesOutcome::Resynced {
            self.resync_pending = false;
            self.tracker.clear();
            log::info!("rejoin resync complete");
        }
        cascade::refresh(&mut self.store, &self.config.cascade);

        let viewed_gone = self
            .viewed_player
            .as_ref()
            .map_or(true, |viewed| !snapshot.players.contains_key(viewed));
        if viewed_gone {
            self.viewed_player = local;
        }

        self.snapshot = Some(snapshot);
        self.timers.arm(TimerKind::Render, now);
        outcome
    }

    // === Viewing ===

    /// Choose whose board is displayed.
    pub fn view_player(&mut self, player: PlayerId) {
        self.viewed_player = Some(player);
        self.request_render();
    }

    #[must_use]
    pub fn viewed_player(&self) -> Option<&PlayerId> {
        self.viewed_player.as_ref()
    }

    #[must_use]
    pub fn current_turn_player(&self) -> Option<&PlayerId> {
        self.snapshot.as_ref()?.current_turn_player()
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        match (self.current_turn_player(), &self.player_id) {
            (Some(current), Some(me)) => current == me,
            _ => false,
        }
    }

    // === Local edits ===

    /// Borrow the movement engine at the current instant.
    pub fn movement(&mut self) -> CardMovementEngine<'_> {
        let now = self.clock.now();
        self.engine_at(now)
    }

    fn engine_at(&mut self, now: Millis) -> CardMovementEngine<'_> {
        CardMovementEngine::new(
            &mut self.store,
            &mut self.tracker,
            &mut self.timers,
            &mut self.transmitter,
            &self.config,
            now,
        )
    }

    pub fn move_card(&mut self, id: &CardId, source: ZoneKind, target: ZoneKind) -> MoveOutcome {
        self.movement().move_card(id, source, target)
    }

    /// Move by UI zone keys; unknown keys do nothing.
    pub fn move_card_by_key(&mut self, id: &CardId, source: &str, target: &str) -> MoveOutcome {
        match (ZoneKind::from_key(source), ZoneKind::from_key(target)) {
            (Some(source), Some(target)) => self.move_card(id, source, target),
            _ => {
                log::debug!("ignoring move with unknown zone key {:?} -> {:?}", source, target);
                MoveOutcome::default()
            }
        }
    }

    /// Move a selection and confirm it to the player.
    pub fn move_selection(&mut self, ids: &[CardId], target: ZoneTarget) -> MoveOutcome {
        let outcome = self.movement().move_selection(ids, target);
        if let Some(message) = outcome.notice(target) {
            self.notice(message);
        }
        outcome
    }

    /// Like [`Self::move_selection`], with a context-menu target key such as
    /// `"library-bottom"`.
    pub fn move_selection_by_key(&mut self, ids: &[CardId], target: &str) -> MoveOutcome {
        match ZoneTarget::from_key(target) {
            Some(target) => self.move_selection(ids, target),
            None => MoveOutcome::default(),
        }
    }

    /// Queue a tap/untap of `ids`. Repeated calls inside the window collapse;
    /// the consensus is decided from the board when the timer fires.
    pub fn toggle_tap(&mut self, ids: &[CardId]) {
        let now = self.clock.now();
        self.pending_tap = Some(ids.to_vec());
        self.timers.arm(TimerKind::TapToggle, now);
    }

    /// Apply a tap/untap immediately, bypassing the debounce.
    pub fn toggle_tap_now(&mut self, ids: &[CardId]) -> Option<Rotation> {
        self.pending_tap = None;
        self.timers.cancel(TimerKind::TapToggle);
        self.movement().apply_tap_toggle(ids)
    }

    /// Parse player-entered text and set it as the counter value on `ids`.
    ///
    /// Malformed text leaves every card unchanged.
    pub fn set_counters_from_input(&mut self, ids: &[CardId], input: &str) -> Result<usize> {
        let value = counters::parse_input(input)?;
        let changed = self.movement().set_counters(ids, value);
        if let Some(message) = counters::bulk_notice(value, changed) {
            self.notice(message);
        }
        Ok(changed)
    }

    /// Create a placeholder token on the battlefield; returns its new ID.
    pub fn create_placeholder(&mut self, text: &str) -> Option<CardId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.fresh_card_id();
        self.movement()
            .create_placeholder(id.clone(), text)
            .then_some(id)
    }

    fn fresh_card_id(&mut self) -> CardId {
        loop {
            let id = CardId::new(format!("card-{:016x}", self.id_rng.next_u64()));
            if !self.store.contains(&id) {
                return id;
            }
        }
    }

    /// Shuffle every non-commander card back into the library.
    pub fn reset_all_cards(&mut self) {
        let now = self.clock.now();
        let mut rng = self.shuffle_rng.clone();
        let outcome = self.engine_at(now).reset_all(&mut rng);
        self.shuffle_rng = rng;
        self.notice(outcome.notice());
    }

    pub fn increase_life(&mut self) -> i32 {
        self.movement().adjust_life(1)
    }

    pub fn decrease_life(&mut self) -> i32 {
        self.movement().adjust_life(-1)
    }

    /// Grow the displayed card width by one step, up to the maximum.
    pub fn increase_card_width(&mut self) -> u32 {
        let size = self.config.card_size;
        let width = self.store.card_width();
        if width < size.max {
            self.store.set_card_width((width + size.step).min(size.max));
            self.request_render();
        }
        self.store.card_width()
    }

    /// Shrink the displayed card width by one step, down to the minimum.
    pub fn decrease_card_width(&mut self) -> u32 {
        let size = self.config.card_size;
        let width = self.store.card_width();
        if width > size.min {
            self.store
                .set_card_width(width.saturating_sub(size.step).max(size.min));
            self.request_render();
        }
        self.store.card_width()
    }
}

fn validate_names(room_name: &str, display_name: &str) -> Result<(String, String)> {
    let room_name = room_name.trim();
    let display_name = display_name.trim();
    if room_name.is_empty() || display_name.is_empty() {
        return Err(SessionError::MissingRoomOrName);
    }
    Ok((room_name.to_owned(), display_name.to_owned()))
}

fn non_blank(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
