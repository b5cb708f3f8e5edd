//! Simulation ticks and per-tick input buffering.
//!
//! Both peers step the same fixed-rate clock. Inputs are stored per tick so any tick can be
//! re-simulated deterministically, and so accumulated axes can be turned back into deltas by
//! comparing two ticks.

use crate::constants::INPUT_BUFFER_CAPACITY;
use std::collections::VecDeque;

/// A wrapping 31-bit simulation tick index with an invalid sentinel.
///
/// # Storage layout
/// `raw = (tick_index << 1) | 1` for valid ticks, `raw = 0` for [`NetworkTick::INVALID`].
/// Treat the raw value as a wire/storage format.
///
/// Comparisons are wrap-aware: a tick is newer than another when it is less than half the
/// 31-bit range ahead of it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NetworkTick(u32);

impl NetworkTick {
    pub const INVALID: Self = Self(0);

    /// Largest representable tick index.
    pub const MAX_INDEX: u32 = u32::MAX >> 1;

    pub const fn new(tick_index: u32) -> Self {
        Self((tick_index << 1) | 1)
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    pub const fn tick_index(self) -> u32 {
        self.0 >> 1
    }

    /// Advances by one tick. Invalid ticks stay invalid.
    pub fn increment(&mut self) {
        if self.is_valid() {
            self.0 = self.0.wrapping_add(2);
        }
    }

    /// Steps back one tick. Invalid ticks stay invalid.
    pub fn decrement(&mut self) {
        if self.is_valid() {
            self.0 = self.0.wrapping_sub(2);
        }
    }

    pub fn next(mut self) -> Self {
        self.increment();
        self
    }

    pub fn previous(mut self) -> Self {
        self.decrement();
        self
    }

    /// Signed number of ticks from `older` to `self`.
    ///
    /// Both ticks must be valid.
    pub fn ticks_since(self, older: Self) -> i32 {
        debug_assert!(self.is_valid() && older.is_valid());
        (self.0.wrapping_sub(older.0) as i32) >> 1
    }

    pub fn is_newer_than(self, other: Self) -> bool {
        self.ticks_since(other) > 0
    }
}

/// The simulation clock as seen by the systems of one peer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkTime {
    /// The tick currently being simulated.
    pub server_tick: NetworkTick,
}

impl NetworkTime {
    /// A clock about to simulate its first tick.
    pub const fn starting() -> Self {
        Self {
            server_tick: NetworkTick::new(0),
        }
    }

    pub fn advance(&mut self) {
        self.server_tick.increment();
    }

    /// Moves the clock `lead` ticks ahead of `server_tick` when it is invalid or has drifted
    /// more than `threshold` ticks away from that target. Returns whether the clock moved.
    pub fn sync_to_server(&mut self, server_tick: NetworkTick, lead: u32, threshold: i32) -> bool {
        if !server_tick.is_valid() {
            return false;
        }
        let mut target = server_tick;
        for _ in 0..lead {
            target.increment();
        }
        if self.server_tick.is_valid() && self.server_tick.ticks_since(target).abs() <= threshold {
            return false;
        }
        self.server_tick = target;
        true
    }
}

/// The tick being simulated and the one before it.
#[inline]
pub fn current_and_previous_tick(time: &NetworkTime) -> (NetworkTick, NetworkTick) {
    let current = time.server_tick;
    (current, current.previous())
}

/// Input records that carry edge-triggered event counters.
///
/// An [`InputBuffer`] stores each tick's own event counts and hands out cumulative counts
/// (summed over every older buffered entry), so an edge is never lost when a tick's entry is
/// missing. Levels (axes, held buttons) are stored as-is.
pub trait TickInput: Clone + Default {
    /// Adds `previous`'s event counters into `self`.
    fn accumulate_events(&mut self, previous: &Self);

    /// Subtracts `previous`'s event counters from `self`, reverting [`Self::accumulate_events`].
    fn isolate_events(&mut self, previous: &Self);

    /// Drops all event counters, keeping levels.
    fn clear_events(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickedInput<T> {
    pub tick: NetworkTick,
    /// Levels and the events of this tick alone.
    pub input: T,
}

/// Ring of the most recent ticked inputs, oldest first.
#[derive(Clone, Debug)]
pub struct InputBuffer<T> {
    entries: VecDeque<TickedInput<T>>,
}

impl<T> Default for InputBuffer<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(INPUT_BUFFER_CAPACITY),
        }
    }
}

impl<T: TickInput> InputBuffer<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickedInput<T>> {
        self.entries.iter()
    }

    pub fn newest_tick(&self) -> Option<NetworkTick> {
        self.entries.back().map(|e| e.tick)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Stores `input` for `tick`, replacing any entry for the same tick.
    ///
    /// `input` carries the events of `tick` alone. Ticks may arrive in any order. When the
    /// buffer is full the oldest entry is evicted. Invalid ticks are ignored.
    pub fn add(&mut self, tick: NetworkTick, input: T) {
        if !tick.is_valid() {
            return;
        }

        // Position of the first entry not older than `tick`.
        let position = self
            .entries
            .iter()
            .position(|e| !tick.is_newer_than(e.tick))
            .unwrap_or(self.entries.len());

        match self.entries.get_mut(position) {
            Some(entry) if entry.tick == tick => entry.input = input,
            _ => self.entries.insert(position, TickedInput { tick, input }),
        }

        while self.entries.len() > INPUT_BUFFER_CAPACITY {
            self.entries.pop_front();
        }
    }

    fn index_at_tick(&self, tick: NetworkTick) -> Option<usize> {
        if !tick.is_valid() {
            return None;
        }
        self.entries
            .iter()
            .rposition(|e| !e.tick.is_newer_than(tick))
    }

    /// The newest buffered entry whose tick is not newer than `tick`, as stored.
    pub fn entry_at_tick(&self, tick: NetworkTick) -> Option<&TickedInput<T>> {
        self.index_at_tick(tick).map(|index| &self.entries[index])
    }

    /// Levels of [`Self::entry_at_tick`] with event counters accumulated over every buffered
    /// entry up to it.
    pub fn data_at_tick(&self, tick: NetworkTick) -> Option<T> {
        let index = self.index_at_tick(tick)?;
        let mut data = self.entries[index].input.clone();
        for older in self.entries.range(..index) {
            data.accumulate_events(&older.input);
        }
        Some(data)
    }

    /// The input to simulate at `tick`.
    ///
    /// Levels come from the newest entry not newer than `tick`, so a missing tick repeats the
    /// last known levels. Events are only reported when an entry exists for exactly `tick`.
    pub fn input_for_tick(&self, tick: NetworkTick) -> Option<T> {
        let entry = self.entry_at_tick(tick)?;
        let mut input = entry.input.clone();
        if entry.tick != tick {
            input.clear_events();
        }
        Some(input)
    }
}

/// Raw buffered inputs for the current and previous tick, default when nothing is buffered.
pub fn current_and_previous_tick_inputs<T: TickInput>(
    buffer: &InputBuffer<T>,
    current: NetworkTick,
    previous: NetworkTick,
) -> (T, T) {
    (
        buffer.data_at_tick(current).unwrap_or_default(),
        buffer.data_at_tick(previous).unwrap_or_default(),
    )
}
