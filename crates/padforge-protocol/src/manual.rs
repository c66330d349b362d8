use crate::finger::{Finger, Hand};
use std::collections::BTreeMap;

/// A caller-supplied fingering override for a single event: whichever grip is
/// selected at that event must use `hand` and must place `finger` on its pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManualAssignment {
    pub hand: Hand,
    pub finger: Finger,
}

/// Sorted event-index -> override. A `BTreeMap` keeps lookups and iteration
/// deterministic without needing a separate sort step.
pub type ManualAssignments = BTreeMap<usize, ManualAssignment>;
