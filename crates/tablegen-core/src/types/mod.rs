//! Data model (§3 of the design doc): the HSM graph handed to the emitter by
//! the (out-of-scope) Graph Provider, and the dense-id tables the collection
//! pass derives from it.

mod hsm;
mod ids;
mod tables;

pub use hsm::{Behavior, HistoryKind, HistoryPseudostate, Hsm, InitialPseudostate, NamedVertex};
pub use ids::{ActionId, BehaviorRef, EventId, GuardId, HistoryId, StateId};
pub use tables::{HistorySlot, IndexTables, TransitionEntry};
