//! Typed records and the sparse list that holds them.

use query_state_util::parse_int;
use serde::{Deserialize, Serialize};

use crate::schema::{Schema, MAX_RECORD_INDEX};
use crate::value::Fields;

/// A record type with a fixed wire schema.
pub trait QueryRecord: Sized {
    const SCHEMA: &'static Schema;

    /// Build a record from decoded fields in schema order.
    fn from_fields(fields: Fields) -> Self;

    /// Flatten the record into fields in schema order.
    fn to_fields(&self) -> Fields;
}

/// Ordered list of records in which a slot may be empty.
///
/// A slot's position is meaningful: it is the row index in the form that owns
/// the list. Holes serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordList<R> {
    slots: Vec<Option<R>>,
}

impl<R> Default for RecordList<R> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<R> RecordList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<Option<R>>) -> Self {
        Self { slots }
    }

    /// Number of slots, holes included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Store `record` at `index`, growing the list with holes if needed.
    ///
    /// Indices above [`MAX_RECORD_INDEX`] do not survive a parse, so they are
    /// refused and the list is left unchanged. Returns whether the record was
    /// stored.
    pub fn set(&mut self, index: usize, record: R) -> bool {
        if index > MAX_RECORD_INDEX {
            return false;
        }
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(record);
        true
    }

    /// Append a record after the last slot.
    ///
    /// Unlike [`RecordList::set`] this is unbounded. Lists with an appended
    /// layout carry no index on the wire.
    pub fn push(&mut self, record: R) {
        self.slots.push(Some(record));
    }

    /// Remove the slot at `index`, shifting later rows down.
    pub fn remove(&mut self, index: usize) -> Option<R> {
        if index < self.slots.len() {
            self.slots.remove(index)
        } else {
            None
        }
    }

    /// Empty the slot at `index` without shifting later rows.
    pub fn take(&mut self, index: usize) -> Option<R> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Occupied slots with their indices.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &R)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|record| (index, record)))
    }

    /// Occupied slots in order.
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.slots.iter().flatten()
    }

    pub fn slots(&self) -> &[Option<R>] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Option<R>> {
        self.slots
    }

    /// Drop all holes, renumbering the remaining records.
    pub fn compact(self) -> Self {
        self.slots.into_iter().flatten().collect()
    }

    /// Place a record using a raw index token.
    ///
    /// Unparsable indices append, the way a row added without an explicit
    /// slot would. Negative indices and indices above [`MAX_RECORD_INDEX`]
    /// are not array slots and the record is dropped. A repeated index
    /// overwrites the earlier record. Returns whether the record was kept.
    pub fn place(&mut self, raw_index: &str, record: R) -> bool {
        match parse_int(raw_index) {
            None => {
                let next = self.slots.len();
                self.set(next, record)
            }
            Some(index) => match usize::try_from(index) {
                Ok(index) => self.set(index, record),
                Err(_) => false,
            },
        }
    }
}

impl<R> FromIterator<R> for RecordList<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Some).collect(),
        }
    }
}

impl<R> From<Vec<Option<R>>> for RecordList<R> {
    fn from(slots: Vec<Option<R>>) -> Self {
        Self::from_slots(slots)
    }
}
