use crate::{db::hkey::HKey, model::RowTypeId};

///
/// HKeyCache
///
/// One reusable scratch HKey per table row type, indexed by `RowTypeId`.
///
/// The cache belongs to one execution session and is shared by every cursor
/// created from it. It is not reentrant: a key handed out for a type is
/// overwritten by the next derivation for the same type, so callers that need
/// a key across such calls must copy it first.
///

#[derive(Debug, Default)]
pub struct HKeyCache {
    slots: Vec<HKey>,
}

impl HKeyCache {
    /// Build `slot_count` empty slots, each with room for `reserve` segments.
    #[must_use]
    pub fn new(slot_count: usize, reserve: usize) -> Self {
        Self {
            slots: (0..slot_count).map(|_| HKey::with_capacity(reserve)).collect(),
        }
    }

    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn hkey(&self, table: RowTypeId) -> &HKey {
        self.slots.get(table.slot()).unwrap_or_else(|| Self::missing_slot(table))
    }

    pub fn hkey_mut(&mut self, table: RowTypeId) -> &mut HKey {
        self.slots
            .get_mut(table.slot())
            .unwrap_or_else(|| Self::missing_slot(table))
    }

    /// Copy the key in slot `from` into slot `to`, truncated to `segments`.
    pub fn copy_truncated(&mut self, from: RowTypeId, to: RowTypeId, segments: usize) -> &HKey {
        let (from_slot, to_slot) = (from.slot(), to.slot());
        if from_slot.max(to_slot) >= self.slots.len() {
            Self::missing_slot(if from_slot >= self.slots.len() { from } else { to });
        }

        let target = match from_slot.cmp(&to_slot) {
            std::cmp::Ordering::Equal => &mut self.slots[to_slot],
            std::cmp::Ordering::Less => {
                let (head, tail) = self.slots.split_at_mut(to_slot);
                head[from_slot].copy_to(&mut tail[0]);
                &mut tail[0]
            }
            std::cmp::Ordering::Greater => {
                let (head, tail) = self.slots.split_at_mut(from_slot);
                tail[0].copy_to(&mut head[to_slot]);
                &mut head[to_slot]
            }
        };
        target.use_segments(segments);

        target
    }

    fn missing_slot(table: RowTypeId) -> ! {
        panic!("invariant violation: hkey cache has no slot for row type {table}")
    }
}
