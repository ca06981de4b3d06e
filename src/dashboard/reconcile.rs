//! Local patching of collections after a successful mutation call.

use crate::models::{Identified, RecordId};

/// Apply `patch` to the record with `id`, returning the collection.
/// Every other record is left untouched; an unknown id changes nothing.
pub fn patch_by_id<T, F>(mut items: Vec<T>, id: RecordId, patch: F) -> Vec<T>
where
    T: Identified,
    F: FnOnce(&mut T),
{
    patch_in_place(&mut items, id, patch);
    items
}

/// In-place form of [`patch_by_id`]. Returns whether a record matched.
pub fn patch_in_place<T, F>(items: &mut [T], id: RecordId, patch: F) -> bool
where
    T: Identified,
    F: FnOnce(&mut T),
{
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            patch(item);
            true
        }
        None => false,
    }
}

pub fn find_by_id<T: Identified>(items: &[T], id: RecordId) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
