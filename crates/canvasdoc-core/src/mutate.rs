//! Applying validated changelists to an element collection.

use crate::change::Change;
use crate::elements::Element;

/// Apply `changes` to `elements` in order.
///
/// The changelist is assumed to be validated already. Inserts append,
/// removes drop the first equal element, modifications replace in place so the
/// element keeps its position in the ordering.
pub fn apply(changes: &[Change], elements: &mut Vec<Element>) {
    for change in changes {
        match change {
            Change::Insert(element) => elements.push(element.clone()),
            Change::Remove(element) => match position(elements, element) {
                Some(index) => {
                    elements.remove(index);
                }
                None => log::warn!("Remove of missing element skipped: {:?}", element),
            },
            Change::Modify { old, new } => match position(elements, old) {
                Some(index) => elements[index] = new.clone(),
                None => log::warn!("Modify of missing element skipped: {:?}", old),
            },
        }
    }
}

fn position(elements: &[Element], element: &Element) -> Option<usize> {
    elements.iter().position(|e| e == element)
}
