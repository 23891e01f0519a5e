use crate::{
    entry::CalendarEntry,
    month::{MonthBounds, MonthProperty},
};

// -----------------------------------------------------------------------------
// ObserverId
// -----------------------------------------------------------------------------
/// Handle returned on subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

// -----------------------------------------------------------------------------
// WeekObserver
// -----------------------------------------------------------------------------
/// Listener of a [`crate::WeekGrid`].
///
/// Called synchronously, after the entry at `index` (`0` for Sunday) has been replaced.
pub trait WeekObserver {
    fn on_entry_changed(&mut self, _index: usize, _entry: &CalendarEntry) {}
}

// -----------------------------------------------------------------------------
// MonthObserver
// -----------------------------------------------------------------------------
/// Listener of a [`crate::MonthGrid`].
///
/// All hooks do nothing by default.
/// Property hooks are called only for properties whose value actually changes,
/// `changing` with the old bounds before regeneration and `changed` with the new ones after it.
pub trait MonthObserver {
    /// The whole buffer has been regenerated.
    fn on_generated(&mut self, _bounds: &MonthBounds) {}

    fn on_property_changing(&mut self, _property: MonthProperty, _bounds: &MonthBounds) {}

    fn on_property_changed(&mut self, _property: MonthProperty, _bounds: &MonthBounds) {}

    /// An entry has been marked or annotated through the month.
    /// `week` is the index in the buffer, not in the displayed weeks.
    fn on_entry_changed(&mut self, _week: usize, _entry: &CalendarEntry) {}
}

// -----------------------------------------------------------------------------
// Observers
// -----------------------------------------------------------------------------
pub(crate) struct Observers<O: ?Sized> {
    next_id: u64,
    entries: Vec<(ObserverId, Box<O>)>,
}

impl<O: ?Sized> Default for Observers<O> {
    #[inline]
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<O: ?Sized> std::fmt::Debug for Observers<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<O: ?Sized> Observers<O> {
    pub(crate) fn subscribe(&mut self, observer: Box<O>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> Option<Box<O>> {
        let pos = self.entries.iter().position(|(i, _)| *i == id)?;
        Some(self.entries.remove(pos).1)
    }

    /// Deliver to every observer in subscription order.
    #[inline]
    pub(crate) fn notify(&mut self, mut f: impl FnMut(&mut O)) {
        for (_, observer) in self.entries.iter_mut() {
            f(observer.as_mut());
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
