//! Fixed-capacity widget table

use eatft_protocol::{Point, Rect};

use crate::error::RegistryError;

/// What a slot holds; decides how the widget is removed from the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    /// Momentary touch button, addressed by code
    Button,
    /// Toggle switch, addressed by code
    Switch,
    /// Free touch area, addressed by coordinates
    TouchArea,
}

impl WidgetKind {
    /// True for kinds the display reports by button code
    pub fn has_code(&self) -> bool {
        matches!(self, WidgetKind::Button | WidgetKind::Switch)
    }
}

/// Slot index in the widget table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetId(u8);

impl WidgetId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Button code on the wire, `index + 1`
    pub fn code(&self) -> u8 {
        self.0 + 1
    }

    /// Code sent by the display when the button goes down
    pub fn down_code(&self) -> u8 {
        self.code() | eatft_protocol::events::CODE_DOWN
    }
}

/// One occupied slot
#[derive(Debug, Clone, Copy)]
pub struct Widget<F> {
    pub kind: WidgetKind,
    /// Area on screen as given at creation
    pub rect: Rect,
    pub callback: F,
    /// Opaque value handed back to the callback
    pub payload: usize,
    /// Switch state; always false for other kinds
    pub enabled: bool,
}

impl<F> Widget<F> {
    pub fn new(kind: WidgetKind, rect: Rect, callback: F, payload: usize) -> Self {
        Self {
            kind,
            rect,
            callback,
            payload,
            enabled: false,
        }
    }
}

/// Widget table with `N` slots
///
/// Slots never move, so a [`WidgetId`] stays valid until it is released.
pub struct Registry<F, const N: usize> {
    slots: [Option<Widget<F>>; N],
}

impl<F: Copy, const N: usize> Default for Registry<F, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Copy, const N: usize> Registry<F, N> {
    const FITS_CODE_SPACE: () = assert!(N <= 127, "button codes are 7 bits");

    pub fn new() -> Self {
        let () = Self::FITS_CODE_SPACE;
        Self { slots: [None; N] }
    }

    /// Store `widget` in a free slot
    ///
    /// Code-addressed widgets take the lowest free slot, touch areas the
    /// highest.
    pub fn allocate(&mut self, widget: Widget<F>) -> Result<WidgetId, RegistryError> {
        let free = |i: &usize| self.slots[*i].is_none();
        let index = if widget.kind.has_code() {
            (0..N).find(free)
        } else {
            (0..N).rev().find(free)
        };

        let index = index.ok_or(RegistryError::RegistryFull)?;
        self.slots[index] = Some(widget);
        Ok(WidgetId(index as u8))
    }

    /// Clear a slot, returning what it held
    pub fn release(&mut self, id: WidgetId) -> Result<Widget<F>, RegistryError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(RegistryError::NotRegistered)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget<F>> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget<F>> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Resolve a button code (without the press bit)
    ///
    /// Only buttons and switches answer to a code.
    pub fn by_code(&self, code: u8) -> Option<WidgetId> {
        let index = (code as usize).checked_sub(1)?;
        match self.slots.get(index)? {
            Some(w) if w.kind.has_code() => Some(WidgetId(index as u8)),
            _ => None,
        }
    }

    /// Find the touch area containing `at`
    ///
    /// Scans from the highest slot down. Touch areas fill the table from
    /// the back, so of two overlapping areas the one allocated first wins;
    /// after slots have been freed and reused the higher slot wins.
    pub fn hit_test(&self, at: Point) -> Option<WidgetId> {
        self.slots.iter().enumerate().rev().find_map(|(i, slot)| {
            slot.as_ref()
                .filter(|w| w.kind == WidgetKind::TouchArea && w.rect.contains(at))
                .map(|_| WidgetId(i as u8))
        })
    }

    /// Occupied slots in index order
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Widget<F>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|w| (WidgetId(i as u8), w)))
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
