use chrono::NaiveDate;

use crate::calendar::ValidRange;
use crate::config::NeighborMode;
use crate::error::{Error, Result};
use crate::temporal::TemporalIndex;

/// Display position of a card. Animation state is keyed by slot, not by item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardSlot {
    Left,
    Center,
    Right,
}

impl CardSlot {
    pub const ALL: [CardSlot; 3] = [CardSlot::Left, CardSlot::Center, CardSlot::Right];

    pub fn index(self) -> usize {
        match self {
            CardSlot::Left => 0,
            CardSlot::Center => 1,
            CardSlot::Right => 2,
        }
    }

    pub fn is_center(self) -> bool {
        self == CardSlot::Center
    }

    pub fn label(self) -> &'static str {
        match self {
            CardSlot::Left => "left",
            CardSlot::Center => "center",
            CardSlot::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Pick {
    #[default]
    Nothing,
    Item(usize),
    Date(NaiveDate),
}

/// Either an explicit item or a date drives the center; never both.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pick: Pick,
}

impl Selection {
    pub fn pick_item(&mut self, index: usize) {
        self.pick = Pick::Item(index);
    }

    pub fn pick_date(&mut self, date: NaiveDate, range: &ValidRange) -> Result<()> {
        if !range.contains(date) {
            return Err(Error::DateOutOfRange(date));
        }
        self.pick = Pick::Date(date);
        Ok(())
    }

    pub fn picked_item(&self) -> Option<usize> {
        match self.pick {
            Pick::Item(index) => Some(index),
            _ => None,
        }
    }

    pub fn picked_date(&self) -> Option<NaiveDate> {
        match self.pick {
            Pick::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn center_index(&self, index: &TemporalIndex, today: NaiveDate) -> usize {
        match self.pick {
            Pick::Item(item) => item,
            Pick::Date(date) => index.resolve(date),
            Pick::Nothing => index.resolve(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTriple {
    pub left: Option<usize>,
    pub center: usize,
    pub right: Option<usize>,
}

impl SlotTriple {
    pub fn around(center: usize, len: usize, mode: NeighborMode) -> Self {
        let (left, right) = match mode {
            NeighborMode::Clamped => (
                center.checked_sub(1),
                Some(center + 1).filter(|&i| i < len),
            ),
            NeighborMode::Circular if len > 1 => (
                Some((center + len - 1) % len),
                Some((center + 1) % len),
            ),
            NeighborMode::Circular => (None, None),
        };
        Self {
            left,
            center,
            right,
        }
    }

    pub fn get(&self, slot: CardSlot) -> Option<usize> {
        match slot {
            CardSlot::Left => self.left,
            CardSlot::Center => Some(self.center),
            CardSlot::Right => self.right,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardSlot, usize)> + '_ {
        CardSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|index| (slot, index)))
    }
}
