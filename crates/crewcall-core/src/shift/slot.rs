use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ids::SlotId;

/// A discrete date/time unit of a multi-slot shift, fillable independently.
/// Slot identity is stable across tier changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl Slot {
    pub fn new(id: SlotId, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id,
            date,
            start,
            end,
        }
    }

    pub fn id(&self) -> &SlotId {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}
