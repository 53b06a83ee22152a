//! Spot occupancy ledger.
//!
//! One flag per spot.  The simulator owns the ledger and lends it (`&mut`)
//! to each vehicle in turn through [`AgentContext`][crate::AgentContext], so
//! there is exactly one writer at a time and no shared global state.

use ps_core::SpotId;

/// Per-spot occupancy flags plus running reserve/release counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OccupancyLedger {
    occupied: Vec<bool>,
    reserved_total: u64,
    released_total: u64,
}

impl OccupancyLedger {
    /// A ledger seeded with the setup-time occupancy.
    pub fn new(initial: Vec<bool>) -> Self {
        Self { occupied: initial, reserved_total: 0, released_total: 0 }
    }

    /// Mark a free spot occupied.  Returns `false` (and changes nothing) if
    /// the spot is already occupied or does not exist.
    pub fn reserve(&mut self, spot: SpotId) -> bool {
        match self.occupied.get_mut(spot.index()) {
            Some(slot) if !*slot => {
                *slot = true;
                self.reserved_total += 1;
                true
            }
            _ => false,
        }
    }

    /// Confirm a parked vehicle in `spot`.  The spot was reserved at spawn,
    /// so this only repairs the flag if something cleared it meanwhile.
    pub fn claim(&mut self, spot: SpotId) {
        if let Some(slot) = self.occupied.get_mut(spot.index()) {
            if !*slot {
                *slot = true;
                self.reserved_total += 1;
            }
        }
    }

    /// Mark an occupied spot free.  Returns `false` if it was already free
    /// or does not exist.
    pub fn release(&mut self, spot: SpotId) -> bool {
        match self.occupied.get_mut(spot.index()) {
            Some(slot) if *slot => {
                *slot = false;
                self.released_total += 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn is_occupied(&self, spot: SpotId) -> bool {
        self.occupied.get(spot.index()).copied().unwrap_or(false)
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&o| o).count()
    }

    pub fn spot_count(&self) -> usize {
        self.occupied.len()
    }

    /// Free spots in ascending id order.
    pub fn free_spots(&self) -> Vec<SpotId> {
        self.occupied
            .iter()
            .enumerate()
            .filter(|(_, o)| !**o)
            .map(|(i, _)| SpotId(i as u32))
            .collect()
    }

    /// Successful reservations (and repairing claims) since construction.
    pub fn reserved_total(&self) -> u64 {
        self.reserved_total
    }

    /// Successful releases since construction.
    pub fn released_total(&self) -> u64 {
        self.released_total
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.occupied
    }
}
