//! Animation gate: the engine opens a batch of motions and waits until the renderer has
//! reported every one of them finished before taking its next logical step.

use crate::grid::{Coord, TileColor};

/// One visual effect the renderer should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Two tiles trade places (also used for the revert of an unproductive swap).
    Swap { a: Coord, b: Coord },
    /// A matched tile fades out.
    Fade { at: Coord, color: TileColor },
    /// A tile falls from `from` to `to`.
    Drop {
        from: Coord,
        to: Coord,
        color: TileColor,
    },
    /// A new tile appears at the top of a column.
    Spawn { at: Coord, color: TileColor },
}

/// Completion handle for one motion of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    batch: u64,
    index: usize,
}

impl Ticket {
    #[cfg(test)]
    pub fn batch(self) -> u64 {
        self.batch
    }
}

/// Motions started together. The batch settles when all of them have completed.
#[derive(Debug, Clone)]
pub struct Batch {
    id: u64,
    motions: Vec<Motion>,
    done: Vec<bool>,
}

impl Batch {
    pub fn id(&self) -> u64 {
        self.id
    }

    #[cfg(test)]
    pub fn motions(&self) -> &[Motion] {
        &self.motions
    }

    pub fn tickets(&self) -> impl Iterator<Item = (Ticket, Motion)> + '_ {
        self.motions.iter().enumerate().map(|(index, &m)| {
            (
                Ticket {
                    batch: self.id,
                    index,
                },
                m,
            )
        })
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.done.iter().filter(|d| !**d).count()
    }

    pub fn is_settled(&self) -> bool {
        self.done.iter().all(|d| *d)
    }
}

#[derive(Debug, Default)]
pub struct AnimationGate {
    next_id: u64,
    current: Option<Batch>,
}

impl AnimationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new batch. The previous batch must have settled.
    pub fn open(&mut self, motions: Vec<Motion>) -> u64 {
        debug_assert!(self.is_settled(), "opened a batch over an unsettled one");
        let id = self.next_id;
        self.next_id += 1;
        log::trace!("batch {id}: {} motions", motions.len());
        self.current = Some(Batch {
            id,
            done: vec![false; motions.len()],
            motions,
        });
        id
    }

    /// Mark one motion finished. Returns false for tickets of an older batch or ones
    /// already completed.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        match self.current.as_mut() {
            Some(batch) if batch.id == ticket.batch => {
                let slot = &mut batch.done[ticket.index];
                let fresh = !*slot;
                *slot = true;
                fresh
            }
            _ => false,
        }
    }

    /// Mark every motion of the current batch finished.
    pub fn complete_all(&mut self) {
        if let Some(batch) = self.current.as_mut() {
            batch.done.fill(true);
        }
    }

    /// No batch in flight, or every motion of the current one has completed.
    pub fn is_settled(&self) -> bool {
        self.current.as_ref().is_none_or(Batch::is_settled)
    }

    pub fn batch(&self) -> Option<&Batch> {
        self.current.as_ref()
    }

    /// Drop the settled batch.
    pub fn close(&mut self) {
        debug_assert!(self.is_settled());
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(x: usize) -> Motion {
        Motion::Fade {
            at: Coord::new(x, 0),
            color: TileColor::Red,
        }
    }

    #[test]
    fn idle_gate_is_settled() {
        assert!(AnimationGate::new().is_settled());
    }

    #[test]
    fn waits_for_every_ticket() {
        let mut gate = AnimationGate::new();
        gate.open(vec![fade(0), fade(1), fade(2)]);
        let tickets: Vec<Ticket> = gate.batch().unwrap().tickets().map(|(t, _)| t).collect();
        assert!(!gate.is_settled());

        assert!(gate.complete(tickets[2]));
        assert!(gate.complete(tickets[0]));
        assert!(!gate.is_settled());
        assert_eq!(gate.batch().unwrap().pending(), 1);

        assert!(gate.complete(tickets[1]));
        assert!(gate.is_settled());
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let mut gate = AnimationGate::new();
        gate.open(vec![fade(0), fade(1)]);
        let first = gate.batch().unwrap().tickets().next().unwrap().0;
        assert!(gate.complete(first));
        assert!(!gate.complete(first));
        assert!(!gate.is_settled());
    }

    #[test]
    fn stale_ticket_does_not_touch_new_batch() {
        let mut gate = AnimationGate::new();
        gate.open(vec![fade(0)]);
        let old = gate.batch().unwrap().tickets().next().unwrap().0;
        gate.complete_all();
        gate.close();

        let id = gate.open(vec![fade(1)]);
        assert_ne!(old.batch(), id);
        assert!(!gate.complete(old));
        assert!(!gate.is_settled());
    }

    #[test]
    fn empty_batch_settles_immediately() {
        let mut gate = AnimationGate::new();
        gate.open(Vec::new());
        assert!(gate.is_settled());
    }
}
