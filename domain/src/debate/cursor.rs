//! Turn cursor: the scheduler's position over (round, participant) cells.
//!
//! The cursor walks participants in panel order inside a round, then moves
//! to the next round, and finally reaches a terminal `done` state.
//!
//! ```text
//! (opening,0) → (opening,1) → … → (opening,P-1)
//!      → (arguments,0) → … → (closing,P-1) → DONE
//! ```

use crate::core::round::Round;
use serde::{Deserialize, Serialize};

/// What a single `advance()` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the next participant in the same round
    NextParticipant { round: Round, participant: usize },
    /// Moved to the first participant of the next round
    NextRound(Round),
    /// Left the last cell; the debate is complete
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCursor {
    round_index: usize,
    participant_index: usize,
    panel_size: usize,
    done: bool,
}

impl TurnCursor {
    /// Cursor at the first cell of the given panel size
    pub fn new(panel_size: usize) -> Self {
        Self {
            round_index: 0,
            participant_index: 0,
            panel_size,
            done: panel_size == 0,
        }
    }

    /// Current cell as (participant index, round), `None` once done
    pub fn current(&self) -> Option<(usize, Round)> {
        if self.done {
            return None;
        }
        Round::from_index(self.round_index).map(|round| (self.participant_index, round))
    }

    pub fn round(&self) -> Round {
        Round::from_index(self.round_index).unwrap_or(Round::Closing)
    }

    pub fn participant_index(&self) -> usize {
        self.participant_index
    }

    pub fn is_complete(&self) -> bool {
        self.done
    }

    /// Step to the next cell. Returns `None` if already done.
    pub fn advance(&mut self) -> Option<Transition> {
        if self.done {
            return None;
        }

        if self.participant_index + 1 < self.panel_size {
            self.participant_index += 1;
            return Some(Transition::NextParticipant {
                round: self.round(),
                participant: self.participant_index,
            });
        }

        match Round::from_index(self.round_index + 1) {
            Some(next) => {
                self.round_index += 1;
                self.participant_index = 0;
                Some(Transition::NextRound(next))
            }
            None => {
                self.done = true;
                Some(Transition::Completed)
            }
        }
    }

    /// Advance only if the cursor still sits on `expected`.
    ///
    /// Redundant advance requests for a cell already left behind are no-ops,
    /// which keeps re-entrant completion paths from skipping cells.
    pub fn advance_from(&mut self, expected: (usize, Round)) -> Option<Transition> {
        if self.current() != Some(expected) {
            return None;
        }
        self.advance()
    }

    /// Number of cells already passed
    pub fn cells_passed(&self) -> usize {
        if self.done {
            return self.total_cells();
        }
        self.round_index * self.panel_size + self.participant_index
    }

    pub fn total_cells(&self) -> usize {
        self.panel_size * Round::COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_every_cell_in_order() {
        let mut cursor = TurnCursor::new(3);
        let mut visited = vec![cursor.current().unwrap()];
        while let Some(transition) = cursor.advance() {
            if transition == Transition::Completed {
                break;
            }
            visited.push(cursor.current().unwrap());
        }

        assert_eq!(visited.len(), 12);
        assert_eq!(visited[0], (0, Round::Opening));
        assert_eq!(visited[3], (0, Round::Arguments));
        assert_eq!(visited[11], (2, Round::Closing));
        assert!(cursor.is_complete());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_transitions() {
        let mut cursor = TurnCursor::new(2);
        assert_eq!(
            cursor.advance(),
            Some(Transition::NextParticipant {
                round: Round::Opening,
                participant: 1
            })
        );
        assert_eq!(cursor.advance(), Some(Transition::NextRound(Round::Arguments)));
    }

    #[test]
    fn test_single_expert_panel_completes_after_four_cells() {
        let mut cursor = TurnCursor::new(1);
        assert_eq!(cursor.advance(), Some(Transition::NextRound(Round::Arguments)));
        assert_eq!(cursor.advance(), Some(Transition::NextRound(Round::Rebuttals)));
        assert_eq!(cursor.advance(), Some(Transition::NextRound(Round::Closing)));
        assert_eq!(cursor.advance(), Some(Transition::Completed));
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn test_advance_from_is_idempotent() {
        let mut cursor = TurnCursor::new(3);
        let first = cursor.current().unwrap();

        assert!(cursor.advance_from(first).is_some());
        // Second request for the same cell must not move the cursor again
        assert!(cursor.advance_from(first).is_none());
        assert_eq!(cursor.current(), Some((1, Round::Opening)));
    }

    #[test]
    fn test_cells_passed() {
        let mut cursor = TurnCursor::new(3);
        for _ in 0..4 {
            cursor.advance();
        }
        assert_eq!(cursor.cells_passed(), 4);
        assert_eq!(cursor.round(), Round::Arguments);
        assert_eq!(cursor.participant_index(), 1);
    }
}
