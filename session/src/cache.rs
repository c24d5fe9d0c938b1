//! Holder of the most recently installed board snapshot.

use std::rc::Rc;

use warboard_core::Board;

/// Last board snapshot received from the server.
///
/// Snapshots are shared, never mutated: installing a new board swaps the
/// pointer while readers holding the previous `Rc` keep a consistent view.
#[derive(Clone, Debug, Default)]
pub struct BoardCache {
    current: Option<Rc<Board>>,
    generation: u64,
}

impl BoardCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            generation: 0,
        }
    }

    /// Replaces the cached snapshot and returns the shared handle.
    pub fn install(&mut self, board: Board) -> Rc<Board> {
        let board = Rc::new(board);
        self.current = Some(Rc::clone(&board));
        self.generation += 1;
        board
    }

    /// Current snapshot, if one was installed.
    #[must_use]
    pub fn current(&self) -> Option<Rc<Board>> {
        self.current.clone()
    }

    /// Borrow of the current snapshot.
    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.current.as_deref()
    }

    /// Number of snapshots installed so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops the cached snapshot.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warboard_core::Army;

    #[test]
    fn previous_snapshot_stays_valid_for_existing_readers() {
        let mut cache = BoardCache::new();
        let first = cache.install(Board::blank(1, 1, Army::Red));
        let _ = cache.install(Board::blank(2, 2, Army::Blue));

        assert_eq!(first.width, 1);
        assert_eq!(cache.board().map(|board| board.width), Some(2));
        assert_eq!(cache.generation(), 2);
    }
}
