use std::collections::BTreeSet;

use crate::{
    core::{CellId, Move, Side},
    engine::Layout,
};

/// Ownership of every cell: player 0's pieces, player 1's pieces, or empty.
///
/// The three sets always partition the 64 cell ids. They describe the logical
/// position, which runs ahead of the cells while a move is animated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSets {
    sides: [BTreeSet<CellId>; 2],
    empty: BTreeSet<CellId>,
}

impl CellSets {
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        let mut sets = Self {
            sides: [BTreeSet::new(), BTreeSet::new()],
            empty: BTreeSet::new(),
        };
        for id in CellId::all() {
            match layout.side_at(id.position()) {
                Some(side) => sets.sides[side.index()].insert(id),
                None => sets.empty.insert(id),
            };
        }
        sets
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &BTreeSet<CellId> {
        &self.sides[side.index()]
    }

    #[must_use]
    pub fn empty(&self) -> &BTreeSet<CellId> {
        &self.empty
    }

    #[must_use]
    pub fn owner(&self, id: CellId) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.sides[side.index()].contains(&id))
    }

    /// Applies `mv` played by `side`.
    pub fn apply(&mut self, mv: &Move, side: Side) {
        let own = side.index();
        let opponent = side.opponent().index();
        if let Some(captured) = mv.captured {
            self.sides[opponent].remove(&captured);
            self.empty.insert(captured);
        }
        self.sides[own].remove(&mv.from);
        self.sides[own].insert(mv.to);
        self.empty.remove(&mv.to);
        self.empty.insert(mv.from);
    }

    /// Reverts `mv` previously applied for `side`.
    pub fn revert(&mut self, mv: &Move, side: Side) {
        let own = side.index();
        let opponent = side.opponent().index();
        self.sides[own].remove(&mv.to);
        self.sides[own].insert(mv.from);
        self.empty.remove(&mv.from);
        self.empty.insert(mv.to);
        if let Some(captured) = mv.captured {
            self.empty.remove(&captured);
            self.sides[opponent].insert(captured);
        }
    }

    /// Whether the sets are disjoint and cover every cell.
    #[must_use]
    pub fn is_partition(&self) -> bool {
        let total = self.sides[0].len() + self.sides[1].len() + self.empty.len();
        total == CellId::COUNT && CellId::all().all(|id| {
            let hits = usize::from(self.sides[0].contains(&id))
                + usize::from(self.sides[1].contains(&id))
                + usize::from(self.empty.contains(&id));
            hits == 1
        })
    }
}
