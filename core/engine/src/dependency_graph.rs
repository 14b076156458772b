//! FILENAME: core/engine/src/dependency_graph.rs
//! PURPOSE: Tracks the directed graph of references between formula cells.
//! CONTEXT: The graph stays acyclic at all times: an edit is checked with
//! `would_create_cycle` before its edges are installed. Edges are keyed by
//! `Position`, never by cell handles, so removing a cell cannot dangle.
//!
//! TERMINOLOGY:
//! - Precedents: cells that a formula cell references (its inputs).
//!   If A3 = A1 + A2, then A1 and A2 are precedents of A3.
//! - Dependents: cells that reference a given cell (reverse lookup).
//!   If A3 = A1 + A2, then A3 is a dependent of A1 and A2.
//!
//! USAGE:
//! 1. Before committing a formula change, check `would_create_cycle()`.
//! 2. When a cell's state is replaced, call `set_dependencies()` with its
//!    new precedents (an empty set for non-formula cells).
//! 3. After the change, invalidate the caches of `collect_dirty()`.

use crate::position::Position;
use std::collections::{HashMap, HashSet, VecDeque};

/// The Dependency Graph tracks relationships between cells.
/// It maintains both forward (precedents) and reverse (dependents)
/// mappings for efficient lookups in either direction.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// For each cell, the set of cells it directly depends on.
    /// If A3 = A1 + A2, then precedents[A3] = {A1, A2}.
    precedents: HashMap<Position, HashSet<Position>>,

    /// For each cell, the set of cells that directly depend on it.
    /// If A3 = A1 + A2, then dependents[A1] contains A3, and
    /// dependents[A2] contains A3.
    dependents: HashMap<Position, HashSet<Position>>,
}

impl DependencyGraph {
    /// Creates a new, empty dependency graph.
    pub fn new() -> Self {
        DependencyGraph {
            precedents: HashMap::new(),
            dependents: HashMap::new(),
        }
    }

    /// Replaces the outbound edges of `cell` with `new_precedents`,
    /// updating the reverse map in lockstep. Only the difference against
    /// the previous set is touched; a target present in both survives
    /// untouched. Run `would_create_cycle()` before calling this.
    pub fn set_dependencies(&mut self, cell: Position, new_precedents: HashSet<Position>) {
        let old_precedents = self.precedents.remove(&cell).unwrap_or_default();

        for &dropped in old_precedents.difference(&new_precedents) {
            self.unlink_dependent(dropped, cell);
        }
        for &added in new_precedents.difference(&old_precedents) {
            self.dependents.entry(added).or_default().insert(cell);
        }

        if !new_precedents.is_empty() {
            self.precedents.insert(cell, new_precedents);
        }
    }

    /// Removes every outbound edge of a cell, for when it stops being a
    /// formula.
    pub fn clear_dependencies(&mut self, cell: Position) {
        self.set_dependencies(cell, HashSet::new());
    }

    /// Erases the back edge target <- cell, pruning the entry once its
    /// set runs dry.
    fn unlink_dependent(&mut self, target: Position, cell: Position) {
        if let Some(entry) = self.dependents.get_mut(&target) {
            entry.remove(&cell);
            if entry.is_empty() {
                self.dependents.remove(&target);
            }
        }
    }

    /// Returns the direct precedents of a cell (cells it directly references).
    pub fn get_precedents(&self, cell: Position) -> Option<&HashSet<Position>> {
        self.precedents.get(&cell)
    }

    /// Returns the direct dependents of a cell (cells that directly reference it).
    pub fn get_dependents(&self, cell: Position) -> Option<&HashSet<Position>> {
        self.dependents.get(&cell)
    }

    /// True if any formula cell currently references this position.
    pub fn is_referenced(&self, cell: Position) -> bool {
        self.dependents
            .get(&cell)
            .is_some_and(|deps| !deps.is_empty())
    }

    /// Checks if pointing `cell` at `new_precedents` would create a cycle.
    ///
    /// Adding the edges cell -> T closes a cycle exactly when some member
    /// of T already reaches `cell` through existing references, i.e. when
    /// a member of T shows up among the cells that transitively depend on
    /// `cell`. So this walks the dependent edges from `cell` with an
    /// iterative DFS and tests membership in `new_precedents` along the
    /// way. Positions referenced but not yet materialised have no inbound
    /// edges and are never visited.
    pub fn would_create_cycle(
        &self,
        cell: Position,
        new_precedents: &HashSet<Position>,
    ) -> bool {
        // A cell depending on itself is a trivial cycle
        if new_precedents.contains(&cell) {
            return true;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![cell];

        while let Some(current) = stack.pop() {
            if visited.contains(&current) {
                continue;
            }
            visited.insert(current);

            if new_precedents.contains(&current) {
                return true;
            }

            if let Some(deps) = self.dependents.get(&current) {
                for &dep in deps {
                    if !visited.contains(&dep) {
                        stack.push(dep);
                    }
                }
            }
        }

        false
    }

    /// Returns the cells whose cached values become stale when `cell`
    /// changes: the cell itself plus all transitive dependents, gathered
    /// with a BFS over the dependent edges. The visited set also guards
    /// the walk against a malformed graph.
    pub fn collect_dirty(&self, cell: Position) -> Vec<Position> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(cell);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);

            if let Some(deps) = self.dependents.get(&current) {
                for &dep in deps {
                    if !visited.contains(&dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        result
    }
}
