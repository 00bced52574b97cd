use std::collections::HashSet;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};

use lsup_api::graph::{GraphResult, TripleSet};
use lsup_api::matcher::{Position, TermPattern};
use lsup_api::slice::Slice;
use lsup_api::term::{Term, Triple};
use lsup_inmem::graph::SimpleGraph;

use super::Imr;

impl TripleSet for Imr {
    fn len(&self) -> usize {
        self.graph.len()
    }

    fn empty_like(&self) -> Self {
        self.anchored(self.graph.empty_like())
    }

    fn add_triple(&mut self, triple: &Triple) -> GraphResult<bool> {
        self.graph.add_triple(triple)
    }

    fn contains(&self, triple: &Triple) -> GraphResult<bool> {
        self.graph.contains(triple)
    }

    fn remove(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        self.graph.remove(pattern)
    }

    fn retain(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        self.graph.retain(pattern)
    }

    fn lookup(&self, pattern: TermPattern) -> GraphResult<Self> {
        Ok(self.anchored(self.graph.lookup(pattern)?))
    }

    fn slice(&self, pattern: TermPattern) -> GraphResult<Slice<Term>> {
        self.graph.slice(pattern)
    }

    fn data(&self) -> GraphResult<Vec<Triple>> {
        self.graph.data()
    }

    fn set(&mut self, triple: TermPattern) -> GraphResult<()> {
        self.graph.set(triple)
    }

    fn terms(&self, position: Position) -> GraphResult<HashSet<Term>> {
        self.graph.terms(position)
    }

    fn value_for(
        &self,
        subject: &Term,
        predicate: &Term,
        strict: bool,
    ) -> GraphResult<Option<Term>> {
        self.graph.value_for(subject, predicate, strict)
    }

    fn union(&self, other: &Self) -> Self {
        self.anchored(self.graph.union(&other.graph))
    }

    fn intersection(&self, other: &Self) -> Self {
        self.anchored(self.graph.intersection(&other.graph))
    }

    fn difference(&self, other: &Self) -> Self {
        self.anchored(self.graph.difference(&other.graph))
    }

    fn symmetric_difference(&self, other: &Self) -> Self {
        self.anchored(self.graph.symmetric_difference(&other.graph))
    }

    fn union_with(&mut self, other: &Self) -> &mut Self {
        self.graph.union_with(&other.graph);
        self
    }

    fn intersect_with(&mut self, other: &Self) -> &mut Self {
        self.graph.intersect_with(&other.graph);
        self
    }

    fn subtract(&mut self, other: &Self) -> &mut Self {
        self.graph.subtract(&other.graph);
        self
    }

    fn symmetric_difference_with(&mut self, other: &Self) -> &mut Self {
        self.graph.symmetric_difference_with(&other.graph);
        self
    }
}

lsup_inmem::impl_set_operators!(Imr);

// An Imr combined with a plain graph stays anchored to its subject.
macro_rules! graph_operand {
    ($op: ident, $method: ident, $assign_op: ident, $assign_method: ident, $set_op: ident, $set_assign_op: ident) => {
        impl $op<&SimpleGraph> for &Imr {
            type Output = Imr;
            fn $method(self, rhs: &SimpleGraph) -> Imr {
                self.anchored(self.graph.$set_op(rhs))
            }
        }

        impl $assign_op<&SimpleGraph> for Imr {
            fn $assign_method(&mut self, rhs: &SimpleGraph) {
                self.graph.$set_assign_op(rhs);
            }
        }
    };
}

graph_operand!(BitOr, bitor, BitOrAssign, bitor_assign, union, union_with);
graph_operand!(BitAnd, bitand, BitAndAssign, bitand_assign, intersection, intersect_with);
graph_operand!(Sub, sub, SubAssign, sub_assign, difference, subtract);
graph_operand!(
    BitXor,
    bitxor,
    BitXorAssign,
    bitxor_assign,
    symmetric_difference,
    symmetric_difference_with
);
