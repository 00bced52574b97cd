// this module is transparently re-exported by its parent `graph`
use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use crate::term::{Term, Triple};

/// A generic, mutable graph representation living outside this workspace,
/// that hydrated sets can be converted to.
///
/// See [`TripleSet::as_external_graph`](super::TripleSet::as_external_graph).
pub trait ExternalGraph: Default {
    /// Insert a triple in this graph.
    fn insert_triple(&mut self, triple: Triple);
}

/// A resource-centric view of an [`ExternalGraph`],
/// tagged with the subject it describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalResource<G> {
    /// The subject described by the graph
    pub subject: Term,
    /// The triples describing the subject
    pub graph: G,
}

//
// foreign implementations
//

impl ExternalGraph for Vec<Triple> {
    fn insert_triple(&mut self, triple: Triple) {
        self.push(triple)
    }
}

impl<S: BuildHasher + Default> ExternalGraph for HashSet<Triple, S> {
    fn insert_triple(&mut self, triple: Triple) {
        self.insert(triple);
    }
}

impl ExternalGraph for BTreeSet<Triple> {
    fn insert_triple(&mut self, triple: Triple) {
        self.insert(triple);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fill<G: ExternalGraph>() -> G {
        let mut g = G::default();
        let t = [Term::iri("urn:s"), Term::iri("urn:p"), Term::literal("o")];
        g.insert_triple(t.clone());
        g.insert_triple(t);
        g
    }

    #[test]
    fn vec_keeps_duplicates() {
        assert_eq!(fill::<Vec<Triple>>().len(), 2);
    }

    #[test]
    fn sets_deduplicate() {
        assert_eq!(fill::<HashSet<Triple>>().len(), 1);
        assert_eq!(fill::<BTreeSet<Triple>>().len(), 1);
    }
}
