//! Buffer-backed triple sets, independent of any store.
use std::collections::{HashMap, HashSet};

use lsup_api::codec;
use lsup_api::graph::{bound_triple, single_value, GraphError, GraphResult, TripleSet};
use lsup_api::key::{TermKey, TripleKey};
use lsup_api::matcher::{Matcher, Pattern, Position, Shape, TermPattern};
use lsup_api::options::SetOptions;
use lsup_api::slice::Slice;
use lsup_api::store::{ReadTxn, TermStore};
use lsup_api::term::{Term, Triple};

use crate::buffer::{encode_triple, BufferSet};
use crate::index::{CapacityError, Index};

/// A triple set owning the encodings of its terms.
///
/// Terms are stored once per set, however many triples use them.
/// Lookups decode nothing until results are returned as [terms](Term).
///
/// A graph holds at most [`I::CAPACITY`](Index::CAPACITY) distinct terms.
/// Beyond that, [`add_triple`](TripleSet::add_triple) and the other fallible
/// methods return [`GraphError::Capacity`],
/// and the set algebra of [`TripleSet`] panics (see [`try_union`](Self::try_union)).
#[derive(Clone, Debug)]
pub struct GenericSimpleGraph<I: Index> {
    set: BufferSet<I>,
}

impl<I: Index> Default for GenericSimpleGraph<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Index> GenericSimpleGraph<I> {
    pub fn new() -> Self {
        Self::with_options(SetOptions::default())
    }

    pub fn with_options(options: SetOptions) -> Self {
        GenericSimpleGraph {
            set: BufferSet::new(options),
        }
    }

    /// Adopt `set` as the storage of a new graph, without copying it.
    pub fn from_set(set: BufferSet<I>) -> Self {
        log::debug!("adopting a set of {} triples", set.len());
        GenericSimpleGraph { set }
    }

    /// Build a graph from `triples`.
    pub fn from_triples<T>(options: SetOptions, triples: T) -> GraphResult<Self>
    where
        T: IntoIterator<Item = Triple>,
    {
        let mut g = Self::with_options(options);
        g.add(triples)?;
        Ok(g)
    }

    /// Build a graph from the triples identified by `keys` in `store`.
    ///
    /// All keys are resolved within one read transaction,
    /// and each distinct key is resolved only once.
    pub fn from_keys<S, K>(store: &S, keys: K, options: SetOptions) -> GraphResult<Self>
    where
        S: TermStore,
        K: IntoIterator<Item = TripleKey>,
    {
        let txn = store.begin_read()?;
        let mut set = BufferSet::new(options);
        let mut cache: HashMap<TermKey, I> = HashMap::new();
        for key in keys {
            let mut ids = [I::default(); 3];
            for (id, k) in ids.iter_mut().zip(key) {
                *id = match cache.get(&k) {
                    Some(i) => *i,
                    None => {
                        let data = codec::serialize(&txn.from_key(k)?)?;
                        let i = set.ensure_buffer(&data)?;
                        cache.insert(k, i);
                        i
                    }
                };
            }
            set.insert_indices(ids);
        }
        log::debug!(
            "loaded {} triples ({} distinct keys) from store",
            set.len(),
            cache.len()
        );
        Ok(GenericSimpleGraph { set })
    }

    /// Build a graph from the triples of `store` in `context` matching `pattern`.
    ///
    /// If `context` is `None`, all contexts are searched.
    /// Terms unknown to the store match nothing, and are not added to it.
    pub fn from_store<S: TermStore>(
        store: &S,
        pattern: TermPattern,
        context: Option<&Term>,
        options: SetOptions,
    ) -> GraphResult<Self> {
        let mut kp: Pattern<TermKey> = [None; 3];
        for (k, t) in kp.iter_mut().zip(pattern) {
            if let Some(t) = t {
                match store.get_key(t)? {
                    Some(key) => *k = Some(key),
                    None => return Ok(Self::with_options(options)),
                }
            }
        }
        let keys = store.triple_keys(&kp, context)?;
        Self::from_keys(store, keys, options)
    }

    /// Build a graph from the first available input of `source`.
    pub fn from_source<S: TermStore>(source: GraphSource<'_, S, I>) -> GraphResult<Self> {
        let GraphSource {
            options,
            set,
            keys,
            triples,
        } = source;
        if let Some(set) = set {
            Ok(Self::from_set(set))
        } else if let Some((store, keys)) = keys {
            Self::from_keys(store, keys, options)
        } else if let Some(triples) = triples {
            Self::from_triples(options, triples)
        } else {
            Ok(Self::with_options(options))
        }
    }

    /// The underlying set.
    pub fn as_set(&self) -> &BufferSet<I> {
        &self.set
    }

    /// Give up the graph, keeping its underlying set.
    pub fn into_set(self) -> BufferSet<I> {
        self.set
    }

    /// Iterate over the triples of this graph, decoding them on the fly.
    pub fn triples(&self) -> impl Iterator<Item = GraphResult<Triple>> + '_ {
        self.set
            .indices()
            .map(move |ids| self.set.get_triple(ids).map_err(GraphError::from))
    }

    /// A new graph with the triples of both graphs.
    ///
    /// Fails if they use more distinct terms than the graph can hold.
    pub fn try_union(&self, other: &Self) -> GraphResult<Self> {
        Ok(GenericSimpleGraph {
            set: self.set.union(&other.set)?,
        })
    }

    /// A new graph with the triples present in exactly one of the graphs.
    ///
    /// Fails if they use more distinct terms than the graph can hold.
    pub fn try_symmetric_difference(&self, other: &Self) -> GraphResult<Self> {
        Ok(GenericSimpleGraph {
            set: self.set.symmetric_difference(&other.set)?,
        })
    }

    /// Add the triples of `other` to this graph.
    ///
    /// Fails without modifying this graph if they do not fit.
    pub fn try_union_with(&mut self, other: &Self) -> GraphResult<&mut Self> {
        self.set.union_with(&other.set)?;
        Ok(self)
    }

    /// Keep only the triples present in exactly one of the graphs.
    ///
    /// Fails without modifying this graph if they do not fit.
    pub fn try_symmetric_difference_with(&mut self, other: &Self) -> GraphResult<&mut Self> {
        self.set.symmetric_difference_with(&other.set)?;
        Ok(self)
    }

    fn index_triple(&self, triple: &Triple) -> GraphResult<Option<[I; 3]>> {
        Ok(
            match self
                .set
                .index_pattern([Some(&triple[0]), Some(&triple[1]), Some(&triple[2])])?
            {
                Some([Some(s), Some(p), Some(o)]) => Some([s, p, o]),
                _ => None,
            },
        )
    }
}

impl<I: Index> TripleSet for GenericSimpleGraph<I> {
    fn len(&self) -> usize {
        self.set.len()
    }

    fn empty_like(&self) -> Self {
        GenericSimpleGraph {
            set: self.set.empty_like(),
        }
    }

    fn add_triple(&mut self, triple: &Triple) -> GraphResult<bool> {
        let [s, p, o] = encode_triple([&triple[0], &triple[1], &triple[2]])?;
        Ok(self.set.insert_buffers([&s, &p, &o])?)
    }

    fn contains(&self, triple: &Triple) -> GraphResult<bool> {
        Ok(match self.index_triple(triple)? {
            Some(ids) => self.set.contains_indices(ids),
            None => false,
        })
    }

    fn remove(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        Ok(match self.set.index_pattern(pattern)? {
            Some(p) => self.set.remove_matching(Matcher::new(p)),
            None => 0,
        })
    }

    fn retain(&mut self, pattern: TermPattern) -> GraphResult<usize> {
        Ok(match self.set.index_pattern(pattern)? {
            Some(p) => self.set.retain_matching(Matcher::new(p)),
            None => {
                let n = self.set.len();
                self.set.clear();
                n
            }
        })
    }

    fn lookup(&self, pattern: TermPattern) -> GraphResult<Self> {
        let mut ret = self.empty_like();
        if let Some(p) = self.set.index_pattern(pattern)? {
            for ids in self.set.matching(Matcher::new(p)) {
                ret.set.import(&self.set, ids)?;
            }
        }
        Ok(ret)
    }

    fn slice(&self, pattern: TermPattern) -> GraphResult<Slice<Term>> {
        Ok(match self.set.index_pattern(pattern)? {
            Some(p) => {
                let m = Matcher::new(p);
                Slice::collect(m.shape(), self.set.matching(m))
                    .try_map(|i| self.set.terms().get_term(i))?
            }
            None => Slice::collect(Shape::of(&pattern), std::iter::empty()),
        })
    }

    fn data(&self) -> GraphResult<Vec<Triple>> {
        self.triples().collect()
    }

    fn set(&mut self, triple: TermPattern) -> GraphResult<()> {
        let [s, p, o] = bound_triple(triple)?;
        let data = encode_triple([s, p, o])?;
        let ids = self.set.ensure_buffers([&data[0], &data[1], &data[2]])?;
        let removed = self
            .set
            .remove_matching(Matcher::new([Some(ids[0]), Some(ids[1]), None]));
        log::trace!("replacing {removed} value(s) of {s} {p}");
        self.set.insert_indices(ids);
        Ok(())
    }

    fn terms(&self, position: Position) -> GraphResult<HashSet<Term>> {
        let i = position.index();
        let ids: HashSet<I> = self.set.indices().map(|t| t[i]).collect();
        ids.into_iter()
            .map(|id| self.set.terms().get_term(id).map_err(GraphError::from))
            .collect()
    }

    fn value_for(
        &self,
        subject: &Term,
        predicate: &Term,
        strict: bool,
    ) -> GraphResult<Option<Term>> {
        let Some(p) = self.set.index_pattern([Some(subject), Some(predicate), None])? else {
            return Ok(None);
        };
        let objects: Vec<I> = self.set.matching(Matcher::new(p)).map(|t| t[2]).collect();
        let values = objects
            .into_iter()
            .take(if strict { usize::MAX } else { 1 })
            .map(|i| self.set.terms().get_term(i))
            .collect::<Result<Vec<_>, _>>()?;
        single_value(subject, predicate, values, strict)
    }

    fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.set.is_subset(&other.set)
    }

    /// # Panics
    /// If the graphs use more distinct terms than one graph can hold;
    /// see [`try_union`](GenericSimpleGraph::try_union).
    fn union(&self, other: &Self) -> Self {
        GenericSimpleGraph {
            set: within_capacity(self.set.union(&other.set)),
        }
    }

    fn intersection(&self, other: &Self) -> Self {
        GenericSimpleGraph {
            set: within_capacity(self.set.intersection(&other.set)),
        }
    }

    fn difference(&self, other: &Self) -> Self {
        GenericSimpleGraph {
            set: within_capacity(self.set.difference(&other.set)),
        }
    }

    /// # Panics
    /// If the graphs use more distinct terms than one graph can hold;
    /// see [`try_symmetric_difference`](GenericSimpleGraph::try_symmetric_difference).
    fn symmetric_difference(&self, other: &Self) -> Self {
        GenericSimpleGraph {
            set: within_capacity(self.set.symmetric_difference(&other.set)),
        }
    }

    /// # Panics
    /// If the graphs use more distinct terms than one graph can hold,
    /// before modifying this graph;
    /// see [`try_union_with`](GenericSimpleGraph::try_union_with).
    fn union_with(&mut self, other: &Self) -> &mut Self {
        within_capacity(self.set.union_with(&other.set));
        self
    }

    fn intersect_with(&mut self, other: &Self) -> &mut Self {
        self.set.intersect_with(&other.set);
        self
    }

    fn subtract(&mut self, other: &Self) -> &mut Self {
        self.set.subtract(&other.set);
        self
    }

    /// # Panics
    /// If the graphs use more distinct terms than one graph can hold,
    /// before modifying this graph;
    /// see [`try_symmetric_difference_with`](GenericSimpleGraph::try_symmetric_difference_with).
    fn symmetric_difference_with(&mut self, other: &Self) -> &mut Self {
        within_capacity(self.set.symmetric_difference_with(&other.set));
        self
    }
}

// intersection and difference only copy terms of the receiver, so they never fail here
fn within_capacity<T>(res: Result<T, CapacityError>) -> T {
    match res {
        Ok(val) => val,
        Err(e) => panic!("{e}"),
    }
}

crate::impl_set_operators!([I: Index] GenericSimpleGraph<I>);

/// The inputs a [`GenericSimpleGraph`] can be built from.
///
/// When several inputs are given,
/// only the first one in this order is used:
/// a pre-built [set](GraphSource::set),
/// [keys](GraphSource::keys) to resolve in a store,
/// [triples](GraphSource::triples).
pub struct GraphSource<'s, S, I: Index = u32> {
    options: SetOptions,
    set: Option<BufferSet<I>>,
    keys: Option<(&'s S, Vec<TripleKey>)>,
    triples: Option<Vec<Triple>>,
}

impl<'s, S: TermStore, I: Index> GraphSource<'s, S, I> {
    pub fn new(options: SetOptions) -> Self {
        GraphSource {
            options,
            set: None,
            keys: None,
            triples: None,
        }
    }

    pub fn set(mut self, set: BufferSet<I>) -> Self {
        self.set = Some(set);
        self
    }

    pub fn keys(mut self, store: &'s S, keys: Vec<TripleKey>) -> Self {
        self.keys = Some((store, keys));
        self
    }

    pub fn triples(mut self, triples: Vec<Triple>) -> Self {
        self.triples = Some(triples);
        self
    }
}

/// A buffer-backed triple set.
pub type SimpleGraph = GenericSimpleGraph<u32>;

/// Flavors of buffer-backed sets with a smaller memory-footprint.
///
/// The trade-off is that these implementations can only contain a small number (2^16) of distinct terms.
pub mod small {
    /// A buffer-backed triple set with 16-bit term indices.
    pub type SimpleGraph = super::GenericSimpleGraph<u16>;

}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::MemoryStore;
    use lsup_api::hash::HashSeed;
    use lsup_api::store::StoreError;

    lsup_api::test_triple_set_impl!(simple_graph, SimpleGraph::new());
    lsup_api::test_triple_set_impl!(
        seeded_simple_graph,
        SimpleGraph::with_options(SetOptions::new().with_seed(HashSeed::from_config(b"test")))
    );

    fn ex(suffix: &str) -> Term {
        Term::iri(format!("http://example.org/{suffix}"))
    }

    fn sample() -> Vec<Triple> {
        vec![
            [ex("a"), ex("p"), Term::literal("1")],
            [ex("a"), ex("p"), Term::literal("2")],
            [ex("b"), ex("q"), ex("a")],
        ]
    }

    #[test]
    fn operators() -> GraphResult<()> {
        let a = SimpleGraph::from_triples(SetOptions::default(), sample())?;
        let b = SimpleGraph::from_triples(SetOptions::default(), sample()[1..].to_vec())?;
        assert_eq!((&a | &b).len(), 3);
        assert_eq!((&a & &b).len(), 2);
        assert_eq!((&a - &b).len(), 1);
        assert_eq!((&a ^ &b).len(), 1);
        assert!(&a - &b == a.difference(&b));

        let mut c = a.clone();
        c -= &b;
        assert_eq!(c.data()?, vec![sample().remove(0)]);
        c |= &b;
        assert!(c == a);
        c &= &b;
        assert!(c == b);
        c ^= &a;
        assert_eq!(c.data()?, vec![sample().remove(0)]);
        Ok(())
    }

    #[test]
    fn seeds_do_not_change_semantics() -> GraphResult<()> {
        let a = SimpleGraph::from_triples(SetOptions::default(), sample())?;
        let other = SetOptions::new().with_seed(HashSeed::from_config(b"other"));
        let b = SimpleGraph::from_triples(other, sample()[1..].to_vec())?;
        assert_eq!(a.intersection(&b).len(), 2);
        assert_eq!(b.union(&a).len(), 3);
        assert_eq!(b.union(&a).as_set().hasher(), b.as_set().hasher());
        Ok(())
    }

    #[test]
    fn adopt_set() -> GraphResult<()> {
        let mut set = BufferSet::default();
        let [s, p, o] = sample().remove(0).map(|t| codec::serialize(&t).unwrap());
        assert!(set.insert_buffers([&s, &p, &o])?);
        let g = SimpleGraph::from_set(set);
        assert_eq!(g.data()?, vec![sample().remove(0)]);
        assert_eq!(g.into_set().len(), 1);
        Ok(())
    }

    #[test]
    fn variables_are_rejected() -> GraphResult<()> {
        let mut g = SimpleGraph::from_triples(SetOptions::default(), sample())?;
        let mut before = g.data()?;
        before.sort();
        let t = [ex("a"), ex("p"), Term::var("x")];
        assert!(matches!(g.add_triple(&t), Err(GraphError::Codec(_))));
        // existing values of ex:a ex:p are kept
        assert!(matches!(
            g.set([Some(&t[0]), Some(&t[1]), Some(&t[2])]),
            Err(GraphError::Codec(_))
        ));
        let mut after = g.data()?;
        after.sort();
        assert_eq!(after, before);
        Ok(())
    }

    #[test]
    fn unknown_keys_are_reported() -> GraphResult<()> {
        let store = MemoryStore::new();
        let known = store.insert(None, &sample()[0])?;
        let unknown = [TermKey(1), TermKey(2), TermKey(99)];
        assert!(matches!(
            SimpleGraph::from_keys(&store, [known, unknown], SetOptions::default()),
            Err(GraphError::Store(StoreError::UnknownKey(TermKey(99))))
        ));
        assert!(matches!(
            SimpleGraph::from_source(
                GraphSource::new(SetOptions::default())
                    .triples(sample())
                    .keys(&store, vec![unknown]),
            ),
            Err(GraphError::Store(StoreError::UnknownKey(TermKey(99))))
        ));
        Ok(())
    }

    /// A small graph with `n` values for the same subject and predicate.
    fn wide(n: u32, tag: &str) -> GraphResult<small::SimpleGraph> {
        small::SimpleGraph::from_triples(
            SetOptions::default(),
            (0..n).map(|i| [ex("s"), ex("p"), Term::literal(format!("{tag}{i}"))]),
        )
    }

    #[test]
    fn small_graphs_report_capacity() -> GraphResult<()> {
        // ex:s and ex:p leave room for 65534 objects
        let mut g = wide(65_534, "")?;
        assert_eq!(g.as_set().terms().len(), 65_536);
        let extra = [ex("s"), ex("p"), Term::literal("extra")];
        assert!(matches!(
            g.add_triple(&extra),
            Err(GraphError::Capacity(65_536))
        ));
        assert!(matches!(
            g.set([Some(&extra[0]), Some(&extra[1]), Some(&extra[2])]),
            Err(GraphError::Capacity(65_536))
        ));
        assert_eq!(g.len(), 65_534);
        // known terms still fit
        assert!(!g.add_triple(&[ex("s"), ex("p"), Term::literal("7")])?);
        assert!(g.add_triple(&[ex("p"), ex("s"), Term::literal("7")])?);
        Ok(())
    }

    #[test]
    fn small_graph_algebra_checks_capacity() -> GraphResult<()> {
        let mut x = wide(40_000, "x")?;
        let y = wide(40_000, "y")?;
        assert!(matches!(x.try_union(&y), Err(GraphError::Capacity(65_536))));
        assert!(matches!(
            x.try_symmetric_difference(&y),
            Err(GraphError::Capacity(65_536))
        ));
        assert!(matches!(
            x.try_union_with(&y),
            Err(GraphError::Capacity(65_536))
        ));
        assert!(matches!(
            x.try_symmetric_difference_with(&y),
            Err(GraphError::Capacity(65_536))
        ));
        assert_eq!(x.len(), 40_000);
        assert!(x == wide(40_000, "x")?);
        assert!(x != y);
        assert_eq!(x.intersection(&y).len(), 0);
        assert_eq!(x.difference(&y).len(), 40_000);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "at most 65536 distinct terms")]
    fn small_graph_union_panics_when_full() {
        let mut x = wide(40_000, "x").unwrap();
        let y = wide(40_000, "y").unwrap();
        x |= &y;
    }

    #[test]
    fn from_store() -> GraphResult<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = MemoryStore::new();
        let ctx = ex("ctx");
        for t in sample() {
            store.insert(Some(&ctx), &t)?;
        }
        store.insert(None, &[ex("c"), ex("p"), ex("a")])?;

        let g = SimpleGraph::from_store(&store, [None, None, None], Some(&ctx), SetOptions::default())?;
        assert_eq!(g.len(), 3);
        let g = SimpleGraph::from_store(&store, [None, Some(&ex("p")), None], None, SetOptions::default())?;
        assert_eq!(g.len(), 3);
        let all = SimpleGraph::from_store(&store, [None, None, None], None, SetOptions::default())?;
        assert_eq!(all.len(), 4);
        Ok(())
    }

    #[test]
    fn source_precedence() -> GraphResult<()> {
        let store = MemoryStore::new();
        let keys = vec![store.insert(None, &sample()[0])?];
        let mut set = BufferSet::default();
        set.insert_buffers([b"not", b"a", b"term"])?;

        let g = SimpleGraph::from_source(
            GraphSource::new(SetOptions::default())
                .triples(sample())
                .keys(&store, keys.clone())
                .set(set),
        )?;
        assert_eq!(g.len(), 1);
        assert!(g.data().is_err());

        let g = SimpleGraph::from_source(
            GraphSource::new(SetOptions::default())
                .triples(sample())
                .keys(&store, keys),
        )?;
        assert_eq!(g.data()?, vec![sample().remove(0)]);

        let g = SimpleGraph::from_source(
            GraphSource::<MemoryStore>::new(SetOptions::default()).triples(sample()),
        )?;
        assert_eq!(g.len(), 3);

        let g = SimpleGraph::from_source(GraphSource::<MemoryStore>::new(SetOptions::default()))?;
        assert!(g.is_empty());
        Ok(())
    }

    #[test]
    fn new_available() {
        let _ = SimpleGraph::default();
        let _ = small::SimpleGraph::new();
    }
}
