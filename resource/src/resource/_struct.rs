use lsup_api::graph::{ExternalGraph, ExternalResource, GraphResult, TripleSet};
use lsup_api::options::SetOptions;
use lsup_api::store::TermStore;
use lsup_api::term::{Term, Triple};
use lsup_inmem::graph::{GraphSource, SimpleGraph};

/// An in-memory resource:
/// a [`SimpleGraph`] anchored to the subject it describes.
///
/// The anchor never changes:
/// every set derived from an [`Imr`]
/// (by [lookup](TripleSet::lookup) or set algebra)
/// is an [`Imr`] with the same anchor,
/// whatever the anchor of the other operand.
#[derive(Clone, Debug)]
pub struct Imr {
    pub(super) uri: Term,
    pub(super) graph: SimpleGraph,
}

impl Imr {
    /// Build an empty resource identified by the IRI `uri`.
    pub fn new<U: Into<String>>(uri: U) -> Self {
        Self::with_options(uri, SetOptions::default())
    }

    /// Build an empty resource identified by the IRI `uri`, with the given options.
    pub fn with_options<U: Into<String>>(uri: U, options: SetOptions) -> Self {
        Imr {
            uri: Term::iri(uri),
            graph: SimpleGraph::with_options(options),
        }
    }

    /// Build a resource identified by the IRI `uri`, described by `triples`.
    ///
    /// Used to replace the whole content of a resource.
    pub fn with_triples<U, T>(uri: U, triples: T) -> GraphResult<Self>
    where
        U: Into<String>,
        T: IntoIterator<Item = Triple>,
    {
        let mut ret = Self::new(uri);
        ret.graph.add(triples)?;
        Ok(ret)
    }

    /// Anchor `graph` to the IRI `uri`, without copying it.
    pub fn from_graph<U: Into<String>>(uri: U, graph: SimpleGraph) -> Self {
        Imr {
            uri: Term::iri(uri),
            graph,
        }
    }

    /// Build a resource identified by the IRI `uri`,
    /// from the first available input of `source`.
    pub fn from_source<U, S>(uri: U, source: GraphSource<'_, S>) -> GraphResult<Self>
    where
        U: Into<String>,
        S: TermStore,
    {
        let graph = SimpleGraph::from_source(source)?;
        Ok(Self::from_graph(uri, graph))
    }

    /// The subject this resource is anchored to.
    pub fn identifier(&self) -> &Term {
        &self.uri
    }

    /// The triples describing this resource.
    pub fn graph(&self) -> &SimpleGraph {
        &self.graph
    }

    /// Give up the anchor, keeping the triples.
    pub fn into_graph(self) -> SimpleGraph {
        self.graph
    }

    /// The value of `predicate` for the [identifier](Imr::identifier) of this resource.
    ///
    /// See [`TripleSet::value_for`] for the meaning of `strict`.
    pub fn value(&self, predicate: &Term, strict: bool) -> GraphResult<Option<Term>> {
        self.graph.value_for(&self.uri, predicate, strict)
    }

    /// Replace the value of `predicate` for the [identifier](Imr::identifier) of this resource
    /// with `object`.
    ///
    /// Used for single-valued properties, such as server-managed timestamps.
    pub fn set_value(&mut self, predicate: &Term, object: &Term) -> GraphResult<()> {
        log::debug!("setting {predicate} of {}", self.uri);
        self.graph
            .set([Some(&self.uri), Some(predicate), Some(object)])
    }

    /// Convert this resource to an [`ExternalResource`],
    /// tagged with its [identifier](Imr::identifier).
    pub fn as_external_resource<G: ExternalGraph>(&self) -> GraphResult<ExternalResource<G>> {
        Ok(ExternalResource {
            subject: self.uri.clone(),
            graph: self.graph.as_external_graph()?,
        })
    }

    pub(super) fn anchored(&self, graph: SimpleGraph) -> Self {
        Imr {
            uri: self.uri.clone(),
            graph,
        }
    }
}

impl AsRef<SimpleGraph> for Imr {
    fn as_ref(&self) -> &SimpleGraph {
        &self.graph
    }
}
