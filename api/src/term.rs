//! I define the [`Term`] type, representing RDF terms,
//! and the [`TermKind`] enum classifying them.
//!
//! Terms are immutable once constructed.
//! They are compared, hashed and ordered structurally,
//! which is what the in-memory sets and the codec rely on.
use std::fmt;

/// This type represents the different kinds of RDF terms.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TermKind {
    /// An [RDF IRI](https://www.w3.org/TR/rdf11-concepts/#section-IRIs)
    Iri,
    /// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#section-blank-nodes)
    BlankNode,
    /// An RDF [literal](https://www.w3.org/TR/rdf11-concepts/#section-Graph-Literal)
    Literal,
    /// A SPARQL or Notation3 variable
    Variable,
}

/// An RDF term.
///
/// Only [IRIs](Term::Iri), [blank nodes](Term::BlankNode) and [literals](Term::Literal)
/// can be stored; [variables](Term::Variable) are only meaningful in queries,
/// and are rejected by the [codec](crate::codec).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Term {
    /// An [RDF IRI](https://www.w3.org/TR/rdf11-concepts/#section-IRIs)
    Iri(Box<str>),
    /// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#section-blank-nodes)
    BlankNode(Box<str>),
    /// An RDF [literal](https://www.w3.org/TR/rdf11-concepts/#section-Graph-Literal)
    Literal(Literal),
    /// A SPARQL or Notation3 variable
    Variable(Box<str>),
}

/// The data of a [`Term::Literal`].
///
/// The value is kept as raw bytes;
/// datatype and language tag are both optional and independent.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Literal {
    value: Box<[u8]>,
    datatype: Option<Box<str>>,
    language: Option<Box<str>>,
}

impl Literal {
    /// Build a literal from its parts.
    pub fn new<V, D, L>(value: V, datatype: Option<D>, language: Option<L>) -> Self
    where
        V: Into<Vec<u8>>,
        D: Into<String>,
        L: Into<String>,
    {
        Literal {
            value: value.into().into_boxed_slice(),
            datatype: datatype.map(|d| d.into().into_boxed_str()),
            language: language.map(|l| l.into().into_boxed_str()),
        }
    }

    /// The raw value of this literal.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The value of this literal as text, if it is valid UTF-8.
    pub fn lexical_form(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// The datatype IRI of this literal, if any.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// The language tag of this literal, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl Term {
    /// Build an IRI term.
    pub fn iri<T: Into<String>>(iri: T) -> Self {
        Term::Iri(iri.into().into_boxed_str())
    }

    /// Build a blank node term.
    pub fn bnode<T: Into<String>>(id: T) -> Self {
        Term::BlankNode(id.into().into_boxed_str())
    }

    /// Build a plain literal, with neither datatype nor language tag.
    pub fn literal<V: Into<Vec<u8>>>(value: V) -> Self {
        Term::Literal(Literal::new(value, None::<String>, None::<String>))
    }

    /// Build a literal with a datatype.
    pub fn literal_dt<V: Into<Vec<u8>>, D: Into<String>>(value: V, datatype: D) -> Self {
        Term::Literal(Literal::new(value, Some(datatype), None::<String>))
    }

    /// Build a language-tagged literal.
    pub fn literal_lang<V: Into<Vec<u8>>, L: Into<String>>(value: V, language: L) -> Self {
        Term::Literal(Literal::new(value, None::<String>, Some(language)))
    }

    /// Build a variable.
    pub fn var<T: Into<String>>(name: T) -> Self {
        Term::Variable(name.into().into_boxed_str())
    }

    /// Return the kind of RDF term that this [`Term`] represents.
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Iri(_) => TermKind::Iri,
            Term::BlankNode(_) => TermKind::BlankNode,
            Term::Literal(_) => TermKind::Literal,
            Term::Variable(_) => TermKind::Variable,
        }
    }

    /// Return true if this [`Term`] is an IRI.
    #[inline]
    pub fn is_iri(&self) -> bool {
        self.kind() == TermKind::Iri
    }

    /// Return true if this [`Term`] is a blank node.
    #[inline]
    pub fn is_blank_node(&self) -> bool {
        self.kind() == TermKind::BlankNode
    }

    /// Return true if this [`Term`] is a literal.
    #[inline]
    pub fn is_literal(&self) -> bool {
        self.kind() == TermKind::Literal
    }

    /// If this term is an IRI, return it.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// If this term is a literal, return its data.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

/// Terms are displayed in an N-Triples-like syntax.
/// Literal values that are not valid UTF-8 are displayed lossily.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Variable(name) => write!(f, "?{name}"),
            Term::Literal(lit) => {
                write!(f, "{:?}", String::from_utf8_lossy(&lit.value))?;
                if let Some(lang) = &lit.language {
                    write!(f, "@{lang}")?;
                }
                if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{dt}>")?;
                }
                Ok(())
            }
        }
    }
}

/// A triple of owned [terms](Term), in subject-predicate-object order.
pub type Triple = [Term; 3];
