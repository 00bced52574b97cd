//! Contains helper functions and macros for testing TripleSet implementations

use crate::term::{Term, Triple};

pub const NS: &str = "http://example.org/";

pub fn iri(suffix: &str) -> Term {
    Term::iri(format!("{NS}{suffix}"))
}

pub fn lit(value: &str) -> Term {
    Term::literal(value)
}

/// `{(a,p,1), (a,p,2), (b,p,1)}`
pub fn scenario_triples() -> Vec<Triple> {
    vec![
        [iri("a"), iri("p"), lit("1")],
        [iri("a"), iri("p"), lit("2")],
        [iri("b"), iri("p"), lit("1")],
    ]
}

/// A set mixing all storable term kinds.
pub fn some_triples() -> Vec<Triple> {
    vec![
        [iri("C1"), iri("type"), iri("Class")],
        [iri("C2"), iri("type"), iri("Class")],
        [iri("C2"), iri("subClassOf"), iri("C1")],
        [iri("I1"), iri("type"), iri("C1")],
        [iri("I1"), iri("label"), Term::literal_lang("un", "fr")],
        [iri("I1"), iri("label"), Term::literal_lang("one", "en")],
        [iri("I1"), iri("rank"), Term::literal_dt("1", "urn:int")],
        [Term::bnode("b1"), iri("type"), iri("C2")],
        [Term::bnode("b1"), iri("knows"), iri("I1")],
        [iri("I1"), iri("knows"), Term::bnode("b1")],
    ]
}

/// A set overlapping with [`some_triples`].
pub fn other_triples() -> Vec<Triple> {
    vec![
        [iri("C1"), iri("type"), iri("Class")],
        [iri("I1"), iri("type"), iri("C1")],
        [iri("I1"), iri("label"), Term::literal_lang("one", "en")],
        [iri("I2"), iri("type"), iri("C2")],
        [iri("I2"), iri("label"), lit("two")],
        [Term::bnode("b2"), iri("knows"), iri("I2")],
    ]
}

/// The 8 patterns obtained by unbinding 0 to 3 positions of `t`.
pub fn patterns_of(t: &Triple) -> [[Option<&Term>; 3]; 8] {
    let [s, p, o] = t;
    [
        [Some(s), Some(p), Some(o)],
        [Some(s), Some(p), None],
        [Some(s), None, Some(o)],
        [None, Some(p), Some(o)],
        [Some(s), None, None],
        [None, Some(p), None],
        [None, None, Some(o)],
        [None, None, None],
    ]
}

pub fn sorted(mut triples: Vec<Triple>) -> Vec<Triple> {
    triples.sort();
    triples.dedup();
    triples
}

/// Generates a test suite for implementations of
/// [`TripleSet`](crate::graph::TripleSet).
///
/// `$new_set` is an expression building an empty set;
/// every other set in a test is built from it with
/// [`empty_like`](crate::graph::TripleSet::empty_like),
/// so that all operands share the same configuration.
#[macro_export]
macro_rules! test_triple_set_impl {
    ($new_set: expr) => {
        $crate::test_triple_set_impl!(test, $new_set);
    };
    ($module_name: ident, $new_set: expr) => {
        #[cfg(test)]
        mod $module_name {
            #[allow(unused_imports)]
            use super::*;
            use std::collections::{BTreeSet, HashSet};
            use $crate::graph::test::*;
            use $crate::graph::{GraphError, TripleSet};
            use $crate::matcher::Position;
            use $crate::slice::Slice;
            use $crate::term::{Term, Triple};

            type TestResult = Result<(), Box<dyn std::error::Error>>;

            fn filled<G: TripleSet>(like: &G, triples: Vec<Triple>) -> G {
                let mut g = like.empty_like();
                g.add(triples).unwrap();
                g
            }

            #[test]
            fn test_empty() -> TestResult {
                let g = $new_set;
                assert_eq!(g.len(), 0);
                assert!(g.is_empty());
                assert!(g.data()?.is_empty());
                assert!(!g.contains(&scenario_triples()[0])?);
                Ok(())
            }

            #[test]
            fn test_idempotent_insertion() -> TestResult {
                let mut g = $new_set;
                let t = some_triples().remove(0);
                assert!(g.add_triple(&t)?);
                assert_eq!(g.len(), 1);
                assert!(!g.add_triple(&t)?);
                assert_eq!(g.len(), 1);
                g.add(some_triples())?;
                g.add(some_triples())?;
                assert_eq!(g.len(), some_triples().len());
                Ok(())
            }

            #[test]
            fn test_contains() -> TestResult {
                let g = filled(&$new_set, some_triples());
                for t in some_triples() {
                    assert!(g.contains(&t)?, "{t:?}");
                }
                for t in other_triples() {
                    assert_eq!(g.contains(&t)?, some_triples().contains(&t), "{t:?}");
                }
                Ok(())
            }

            #[test]
            fn test_data() -> TestResult {
                let g = filled(&$new_set, some_triples());
                assert_eq!(sorted(g.data()?), sorted(some_triples()));
                let ext: BTreeSet<Triple> = g.as_external_graph()?;
                assert_eq!(ext, some_triples().into_iter().collect::<BTreeSet<_>>());
                let ext: Vec<Triple> = g.as_external_graph()?;
                assert_eq!(ext.len(), g.len());
                Ok(())
            }

            #[test]
            fn test_equality_ignores_order() {
                let new = $new_set;
                let mut reversed = some_triples();
                reversed.reverse();
                let g1 = filled(&new, some_triples());
                let g2 = filled(&new, reversed);
                assert!(g1.equals(&g2));
                assert!(!g1.equals(&filled(&new, other_triples())));
                assert!(!g1.equals(&new));
            }

            #[test]
            fn test_commutativity_and_idempotence() {
                let new = $new_set;
                let a = filled(&new, some_triples());
                let b = filled(&new, other_triples());
                assert!(a.union(&b).equals(&b.union(&a)));
                assert!(a.intersection(&b).equals(&b.intersection(&a)));
                assert!(a.union(&a).equals(&a));
                assert!(a.intersection(&a).equals(&a));
                assert!(a.difference(&a).is_empty());
                assert!(a.symmetric_difference(&a).is_empty());
            }

            #[test]
            fn test_algebra_contents() -> TestResult {
                let new = $new_set;
                let a = filled(&new, some_triples());
                let b = filled(&new, other_triples());
                let sa: HashSet<Triple> = some_triples().into_iter().collect();
                let sb: HashSet<Triple> = other_triples().into_iter().collect();

                let union: HashSet<Triple> = a.union(&b).as_external_graph()?;
                assert_eq!(union, &sa | &sb);
                let inter: HashSet<Triple> = a.intersection(&b).as_external_graph()?;
                assert_eq!(inter, &sa & &sb);
                let diff: HashSet<Triple> = a.difference(&b).as_external_graph()?;
                assert_eq!(diff, &sa - &sb);
                let xor: HashSet<Triple> = a.symmetric_difference(&b).as_external_graph()?;
                assert_eq!(xor, &sa ^ &sb);
                Ok(())
            }

            #[test]
            fn test_de_morgan_identities() {
                let new = $new_set;
                let a = filled(&new, some_triples());
                let b = filled(&new, other_triples());
                let xor = a.symmetric_difference(&b);
                let expected = a.difference(&b).union(&b.difference(&a));
                assert!(xor.equals(&expected));
                assert!(a.difference(&b).intersection(&b).is_empty());
            }

            #[test]
            fn test_operands_untouched() {
                let new = $new_set;
                let a = filled(&new, some_triples());
                let b = filled(&new, other_triples());
                let _ = a.union(&b);
                let _ = a.intersection(&b);
                let _ = a.difference(&b);
                let _ = a.symmetric_difference(&b);
                assert_eq!(a.len(), some_triples().len());
                assert_eq!(b.len(), other_triples().len());
            }

            #[test]
            fn test_in_place_algebra() {
                let new = $new_set;
                let a = filled(&new, some_triples());
                let b = filled(&new, other_triples());

                let mut x = filled(&new, some_triples());
                assert!(x.union_with(&b).equals(&a.union(&b)));
                let mut x = filled(&new, some_triples());
                assert!(x.intersect_with(&b).equals(&a.intersection(&b)));
                let mut x = filled(&new, some_triples());
                assert!(x.subtract(&b).equals(&a.difference(&b)));
                let mut x = filled(&new, some_triples());
                x.symmetric_difference_with(&b);
                assert!(x.equals(&a.symmetric_difference(&b)));
                assert_eq!(b.len(), other_triples().len());
            }

            #[test]
            fn test_pattern_completeness() -> TestResult {
                let g = filled(&$new_set, some_triples());
                for t in some_triples() {
                    for pattern in patterns_of(&t) {
                        let found = g.lookup(pattern)?;
                        assert!(found.contains(&t)?, "{t:?} not found by {pattern:?}");
                        for u in found.data()? {
                            for i in 0..3 {
                                if let Some(term) = pattern[i] {
                                    assert_eq!(&u[i], term);
                                }
                            }
                        }
                    }
                }
                Ok(())
            }

            #[test]
            fn test_lookup_unknown_term() -> TestResult {
                let g = filled(&$new_set, some_triples());
                let unknown = iri("unknown");
                assert!(g.lookup([Some(&unknown), None, None])?.is_empty());
                assert!(g.lookup([None, None, Some(&unknown)])?.is_empty());
                assert_eq!(g.slice([Some(&unknown), None, None])?.len(), 0);
                Ok(())
            }

            #[test]
            fn test_scenario_lookup_and_slice() -> TestResult {
                let g = filled(&$new_set, scenario_triples());
                let (a, b, p) = (iri("a"), iri("b"), iri("p"));
                let (l1, l2) = (lit("1"), lit("2"));

                let found = g.lookup([Some(&a), Some(&p), None])?;
                assert_eq!(
                    sorted(found.data()?),
                    sorted(scenario_triples()[..2].to_vec())
                );

                let s = g.slice([Some(&a), Some(&p), None])?;
                assert_eq!(
                    s,
                    Slice::Terms([l1.clone(), l2.clone()].into_iter().collect())
                );
                let s = g.slice([None, Some(&p), Some(&l1)])?;
                assert_eq!(s, Slice::Terms([a.clone(), b.clone()].into_iter().collect()));
                assert_eq!(g.slice([Some(&a), Some(&p), Some(&l1)])?, Slice::Contains(true));
                assert_eq!(g.slice([Some(&b), Some(&p), Some(&l2)])?, Slice::Contains(false));
                let s = g.slice([None, Some(&p), None])?;
                assert_eq!(
                    s,
                    Slice::Pairs(
                        [
                            (a.clone(), l1.clone()),
                            (a.clone(), l2.clone()),
                            (b.clone(), l1.clone())
                        ]
                        .into_iter()
                        .collect()
                    )
                );
                let s = g.slice([None, None, None])?;
                assert_eq!(s, Slice::Triples(scenario_triples().into_iter().collect()));
                Ok(())
            }

            #[test]
            fn test_value() -> TestResult {
                let g = filled(&$new_set, scenario_triples());
                let (a, b, p, q) = (iri("a"), iri("b"), iri("p"), iri("q"));
                assert!(matches!(
                    g.value_for(&a, &p, true),
                    Err(GraphError::MultipleValues { count: 2, .. })
                ));
                let v = g.value_for(&a, &p, false)?.unwrap();
                assert!(v == lit("1") || v == lit("2"));
                assert_eq!(g.value_for(&b, &p, true)?, Some(lit("1")));
                assert_eq!(g.value_for(&b, &q, true)?, None);
                Ok(())
            }

            #[test]
            fn test_remove_and_retain() -> TestResult {
                let new = $new_set;
                let (a, p) = (iri("a"), iri("p"));
                let mut g = filled(&new, scenario_triples());
                assert_eq!(g.remove([Some(&a), None, None])?, 2);
                assert_eq!(g.len(), 1);
                assert_eq!(g.remove([Some(&a), None, None])?, 0);

                let mut g = filled(&new, scenario_triples());
                let t = scenario_triples().remove(1);
                assert_eq!(g.remove([Some(&t[0]), Some(&t[1]), Some(&t[2])])?, 1);
                assert!(!g.contains(&t)?);
                assert_eq!(g.len(), 2);

                let mut g = filled(&new, scenario_triples());
                assert_eq!(g.remove([None, None, None])?, 3);
                assert!(g.is_empty());

                let mut g = filled(&new, scenario_triples());
                assert_eq!(g.retain([Some(&a), Some(&p), None])?, 1);
                assert_eq!(sorted(g.data()?), sorted(scenario_triples()[..2].to_vec()));
                Ok(())
            }

            #[test]
            fn test_functional_replace() -> TestResult {
                let mut g = $new_set;
                let (a, b, p, q) = (iri("a"), iri("b"), iri("p"), iri("q"));
                let (v1, v2) = (lit("v1"), lit("v2"));
                g.add(vec![
                    [a.clone(), p.clone(), v1.clone()],
                    [a.clone(), q.clone(), v1.clone()],
                    [b.clone(), p.clone(), v1.clone()],
                ])?;
                g.set([Some(&a), Some(&p), Some(&v2)])?;
                assert_eq!(
                    g.slice([Some(&a), Some(&p), None])?,
                    Slice::Terms([v2.clone()].into_iter().collect())
                );
                assert!(g.contains(&[a.clone(), q.clone(), v1.clone()])?);
                assert!(g.contains(&[b.clone(), p.clone(), v1.clone()])?);
                assert_eq!(g.len(), 3);
                Ok(())
            }

            #[test]
            fn test_functional_replace_rejects_unbound() -> TestResult {
                let mut g = filled(&$new_set, scenario_triples());
                let (a, p) = (iri("a"), iri("p"));
                assert!(matches!(
                    g.set([Some(&a), Some(&p), None]),
                    Err(GraphError::InvalidTriple([true, true, false]))
                ));
                assert!(matches!(
                    g.set([None, Some(&p), Some(&a)]),
                    Err(GraphError::InvalidTriple([false, true, true]))
                ));
                assert_eq!(sorted(g.data()?), sorted(scenario_triples()));
                Ok(())
            }

            #[test]
            fn test_terms_by_position() -> TestResult {
                let g = filled(&$new_set, scenario_triples());
                let subjects: HashSet<Term> = [iri("a"), iri("b")].into_iter().collect();
                let predicates: HashSet<Term> = [iri("p")].into_iter().collect();
                let objects: HashSet<Term> = [lit("1"), lit("2")].into_iter().collect();
                assert_eq!(g.terms(Position::Subject)?, subjects);
                assert_eq!(g.terms(Position::Predicate)?, predicates);
                assert_eq!(g.terms(Position::Object)?, objects);
                Ok(())
            }
        }
    };
}
