//! I define triple patterns and the [`Matcher`] that scans a set against them.
//!
//! A pattern binds any subset of the subject, predicate and object positions.
//! The [`Shape`] of a pattern (which positions are bound) is computed once per query,
//! and selects one of eight fixed comparison functions;
//! scanning a set then costs one indirect call per candidate,
//! with no branching on the pattern inside the comparison.
//!
//! Matchers are generic over the key type,
//! so that they work on store keys as well as on local term handles.
use crate::term::Term;

/// A pattern over triples of `K`, where `None` leaves a position unbound.
pub type Pattern<K> = [Option<K>; 3];

/// A pattern over [terms](Term), as accepted by the public set APIs.
pub type TermPattern<'a> = [Option<&'a Term>; 3];

/// A position in a triple.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Position {
    /// The subject, at index 0
    Subject,
    /// The predicate, at index 1
    Predicate,
    /// The object, at index 2
    Object,
}

impl Position {
    /// The index of this position in a triple.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Position::Subject => 0,
            Position::Predicate => 1,
            Position::Object => 2,
        }
    }
}

/// The shape of a pattern, named after its bound positions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Shape {
    /// `(s, p, o)`
    Spo,
    /// `(s, p, ?)`
    Sp,
    /// `(s, ?, o)`
    So,
    /// `(?, p, o)`
    Po,
    /// `(s, ?, ?)`
    S,
    /// `(?, p, ?)`
    P,
    /// `(?, ?, o)`
    O,
    /// `(?, ?, ?)`
    Any,
}

impl Shape {
    /// The shape of `pattern`.
    pub fn of<K>(pattern: &Pattern<K>) -> Self {
        match (
            pattern[0].is_some(),
            pattern[1].is_some(),
            pattern[2].is_some(),
        ) {
            (true, true, true) => Shape::Spo,
            (true, true, false) => Shape::Sp,
            (true, false, true) => Shape::So,
            (false, true, true) => Shape::Po,
            (true, false, false) => Shape::S,
            (false, true, false) => Shape::P,
            (false, false, true) => Shape::O,
            (false, false, false) => Shape::Any,
        }
    }

    /// The unbound positions of this shape, in triple order.
    pub fn unbound(self) -> &'static [usize] {
        match self {
            Shape::Spo => &[],
            Shape::Sp => &[2],
            Shape::So => &[1],
            Shape::Po => &[0],
            Shape::S => &[1, 2],
            Shape::P => &[0, 2],
            Shape::O => &[0, 1],
            Shape::Any => &[0, 1, 2],
        }
    }

    /// Whether all positions are bound.
    #[inline]
    pub fn is_fully_bound(self) -> bool {
        self == Shape::Spo
    }
}

type CmpFn<K> = fn(&[K; 3], &[K; 3]) -> bool;

/// A pattern compiled into a single comparison function.
#[derive(Clone, Copy)]
pub struct Matcher<K> {
    shape: Shape,
    probe: [K; 3],
    cmp: CmpFn<K>,
}

impl<K> Matcher<K>
where
    K: Copy + Default + PartialEq,
{
    /// Compile `pattern`.
    pub fn new(pattern: Pattern<K>) -> Self {
        let shape = Shape::of(&pattern);
        let probe = pattern.map(Option::unwrap_or_default);
        let cmp: CmpFn<K> = match shape {
            Shape::Spo => cmp_spo,
            Shape::Sp => cmp_sp,
            Shape::So => cmp_so,
            Shape::Po => cmp_po,
            Shape::S => cmp_s,
            Shape::P => cmp_p,
            Shape::O => cmp_o,
            Shape::Any => cmp_any,
        };
        Matcher { shape, probe, cmp }
    }

    /// The shape of the compiled pattern.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// If the pattern is fully bound, the only triple it can match.
    ///
    /// Sets use it for a direct membership test instead of a scan.
    #[inline]
    pub fn exact(&self) -> Option<&[K; 3]> {
        self.shape.is_fully_bound().then_some(&self.probe)
    }

    /// Whether `triple` matches the pattern.
    #[inline]
    pub fn matches(&self, triple: &[K; 3]) -> bool {
        (self.cmp)(&self.probe, triple)
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for Matcher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("shape", &self.shape)
            .field("probe", &self.probe)
            .finish()
    }
}

fn cmp_spo<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    (p[0] == t[0]) & (p[1] == t[1]) & (p[2] == t[2])
}

fn cmp_sp<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    (p[0] == t[0]) & (p[1] == t[1])
}

fn cmp_so<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    (p[0] == t[0]) & (p[2] == t[2])
}

fn cmp_po<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    (p[1] == t[1]) & (p[2] == t[2])
}

fn cmp_s<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    p[0] == t[0]
}

fn cmp_p<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    p[1] == t[1]
}

fn cmp_o<K: PartialEq>(p: &[K; 3], t: &[K; 3]) -> bool {
    p[2] == t[2]
}

fn cmp_any<K>(_: &[K; 3], _: &[K; 3]) -> bool {
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    const T: [u32; 3] = [1, 2, 3];

    #[test_case([Some(1), Some(2), Some(3)], Shape::Spo)]
    #[test_case([Some(1), Some(2), None], Shape::Sp)]
    #[test_case([Some(1), None, Some(3)], Shape::So)]
    #[test_case([None, Some(2), Some(3)], Shape::Po)]
    #[test_case([Some(1), None, None], Shape::S)]
    #[test_case([None, Some(2), None], Shape::P)]
    #[test_case([None, None, Some(3)], Shape::O)]
    #[test_case([None, None, None], Shape::Any)]
    fn every_shape_matches_its_source(pattern: Pattern<u32>, shape: Shape) {
        let m = Matcher::new(pattern);
        assert_eq!(m.shape(), shape);
        assert!(m.matches(&T));
        assert_eq!(
            shape.unbound().len(),
            pattern.iter().filter(|x| x.is_none()).count()
        );
    }

    #[test_case([Some(1), Some(2), Some(4)])]
    #[test_case([Some(1), Some(4), None])]
    #[test_case([Some(4), None, Some(3)])]
    #[test_case([None, Some(2), Some(4)])]
    #[test_case([Some(4), None, None])]
    #[test_case([None, Some(4), None])]
    #[test_case([None, None, Some(4)])]
    fn bound_positions_are_compared(pattern: Pattern<u32>) {
        assert!(!Matcher::new(pattern).matches(&T));
    }

    #[test]
    fn unbound_positions_are_ignored() {
        // the probe holds the default value in unbound positions
        let m = Matcher::new([None, Some(2), None]);
        assert!(m.matches(&[0, 2, 0]));
        assert!(m.matches(&[9, 2, 9]));
        assert!(!m.matches(&[0, 0, 0]));
    }

    #[test]
    fn exact() {
        assert_eq!(Matcher::new([Some(1), Some(2), Some(3)]).exact(), Some(&T));
        assert_eq!(Matcher::new([Some(1), Some(2), None]).exact(), None);
    }

    #[test]
    fn positions() {
        assert_eq!(Position::Subject.index(), 0);
        assert_eq!(Position::Predicate.index(), 1);
        assert_eq!(Position::Object.index(), 2);
    }
}
