//! I define the binary codec for [terms](Term).
//!
//! Every encoded term is a self-describing record:
//! a one-byte kind tag, followed by one or more fields,
//! each prefixed by its length as a little-endian `u32`.
//!
//! | kind       | tag    | fields                       |
//! |------------|--------|------------------------------|
//! | IRI        | `0x01` | iri                          |
//! | blank node | `0x02` | id                           |
//! | literal    | `0x03` | value, datatype, language    |
//!
//! An absent datatype or language tag is encoded as an empty field.
//! Two terms are equal iff their encodings are byte-for-byte equal,
//! which is what the in-memory sets and the stores rely on.
use crate::term::{Literal, Term, TermKind};
use thiserror::Error;

/// Tag of an encoded IRI.
pub const TAG_IRI: u8 = 0x01;
/// Tag of an encoded blank node.
pub const TAG_BNODE: u8 = 0x02;
/// Tag of an encoded literal.
pub const TAG_LITERAL: u8 = 0x03;

const LEN_SIZE: usize = std::mem::size_of::<u32>();

/// An error raised while encoding or decoding a term.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// This kind of term can not be encoded.
    #[error("Unsupported term type: {0:?}")]
    UnsupportedTermType(TermKind),
    /// The data to decode does not follow the term layout.
    #[error("Corrupt term data: {0}")]
    CorruptData(&'static str),
    /// A field is too long to be framed.
    #[error("Term field of {0} bytes is too long to be encoded")]
    FieldTooLong(usize),
}

/// Encode `term` into a new buffer.
pub fn serialize(term: &Term) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(encoded_len(term));
    serialize_into(term, &mut buf)?;
    Ok(buf)
}

/// Append the encoding of `term` to `buf`.
///
/// On error, `buf` is left as it was.
pub fn serialize_into(term: &Term, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    let start = buf.len();
    let res = match term {
        Term::Iri(iri) => {
            buf.push(TAG_IRI);
            push_field(buf, iri.as_bytes())
        }
        Term::BlankNode(id) => {
            buf.push(TAG_BNODE);
            push_field(buf, id.as_bytes())
        }
        Term::Literal(lit) => {
            buf.push(TAG_LITERAL);
            push_field(buf, lit.value())
                .and_then(|_| push_field(buf, lit.datatype().unwrap_or("").as_bytes()))
                .and_then(|_| push_field(buf, lit.language().unwrap_or("").as_bytes()))
        }
        Term::Variable(_) => Err(CodecError::UnsupportedTermType(term.kind())),
    };
    if res.is_err() {
        buf.truncate(start);
    }
    res
}

/// Decode a term previously encoded with [`serialize`].
///
/// The whole of `data` must be consumed by exactly one record.
pub fn deserialize(data: &[u8]) -> Result<Term, CodecError> {
    let (&tag, mut rest) = data
        .split_first()
        .ok_or(CodecError::CorruptData("empty buffer"))?;
    let term = match tag {
        TAG_IRI => Term::Iri(utf8(read_field(&mut rest)?)?.into()),
        TAG_BNODE => Term::BlankNode(utf8(read_field(&mut rest)?)?.into()),
        TAG_LITERAL => {
            let value = read_field(&mut rest)?;
            let datatype = utf8(read_field(&mut rest)?)?;
            let language = utf8(read_field(&mut rest)?)?;
            Term::Literal(Literal::new(
                value,
                (!datatype.is_empty()).then_some(datatype),
                (!language.is_empty()).then_some(language),
            ))
        }
        _ => return Err(CodecError::CorruptData("unknown term tag")),
    };
    if !rest.is_empty() {
        return Err(CodecError::CorruptData("trailing bytes after term"));
    }
    Ok(term)
}

/// The kind of term encoded in `data`, read from its tag only.
pub fn kind_of(data: &[u8]) -> Result<TermKind, CodecError> {
    match data.first() {
        Some(&TAG_IRI) => Ok(TermKind::Iri),
        Some(&TAG_BNODE) => Ok(TermKind::BlankNode),
        Some(&TAG_LITERAL) => Ok(TermKind::Literal),
        Some(_) => Err(CodecError::CorruptData("unknown term tag")),
        None => Err(CodecError::CorruptData("empty buffer")),
    }
}

fn encoded_len(term: &Term) -> usize {
    1 + match term {
        Term::Iri(s) | Term::BlankNode(s) | Term::Variable(s) => LEN_SIZE + s.len(),
        Term::Literal(lit) => {
            3 * LEN_SIZE
                + lit.value().len()
                + lit.datatype().map(str::len).unwrap_or(0)
                + lit.language().map(str::len).unwrap_or(0)
        }
    }
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) -> Result<(), CodecError> {
    let len = u32::try_from(field.len()).map_err(|_| CodecError::FieldTooLong(field.len()))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(field);
    Ok(())
}

fn read_field<'a>(data: &mut &'a [u8]) -> Result<&'a [u8], CodecError> {
    if data.len() < LEN_SIZE {
        return Err(CodecError::CorruptData("truncated field length"));
    }
    let (len, rest) = data.split_at(LEN_SIZE);
    let mut len_bytes = [0; LEN_SIZE];
    len_bytes.copy_from_slice(len);
    let len = u32::from_le_bytes(len_bytes) as usize;
    if rest.len() < len {
        return Err(CodecError::CorruptData("truncated field"));
    }
    let (field, rest) = rest.split_at(len);
    *data = rest;
    Ok(field)
}

fn utf8(field: &[u8]) -> Result<&str, CodecError> {
    std::str::from_utf8(field).map_err(|_| CodecError::CorruptData("invalid UTF-8 in text field"))
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case(Term::iri("http://example.org/a") ; "iri")]
    #[test_case(Term::iri("") ; "empty iri")]
    #[test_case(Term::bnode("b1") ; "blank node")]
    #[test_case(Term::literal("hello") ; "plain literal")]
    #[test_case(Term::literal("") ; "empty literal")]
    #[test_case(Term::literal_dt("42", "http://www.w3.org/2001/XMLSchema#integer") ; "typed literal")]
    #[test_case(Term::literal_lang("chat", "fr") ; "language literal")]
    #[test_case(Term::Literal(Literal::new("both", Some("urn:dt"), Some("en"))) ; "literal with both")]
    #[test_case(Term::literal(vec![0xff, 0x00, 0xfe]) ; "binary literal")]
    #[test_case(Term::iri("http://example.org/é/日本") ; "non ascii iri")]
    fn round_trip(term: Term) {
        let data = serialize(&term).unwrap();
        assert_eq!(deserialize(&data).unwrap(), term);
        assert_eq!(kind_of(&data).unwrap(), term.kind());
    }

    #[test]
    fn layout() {
        let data = serialize(&Term::iri("ab")).unwrap();
        assert_eq!(data, vec![TAG_IRI, 2, 0, 0, 0, b'a', b'b']);
        let data = serialize(&Term::literal("x")).unwrap();
        assert_eq!(
            data,
            vec![TAG_LITERAL, 1, 0, 0, 0, b'x', 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn kinds_are_distinguished() {
        let iri = serialize(&Term::iri("x")).unwrap();
        let bnode = serialize(&Term::bnode("x")).unwrap();
        let lit = serialize(&Term::literal("x")).unwrap();
        assert_ne!(iri, bnode);
        assert_ne!(iri, lit);
        assert_ne!(bnode, lit);
    }

    #[test]
    fn variable_is_unsupported() {
        let mut buf = vec![1, 2, 3];
        assert_eq!(
            serialize_into(&Term::var("x"), &mut buf),
            Err(CodecError::UnsupportedTermType(TermKind::Variable))
        );
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test_case(&[] ; "empty")]
    #[test_case(&[0x09, 0, 0, 0, 0] ; "unknown tag")]
    #[test_case(&[TAG_IRI, 5, 0] ; "truncated length")]
    #[test_case(&[TAG_IRI, 5, 0, 0, 0, b'a'] ; "truncated field")]
    #[test_case(&[TAG_IRI, 1, 0, 0, 0, b'a', 0] ; "trailing bytes")]
    #[test_case(&[TAG_BNODE, 1, 0, 0, 0, 0xff] ; "invalid utf8")]
    #[test_case(&[TAG_LITERAL, 1, 0, 0, 0, b'a'] ; "missing literal fields")]
    fn corrupt(data: &[u8]) {
        assert!(matches!(
            deserialize(data),
            Err(CodecError::CorruptData(_))
        ));
    }

    #[test]
    fn encoded_len_is_exact() {
        for t in [
            Term::iri("urn:x"),
            Term::bnode("b"),
            Term::Literal(Literal::new("v", Some("urn:dt"), Some("en"))),
        ] {
            assert_eq!(serialize(&t).unwrap().len(), encoded_len(&t));
        }
    }
}
