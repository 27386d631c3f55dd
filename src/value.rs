//! The object tree of decoded values.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use bytes::Bytes;
use crate::ident::{Class, Tag};
use crate::length::Length;


//------------ Value ---------------------------------------------------------

/// A single decoded or to-be-encoded value.
///
/// A value pairs a [`Tag`] with its content. Primitive values carry their
/// raw content octets, constructed values carry an ordered sequence of
/// child values. The two cases are kept apart by the [`Content`] enum, so
/// a primitive value with children cannot be expressed at all.
///
/// Values returned by a decode call are plain owned data: dropping a
/// value drops its entire subtree, and nothing else keeps a reference to
/// it. Trees for encoding can be built directly via [`Value::primitive`]
/// and [`Value::constructed`].
#[derive(Clone, Eq, PartialEq)]
pub struct Value {
    /// The tag of the value.
    tag: Tag,

    /// The content of the value.
    content: Content,
}

impl Value {
    /// Creates a new primitive value from a tag and its content octets.
    pub fn primitive(tag: Tag, content: impl Into<Bytes>) -> Self {
        Self { tag, content: Content::Primitive(content.into()) }
    }

    /// Creates a new constructed value from a tag and its children.
    pub fn constructed(tag: Tag, children: Vec<Value>) -> Self {
        Self { tag, content: Content::Constructed(children) }
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the class of the value’s tag.
    pub fn class(&self) -> Class {
        self.tag.class()
    }

    /// Returns the number of the value’s tag.
    pub fn number(&self) -> u64 {
        self.tag.number()
    }

    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        matches!(self.content, Content::Constructed(_))
    }

    /// Returns whether the value uses primitive encoding.
    pub fn is_primitive(&self) -> bool {
        matches!(self.content, Content::Primitive(_))
    }

    /// Returns a reference to the content of the value.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Returns the content octets if the value is primitive.
    pub fn bytes(&self) -> Option<&Bytes> {
        match self.content {
            Content::Primitive(ref bytes) => Some(bytes),
            Content::Constructed(_) => None,
        }
    }

    /// Returns the child values if the value is constructed.
    pub fn children(&self) -> Option<&[Value]> {
        match self.content {
            Content::Primitive(_) => None,
            Content::Constructed(ref children) => Some(children),
        }
    }

    /// Returns the child value at `idx` if there is one.
    pub fn child(&self, idx: usize) -> Option<&Value> {
        self.children()?.get(idx)
    }

    /// Returns the number of content octets of the canonical encoding.
    ///
    /// For a constructed value, this is the sum of the full encoded
    /// lengths of all children.
    pub fn content_len(&self) -> usize {
        match self.content {
            Content::Primitive(ref bytes) => bytes.len(),
            Content::Constructed(ref children) => {
                children.iter().map(Value::encoded_len).sum()
            }
        }
    }

    /// Returns the total number of octets of the canonical encoding.
    ///
    /// This covers the identifier octets, the length octets, and the
    /// content octets, recursively for constructed values. For values
    /// decoded from non-canonical BER input, this may be smaller than
    /// the number of input octets the decoder reported as consumed.
    pub fn encoded_len(&self) -> usize {
        let content_len = self.content_len();
        self.tag.identifier_len()
            + Length::definite_len(content_len)
            + content_len
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.content {
            Content::Primitive(ref bytes) => {
                write!(f, "{} {:02x?}", self.tag, bytes.as_ref())
            }
            Content::Constructed(ref children) => {
                write!(f, "{} ", self.tag)?;
                f.debug_list().entries(children).finish()
            }
        }
    }
}


//------------ Content -------------------------------------------------------

/// The content of a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
    /// The value is primitive and carries its raw content octets.
    Primitive(Bytes),

    /// The value is constructed from a sequence of child values.
    Constructed(Vec<Value>),
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors() {
        let prim = Value::primitive(
            Tag::OCTET_STRING, Bytes::from_static(b"\x01\x02\x03\x04")
        );
        assert_eq!(prim.tag(), Tag::OCTET_STRING);
        assert_eq!(prim.class(), Class::Universal);
        assert_eq!(prim.number(), 4);
        assert!(prim.is_primitive());
        assert!(!prim.is_constructed());
        assert_eq!(prim.bytes().unwrap().as_ref(), b"\x01\x02\x03\x04");
        assert!(prim.children().is_none());
        assert_eq!(prim.content_len(), 4);
        assert_eq!(prim.encoded_len(), 6);

        let cons = Value::constructed(Tag::SEQUENCE, vec![prim.clone()]);
        assert!(cons.is_constructed());
        assert!(cons.bytes().is_none());
        assert_eq!(cons.children().unwrap().len(), 1);
        assert_eq!(cons.child(0), Some(&prim));
        assert!(cons.child(1).is_none());
        assert_eq!(cons.content_len(), 6);
        assert_eq!(cons.encoded_len(), 8);
    }

    #[test]
    fn empty_constructed_len() {
        let value = Value::constructed(Tag::SEQUENCE, Vec::new());
        assert_eq!(value.content_len(), 0);
        assert_eq!(value.encoded_len(), 2);
    }

    #[test]
    fn long_form_len() {
        let value = Value::primitive(Tag::OCTET_STRING, vec![0u8; 200]);
        // One identifier octet, two length octets, 200 content octets.
        assert_eq!(value.encoded_len(), 203);
    }
}
