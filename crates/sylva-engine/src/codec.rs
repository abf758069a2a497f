//! Versioned, language-neutral binary encoding for syntax trees.
//!
//! ```text
//! stream  := magic version node
//! magic   := "SYLT"
//! version := 0x01
//! node    := 0x00 label                 (leaf)
//!          | 0x01 label count node*     (phrase, count >= 1)
//! label   := u32-BE length, UTF-8 bytes
//! count   := u32-BE
//! ```
//!
//! Nodes are written in pre-order, so a decoder needs nothing beyond the
//! layout above.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::DecodeError;
use crate::tree::Tree;

/// Leading bytes of every encoded tree.
pub const MAGIC: &[u8; 4] = b"SYLT";

/// Current encoding version.
pub const VERSION: u8 = 1;

/// Deepest nesting the decoder accepts.
pub const MAX_DEPTH: usize = 1024;

const LEAF_TAG: u8 = 0x00;
const PHRASE_TAG: u8 = 0x01;

/// Smallest encoded node: a tag byte and an empty label's length.
const MIN_NODE_BYTES: usize = 5;

pub(crate) fn encode(tree: &Tree) -> Vec<u8> {
    let mut buffer = BytesMut::with_capacity(64);
    buffer.put_slice(MAGIC);
    buffer.put_u8(VERSION);
    encode_node(tree, &mut buffer);
    buffer.to_vec()
}

fn encode_node(tree: &Tree, buffer: &mut BytesMut) {
    if tree.is_leaf() {
        buffer.put_u8(LEAF_TAG);
        put_label(tree.label(), buffer);
        return;
    }
    buffer.put_u8(PHRASE_TAG);
    put_label(tree.label(), buffer);
    buffer.put_u32(length_u32(tree.children().len()));
    for child in tree.children() {
        encode_node(child, buffer);
    }
}

fn put_label(label: &str, buffer: &mut BytesMut) {
    buffer.put_u32(length_u32(label.len()));
    buffer.put_slice(label.as_bytes());
}

// Labels and child lists are bounded by the request size, far below u32::MAX.
fn length_u32(length: usize) -> u32 {
    u32::try_from(length).unwrap_or(u32::MAX)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Tree, DecodeError> {
    let mut input = bytes;
    if input.remaining() < MAGIC.len() || !input.starts_with(MAGIC) {
        return Err(DecodeError::BadMagic);
    }
    input.advance(MAGIC.len());

    let version = take_u8(&mut input, "version")?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { version });
    }

    let tree = decode_node(&mut input, 1)?;
    if input.has_remaining() {
        return Err(DecodeError::TrailingBytes {
            count: input.remaining(),
        });
    }
    Ok(tree)
}

fn decode_node(input: &mut &[u8], depth: usize) -> Result<Tree, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::TooDeep { limit: MAX_DEPTH });
    }
    match take_u8(input, "node tag")? {
        LEAF_TAG => Ok(Tree::leaf(take_label(input)?)),
        PHRASE_TAG => {
            let label = take_label(input)?;
            let count = take_u32(input, "child count")?;
            if count == 0 {
                return Err(DecodeError::EmptyPhrase { label });
            }
            // The allocation is bounded by the bytes actually present.
            let capacity = usize::try_from(count)
                .unwrap_or(usize::MAX)
                .min(input.remaining().checked_div(MIN_NODE_BYTES).unwrap_or(0));
            let mut children = Vec::with_capacity(capacity);
            for _ in 0..count {
                children.push(decode_node(input, depth + 1)?);
            }
            Ok(Tree::phrase(label, children))
        }
        tag => Err(DecodeError::UnknownNodeTag { tag }),
    }
}

fn take_u8(input: &mut &[u8], context: &'static str) -> Result<u8, DecodeError> {
    if input.remaining() < 1 {
        return Err(DecodeError::Truncated { context });
    }
    Ok(input.get_u8())
}

fn take_u32(input: &mut &[u8], context: &'static str) -> Result<u32, DecodeError> {
    if input.remaining() < 4 {
        return Err(DecodeError::Truncated { context });
    }
    Ok(input.get_u32())
}

fn take_label(input: &mut &[u8]) -> Result<String, DecodeError> {
    let length = usize::try_from(take_u32(input, "label length")?).unwrap_or(usize::MAX);
    if input.remaining() < length {
        return Err(DecodeError::Truncated { context: "label" });
    }
    let mut raw = vec![0_u8; length];
    input.copy_to_slice(&mut raw);
    String::from_utf8(raw).map_err(|_| DecodeError::InvalidLabel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn noun_phrase() -> Tree {
        Tree::phrase(
            "NP",
            vec![Tree::preterminal("DT", "the"), Tree::preterminal("NN", "café")],
        )
    }

    #[test]
    fn encodes_header_then_preorder_nodes() {
        let bytes = Tree::preterminal("NN", "dog").to_binary();
        let expected: Vec<u8> = [
            b"SYLT".as_slice(),
            &[1],
            &[1, 0, 0, 0, 2],
            b"NN",
            &[0, 0, 0, 1],
            &[0, 0, 0, 0, 3],
            b"dog",
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let tree = noun_phrase();
        assert_eq!(Tree::from_binary(&tree.to_binary()), Ok(tree));
    }

    #[rstest]
    #[case(b"NOPE\x01".to_vec(), DecodeError::BadMagic)]
    #[case(b"SYLT\x02".to_vec(), DecodeError::UnsupportedVersion { version: 2 })]
    #[case(b"SYLT\x01\x07".to_vec(), DecodeError::UnknownNodeTag { tag: 7 })]
    #[case(b"SYLT\x01\x00\x00\x00\x00\x09ab".to_vec(), DecodeError::Truncated { context: "label" })]
    #[case(b"SYLT\x01\x01\x00\x00\x00\x01X\x00\x00\x00\x00".to_vec(), DecodeError::EmptyPhrase { label: "X".to_owned() })]
    #[case(b"SYLT\x01\x00\x00\x00\x00\x02\xff\xfe".to_vec(), DecodeError::InvalidLabel)]
    fn rejects_malformed_streams(#[case] bytes: Vec<u8>, #[case] expected: DecodeError) {
        assert_eq!(Tree::from_binary(&bytes), Err(expected));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = Tree::leaf("x").to_binary();
        bytes.push(0);
        assert_eq!(
            Tree::from_binary(&bytes),
            Err(DecodeError::TrailingBytes { count: 1 })
        );
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut tree = Tree::leaf("x");
        for _ in 0..=MAX_DEPTH {
            tree = Tree::phrase("X", vec![tree]);
        }
        assert_eq!(
            Tree::from_binary(&tree.to_binary()),
            Err(DecodeError::TooDeep { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn oversized_child_counts_fail_as_truncated() {
        let mut buffer = BytesMut::new();
        buffer.put_slice(MAGIC);
        buffer.put_u8(VERSION);
        buffer.put_u8(PHRASE_TAG);
        buffer.put_u32(2);
        buffer.put_slice(b"NP");
        buffer.put_u32(u32::MAX);
        buffer.put_u8(LEAF_TAG);
        buffer.put_u32(1);
        buffer.put_slice(b"x");
        let bytes = buffer.to_vec();
        assert_eq!(
            Tree::from_binary(&bytes),
            Err(DecodeError::Truncated {
                context: "node tag"
            })
        );
    }
}
