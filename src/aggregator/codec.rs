//! Run-length raw stack corpus codec.
//!
//! Layout: `[len, frame_id_0 .. frame_id_{len-1}, count]` repeated until the
//! sequence is exhausted. Index 0 of each stack is the outermost frame.
//!
//! Example: `[2, 1, 2, 5, 1, 3, 1]` is stack `[1, 2]` seen 5 times followed by
//! stack `[3]` seen once.

use crate::parser::schema::RawStack;
use crate::utils::error::CodecError;

/// Cursor over a flat corpus yielding one `RawStack` per record.
///
/// Reads from a borrowed slice, so the input stays untouched and can be
/// decoded again or shared between threads.
#[derive(Debug, Clone)]
pub struct RawStackReader<'a> {
    data: &'a [u64],
    cursor: usize,
    failed: bool,
}

impl<'a> RawStackReader<'a> {
    pub fn new(data: &'a [u64]) -> Self {
        Self {
            data,
            cursor: 0,
            failed: false,
        }
    }

    fn read_record(&mut self) -> Result<RawStack, CodecError> {
        let offset = self.cursor;
        let len = self.data[offset];
        let remaining = self.data.len() - offset - 1;

        let len = usize::try_from(len)
            .ok()
            .filter(|&len| len < remaining)
            .ok_or_else(|| CodecError::MalformedCorpus {
                offset,
                reason: format!(
                    "stack of length {} needs {} more values but only {} remain",
                    len,
                    len.saturating_add(1),
                    remaining
                ),
            })?;

        let start = offset + 1;
        let frames = self.data[start..start + len].to_vec();
        let count = self.data[start + len];
        self.cursor = start + len + 1;

        Ok(RawStack::new(frames, count))
    }
}

impl Iterator for RawStackReader<'_> {
    type Item = Result<RawStack, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.data.len() {
            return None;
        }

        let record = self.read_record();
        self.failed = record.is_err();
        Some(record)
    }
}

/// Decode a flat corpus into stacks, in record order
pub fn decode(data: &[u64]) -> Result<Vec<RawStack>, CodecError> {
    RawStackReader::new(data).collect()
}

/// Encode stacks into the flat corpus layout
pub fn encode(stacks: &[RawStack]) -> Vec<u64> {
    let capacity = stacks.iter().map(|s| s.frames.len() + 2).sum();
    let mut data = Vec::with_capacity(capacity);

    for stack in stacks {
        data.push(stack.frames.len() as u64);
        data.extend_from_slice(&stack.frames);
        data.push(stack.count);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_two_records() {
        let stacks = decode(&[2, 1, 2, 5, 1, 3, 1]).unwrap();
        assert_eq!(
            stacks,
            vec![RawStack::new(vec![1, 2], 5), RawStack::new(vec![3], 1)]
        );
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_empty_stack_record() {
        let stacks = decode(&[0, 4]).unwrap();
        assert_eq!(stacks, vec![RawStack::new(vec![], 4)]);
    }

    #[test]
    fn test_encode_decode_preserves_order() {
        let stacks = vec![
            RawStack::new(vec![9, 8, 7], 2),
            RawStack::new(vec![1], 10),
            RawStack::new(vec![9, 8], 1),
        ];
        assert_eq!(decode(&encode(&stacks)).unwrap(), stacks);
    }

    #[test]
    fn test_encode_is_inverse_of_decode() {
        let flat = vec![2, 1, 2, 5, 3, 4, 5, 6, 1];
        assert_eq!(encode(&decode(&flat).unwrap()), flat);
    }

    #[test]
    fn test_length_past_end_is_malformed() {
        let err = decode(&[2, 1, 2, 5, 4, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            CodecError::MalformedCorpus {
                offset: 4,
                reason: "stack of length 4 needs 5 more values but only 2 remain".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_count_is_malformed() {
        assert!(decode(&[2, 1, 2]).is_err());
    }

    #[test]
    fn test_trailing_value_is_malformed() {
        assert!(decode(&[1, 7, 3, 9]).is_err());
    }

    #[test]
    fn test_huge_length_is_malformed() {
        assert!(decode(&[u64::MAX, 1, 2]).is_err());
    }

    #[test]
    fn test_reader_does_not_consume_input() {
        let flat = vec![1, 4, 2];
        let first: Vec<_> = RawStackReader::new(&flat).collect();
        let second: Vec<_> = RawStackReader::new(&flat).collect();
        assert_eq!(first, second);
        assert_eq!(flat, vec![1, 4, 2]);
    }

    #[test]
    fn test_reader_stops_after_error() {
        let mut reader = RawStackReader::new(&[5, 1]);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
