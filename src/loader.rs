//! Sequence database file loader
//!
//! Reads the standard sequence format: one sequence per line, tokens are
//! whitespace-separated integers, `-1` terminates an itemset and `-2`
//! terminates the sequence. Lines starting with `#`, `%` or `@` and blank
//! lines are skipped. Sequence IDs are assigned from the 0-based position
//! among the loaded sequences.

use crate::database::{Item, Itemset, Sequence, SequenceDatabase};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read sequence file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unrecognized token {token:?}")]
    BadToken { line: usize, token: String },

    #[error("line {line}: empty itemset")]
    EmptyItemset { line: usize },

    #[error("line {line}: items must be strictly ascending within an itemset (found {found} after {previous})")]
    NotAscending {
        line: usize,
        previous: Item,
        found: Item,
    },
}

/// Load a sequence database from a file path
pub fn load_file(path: &Path) -> Result<SequenceDatabase, LoadError> {
    load_reader(BufReader::new(File::open(path)?))
}

/// Load a sequence database from any buffered reader
pub fn load_reader<R: BufRead>(reader: R) -> Result<SequenceDatabase, LoadError> {
    let mut sequences = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(['#', '%', '@']) {
            continue;
        }
        sequences.push(parse_sequence(sequences.len(), trimmed, line_number)?);
    }
    Ok(SequenceDatabase::from_sequences(sequences))
}

fn parse_sequence(id: usize, line: &str, line_number: usize) -> Result<Sequence, LoadError> {
    let mut itemsets = Vec::new();
    let mut current: Vec<Item> = Vec::new();
    for token in line.split_whitespace() {
        let value: i64 = token.parse().map_err(|_| LoadError::BadToken {
            line: line_number,
            token: token.to_string(),
        })?;
        match value {
            -2 => break,
            -1 => {
                if current.is_empty() {
                    return Err(LoadError::EmptyItemset { line: line_number });
                }
                itemsets.push(Itemset::new(std::mem::take(&mut current)));
            }
            v if v >= 1 && v <= i64::from(u32::MAX) => {
                let item = v as Item;
                if let Some(&previous) = current.last() {
                    if item <= previous {
                        return Err(LoadError::NotAscending {
                            line: line_number,
                            previous,
                            found: item,
                        });
                    }
                }
                current.push(item);
            }
            _ => {
                return Err(LoadError::BadToken {
                    line: line_number,
                    token: token.to_string(),
                })
            }
        }
    }
    // a trailing itemset without its -1 terminator is accepted
    if !current.is_empty() {
        itemsets.push(Itemset::new(current));
    }
    Ok(Sequence::new(id, itemsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(text: &str) -> Result<SequenceDatabase, LoadError> {
        load_reader(Cursor::new(text.as_bytes()))
    }

    #[test]
    fn test_loads_sequences_with_dense_ids() {
        let database = load("1 2 -1 3 -1 -2\n2 -1 -2\n").unwrap();
        assert_eq!(database.len(), 2);
        assert_eq!(database.sequences()[0].id(), 0);
        assert_eq!(database.sequences()[0].len(), 2);
        assert_eq!(database.sequences()[0].itemset(0).items(), &[1, 2]);
        assert_eq!(database.sequences()[1].id(), 1);
        assert_eq!(database.sequences()[1].itemset(0).items(), &[2]);
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let database = load("# header\n% meta\n@CONVERTED\n\n1 -1 -2\n").unwrap();
        assert_eq!(database.len(), 1);
    }

    #[test]
    fn test_rejects_garbage_token() {
        let err = load("1 x -1 -2\n").unwrap_err();
        assert!(matches!(err, LoadError::BadToken { line: 1, .. }));
    }

    #[test]
    fn test_rejects_non_positive_item() {
        let err = load("1 -1 0 -1 -2\n").unwrap_err();
        assert!(matches!(err, LoadError::BadToken { line: 1, .. }));
    }

    #[test]
    fn test_rejects_descending_itemset() {
        let err = load("3 2 -1 -2\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotAscending {
                line: 1,
                previous: 3,
                found: 2,
            }
        ));
    }

    #[test]
    fn test_rejects_empty_itemset() {
        let err = load("1 -1 -1 -2\n").unwrap_err();
        assert!(matches!(err, LoadError::EmptyItemset { line: 1 }));
    }

    #[test]
    fn test_validates_after_load() {
        let database = load("1 2 -1 3 -1 -2\n").unwrap();
        assert!(database.validate().is_ok());
    }
}
