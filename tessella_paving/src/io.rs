// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! File persistence for pavings.
//!
//! The format is the bare pre-order dump of the tree: `0x01` for a branch
//! (followed by the left, then the right subtree), `0x00` for a leaf
//! followed by one state byte. No header, no length prefix, no versioning;
//! the importer assumes a well-formed stream.

use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::node::BinaryTreeNode;
use crate::set::GridTreeSet;

/// Failures while persisting or restoring a paving.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The underlying file operation failed.
    #[error("i/o error")]
    Io(#[from] io::Error),
    /// The stream ended inside a node.
    #[error("unexpected end of tree stream")]
    TruncatedStream,
}

impl GridTreeSet {
    /// Write the tree to `path`, draining it node by node: after a
    /// successful export the paving is empty (its grid and root height are
    /// kept). On an I/O error the paving is left unspecified.
    pub fn export_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        let root = core::mem::replace(self.binary_tree_mut(), BinaryTreeNode::Leaf(false));
        write_node(root, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Replace the tree with the one stored at `path`; the file is deleted
    /// after a successful import.
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let mut reader = BufReader::new(file);
        *self.binary_tree_mut() = read_node(&mut reader)?;
        drop(reader);
        fs::remove_file(path)?;
        Ok(())
    }
}

fn write_node<W: Write>(node: BinaryTreeNode, writer: &mut W) -> io::Result<()> {
    match node {
        BinaryTreeNode::Leaf(state) => writer.write_all(&[0x00, u8::from(state)]),
        BinaryTreeNode::Branch { left, right } => {
            writer.write_all(&[0x01])?;
            write_node(*left, writer)?;
            write_node(*right, writer)
        }
    }
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8, PersistError> {
    let mut byte = [0u8; 1];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(byte[0]),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            Err(PersistError::TruncatedStream)
        }
        Err(err) => Err(err.into()),
    }
}

fn read_node<R: Read>(reader: &mut R) -> Result<BinaryTreeNode, PersistError> {
    if read_byte(reader)? != 0 {
        let left = read_node(reader)?;
        let right = read_node(reader)?;
        Ok(BinaryTreeNode::branch(left, right))
    } else {
        let state = read_byte(reader)?;
        Ok(BinaryTreeNode::Leaf(state != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_grid::{BinaryWord, Grid};

    use crate::cell::GridCell;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tessella_paving_{}_{}", std::process::id(), name));
        path
    }

    #[test]
    fn export_import_round_trip() {
        let grid = Grid::unit(2);
        let mut set = GridTreeSet::new(grid.clone());
        for bits in [
            &[false][..],
            &[true, false, true][..],
            &[true, true][..],
        ] {
            set.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from(bits)));
        }
        let words_before = set.to_binary_words();

        let path = scratch_path("round_trip");
        set.export_to_file(&path).unwrap();
        assert!(set.is_empty(), "export drains the paving");

        set.import_from_file(&path).unwrap();
        assert_eq!(set.to_binary_words(), words_before);
        assert!(!path.exists(), "a successful import deletes the file");
    }

    #[test]
    fn truncated_stream_is_reported() {
        let path = scratch_path("truncated");
        std::fs::write(&path, [0x01, 0x00, 0x01]).unwrap();
        let mut set = GridTreeSet::unit(2);
        match set.import_from_file(&path) {
            Err(PersistError::TruncatedStream) => {}
            other => panic!("expected a truncated stream error, got {other:?}"),
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_propagates_io_error() {
        let mut set = GridTreeSet::unit(2);
        let result = set.import_from_file(scratch_path("does_not_exist"));
        assert!(matches!(result, Err(PersistError::Io(_))));
    }
}
