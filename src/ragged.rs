//! Ragged arrays: flattened data plus per-row lengths.
//!
//! Downstream numeric code consumes these structures by cumulative offsets
//! into the flat data array, so the data/lengths pairing is part of the
//! contract and is preserved exactly rather than hidden behind a nested
//! `Vec<Vec<T>>`.

use serde::{Deserialize, Serialize};

/// A ragged two-dimensional container stored as flat data + row lengths.
///
/// # Example
///
/// ```rust
/// use anaphora::Ragged;
///
/// let mut ragged = Ragged::new();
/// ragged.push_row([0usize, 2]);
/// ragged.push_row([6]);
///
/// assert_eq!(ragged.num_rows(), 2);
/// assert_eq!(ragged.data(), &[0, 2, 6]);
/// assert_eq!(ragged.lengths(), &[2, 1]);
/// assert_eq!(ragged.row(1), &[6]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ragged<T> {
    data: Vec<T>,
    lengths: Vec<usize>,
}

impl<T> Ragged<T> {
    /// Create an empty ragged container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            lengths: Vec::new(),
        }
    }

    /// Append one row.
    pub fn push_row(&mut self, row: impl IntoIterator<Item = T>) {
        let before = self.data.len();
        self.data.extend(row);
        self.lengths.push(self.data.len() - before);
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.lengths.len()
    }

    /// Check whether the container has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Total number of flattened elements.
    #[must_use]
    pub fn flat_len(&self) -> usize {
        self.data.len()
    }

    /// The flattened data array, row-major.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The per-row lengths.
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// The row at `index`, located by cumulative offset.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_rows()`.
    #[must_use]
    pub fn row(&self, index: usize) -> &[T] {
        let start: usize = self.lengths[..index].iter().sum();
        &self.data[start..start + self.lengths[index]]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        let mut offset = 0;
        self.lengths.iter().map(move |&len| {
            let row = &self.data[offset..offset + len];
            offset += len;
            row
        })
    }
}

impl<T> FromIterator<Vec<T>> for Ragged<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(iter: I) -> Self {
        let mut ragged = Ragged::new();
        for row in iter {
            ragged.push_row(row);
        }
        ragged
    }
}
