use std::ops::{Index, IndexMut};

use thiserror::Error;

/// Row-major dense matrix. Rows are samples, columns are features.
///
/// Every row has the same length by construction, which is why ragged
/// input is rejected in [`Array2::from_rows`] rather than at fit time.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError::BufferLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from nested rows, rejecting rows whose length differs
    /// from the first one.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[T]>,
        T: Clone,
    {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ShapeError::RaggedRow {
                    row: idx,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Single-column matrix, one row per value.
    pub fn from_column(values: Vec<T>) -> Self {
        let rows = values.len();
        Self {
            data: values,
            rows,
            cols: 1,
        }
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row_slice(r))
    }

    /// Copy of one column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        self.rows().map(|row| row[col].clone()).collect()
    }

    /// Overwrite one column with `values`.
    pub fn set_column(&mut self, col: usize, values: &[T]) -> Result<(), ShapeError>
    where
        T: Clone,
    {
        if col >= self.cols || values.len() != self.rows {
            return Err(ShapeError::ColumnLength {
                col,
                rows: self.rows,
                len: values.len(),
            });
        }
        for (row, value) in values.iter().enumerate() {
            self[(row, col)] = value.clone();
        }
        Ok(())
    }

    pub fn select_rows(&self, indices: &[usize]) -> Array2<T>
    where
        T: Clone,
    {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &row in indices {
            data.extend_from_slice(self.row_slice(row));
        }
        Array2 {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("invalid shape ({rows}, {cols}) for buffer of length {len}")]
    BufferLength { rows: usize, cols: usize, len: usize },

    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot write {len} values into column {col} of a matrix with {rows} rows")]
    ColumnLength { col: usize, rows: usize, len: usize },
}
