//! FILENAME: jsonstat/src/addressing.rs
//! Offset arithmetic and projections over the flat value array.
//!
//! Strides are row-major over the declared dimension order: the last
//! dimension is contiguous, `stride[i] = stride[i+1] * size[i+1]`. Every
//! accessor here validates its input and names the offending dimension;
//! nothing clamps.

use serde::Serialize;
use smallvec::SmallVec;

use crate::dataset::Dataset;
use crate::dimension::Dimension;
use crate::error::AddressError;

/// A tuple of per-dimension ordinals. Cubes in this dataset family stay
/// well under eight dimensions, so these never spill to the heap.
pub type IndexTuple = SmallVec<[usize; 8]>;

/// One coordinate of a cube address: either a raw ordinal or a category
/// code resolved through the dimension's index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionKey<'a> {
    Ordinal(usize),
    Code(&'a str),
}

/// One entry of a wildcard slice, resolved by the category of the free
/// dimension at that position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceEntry {
    pub code: String,
    pub label: String,
    pub value: Option<f64>,
    pub status: Option<String>,
}

/// Full-cube tabular projection for a caller-chosen dimension ordering.
#[derive(Debug, Clone, Serialize)]
pub struct TableProjection {
    /// Dimension labels in the projected order, then `"Value"`.
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub labels: Vec<String>,
    pub value: Option<f64>,
}

impl Dataset {
    /// Row-major stride of each dimension.
    pub fn strides(&self) -> IndexTuple {
        let sizes = self.sizes();
        let mut strides: IndexTuple = SmallVec::from_elem(1, sizes.len());
        for i in (0..sizes.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * sizes[i + 1];
        }
        strides
    }

    /// Flat offset of an ordinal tuple in declared dimension order.
    pub fn offset(&self, indices: &[usize]) -> Result<usize, AddressError> {
        let sizes = self.sizes();
        if indices.len() != sizes.len() {
            return Err(AddressError::ArityMismatch {
                expected: sizes.len(),
                got: indices.len(),
            });
        }
        let strides = self.strides();
        let mut offset = 0;
        for (i, (&index, &size)) in indices.iter().zip(sizes).enumerate() {
            if index >= size {
                return Err(AddressError::OrdinalOutOfRange {
                    dimension: self.ids()[i].clone(),
                    index,
                    size,
                });
            }
            offset += index * strides[i];
        }
        Ok(offset)
    }

    /// Inverse of `offset`: recovers the ordinal tuple for a flat offset.
    pub fn decompose(&self, offset: usize) -> Result<IndexTuple, AddressError> {
        if offset >= self.len() {
            return Err(AddressError::OffsetOutOfRange {
                offset,
                len: self.len(),
            });
        }
        let strides = self.strides();
        let mut indices: IndexTuple = SmallVec::with_capacity(strides.len());
        let mut rest = offset;
        for &stride in &strides {
            indices.push(rest / stride);
            rest %= stride;
        }
        Ok(indices)
    }

    /// Resolves a key tuple (codes and/or ordinals, declared order) to
    /// ordinals.
    pub fn resolve(&self, keys: &[DimensionKey]) -> Result<IndexTuple, AddressError> {
        if keys.len() != self.dimensions().len() {
            return Err(AddressError::ArityMismatch {
                expected: self.dimensions().len(),
                got: keys.len(),
            });
        }
        let mut indices: IndexTuple = SmallVec::with_capacity(keys.len());
        for (dim, key) in self.dimensions().iter().zip(keys) {
            indices.push(resolve_key(dim, *key)?);
        }
        Ok(indices)
    }

    /// Flat offset for a key tuple.
    pub fn offset_of(&self, keys: &[DimensionKey]) -> Result<usize, AddressError> {
        let indices = self.resolve(keys)?;
        self.offset(&indices)
    }

    /// Value at a key tuple.
    pub fn value_of(&self, keys: &[DimensionKey]) -> Result<Option<f64>, AddressError> {
        Ok(self.value_at(self.offset_of(keys)?))
    }

    /// Wildcard slice: every dimension fixed except `free`, whose full
    /// extent is returned in ordinal order. This is how the pivot engine
    /// pulls "all geos for this time/tax" without looping over offsets.
    pub fn slice(
        &self,
        fixed: &[(&str, DimensionKey)],
        free: &str,
    ) -> Result<Vec<SliceEntry>, AddressError> {
        let dims = self.dimensions();
        let mut ordinals: SmallVec<[Option<usize>; 8]> = SmallVec::from_elem(None, dims.len());

        for &(id, key) in fixed {
            let position = self
                .dim_position(id)
                .ok_or_else(|| AddressError::UnknownDimension(id.to_string()))?;
            ordinals[position] = Some(resolve_key(&dims[position], key)?);
        }

        let free_position = self
            .dim_position(free)
            .ok_or_else(|| AddressError::UnknownDimension(free.to_string()))?;

        let unspecified = ordinals.iter().filter(|o| o.is_none()).count();
        if unspecified != 1 || ordinals[free_position].is_some() {
            return Err(AddressError::FreeDimensions(unspecified));
        }

        let free_dim = &dims[free_position];
        let mut entries = Vec::with_capacity(free_dim.size());
        let mut indices: IndexTuple = ordinals.iter().map(|o| o.unwrap_or(0)).collect();
        for ordinal in 0..free_dim.size() {
            indices[free_position] = ordinal;
            let offset = self.offset(&indices)?;
            entries.push(SliceEntry {
                code: free_dim.code_at(ordinal).unwrap_or_default().to_string(),
                label: free_dim.label_at(ordinal).unwrap_or_default().to_string(),
                value: self.value_at(offset),
                status: self.status_at(offset).map(String::from),
            });
        }
        Ok(entries)
    }

    /// Projects the full cube into a 2-D table for the given dimension
    /// ordering, used for exhaustive exports (chart pivoting goes through
    /// `slice` instead).
    ///
    /// Label columns are produced by repeated-element expansion: in the
    /// projected order, dimension `j`'s labels repeat in runs of
    /// `total / (size[0] * … * size[j])` rows.
    pub fn project(&self, order: &[&str]) -> Result<TableProjection, AddressError> {
        let dims = self.dimensions();
        if order.len() != dims.len() {
            return Err(AddressError::ArityMismatch {
                expected: dims.len(),
                got: order.len(),
            });
        }

        let mut positions = Vec::with_capacity(order.len());
        for id in order {
            let position = self
                .dim_position(id)
                .ok_or_else(|| AddressError::UnknownDimension(id.to_string()))?;
            if positions.contains(&position) {
                return Err(AddressError::DuplicateDimension(id.to_string()));
            }
            positions.push(position);
        }

        let headers: Vec<String> = positions
            .iter()
            .map(|&p| dims[p].label.clone())
            .chain(std::iter::once("Value".to_string()))
            .collect();

        let total = self.len();
        if total == 0 {
            return Ok(TableProjection {
                headers,
                rows: Vec::new(),
            });
        }

        let mut run_lengths = Vec::with_capacity(positions.len());
        let mut covered = 1;
        for &position in &positions {
            covered *= self.sizes()[position];
            run_lengths.push(total / covered);
        }

        let mut rows = Vec::with_capacity(total);
        let mut indices: IndexTuple = SmallVec::from_elem(0, dims.len());
        for row in 0..total {
            let mut labels = Vec::with_capacity(positions.len());
            for (j, &position) in positions.iter().enumerate() {
                let dim = &dims[position];
                let ordinal = (row / run_lengths[j]) % dim.size();
                indices[position] = ordinal;
                labels.push(dim.label_at(ordinal).unwrap_or_default().to_string());
            }
            let offset = self.offset(&indices)?;
            rows.push(TableRow {
                labels,
                value: self.value_at(offset),
            });
        }

        Ok(TableProjection { headers, rows })
    }
}

fn resolve_key(dim: &Dimension, key: DimensionKey) -> Result<usize, AddressError> {
    match key {
        DimensionKey::Ordinal(index) => {
            if index >= dim.size() {
                return Err(AddressError::OrdinalOutOfRange {
                    dimension: dim.id.clone(),
                    index,
                    size: dim.size(),
                });
            }
            Ok(index)
        }
        DimensionKey::Code(code) => dim.ordinal_of(code).ok_or_else(|| AddressError::UnknownCode {
            dimension: dim.id.clone(),
            code: code.to_string(),
        }),
    }
}
