//! Multi-level category headers.
//!
//! Hierarchical category axes are stored as a rectangular label block that
//! holds every level. Renderers only take a flat label list, so the decoder
//! keeps the innermost (leaf) level. The block orientation is inferred from
//! how many levels fit into the block:
//!
//! - levels == width: levels run across columns and the leaf label of
//!   category `i` is the last cell of row `i`
//! - levels == height: levels run down rows and the leaf labels form the
//!   last row
//!
//! A square block satisfies both readings and is rejected.

use crate::common::error::{Error, Result};
use crate::sheet::reference::CellCoordinate;

/// Offsets of the leaf labels within a flattened, row-major label block.
pub fn leaf_offsets(
    total: usize,
    leaf_count: usize,
    width: usize,
    height: usize,
) -> Result<Vec<usize>> {
    if total == 0 || leaf_count == 0 {
        return Ok(Vec::new());
    }

    let levels = total / leaf_count;
    let ambiguous = Error::AmbiguousHierarchy {
        levels,
        width,
        height,
    };

    let offsets: Vec<usize> = if width == height {
        return Err(ambiguous);
    } else if levels == width {
        (0..leaf_count).map(|i| (levels - 1) + i * levels).collect()
    } else if levels == height {
        (0..leaf_count).map(|i| total - width + i).collect()
    } else {
        return Err(ambiguous);
    };

    // A cached leaf count that disagrees with the block can point past its end.
    if offsets.last().is_some_and(|&last| last >= total) {
        return Err(ambiguous);
    }
    Ok(offsets)
}

/// Select the leaf-level coordinates of a multi-level label block.
///
/// `coords` is the block flattened row-major; its bounding rectangle is
/// taken from the first and last coordinate.
pub fn decode_leaves(coords: &[CellCoordinate], leaf_count: usize) -> Result<Vec<CellCoordinate>> {
    let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
        return Ok(Vec::new());
    };
    let width = last.col.abs_diff(first.col) as usize + 1;
    let height = last.row.abs_diff(first.row) as usize + 1;

    let offsets = leaf_offsets(coords.len(), leaf_count, width, height)?;
    Ok(offsets.into_iter().map(|i| coords[i].clone()).collect())
}
