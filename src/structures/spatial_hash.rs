//! Uniform grid for point lookups

use crate::error::{GraphError, Result};
use itertools::Either;
use std::collections::HashMap;

/// Grid cell coordinates
pub type Cell = (i64, i64);

/// Buckets items by the grid cell their position falls into
#[derive(Debug, Clone)]
pub struct SpatialHashTable<T> {
    cell_size: f64,
    table: HashMap<Cell, Vec<T>>,
}

impl<T> SpatialHashTable<T> {
    pub fn new(cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GraphError::InvalidArgument(format!(
                "cell size must be a positive number, got {}",
                cell_size
            )));
        }
        Ok(Self {
            cell_size,
            table: HashMap::new(),
        })
    }

    /// Cell containing the point `(x, y)`
    pub fn cell_of(&self, x: f64, y: f64) -> Cell {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, x: f64, y: f64, item: T) {
        let key = self.cell_of(x, y);
        self.table.entry(key).or_default().push(item);
    }

    /// Items stored in the same cell as `(x, y)`
    pub fn query(&self, x: f64, y: f64) -> &[T] {
        self.table
            .get(&self.cell_of(x, y))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Items in every cell that overlaps the square of half-width `radius`
    /// around `(x, y)`.
    ///
    /// When the square covers more cells than are occupied, the occupied
    /// cells are scanned instead, so the cost is bounded by the table size.
    pub fn query_radius(
        &self,
        x: f64,
        y: f64,
        radius: f64,
    ) -> Result<impl Iterator<Item = &T> + '_> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(GraphError::InvalidArgument(format!(
                "query point must be finite, got ({}, {})",
                x, y
            )));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(GraphError::InvalidArgument(format!(
                "radius must be a non-negative number, got {}",
                radius
            )));
        }

        let (min_x, min_y) = self.cell_of(x - radius, y - radius);
        let (max_x, max_y) = self.cell_of(x + radius, y + radius);

        let span = |lo: i64, hi: i64| (hi as i128 - lo as i128 + 1) as u128;
        let covered = span(min_x, max_x).checked_mul(span(min_y, max_y));
        let in_bounds = move |&(cx, cy): &Cell| {
            (min_x..=max_x).contains(&cx) && (min_y..=max_y).contains(&cy)
        };

        let items = match covered {
            Some(cells) if cells <= self.table.len() as u128 => Either::Left(
                (min_x..=max_x)
                    .flat_map(move |cx| (min_y..=max_y).map(move |cy| (cx, cy)))
                    .filter_map(|cell| self.table.get(&cell))
                    .flatten(),
            ),
            _ => Either::Right(
                self.table
                    .iter()
                    .filter(move |&(cell, _)| in_bounds(cell))
                    .flat_map(|(_, items)| items),
            ),
        };
        Ok(items)
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_returns_same_cell_only() {
        let mut grid = SpatialHashTable::new(1.0).unwrap();
        grid.insert(0.2, 0.3, "a");
        grid.insert(0.9, 0.1, "b");
        grid.insert(1.5, 0.5, "c");
        grid.insert(-0.5, 0.5, "d");

        assert_eq!(grid.query(0.5, 0.5), &["a", "b"]);
        assert_eq!(grid.query(1.0, 0.0), &["c"]);
        assert_eq!(grid.query(-0.1, 0.9), &["d"]);
        assert!(grid.query(10.0, 10.0).is_empty());
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn radius_query_spans_neighbouring_cells() {
        let mut grid = SpatialHashTable::new(1.0).unwrap();
        grid.insert(0.9, 0.9, 1);
        grid.insert(1.1, 1.1, 2);
        grid.insert(5.0, 5.0, 3);

        let mut near: Vec<i32> = grid.query_radius(1.0, 1.0, 0.2).unwrap().copied().collect();
        near.sort();
        assert_eq!(near, vec![1, 2]);
    }

    #[test]
    fn wide_radius_scans_occupied_cells_only() {
        let mut grid = SpatialHashTable::new(0.25).unwrap();
        grid.insert(0.1, 0.1, 1);
        grid.insert(150.0, -150.0, 2);
        grid.insert(1.0e12, 0.0, 3);

        let mut near: Vec<i32> = grid.query_radius(0.0, 0.0, 200.0).unwrap().copied().collect();
        near.sort();
        assert_eq!(near, vec![1, 2]);

        let mut all: Vec<i32> = grid.query_radius(0.0, 0.0, f64::MAX).unwrap().copied().collect();
        all.sort();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_bad_radius() {
        let grid = SpatialHashTable::<u32>::new(1.0).unwrap();
        assert!(grid.query_radius(0.0, 0.0, f64::INFINITY).is_err());
        assert!(grid.query_radius(0.0, 0.0, f64::NAN).is_err());
        assert!(grid.query_radius(0.0, 0.0, -1.0).is_err());
        assert!(grid.query_radius(f64::NAN, 0.0, 1.0).is_err());
        assert_eq!(grid.query_radius(0.0, 0.0, 0.0).unwrap().count(), 0);
    }

    #[test]
    fn rejects_bad_cell_size() {
        assert!(SpatialHashTable::<u32>::new(0.0).is_err());
        assert!(SpatialHashTable::<u32>::new(f64::NAN).is_err());
        assert!(SpatialHashTable::<u32>::new(-2.0).is_err());
    }
}
