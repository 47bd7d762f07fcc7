//! Rectangular occupancy masks used for bulk level construction
//!
//! A mask is indexed `[x, y]` and maps one-to-one onto tile coordinates,
//! so cell `(x, y)` becomes tile `(x, y)` when a grid is built from it.

use ndarray::Array2;

use crate::io::configuration::MAX_MASK_DIMENSION;
use crate::io::error::{Result, invalid_parameter, invalid_source};
use crate::spatial::coord::TileCoord;

/// Rectangular boolean grid marking occupied cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMask {
    cells: Array2<bool>,
}

impl TileMask {
    /// Create an empty mask of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension exceeds `MAX_MASK_DIMENSION`
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::check_dimensions(width, height)?;
        Ok(Self {
            cells: Array2::from_elem((width, height), false),
        })
    }

    /// Create a mask by evaluating `occupied` for every cell
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension exceeds `MAX_MASK_DIMENSION`
    pub fn from_fn(
        width: usize,
        height: usize,
        mut occupied: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self> {
        Self::check_dimensions(width, height)?;
        Ok(Self {
            cells: Array2::from_shape_fn((width, height), |(x, y)| occupied(x, y)),
        })
    }

    /// Create a mask from columns, where `columns[x][y]` is cell `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns an error if the columns have differing lengths or the mask
    /// would exceed `MAX_MASK_DIMENSION`
    pub fn from_columns(columns: &[Vec<bool>]) -> Result<Self> {
        let height = columns.first().map_or(0, Vec::len);
        if let Some((x, column)) = columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != height)
        {
            return Err(invalid_source(&format!(
                "column {x} has {} cells, expected {height}",
                column.len()
            )));
        }

        Self::from_fn(columns.len(), height, |x, y| {
            columns
                .get(x)
                .and_then(|column| column.get(y))
                .copied()
                .unwrap_or(false)
        })
    }

    /// Smallest mask covering a set of coordinates
    ///
    /// Returns the mask together with the coordinate of its `(0, 0)` cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty or its extent exceeds
    /// `MAX_MASK_DIMENSION`
    pub fn from_coords<'a>(
        coords: impl IntoIterator<Item = &'a TileCoord> + Clone,
    ) -> Result<(Self, TileCoord)> {
        let mut min = [i32::MAX; 2];
        let mut max = [i32::MIN; 2];
        let mut found = false;

        for coord in coords.clone() {
            found = true;
            min = [min[0].min(coord.x), min[1].min(coord.y)];
            max = [max[0].max(coord.x), max[1].max(coord.y)];
        }

        if !found {
            return Err(invalid_source(&"no tiles to build a mask from"));
        }

        let width = (i64::from(max[0]) - i64::from(min[0]) + 1) as usize;
        let height = (i64::from(max[1]) - i64::from(min[1]) + 1) as usize;
        let mut mask = Self::new(width, height)?;
        let origin = TileCoord::new(min[0], min[1]);

        for coord in coords {
            let x = (i64::from(coord.x) - i64::from(origin.x)) as usize;
            let y = (i64::from(coord.y) - i64::from(origin.y)) as usize;
            mask.set(x, y, true);
        }

        Ok((mask, origin))
    }

    fn check_dimensions(width: usize, height: usize) -> Result<()> {
        if width > MAX_MASK_DIMENSION {
            return Err(invalid_parameter(
                "width",
                &width,
                &format!("must not exceed {MAX_MASK_DIMENSION}"),
            ));
        }
        if height > MAX_MASK_DIMENSION {
            return Err(invalid_parameter(
                "height",
                &height,
                &format!("must not exceed {MAX_MASK_DIMENSION}"),
            ));
        }
        Ok(())
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.dim().0
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.dim().1
    }

    /// Whether cell `(x, y)` is occupied; cells outside the mask are not
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells.get([x, y]).copied().unwrap_or(false)
    }

    /// Mark a cell; writes outside the mask are ignored
    pub fn set(&mut self, x: usize, y: usize, occupied: bool) {
        if let Some(cell) = self.cells.get_mut([x, y]) {
            *cell = occupied;
        }
    }

    /// Occupied cells as tile coordinates, every `y` of a column before the next `x`
    pub fn occupied(&self) -> impl Iterator<Item = TileCoord> + '_ {
        // Array2 is row-major over (x, y), so the natural walk is x-major.
        self.cells
            .indexed_iter()
            .filter(|&(_, &occupied)| occupied)
            .map(|((x, y), _)| TileCoord::new(x as i32, y as i32))
    }

    /// Number of occupied cells
    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }
}
