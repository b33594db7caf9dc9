//! Bounded 2D grid of organism slots.

use predprey_core::{Error, Location, Result};

/// Index of an organism in the population's organism list
pub type Slot = usize;

/// A rectangular, non-wrapping grid. Each cell holds at most one organism, stored as
/// its slot in the population rather than the organism itself.
#[derive(Debug, Clone)]
pub struct Grid {
    pub depth: i32,
    pub width: i32,
    cells: Vec<Option<Slot>>,
}

impl Grid {
    pub fn new(depth: i32, width: i32) -> Self {
        let size = (depth.max(0) * width.max(0)) as usize;
        Self {
            depth,
            width,
            cells: vec![None; size],
        }
    }

    pub fn contains(&self, location: Location) -> bool {
        location.row >= 0 && location.row < self.depth && location.col >= 0 && location.col < self.width
    }

    fn index(&self, location: Location) -> Result<usize> {
        if !self.contains(location) {
            return Err(Error::OutOfBounds {
                row: location.row,
                col: location.col,
                depth: self.depth,
                width: self.width,
            });
        }
        Ok((location.row * self.width + location.col) as usize)
    }

    /// Claim `location` for `slot`, first releasing `previous` if it still points at
    /// `slot`. Any other occupant of `location` is evicted.
    pub fn place(&mut self, slot: Slot, previous: Option<Location>, location: Location) -> Result<()> {
        let target = self.index(location)?;
        if let Some(prev) = previous {
            if let Ok(index) = self.index(prev) {
                if self.cells[index] == Some(slot) {
                    self.cells[index] = None;
                }
            }
        }
        self.cells[target] = Some(slot);
        Ok(())
    }

    /// Mark a cell empty. Locations outside the grid are ignored.
    pub fn clear(&mut self, location: Location) {
        if let Ok(index) = self.index(location) {
            self.cells[index] = None;
        }
    }

    pub fn clear_all(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    pub fn occupant_at(&self, location: Location) -> Option<Slot> {
        self.index(location).ok().and_then(|index| self.cells[index])
    }

    pub fn is_free(&self, location: Location) -> bool {
        self.contains(location) && self.occupant_at(location).is_none()
    }

    /// In-bounds locations within `radius` of `location`, excluding the centre, in
    /// row-major order. Callers rely on this order for tie-breaking.
    fn adjacent(&self, location: Location, radius: i32) -> impl Iterator<Item = Location> + '_ {
        (-radius..=radius)
            .flat_map(move |d_row| (-radius..=radius).map(move |d_col| (d_row, d_col)))
            .filter(|&(d_row, d_col)| d_row != 0 || d_col != 0)
            .map(move |(d_row, d_col)| location.offset(d_row, d_col))
            .filter(move |loc| self.contains(*loc))
    }

    pub fn adjacent_locations(&self, location: Location, radius: i32) -> Vec<Location> {
        self.adjacent(location, radius).collect()
    }

    pub fn free_adjacent_locations(&self, location: Location, radius: i32) -> Vec<Location> {
        self.adjacent(location, radius)
            .filter(|loc| self.is_free(*loc))
            .collect()
    }

    pub fn first_free_adjacent_location(&self, location: Location, radius: i32) -> Option<Location> {
        self.adjacent(location, radius)
            .find(|loc| self.is_free(*loc))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Rebuild every cell from `(slot, location)` pairs, e.g. after the population
    /// compacted its organism list.
    pub fn reindex(&mut self, occupants: impl IntoIterator<Item = (Slot, Location)>) -> Result<()> {
        self.clear_all();
        for (slot, location) in occupants {
            let index = self.index(location)?;
            self.cells[index] = Some(slot);
        }
        Ok(())
    }

    pub fn index_to_location(&self, index: usize) -> Location {
        let row = (index as i32) / self.width;
        let col = (index as i32) % self.width;
        Location::new(row, col)
    }

    /// Iterator over all cells with their locations, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Location, Option<Slot>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_location(i), *cell))
    }
}
