use crate::{Particle, Scalar, Vec3};
use itertools::iproduct;
use na::Vector3;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Represents a single grid cell. A grid cell contains a list of the particles within it.
///
/// A `SmallVec` is used to prevent unnecessary allocation.
type GridCell = SmallVec<[usize; 4]>;

/// A 3d Coordinate composed of 3 signed integers.
pub type Coord = Vector3<isize>;

/// Answers "which particles are near this point?". Results are indices into the particle list
/// the query was built from, in no particular order. Every particle within `h` of `position`
/// must be included; extra particles farther away are allowed.
pub trait NeighborQuery {
    /// Re-indexes `particles` at their current positions. Called once per derivative
    /// evaluation, before any query.
    fn rebuild(&mut self, particles: &[Particle]);

    fn query(&self, position: Vec3) -> Vec<usize>;
}

/// The uniform Grid used to speed up SPH neighbor finding. Cells are `h` wide and only the
/// occupied ones are stored, so the domain doesn't need to be bounded.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: HashMap<Coord, GridCell>,
    h: Scalar,
}

impl Grid {
    pub fn new(h: Scalar) -> Self {
        assert!(h > 0., "Grid cell size must be positive, got {}", h);
        Grid {
            cells: HashMap::new(),
            h,
        }
    }

    pub fn cell_size(&self) -> Scalar {
        self.h
    }

    pub fn position_to_coord(&self, pos: Vec3) -> Coord {
        pos.map(|i| (i / self.h).floor() as isize)
    }

    pub fn add_particle(&mut self, coord: Coord, index: usize) {
        self.cells.entry(coord).or_default().push(index);
    }

    /// Clears the grid and re-inserts every particle at its current position.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.cells.clear();
        for (index, p) in particles.iter().enumerate() {
            self.add_particle(self.position_to_coord(p.position), index);
        }
    }

    /// Every particle in the 3x3x3 block of cells around `coord`. Coordinates saturate at the
    /// edges of `isize`, far away positions land in the outermost cells.
    pub fn get_neighbors(&self, coord: Coord) -> impl Iterator<Item = usize> + Clone + '_ {
        iproduct!(
            coord.x.saturating_sub(1)..=coord.x.saturating_add(1),
            coord.y.saturating_sub(1)..=coord.y.saturating_add(1),
            coord.z.saturating_sub(1)..=coord.z.saturating_add(1)
        )
        .filter_map(move |(x, y, z)| self.cells.get(&Vector3::new(x, y, z)))
        .flat_map(|cell| cell.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(|cell| cell.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|cell| cell.is_empty())
    }
}

impl NeighborQuery for Grid {
    fn rebuild(&mut self, particles: &[Particle]) {
        Grid::rebuild(self, particles)
    }

    fn query(&self, position: Vec3) -> Vec<usize> {
        self.get_neighbors(self.position_to_coord(position)).collect()
    }
}
