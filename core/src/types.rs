use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major offsets of the 8-neighborhood.
const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds cells of the 8-neighborhood of `center` on a
/// `bounds.0 × bounds.1` grid. Edge and corner cells simply yield fewer
/// items; the center itself is never yielded.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    let (rows, cols) = bounds;
    OFFSETS.into_iter().filter_map(move |(dr, dc)| {
        let row = center.0.checked_add_signed(dr)?;
        let col = center.1.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some((row, col))
    })
}

/// Dimensions of an `Array2` narrowed back to board coordinates.
pub(crate) fn dim_to_coords<T>(grid: &Array2<T>) -> Coord2 {
    let dim = grid.dim();
    (
        dim.0.try_into().expect("board axis exceeds coordinate range"),
        dim.1.try_into().expect("board axis exceeds coordinate range"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collected(center: Coord2, bounds: Coord2) -> Vec<Coord2> {
        neighbors(center, bounds).collect()
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let all = collected((1, 1), (3, 3));
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&(1, 1)));
    }

    #[test]
    fn corner_cell_has_three_neighbors() {
        assert_eq!(collected((0, 0), (3, 3)), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(collected((2, 2), (3, 3)).len(), 3);
    }

    #[test]
    fn edge_cell_has_five_neighbors() {
        assert_eq!(collected((0, 1), (3, 3)).len(), 5);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert!(collected((0, 0), (1, 1)).is_empty());
    }

    #[test]
    fn neighbors_stay_in_bounds() {
        for (row, col) in collected((4, 0), (5, 5)) {
            assert!(row < 5 && col < 5);
        }
    }
}
