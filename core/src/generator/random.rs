use super::*;
use ndarray::Array2;

/// Uniform mine placement without replacement: every possible set of
/// `mines` distinct cells is equally likely. Each draw picks a rank among
/// the still-free cells and claims the matching slot, so no draw is ever
/// rejected or repeated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineLayoutGenerator {
    seed: u64,
}

impl RandomMineLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineLayoutGenerator for RandomMineLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let size = (config.size, config.size);

        // validated configs never get here, but the trait takes any config
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "mine budget {} exceeds the {} available cells, generated a full board",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(size.to_nd_index(), true));
        }

        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());
        let mut free_cells = total_cells;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        {
            let cells = mines.as_slice_mut().expect("layout should be standard");
            for _ in 0..config.mines {
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    if *cell {
                        // skip over cells already holding a mine
                        place += 1;
                    }
                    if i as CellCount == place {
                        *cell = true;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        MineLayout::from_mine_mask(mines)
    }
}
