use rand::Rng;
use tracing::debug;
use tracing::warn;

use crate::grid::Grid;
use crate::grid::GridError;
use crate::rules;
use crate::rules::Aging;

/// A running game of Life. Owns the current generation and nothing else of its past.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    aging: Aging,
    generation: u64,
}

impl Simulation {
    /// Seed a `width` by `height` board where every cell is independently alive with probability
    /// `alive_fraction`.
    ///
    /// The fraction is clamped to `[0, 1]`, and `NaN` seeds nothing.
    pub fn new<R>(
        width: usize,
        height: usize,
        alive_fraction: f64,
        rng: &mut R,
    ) -> Result<Self, GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Grid::new(width, height)?;

        let p = clamp_fraction(alive_fraction);
        for cell in grid.cells_mut() {
            *cell = if rng.gen_bool(p) { 1 } else { 0 };
        }

        debug!(
            width,
            height,
            alive_fraction = p,
            population = grid.population(),
            "seeded simulation"
        );

        Ok(Self::from_grid(grid))
    }

    /// Start from a known board
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            aging: Aging::default(),
            generation: 0,
        }
    }

    pub fn with_aging(mut self, aging: Aging) -> Self {
        self.aging = aging;

        if aging == Aging::Binary {
            for cell in self.grid.cells_mut() {
                *cell = (*cell).min(1);
            }
        }

        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn aging(&self) -> Aging {
        self.aging
    }

    /// Number of steps taken since seeding
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Advance one generation.
    ///
    /// Every cell of the new board is computed from the previous board only, which is dropped
    /// afterwards.
    pub fn step(&mut self) -> &mut Self {
        let prev = &self.grid;

        let mut next = prev.clone();
        let width = prev.width();

        for (n, cell) in next.cells_mut().iter_mut().enumerate() {
            let (x, y) = (n % width, n / width);
            let alive_for = prev.get(x, y);
            let neighbors = prev.neighbor_count(x, y);

            *cell = rules::next_state_with(self.aging, alive_for, neighbors);
        }

        self.grid = next;
        self.generation += 1;

        self
    }

    /// Advance `n` generations
    pub fn steps(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.step();
        }

        self
    }
}

fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        warn!("alive fraction is NaN, seeding an empty board");
        return 0.0;
    }

    if !(0.0..=1.0).contains(&fraction) {
        warn!(fraction, "alive fraction out of range, clamping to [0, 1]");
    }

    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Simulation;
    use crate::grid::Grid;
    use crate::rules;
    use crate::rules::Aging;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xB3_523)
    }

    #[test]
    fn seeding_extremes() {
        let sim = Simulation::new(8, 6, 0.0, &mut rng()).unwrap();
        assert!(sim.grid().is_dead());

        let sim = Simulation::new(8, 6, 1.0, &mut rng()).unwrap();
        assert_eq!(sim.population(), 48);
        assert!(sim.grid().iter().all(|(_, _, age)| age == 1));
    }

    #[test]
    fn seeding_clamps_fraction() {
        let sim = Simulation::new(5, 5, 3.5, &mut rng()).unwrap();
        assert_eq!(sim.population(), 25);

        let sim = Simulation::new(5, 5, -1.0, &mut rng()).unwrap();
        assert_eq!(sim.population(), 0);

        let sim = Simulation::new(5, 5, f64::NAN, &mut rng()).unwrap();
        assert_eq!(sim.population(), 0);
    }

    #[test]
    fn seeding_rejects_empty_board() {
        assert!(Simulation::new(0, 5, 0.5, &mut rng()).is_err());
        assert!(Simulation::new(5, 0, 0.5, &mut rng()).is_err());
    }

    #[test]
    fn single_cell_dies() {
        let mut sim = Simulation::from_grid(Grid::from_rows(&[[1u32]]).unwrap());
        sim.step();

        assert!(sim.grid().is_dead());
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn blinker_has_period_two() {
        let grid = Grid::from_rows(&[[0u32, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap();
        let mut sim = Simulation::from_grid(grid);

        sim.step();
        let want = Grid::from_rows(&[[0u32, 0, 0], [1, 2, 1], [0, 0, 0]]).unwrap();
        assert_eq!(sim.grid(), &want);

        sim.step();
        let want = Grid::from_rows(&[[0u32, 1, 0], [0, 3, 0], [0, 1, 0]]).unwrap();
        assert_eq!(sim.grid(), &want);
    }

    #[test]
    fn block_keeps_aging() {
        let grid = Grid::from_rows(&[[0u32, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]]);
        let mut sim = Simulation::from_grid(grid.unwrap());

        sim.steps(4);

        insta::assert_snapshot!(sim.grid().to_string(), @r"
        ....
        .55.
        .55.
        ....
        ");
    }

    #[test]
    fn binary_aging() {
        let grid = Grid::from_rows(&[[0u32, 0, 0, 0], [0, 4, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]]);
        let mut sim = Simulation::from_grid(grid.unwrap()).with_aging(Aging::Binary);

        assert_eq!(sim.grid().get(1, 1), 1);

        sim.steps(3);
        assert!(sim.grid().iter().all(|(_, _, age)| age <= 1));
        assert_eq!(sim.population(), 4);
    }

    #[test]
    fn step_chains() {
        let mut sim = Simulation::new(6, 6, 0.5, &mut rng()).unwrap();

        let generation = sim.step().step().step().generation();
        assert_eq!(generation, 3);
    }

    /// Steps `grid` by visiting cells back to front, reading only from `grid`.
    fn reversed_step(grid: &Grid) -> Grid {
        let mut next = Grid::new(grid.width(), grid.height()).unwrap();

        for y in (0..grid.height()).rev() {
            for x in (0..grid.width()).rev() {
                let age = rules::next_state(grid.get(x, y), grid.neighbor_count(x, y));
                next.set(x, y, age);
            }
        }

        next
    }

    fn arb_board() -> impl Strategy<Value = Vec<Vec<u32>>> {
        (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
            proptest::collection::vec(proptest::collection::vec(0u32..3, w), h)
        })
    }

    proptest! {
        #[test]
        fn step_is_order_independent(rows in arb_board()) {
            let grid = Grid::from_rows(&rows).unwrap();
            let want = reversed_step(&reversed_step(&grid));

            let mut sim = Simulation::from_grid(grid);
            sim.step().step();

            prop_assert_eq!(sim.grid(), &want);
        }

        #[test]
        fn dead_board_stays_dead(w in 1usize..30, h in 1usize..30) {
            let mut sim = Simulation::from_grid(Grid::new(w, h).unwrap());
            sim.step();

            prop_assert!(sim.grid().is_dead());
            prop_assert_eq!(sim.grid().size(), (w, h));
        }

        #[test]
        fn seeding_matches_size(w in 1usize..20, h in 1usize..20, p in 0.0f64..=1.0, seed in any::<u64>()) {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let sim = Simulation::new(w, h, p, &mut rng).unwrap();

            prop_assert_eq!(sim.grid().size(), (w, h));
            prop_assert!(sim.grid().iter().all(|(_, _, age)| age <= 1));
        }
    }
}
