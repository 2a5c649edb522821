use std::collections::BTreeSet;

use itertools::Itertools;
use minesweeper_kb::util::{play, Minefield, Outcome};
use minesweeper_kb::{Agent, Cell, GameConfig, Grid, KnowledgeBase, Move};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn cells(cells: &[Cell]) -> BTreeSet<Cell> {
    cells.iter().copied().collect()
}

/// Nothing the knowledge base believes may disagree with the real field
fn assert_sound(kb: &KnowledgeBase, field: &Minefield) {
    assert!(kb.mine_cells().is_disjoint(kb.known_safes()));
    assert!(kb.mine_cells().is_subset(field.mines()));
    assert!(kb.known_safes().is_disjoint(field.mines()));
    assert_eq!(
        kb.sentences().iter().unique().count(),
        kb.sentences().len()
    );
    for sentence in kb.sentences() {
        assert!(!sentence.is_empty());
        assert!(sentence.count() <= sentence.len());
        let actual = sentence
            .cells()
            .iter()
            .filter(|&&cell| field.is_mine(cell))
            .count();
        assert_eq!(actual, sentence.count(), "{sentence} disagrees with the field");
    }
}

#[test]
fn three_by_three_walkthrough() {
    let field = Minefield::new(
        "
        ...
        ...
        ..*
        ",
    )
    .unwrap();
    let mut kb = KnowledgeBase::with_grid(field.grid());

    kb.add_observation((0, 0), field.nearby_mines((0, 0))).unwrap();
    assert_eq!(kb.safe_moves(), cells(&[(0, 1), (1, 0), (1, 1)]));

    for cell in [(0, 1), (1, 0), (0, 2), (2, 0), (1, 2), (2, 1)] {
        kb.add_observation(cell, field.nearby_mines(cell)).unwrap();
        assert_sound(&kb, &field);
    }
    // Only (1,1) is left unprobed among the safe cells
    assert_eq!(kb.mine_cells(), &cells(&[(2, 2)]));
    assert_eq!(kb.safe_moves(), cells(&[(1, 1)]));
}

#[test]
fn counts_of_one_resolve_through_subsets() {
    // ...
    // .*.   (0,0) and (0,1) both see 1
    // ...
    let field = Minefield::new("...\n.*.\n...").unwrap();
    let mut kb = KnowledgeBase::with_grid(field.grid());
    kb.add_observation((0, 0), 1).unwrap();
    kb.add_observation((0, 1), 1).unwrap();
    assert_sound(&kb, &field);
    assert_eq!(kb.safe_moves(), cells(&[(0, 2), (1, 2)]));

    let remaining = field
        .grid()
        .cells()
        .filter(|&cell| !field.is_mine(cell) && !kb.moves_made().contains(&cell))
        .collect_vec();
    for cell in remaining {
        kb.add_observation(cell, field.nearby_mines(cell)).unwrap();
        assert_sound(&kb, &field);
    }
    assert_eq!(kb.mine_cells(), &cells(&[(1, 1)]));
}

#[test]
fn subsets_combine_with_later_observations() {
    let field = Minefield::new(
        "
        *..*.
        ..*.*
        .....
        .*...
        *....
        ",
    )
    .unwrap();
    let mut kb = KnowledgeBase::with_grid(field.grid());
    for cell in [(2, 0), (1, 1), (1, 0), (2, 3), (0, 1)] {
        kb.add_observation(cell, field.nearby_mines(cell)).unwrap();
        assert_sound(&kb, &field);
    }
    assert_eq!(kb.mine_cells(), &cells(&[(0, 0)]));
    assert!(kb.safe_moves().is_superset(&cells(&[(2, 1), (2, 2)])));
}

#[test]
fn autoplay_beginner_boards() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut wins = 0;
    for seed in 0..20 {
        let field = Minefield::random(&config, &mut rng).unwrap();
        let mut agent = Agent::seeded(field.grid(), seed);
        match play(&field, &mut agent).unwrap() {
            Outcome::Won { .. } => {
                wins += 1;
                assert_eq!(
                    agent.knowledge().moves_made().len(),
                    field.grid().len() - field.mines().len()
                );
            },
            Outcome::Lost { cell, .. } => assert!(field.is_mine(cell)),
        }
        assert_sound(agent.knowledge(), &field);
    }
    // 8 mines on 8x8 is easy enough that most games should go through
    assert!(wins > 0);
}

fn arb_field() -> impl Strategy<Value = (Minefield, u64)> {
    (2usize..6, 2usize..6, any::<u64>()).prop_flat_map(|(height, width, seed)| {
        (0..height * width).prop_map(move |mines| {
            let config = GameConfig {
                height,
                width,
                mines,
            };
            let field = Minefield::random(&config, &mut StdRng::seed_from_u64(seed))
                .expect("mines < height * width");
            (field, seed)
        })
    })
}

proptest! {
    #[test]
    fn observations_in_any_order_stay_sound((field, seed) in arb_field()) {
        let mut safe = field
            .grid()
            .cells()
            .filter(|&cell| !field.is_mine(cell))
            .collect_vec();
        safe.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut kb = KnowledgeBase::with_grid(field.grid());
        for cell in safe {
            kb.add_observation(cell, field.nearby_mines(cell)).unwrap();
            assert_sound(&kb, &field);
        }
        // Every safe cell has been probed, so every mine is pinned down
        // unless it's walled in by other mines
        prop_assert!(kb.safe_moves().is_empty());
        for &mine in field.mines() {
            let touches_safe = field
                .grid()
                .neighbours(mine)
                .any(|cell| !field.is_mine(cell));
            if touches_safe {
                prop_assert!(kb.mine_cells().contains(&mine));
            }
        }
    }

    #[test]
    fn deduced_moves_are_never_mines((field, seed) in arb_field()) {
        let mut agent = Agent::seeded(field.grid(), seed);
        loop {
            let flags = agent.knowledge().mine_cells().clone();
            let Some(next) = agent.next_move(&flags) else { break };
            let cell = next.cell();
            if field.is_mine(cell) {
                prop_assert!(matches!(next, Move::Guess(_)), "deduced {:?} is a mine", cell);
                break;
            }
            agent.add_observation(cell, field.nearby_mines(cell)).unwrap();
        }
        assert_sound(agent.knowledge(), &field);
    }

    #[test]
    fn random_moves_cover_the_grid(height in 1usize..5, width in 1usize..5, seed in any::<u64>()) {
        let grid = Grid::new(height, width);
        let mut agent = Agent::seeded(grid, seed);
        let mut flags = BTreeSet::new();
        let mut seen = BTreeSet::new();
        // Alternate between flagging and probing so both sets grow. A count
        // of 0 can't contradict anything while no mine is known.
        while let Some(cell) = agent.choose_random_move(&flags) {
            prop_assert!(seen.insert(cell));
            if seen.len() % 2 == 0 {
                flags.insert(cell);
            } else {
                agent.add_observation(cell, 0).unwrap();
            }
        }
        prop_assert_eq!(seen.len(), grid.len());
    }
}
