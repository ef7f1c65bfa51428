use flashpoint_core::{CellCoord, Command, Event, TileKind};
use flashpoint_system_hazard::{eligible_cells, Hazard};
use flashpoint_world::{self as world, query, TileGrid, World, DEFAULT_LAYOUT};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn default_world() -> World {
    let grid = TileGrid::parse(DEFAULT_LAYOUT).expect("default layout parses");
    World::new(grid, Vec::new())
}

#[test]
fn targets_only_victim_free_floor() {
    let mut world = default_world();
    let mut events = Vec::new();
    let victim = CellCoord::new(2, 2);
    world::apply(&mut world, Command::PlaceVictim { cell: victim }, &mut events);

    let eligible = eligible_cells(&world);
    assert!(!eligible.contains(&victim));

    let mut hazard = Hazard::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let mut commands = Vec::new();
        hazard.handle(&world, &mut rng, &mut commands);
        assert_eq!(commands.len(), 1);
        match commands[0] {
            Command::AdvanceHazard { cell } => {
                let tile = query::grid(&world).tile_at(cell).expect("cell on board");
                assert_eq!(tile.kind(), TileKind::Cell);
                assert!(!tile.has_victim());
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn identical_seeds_pick_identical_tiles() {
    let world = default_world();
    let picks = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut hazard = Hazard::new();
        let mut commands = Vec::new();
        for _ in 0..32 {
            hazard.handle(&world, &mut rng, &mut commands);
        }
        commands
    };

    assert_eq!(picks(42), picks(42));
    assert_ne!(picks(42), picks(43));
}

#[test]
fn repeated_escalation_on_a_single_tile_explodes() {
    let grid = TileGrid::parse("FFF\nFCF\nFFF").expect("layout parses");
    let mut world = World::new(grid, Vec::new());
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut hazard = Hazard::new();
    let mut events = Vec::new();

    for _ in 0..3 {
        let mut commands = Vec::new();
        hazard.handle(&world, &mut rng, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let center = CellCoord::new(1, 1);
    assert_eq!(
        events,
        vec![
            Event::SmokeAppeared { cell: center },
            Event::FireIgnited { cell: center },
            Event::ExplosionTriggered { center },
        ]
    );
    assert_eq!(query::stats(&world).explosions, 1);
}
