use grid_levelgen::automaton::{self, AutomatonConfig};
use grid_levelgen::carver::{RoomCarver, WeightedChoice};
use grid_levelgen::config::{LayoutConfig, LevelConfig};
use grid_levelgen::corridor::CorridorRouter;
use grid_levelgen::generator::{GenerationPhase, Level, LevelGenerator};
use grid_levelgen::geometry::{Point, Rect, Size};
use grid_levelgen::grid::{Grid, TileGrid};
use grid_levelgen::map::Map;
use grid_levelgen::rect_strategy::{RandomPlacementConfig, RectangleStrategy, SpacePartitionConfig};
use grid_levelgen::rng::LevelRng;
use grid_levelgen::room::{RectangularRoom, Room};
use grid_levelgen::tile::TileType;
use proptest::prelude::*;

fn scenario_a_generator() -> LevelGenerator {
    let rects = RectangleStrategy::RandomPlacement(RandomPlacementConfig {
        number_of_rooms: 5,
        minimum_room_size: Size::new(7, 7),
        maximum_room_size: Size::new(20, 20),
    });
    LevelGenerator::new(rects, RoomCarver::Rectangular, CorridorRouter::Elbow).unwrap()
}

fn generate(generator: &mut LevelGenerator, size: Size, seed: u64) -> (Level, Grid) {
    let mut grid = Grid::new(size);
    let mut rng = LevelRng::new(seed);
    let level = generator.generate(&mut grid, &mut rng).unwrap();
    (level, grid)
}

#[test]
fn random_placement_places_five_separate_rooms() {
    for seed in [17, 42] {
        let (level, _) = generate(&mut scenario_a_generator(), Size::new(50, 50), seed);
        assert_eq!(level.rooms.len(), 5, "seed {seed}");
        assert!(level.rooms.iter().all(|room| room.kind() == "rectangular"));

        let bounds: Vec<Rect> = level.rooms.iter().map(Room::bounds).collect();
        for (i, a) in bounds.iter().enumerate() {
            assert!(Rect::new(0, 0, 50, 50).contains_rect(a));
            assert!(a.width >= 7 && a.width <= 20 && a.height >= 7 && a.height <= 20);
            for b in &bounds[i + 1..] {
                assert!(!a.intersects(b));
            }
        }

        let (again, _) = generate(&mut scenario_a_generator(), Size::new(50, 50), seed);
        let again: Vec<Rect> = again.rooms.iter().map(Room::bounds).collect();
        assert_eq!(bounds, again);
    }
}

#[test]
fn empty_automaton_stays_empty() {
    let config = AutomatonConfig {
        fill_percentage: 0.0,
        number_of_rounds: 5,
    };
    let mut rng = LevelRng::new(3);
    let tiles = automaton::generate(Size::new(10, 10), config, &mut rng).unwrap();
    assert_eq!(tiles.count(TileType::Empty), 100);
}

#[test]
fn elbow_corridor_follows_one_of_two_paths() {
    // Bounds midpoints (5, 5) and (20, 5)
    let rooms = [
        Room::Rectangular(RectangularRoom::new(Rect::new(0, 0, 10, 10))),
        Room::Rectangular(RectangularRoom::new(Rect::new(15, 0, 10, 10))),
    ];
    let straight: Vec<Point> = (5..=20).map(|x| Point::new(x, 5)).collect();

    for seed in 0..20 {
        let mut rng = LevelRng::new(seed);
        let corridors = CorridorRouter::Elbow.route(&rooms, &mut rng);
        assert_eq!(corridors.len(), 1);

        let mut points = corridors[0].points.clone();
        points.dedup();
        assert_eq!(points, straight);
    }
}

#[test]
fn strategy_without_rectangles_gives_empty_level() {
    let rects = RectangleStrategy::RandomPlacement(RandomPlacementConfig {
        number_of_rooms: 0,
        ..RandomPlacementConfig::default()
    });
    let mut generator = LevelGenerator::new(rects, RoomCarver::Rectangular, CorridorRouter::Elbow).unwrap();
    let (level, grid) = generate(&mut generator, Size::new(40, 30), 1);

    assert_eq!(generator.phase(), GenerationPhase::Done);
    assert!(level.rooms.is_empty());
    assert!(level.corridors.is_empty());
    assert!(level.up_stairs.is_empty());
    assert!(level.down_stairs.is_empty());
    assert_eq!(grid.count(TileType::Empty), 40 * 30);
}

#[test]
fn same_seed_same_map() {
    let choice = WeightedChoice::new(vec![
        (0.7, RoomCarver::Rectangular),
        (0.3, RoomCarver::CellularAutomaton(AutomatonConfig::default())),
    ])
    .unwrap();
    let config = LevelConfig {
        seed: Some(2024),
        layout: LayoutConfig::RoomsAndCorridors {
            rects: RectangleStrategy::SpacePartition(SpacePartitionConfig::default()),
            carver: RoomCarver::WeightedChoice(choice),
            corridors: CorridorRouter::Elbow,
        },
        ..LevelConfig::default()
    };

    let first = Map::generate(&config, &mut LevelRng::new(2024)).unwrap();
    let second = Map::generate(&config, &mut LevelRng::new(2024)).unwrap();
    assert_eq!(first.level(), second.level());
    assert_eq!(first.grid(), second.grid());
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn connected_rooms_get_floor_between_them() {
    let (level, grid) = generate(&mut scenario_a_generator(), Size::new(50, 50), 42);
    assert_eq!(level.corridors.len(), level.rooms.len() - 1);
    for corridor in &level.corridors {
        for point in &corridor.points {
            let tile = grid.tile_type_at(*point);
            assert!(matches!(
                tile,
                Some(TileType::Floor | TileType::StairsUp | TileType::StairsDown)
            ));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn everything_stamped_stays_in_bounds(
        seed in any::<u64>(),
        width in 20i32..90,
        height in 20i32..60,
        use_bsp in any::<bool>(),
    ) {
        let rects = if use_bsp {
            RectangleStrategy::SpacePartition(SpacePartitionConfig::default())
        } else {
            RectangleStrategy::RandomPlacement(RandomPlacementConfig::default())
        };
        let carver = RoomCarver::WeightedChoice(
            WeightedChoice::new(vec![
                (0.5, RoomCarver::Rectangular),
                (0.5, RoomCarver::CellularAutomaton(AutomatonConfig::default())),
            ])
            .unwrap(),
        );
        let mut generator = LevelGenerator::new(rects, carver, CorridorRouter::Elbow).unwrap();
        let (level, grid) = generate(&mut generator, Size::new(width, height), seed);
        let bounds = grid.bounds();

        for room in &level.rooms {
            prop_assert!(bounds.contains_rect(&room.bounds()));
            for point in room.floor_points().into_iter().chain(room.wall_points()) {
                prop_assert!(bounds.contains(point));
            }
        }
        for corridor in &level.corridors {
            prop_assert!(corridor.points.iter().all(|p| bounds.contains(*p)));
        }
        for stair in level.up_stairs.iter().chain(&level.down_stairs) {
            prop_assert!(bounds.contains(*stair));
        }
        prop_assert!(level.up_stairs.len() <= 1 && level.down_stairs.len() <= 1);
    }
}
