use clap::{Args, Parser, Subcommand, ValueEnum};
use grid_levelgen::automaton::{self, AutomatonConfig};
use grid_levelgen::carver::{RoomCarver, WeightedChoice};
use grid_levelgen::config::{LayoutConfig, LevelConfig};
use grid_levelgen::corridor::Corridor;
use grid_levelgen::error::ConfigError;
use grid_levelgen::geometry::{Point, Rect, Size};
use grid_levelgen::map::Map;
use grid_levelgen::partition::{PartitionTree, SplitLimits};
use grid_levelgen::rect_strategy::{OneBigRoomConfig, RandomPlacementConfig, RectangleStrategy, SpacePartitionConfig};
use grid_levelgen::rng::LevelRng;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "levelgen")]
#[command(author, version, about = "Generate dungeon levels and print them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a full level
    Generate(GenerateArgs),
    /// Run the cellular automaton on its own
    Automaton(AutomatonArgs),
    /// Print a binary space partition as a Graphviz digraph
    Partition(PartitionArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON level configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Where rooms go
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// What rooms look like
    #[arg(long, value_enum)]
    carver: Option<CarverArg>,

    /// Print a JSON summary instead of the map
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    OneBigRoom,
    Random,
    Bsp,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CarverArg {
    Rect,
    Automaton,
    Mixed,
}

#[derive(Args, Debug)]
struct AutomatonArgs {
    #[arg(long, default_value_t = 20)]
    width: i32,

    #[arg(long, default_value_t = 20)]
    height: i32,

    #[arg(long, default_value_t = 5)]
    rounds: u32,

    #[arg(long, default_value_t = 0.5)]
    fill: f64,

    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct PartitionArgs {
    width: i32,

    height: i32,

    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Minimum side length of a partition
    #[arg(long, default_value_t = 5)]
    min: i32,

    /// Maximum ratio between the sides of a partition
    #[arg(long, default_value_t = 1.5)]
    ratio: f64,

    #[arg(short, long)]
    seed: Option<u64>,
}

/// What `generate --json` prints
#[derive(Serialize)]
struct LevelSummary<'a> {
    seed: u64,
    width: usize,
    height: usize,
    rooms: Vec<RoomSummary>,
    corridors: &'a [Corridor],
    up_stairs: &'a [Point],
    down_stairs: &'a [Point],
    tiles: Vec<String>,
}

#[derive(Serialize)]
struct RoomSummary {
    kind: &'static str,
    bounds: Rect,
    center: Point,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the map on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Automaton(args) => run_automaton(args),
        Command::Partition(args) => partition(args),
    }
}

fn rng_for(seed: Option<u64>) -> LevelRng {
    let rng = match seed {
        Some(seed) => LevelRng::new(seed),
        None => LevelRng::from_entropy(),
    };
    info!("Using seed {}", rng.seed());
    rng
}

fn generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.strategy.is_some() || args.carver.is_some() {
        config.layout = override_layout(std::mem::take(&mut config.layout), args.strategy, args.carver)?;
    }

    let mut rng = config.rng();
    info!("Using seed {}", rng.seed());
    let map = Map::generate(&config, &mut rng)?;

    if args.json {
        let summary = LevelSummary {
            seed: rng.seed(),
            width: map.width(),
            height: map.height(),
            rooms: map
                .rooms()
                .iter()
                .map(|room| RoomSummary {
                    kind: room.kind(),
                    bounds: room.bounds(),
                    center: room.center(),
                })
                .collect(),
            corridors: map.corridors(),
            up_stairs: map.up_stairs(),
            down_stairs: map.down_stairs(),
            tiles: map.to_string().lines().map(str::to_owned).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", map);
    }
    Ok(())
}

/// Swap the room strategy or carver named on the command line into `layout`
fn override_layout(
    layout: LayoutConfig,
    strategy: Option<StrategyArg>,
    carver: Option<CarverArg>,
) -> Result<LayoutConfig, Box<dyn std::error::Error>> {
    let (rects, room_carver, corridors) = match layout {
        LayoutConfig::RoomsAndCorridors {
            rects,
            carver,
            corridors,
        } => (rects, carver, corridors),
        LayoutConfig::CellularAutomaton(_) => Default::default(),
    };

    let rects = match strategy {
        Some(StrategyArg::OneBigRoom) => RectangleStrategy::OneBigRoom(OneBigRoomConfig::default()),
        Some(StrategyArg::Random) => RectangleStrategy::RandomPlacement(RandomPlacementConfig::default()),
        Some(StrategyArg::Bsp) => RectangleStrategy::SpacePartition(SpacePartitionConfig::default()),
        None => rects,
    };

    let carver = match carver {
        Some(CarverArg::Rect) => RoomCarver::Rectangular,
        Some(CarverArg::Automaton) => RoomCarver::CellularAutomaton(AutomatonConfig::default()),
        Some(CarverArg::Mixed) => RoomCarver::WeightedChoice(WeightedChoice::new(vec![
            (0.5, RoomCarver::Rectangular),
            (0.5, RoomCarver::CellularAutomaton(AutomatonConfig::default())),
        ])?),
        None => room_carver,
    };

    Ok(LayoutConfig::RoomsAndCorridors {
        rects,
        carver,
        corridors,
    })
}

fn run_automaton(args: AutomatonArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AutomatonConfig {
        fill_percentage: args.fill,
        number_of_rounds: args.rounds,
    };
    let mut rng = rng_for(args.seed);
    let tiles = automaton::generate(Size::new(args.width, args.height), config, &mut rng)?;
    print!("{}", tiles);
    Ok(())
}

fn partition(args: PartitionArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.min < 1 {
        return Err(ConfigError::InvalidRoomSize {
            min_width: args.min,
            min_height: args.min,
            max_width: args.width,
            max_height: args.height,
        }
        .into());
    }
    let limits = SplitLimits {
        depth: args.depth,
        min_width: args.min,
        min_height: args.min,
        max_horizontal_ratio: args.ratio,
        max_vertical_ratio: args.ratio,
    };
    let mut rng = rng_for(args.seed);
    let tree = PartitionTree::split_recursive(Rect::new(0, 0, args.width, args.height), &limits, &mut rng);
    print!("{}", tree.to_dot());
    Ok(())
}
