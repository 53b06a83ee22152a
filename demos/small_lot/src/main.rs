//! small_lot: a two-row synthetic parking lot with random arrivals and
//! departures.
//!
//! Usage:
//!
//! ```text
//! small_lot [CONFIG.json] [SPOTS.csv]
//! ```
//!
//! `CONFIG.json` is a (partial) `SimConfig`; missing fields take their
//! defaults.  `SPOTS.csv` replaces the synthetic spot table (columns
//! `id,x,y,heading,occupied`); the aisle geometry stays the synthetic one.
//! Set `RUST_LOG=debug` to follow task transitions.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use ps_agent::{IntentPrediction, OccupancyLedger, ProximityPredictor, Vehicle};
use ps_core::{SimConfig, SimRng, VehicleId};
use ps_sim::{Fill, Renderer, SimBuilder, SimStats};
use ps_spatial::{ArcManeuvers, DijkstraPlanner, LotLayout, load_spots_csv};

// ── Constants ─────────────────────────────────────────────────────────────────

const TURN_RADIUS:    f64 = 4.5;
const ROUTE_SPACING:  f64 = 0.5;
/// Log a status line every this many simulated seconds.
const STATUS_EVERY_S: f64 = 10.0;

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Logs a status line periodically and tallies fill classes per frame.
struct LogRenderer {
    frames:      u64,
    next_status: f64,
    frame_fills: [usize; 4],
    intents:     usize,
    /// Each vehicle's most likely spot in the last frame it was predicted.
    last_guess:  Vec<(VehicleId, Option<u32>)>,
}

impl LogRenderer {
    fn new() -> Self {
        Self {
            frames:      0,
            next_status: 0.0,
            frame_fills: [0; 4],
            intents:     0,
            last_guess:  Vec::new(),
        }
    }
}

impl Renderer for LogRenderer {
    fn clear_frame(&mut self) {
        self.frame_fills = [0; 4];
        self.last_guess.clear();
    }

    fn draw_vehicle(&mut self, _vehicle: &Vehicle, fill: Fill) {
        let slot = match fill {
            Fill::Done => 0,
            Fill::Braking => 1,
            Fill::Maneuvering => 2,
            Fill::Cruising => 3,
        };
        self.frame_fills[slot] += 1;
    }

    fn draw_intent(&mut self, vehicle: &Vehicle, prediction: &IntentPrediction) {
        self.intents += 1;
        self.last_guess.push((vehicle.id, prediction.most_likely().map(|(s, _)| s.0)));
    }

    fn render(&mut self, time: f64, occupancy: &OccupancyLedger) {
        self.frames += 1;
        if time < self.next_status {
            return;
        }
        self.next_status = time + STATUS_EVERY_S;
        let [done, braking, maneuvering, cruising] = self.frame_fills;
        info!(
            "t = {time:6.1}s  occupied {:>2}/{}  cruising {cruising}  maneuvering {maneuvering}  braking {braking}  done {done}",
            occupancy.occupied_count(),
            occupancy.spot_count(),
        );
        for (id, guess) in &self.last_guess {
            match guess {
                Some(spot) => info!("    {id} most likely heading for spot {spot}"),
                None => info!("    {id} intent unknown"),
            }
        }
    }

    fn on_sim_end(&mut self, stats: &SimStats) {
        info!("renderer saw {} frames, {} intent predictions", self.frames, self.intents);
        if !stats.terminated_naturally {
            info!("{} vehicles still active at the time limit", stats.pending);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config: SimConfig = match args.next() {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing config {path}"))?
        }
        None => SimConfig::default(),
    };

    println!("=== small_lot — parking-lot simulator ===");
    println!(
        "Seed: {}  |  dt: {}s  |  Horizon: {}s  |  Spawns: {} entering, {} exiting",
        config.seed,
        config.tick_duration,
        config.max_simulation_time,
        config.spawn.entering,
        config.spawn.exiting,
    );
    println!();

    // 1. Lot, aisle graph and maneuver library.
    let layout = LotLayout::default();
    let lot = match args.next() {
        Some(path) => {
            let table = load_spots_csv(Path::new(&path))?;
            let synthetic = layout.lot()?;
            table.into_lot(synthetic.entrance, synthetic.exit)?
        }
        None => layout.lot()?,
    };
    let graph = layout.graph();
    println!(
        "Lot: {} spots ({} occupied)  |  aisle graph: {} nodes, {} edges",
        lot.spot_count(),
        lot.initial_occupancy().iter().filter(|&&o| o).count(),
        graph.node_count(),
        graph.edge_count(),
    );

    let vehicle_config = ps_control::VehicleConfig::default();
    let step = vehicle_config.v_maneuver * config.tick_duration;
    let maneuvers = ArcManeuvers::new(&lot, layout.entry_lane(), layout.exit_lane(), TURN_RADIUS, step);
    let planner = DijkstraPlanner::new(graph, ROUTE_SPACING);

    // 2. Build and run.
    let rng = SimRng::new(config.seed);
    let mut sim = SimBuilder::new(config, lot, planner, maneuvers, rng)
        .vehicle_config(vehicle_config)
        .predictor(ProximityPredictor::default())
        .build()?;

    let mut renderer = LogRenderer::new();
    let t0 = Instant::now();
    let stats = sim.run(&mut renderer)?;
    let elapsed = t0.elapsed();

    // 3. Summary.
    println!();
    println!("Simulation complete in {:.3} s ({} ticks)", elapsed.as_secs_f64(), stats.ticks);
    println!(
        "  simulated time : {:.1} s ({})",
        stats.final_time,
        if stats.terminated_naturally { "all vehicles finished" } else { "time limit" },
    );
    println!("  spawned        : {} entering, {} exiting", stats.entered, stats.exited);
    println!("  deferred       : {} spawn attempts", stats.deferred);
    println!();

    println!("{:<8} {:<10} {:>9} {:>9} {:>8}", "Vehicle", "Status", "x", "y", "heading");
    println!("{}", "-".repeat(48));
    for v in &sim.vehicles {
        let status = match v.status() {
            ps_agent::VehicleStatus::Active => "active",
            ps_agent::VehicleStatus::Done => "done",
            ps_agent::VehicleStatus::Failed(_) => "failed",
        };
        println!(
            "{:<8} {:<10} {:>9.2} {:>9.2} {:>8.3}",
            v.id.0, status, v.state.x, v.state.y, v.state.psi,
        );
    }
    println!();
    println!(
        "Final occupancy: {}/{} spots",
        sim.occupancy.occupied_count(),
        sim.occupancy.spot_count(),
    );

    Ok(())
}
