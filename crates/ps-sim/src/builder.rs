//! Fluent builder for constructing a [`Simulator`].

use log::info;

use ps_agent::{IntentPredictor, OccupancyLedger};
use ps_control::{StanleyParams, VehicleBody, VehicleConfig};
use ps_core::{CoreError, SimConfig, SimRng, SpotId};
use ps_spatial::{ManeuverLibrary, ParkingLot, RoutePlanner};

use crate::{SimError, SimResult, SimStats, Simulator, SpawnSchedule};

/// Fluent builder for [`Simulator<P, M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick duration, horizon, spawn parameters, blocked spots
/// - [`ParkingLot`]: spots, initial occupancy, entrance and exit
/// - `P: RoutePlanner`: cruise paths (e.g. [`ps_spatial::DijkstraPlanner`])
/// - `M: ManeuverLibrary`: park/unpark paths (e.g. [`ps_spatial::ArcManeuvers`])
/// - [`SimRng`]: the run's random stream
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                                   |
/// |-----------------------|-------------------------------------------|
/// | `.schedule(s)`        | `SpawnSchedule::generate` from the config |
/// | `.predictor(p)`       | none; no intents are drawn                |
/// | `.vehicle_body(b)`    | `VehicleBody::default()`                  |
/// | `.vehicle_config(c)`  | `VehicleConfig::default()`                |
/// | `.stanley_params(p)`  | `StanleyParams::default()`                |
///
/// The controller step always follows `config.tick_duration`, whatever
/// `dt` the supplied `StanleyParams` carry.
///
/// # Example
///
/// ```rust,ignore
/// let layout = LotLayout::default();
/// let planner = DijkstraPlanner::new(layout.graph(), 0.5);
/// let maneuvers = ArcManeuvers::new(&layout.lot()?, layout.entry_lane(), layout.exit_lane(), 4.5, 0.15);
/// let mut sim = SimBuilder::new(config, layout.lot()?, planner, maneuvers, SimRng::new(seed))
///     .predictor(ProximityPredictor::default())
///     .build()?;
/// sim.run(&mut HeadlessRenderer)?;
/// ```
pub struct SimBuilder<P: RoutePlanner, M: ManeuverLibrary> {
    config:         SimConfig,
    lot:            ParkingLot,
    router:         P,
    maneuvers:      M,
    rng:            SimRng,
    schedule:       Option<SpawnSchedule>,
    predictor:      Option<Box<dyn IntentPredictor>>,
    body:           VehicleBody,
    vehicle_config: VehicleConfig,
    params:         StanleyParams,
}

impl<P: RoutePlanner, M: ManeuverLibrary> SimBuilder<P, M> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, lot: ParkingLot, router: P, maneuvers: M, rng: SimRng) -> Self {
        Self {
            config,
            lot,
            router,
            maneuvers,
            rng,
            schedule:       None,
            predictor:      None,
            body:           VehicleBody::default(),
            vehicle_config: VehicleConfig::default(),
            params:         StanleyParams::default(),
        }
    }

    /// Use an explicit spawn schedule instead of generating one.
    pub fn schedule(mut self, schedule: SpawnSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Enable advisory intent prediction.
    pub fn predictor(mut self, predictor: impl IntentPredictor + 'static) -> Self {
        self.predictor = Some(Box::new(predictor));
        self
    }

    pub fn vehicle_body(mut self, body: VehicleBody) -> Self {
        self.body = body;
        self
    }

    pub fn vehicle_config(mut self, config: VehicleConfig) -> Self {
        self.vehicle_config = config;
        self
    }

    pub fn stanley_params(mut self, params: StanleyParams) -> Self {
        self.params = params;
        self
    }

    /// Validate inputs, seed the occupancy ledger and return a ready-to-run
    /// [`Simulator`].
    pub fn build(mut self) -> SimResult<Simulator<P, M>> {
        self.config.validate()?;
        if self.lot.spot_count() == 0 {
            return Err(SimError::Config("parking lot has no spots".into()));
        }
        if !(self.vehicle_config.v_cruise > 0.0 && self.vehicle_config.v_maneuver > 0.0) {
            return Err(SimError::Config(format!(
                "vehicle speeds must be positive (cruise {}, maneuver {})",
                self.vehicle_config.v_cruise, self.vehicle_config.v_maneuver,
            )));
        }
        self.params.dt = self.config.tick_duration;

        // ── Occupancy: lot's initial state plus blocked spots ─────────────
        let mut initial = self.lot.initial_occupancy().to_vec();
        for &raw in &self.config.blocked_spots {
            let spot = SpotId(raw);
            match initial.get_mut(spot.index()) {
                Some(slot) => *slot = true,
                None => return Err(CoreError::SpotOutOfRange(spot).into()),
            }
        }
        let occupancy = OccupancyLedger::new(initial);
        let initial_occupied = occupancy.occupied_count();

        let schedule = match self.schedule {
            Some(s) => s,
            None => SpawnSchedule::generate(&self.config.spawn, &mut self.rng)?,
        };

        let exit = self.config.exit_override.unwrap_or(self.lot.exit);

        info!(
            "simulator built: {} spots ({} occupied), {} entering + {} exiting spawns, dt = {}s",
            self.lot.spot_count(),
            initial_occupied,
            schedule.entering.len(),
            schedule.exiting.len(),
            self.config.tick_duration,
        );

        Ok(Simulator {
            clock: self.config.make_clock(),
            config: self.config,
            lot: self.lot,
            occupancy,
            router: self.router,
            maneuvers: self.maneuvers,
            schedule,
            vehicles: Vec::new(),
            initial_occupied,
            body: self.body,
            vehicle_config: self.vehicle_config,
            params: self.params,
            rng: self.rng,
            predictor: self.predictor,
            next_id: 1,
            stats: SimStats::default(),
            exit,
        })
    }
}
