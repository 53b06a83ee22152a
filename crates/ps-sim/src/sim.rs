//! The `Simulator` struct and its tick loop.

use log::{debug, info, warn};

use ps_agent::{
    AgentContext, CruiseTarget, IntentPrediction, IntentPredictor, OccupancyLedger, PeerSnapshot,
    Task, Vehicle, VehicleStatus, predict_all,
};
use ps_control::{StanleyParams, VehicleBody, VehicleConfig, VehicleState};
use ps_core::{Point2, Pose, SimClock, SimConfig, SimRng, SpotId, VehicleId};
use ps_spatial::{ManeuverLibrary, ParkingLot, RoutePlanner};

use crate::{Fill, Renderer, SimError, SimResult, SpawnRequest, SpawnSchedule};

// ── SimStats ──────────────────────────────────────────────────────────────────

/// Summary of a finished run, handed to [`Renderer::on_sim_end`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimStats {
    /// Ticks actually advanced.
    pub ticks: u64,
    /// Simulated time when the loop exited.
    pub final_time: f64,
    /// Entering vehicles spawned.
    pub entered: usize,
    /// Exiting vehicles spawned.
    pub exited: usize,
    /// Spawn attempts postponed because no suitable spot was free or the
    /// entry point was occupied, counted once per tick.
    pub deferred: usize,
    pub done: usize,
    pub failed: usize,
    /// Vehicles still active when time ran out.
    pub pending: usize,
    /// `true` when the loop stopped because nothing was left to do, `false`
    /// when it hit `max_simulation_time`.
    pub terminated_naturally: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SpawnKind {
    Entering,
    Exiting,
}

// ── Simulator ─────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// One iteration of [`run`](Self::run):
///
/// 1. **Spawn**: at most one entering and one exiting vehicle whose scheduled
///    time has strictly passed; each reserves its spot immediately.  With no
///    suitable spot free, or another vehicle still on the entry point, the
///    request waits for the next tick.
/// 2. **Solve**: every active vehicle, in spawn order, against a peer
///    snapshot refreshed after each solve.
/// 3. **Predict**: the optional advisory intent predictor.
/// 4. **Advance** the clock by one tick.
/// 5. **Draw** every vehicle and prediction, then render.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulator<P: RoutePlanner, M: ManeuverLibrary> {
    pub config:    SimConfig,
    pub clock:     SimClock,
    pub lot:       ParkingLot,
    pub occupancy: OccupancyLedger,
    pub router:    P,
    pub maneuvers: M,
    pub schedule:  SpawnSchedule,

    /// All vehicles ever spawned, in spawn (= id) order.  Terminal vehicles
    /// stay so the renderer keeps drawing them.
    pub vehicles: Vec<Vehicle>,

    /// Occupied spots at build time, blocked spots included.
    pub initial_occupied: usize,

    pub(crate) body:           VehicleBody,
    pub(crate) vehicle_config: VehicleConfig,
    pub(crate) params:         StanleyParams,
    pub(crate) rng:            SimRng,
    pub(crate) predictor:      Option<Box<dyn IntentPredictor>>,
    pub(crate) next_id:        u32,
    pub(crate) stats:          SimStats,
    pub(crate) exit:           Point2,
}

impl<P: RoutePlanner, M: ManeuverLibrary> Simulator<P, M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until both spawn queues are empty and no vehicle is active, or
    /// until the clock passes `max_simulation_time`.
    ///
    /// Planning failures are contained per vehicle.  Invariant violations
    /// (diverged state, incomparable priorities) stop the run with
    /// [`SimError::Agent`].
    pub fn run<R: Renderer>(&mut self, renderer: &mut R) -> SimResult<SimStats> {
        info!(
            "simulation start: {} spots, {} occupied, {} scheduled spawns",
            self.lot.spot_count(),
            self.occupancy.occupied_count(),
            self.schedule.len(),
        );

        while self.clock.time() <= self.config.max_simulation_time {
            if !renderer.is_running() {
                renderer.render(self.clock.time(), &self.occupancy);
                continue;
            }
            renderer.clear_frame();

            self.spawn_due(SpawnKind::Entering);
            self.spawn_due(SpawnKind::Exiting);

            let active: Vec<usize> = self
                .vehicles
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_all_done())
                .map(|(i, _)| i)
                .collect();

            if self.schedule.is_empty() && active.is_empty() {
                info!("no active vehicles at t = {:.1}s", self.clock.time());
                self.stats.terminated_naturally = true;
                break;
            }

            self.solve_active(&active)?;
            let predictions = self.predict(&active);

            self.clock.advance();
            self.stats.ticks += 1;

            for vehicle in &self.vehicles {
                renderer.draw_vehicle(vehicle, Fill::for_vehicle(vehicle));
            }
            for (&i, prediction) in active.iter().zip(&predictions) {
                renderer.draw_intent(&self.vehicles[i], prediction);
            }
            renderer.render(self.clock.time(), &self.occupancy);
        }

        let stats = self.finish();
        renderer.on_sim_end(&stats);
        Ok(stats)
    }

    /// Statistics so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.vehicles.iter().filter(|v| !v.is_all_done()).count()
    }

    // ── Spawning ──────────────────────────────────────────────────────────

    fn spawn_due(&mut self, kind: SpawnKind) {
        let now = self.clock.time();
        let queue = match kind {
            SpawnKind::Entering => &self.schedule.entering,
            SpawnKind::Exiting => &self.schedule.exiting,
        };
        let request = match queue.front() {
            Some(req) if now > req.time => *req,
            _ => return,
        };

        // The request stays queued until a spot is available and, for an
        // entering vehicle, until the spawn point is clear.
        if kind == SpawnKind::Entering && self.entrance_blocked() {
            warn!("t = {now:.1}s: entrance occupied, retrying next tick");
            self.stats.deferred += 1;
            return;
        }
        let Some(spot) = self.pick_spot(&request) else {
            warn!("t = {now:.1}s: no free spot for {kind:?} spawn, retrying next tick");
            self.stats.deferred += 1;
            return;
        };
        match kind {
            SpawnKind::Entering => self.schedule.entering.pop_front(),
            SpawnKind::Exiting => self.schedule.exiting.pop_front(),
        };
        self.occupancy.reserve(spot);

        let id = VehicleId(self.next_id);
        self.next_id += 1;
        let mut vehicle = Vehicle::new(
            id,
            self.body,
            self.vehicle_config,
            self.params,
            self.config.history_len,
        );

        match kind {
            SpawnKind::Entering => {
                let start = self.entry_point();
                vehicle.set_state(VehicleState::at_pose(Pose::new(start, self.lot.entrance.heading)));
                vehicle.set_task_profile([
                    Task::Cruise {
                        v_cruise: self.vehicle_config.v_cruise,
                        target:   CruiseTarget::Spot(spot),
                    },
                    Task::Park { spot },
                ]);
                self.stats.entered += 1;
            }
            SpawnKind::Exiting => {
                if let Ok(s) = self.lot.spot(spot) {
                    vehicle.set_state(VehicleState::at_pose(s.pose()));
                }
                vehicle.set_task_profile([
                    Task::Unpark { spot },
                    Task::Cruise {
                        v_cruise: self.vehicle_config.v_cruise,
                        target:   CruiseTarget::Coords(self.exit),
                    },
                ]);
                self.stats.exited += 1;
            }
        }

        info!("t = {now:.1}s: spawned {kind:?} vehicle {id} for spot {spot}");
        self.vehicles.push(vehicle);
    }

    /// Where entering vehicles appear: `spawn_offset` behind the entrance.
    fn entry_point(&self) -> Point2 {
        let entrance = self.lot.entrance;
        entrance.position - entrance.direction() * self.vehicle_config.spawn_offset
    }

    /// An active vehicle stands within the safety radius of the entry point.
    fn entrance_blocked(&self) -> bool {
        let start = self.entry_point();
        self.vehicles
            .iter()
            .filter(|v| !v.is_all_done())
            .any(|v| v.state.position().distance(start) <= self.vehicle_config.safety_radius)
    }

    /// The requested spot if it is free, otherwise a random free spot.
    /// An explicit request for a taken spot waits.
    fn pick_spot(&mut self, request: &SpawnRequest) -> Option<SpotId> {
        match request.spot {
            Some(spot)
                if spot.index() < self.occupancy.spot_count()
                    && !self.occupancy.is_occupied(spot) =>
            {
                Some(spot)
            }
            Some(_) => None,
            None => {
                let free = self.occupancy.free_spots();
                self.rng.choose(&free).copied()
            }
        }
    }

    // ── Solving ───────────────────────────────────────────────────────────

    fn solve_active(&mut self, active: &[usize]) -> SimResult<()> {
        let mut peers: Vec<PeerSnapshot> =
            active.iter().map(|&i| self.vehicles[i].snapshot()).collect();

        // Explicit field borrows so the borrow checker sees disjoint access.
        let tick      = self.clock.current_tick;
        let time      = self.clock.time();
        let lot       = &self.lot;
        let router    = &self.router;
        let maneuvers = &self.maneuvers;
        let occupancy = &mut self.occupancy;
        let vehicles  = &mut self.vehicles;

        for (slot, &i) in active.iter().enumerate() {
            let vehicle = &mut vehicles[i];
            let id = vehicle.id;
            let mut ctx = AgentContext {
                tick,
                time,
                lot,
                router,
                maneuvers,
                peers: &peers,
                occupancy: &mut *occupancy,
            };
            vehicle
                .solve(&mut ctx)
                .map_err(|source| SimError::Agent { vehicle: id, source })?;

            if let VehicleStatus::Failed(reason) = vehicle.status() {
                debug!("vehicle {id} failed at t = {time:.1}s: {reason}");
            }
            peers[slot] = vehicle.snapshot();
        }
        Ok(())
    }

    fn predict(&self, active: &[usize]) -> Vec<IntentPrediction> {
        let Some(predictor) = self.predictor.as_deref() else {
            return Vec::new();
        };
        let inputs: Vec<(VehicleId, Vec<VehicleState>)> = active
            .iter()
            .map(|&i| {
                let v = &self.vehicles[i];
                (v.id, v.history().iter().copied().collect())
            })
            .collect();
        predict_all(predictor, &inputs, &self.lot, &self.occupancy)
    }

    fn finish(&mut self) -> SimStats {
        let stats = &mut self.stats;
        stats.final_time = self.clock.time();
        stats.done = 0;
        stats.failed = 0;
        stats.pending = 0;
        for v in &self.vehicles {
            match v.status() {
                VehicleStatus::Done => stats.done += 1,
                VehicleStatus::Failed(_) => stats.failed += 1,
                VehicleStatus::Active => stats.pending += 1,
            }
        }
        info!(
            "simulation end at t = {:.1}s: {} done, {} failed, {} pending, {} deferred spawn attempts",
            stats.final_time, stats.done, stats.failed, stats.pending, stats.deferred,
        );
        stats.clone()
    }
}
