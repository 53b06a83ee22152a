//! The vehicle agent and its task state machine.
//!
//! # Lifecycle
//!
//! ```text
//!   spawn ──> execute_next_task ──> [CRUISE | PARK | UNPARK] ──complete──┐
//!                 ^                                                     │
//!                 └─────────────────────────────────────────────────────┘
//!   profile exhausted ──> Done        planning failure ──> Failed
//! ```
//!
//! `Done` and `Failed` are terminal: `solve` becomes a no-op.

use std::collections::VecDeque;

use ps_control::{StanleyController, StanleyParams, VehicleBody, VehicleConfig, VehicleState};
use ps_core::{Point2, ReferencePath, SpotId, VehicleId};
use ps_spatial::{ManeuverKind, RouteGoal};

use crate::arbitration::arbitrate;
use crate::{AgentContext, AgentError, AgentResult, CruiseTarget, PeerSnapshot, Task, TaskKind};

// ── VehicleStatus ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum VehicleStatus {
    Active,
    /// Task profile exhausted.
    Done,
    /// A task could not be planned; carries the reason.
    Failed(String),
}

// ── ActiveTask ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct ActiveTask {
    task: Task,
    path: ReferencePath,
    /// Cruise: the controller's tracked waypoint.  Maneuvers: the replayed
    /// pose.  Never decreases.
    index: usize,
    /// Unpark only: the spot has been handed back to the ledger.
    spot_released: bool,
}

impl ActiveTask {
    fn progress(&self) -> f64 {
        match self.path.last_index() {
            0 => 1.0,
            last => self.index as f64 / last as f64,
        }
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// One simulated vehicle.
pub struct Vehicle {
    pub id:     VehicleId,
    pub body:   VehicleBody,
    pub config: VehicleConfig,
    pub state:  VehicleState,

    /// `Some(score)` while in conflict with at least one peer this tick.
    pub priority:   Option<f64>,
    pub is_braking: bool,

    controller:  StanleyController,
    tasks:       VecDeque<Task>,
    current:     Option<ActiveTask>,
    status:      VehicleStatus,
    history:     VecDeque<VehicleState>,
    history_len: usize,
}

impl Vehicle {
    pub fn new(
        id:          VehicleId,
        body:        VehicleBody,
        config:      VehicleConfig,
        params:      StanleyParams,
        history_len: usize,
    ) -> Self {
        Self {
            id,
            body,
            config,
            state: VehicleState::default(),
            priority: None,
            is_braking: false,
            controller: StanleyController::new(params, &body, &config),
            tasks: VecDeque::new(),
            current: None,
            status: VehicleStatus::Active,
            history: VecDeque::with_capacity(history_len),
            history_len,
        }
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    pub fn set_state(&mut self, state: VehicleState) {
        self.state = state;
    }

    /// Replace the queued tasks.  The current task, if any, is unaffected.
    pub fn set_task_profile(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks = tasks.into_iter().collect();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` once the vehicle is terminal (`Done` or `Failed`).
    #[inline]
    pub fn is_all_done(&self) -> bool {
        self.status != VehicleStatus::Active
    }

    pub fn status(&self) -> &VehicleStatus {
        &self.status
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current.as_ref().map(|a| &a.task)
    }

    /// The path of the current task.
    pub fn current_path(&self) -> Option<&ReferencePath> {
        self.current.as_ref().map(|a| &a.path)
    }

    pub fn queued_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Most recent states, oldest first.
    pub fn history(&self) -> &VecDeque<VehicleState> {
        &self.history
    }

    /// Right-of-way score for the current task.
    ///
    /// PARK/UNPARK: `2 + progress`, progress in `[0, 1]`.
    /// CRUISE: `1 / (1 + remaining path length)`, in `(0, 1]`.
    /// No task: `0`.
    pub fn priority_score(&self) -> f64 {
        match &self.current {
            None => 0.0,
            Some(a) if a.task.kind().is_maneuver() => 2.0 + a.progress(),
            Some(a) => 1.0 / (1.0 + a.path.remaining_length(a.index)),
        }
    }

    /// Points the vehicle is about to sweep: cruise path ahead of the tracked
    /// waypoint, or the next maneuver poses.
    pub fn lookahead(&self) -> Vec<Point2> {
        let Some(a) = &self.current else {
            return Vec::new();
        };
        if a.task.kind().is_maneuver() {
            let end = (a.index + self.config.lookahead_steps).min(a.path.last_index());
            a.path.points().get(a.index + 1..=end).map(<[_]>::to_vec).unwrap_or_default()
        } else {
            a.path.lookahead(a.index, self.config.lookahead_distance)
        }
    }

    pub fn snapshot(&self) -> PeerSnapshot {
        PeerSnapshot {
            id:             self.id,
            position:       self.state.position(),
            heading:        self.state.psi,
            speed:          self.state.v,
            task:           if self.is_all_done() { None } else { self.current_task().map(Task::kind) },
            priority_score: self.priority_score(),
            lookahead:      self.lookahead(),
        }
    }

    // ── Task transitions ──────────────────────────────────────────────────

    /// Start the next queued task, or become `Done` when none is left.
    ///
    /// A task whose path cannot be planned fails the vehicle (see
    /// [`VehicleStatus::Failed`]); that is not an error for the caller.
    pub fn execute_next_task(&mut self, ctx: &mut AgentContext<'_>) -> AgentResult<()> {
        if self.is_all_done() {
            return Ok(());
        }
        let Some(task) = self.tasks.pop_front() else {
            self.current = None;
            self.status = VehicleStatus::Done;
            log::debug!("{} done at t={:.1}", self.id, ctx.time);
            return Ok(());
        };

        match self.plan(&task, ctx) {
            Ok(path) => {
                if let Task::Unpark { .. } = task {
                    if let Some(start) = path.first_pose() {
                        self.state = VehicleState::at_pose(start);
                    }
                }
                log::debug!("{} starts {} ({} waypoints)", self.id, task.kind(), path.len());
                self.current = Some(ActiveTask { task, path, index: 0, spot_released: false });
            }
            Err(e) => self.fail(task, &e, ctx),
        }
        Ok(())
    }

    fn plan(&self, task: &Task, ctx: &AgentContext<'_>) -> AgentResult<ReferencePath> {
        let path = match *task {
            Task::Cruise { target, .. } => {
                let goal = match target {
                    CruiseTarget::Spot(spot) => {
                        let park = ctx.maneuvers.maneuver(ctx.lot.spot(spot)?, ManeuverKind::Park)?;
                        let start = park.first_pose().ok_or(AgentError::EmptyPlan(TaskKind::Park))?;
                        RouteGoal::pose(start)
                    }
                    CruiseTarget::Coords(p) => RouteGoal::point(p),
                };
                ctx.router.plan(self.state.pose(), goal)?
            }
            Task::Park { spot } => ctx.maneuvers.maneuver(ctx.lot.spot(spot)?, ManeuverKind::Park)?,
            Task::Unpark { spot } => ctx.maneuvers.maneuver(ctx.lot.spot(spot)?, ManeuverKind::Unpark)?,
        };
        if path.is_empty() {
            return Err(AgentError::EmptyPlan(task.kind()));
        }
        Ok(path)
    }

    /// Terminal failure.  Spots reserved for a park that will now never
    /// happen go back to the ledger.
    fn fail(&mut self, task: Task, reason: &AgentError, ctx: &mut AgentContext<'_>) {
        log::warn!("{} failed {}: {reason}", self.id, task.kind());
        let pending = std::iter::once(task).chain(self.tasks.drain(..));
        for spot in pending.filter_map(|t| t.parks_into()) {
            ctx.occupancy.release(spot);
        }
        self.current = None;
        self.priority = None;
        self.is_braking = false;
        self.state.v = 0.0;
        self.status = VehicleStatus::Failed(reason.to_string());
    }

    // ── Per-tick step ─────────────────────────────────────────────────────

    /// Advance this vehicle one tick.
    ///
    /// 1. Start the first task if none is current.
    /// 2. Arbitrate against `ctx.peers`, setting `priority` and `is_braking`.
    /// 3. Drive the current task; on completion start the next one.
    ///
    /// # Errors
    ///
    /// Controller divergence and incomparable priorities.  Planning failures
    /// are absorbed into [`VehicleStatus::Failed`].
    pub fn solve(&mut self, ctx: &mut AgentContext<'_>) -> AgentResult<()> {
        if self.current.is_none() {
            self.execute_next_task(ctx)?;
        }
        if self.is_all_done() {
            return Ok(());
        }

        let decision = arbitrate(&self.snapshot(), ctx.peers, self.config.safety_radius)?;
        self.priority = decision.priority;
        self.is_braking = decision.braking;

        let finished = match self.current.as_ref().map(|a| a.task) {
            Some(Task::Cruise { v_cruise, .. }) => self.step_cruise(v_cruise)?,
            Some(Task::Park { .. }) => self.step_maneuver(),
            Some(Task::Unpark { spot }) => {
                let finished = self.step_maneuver();
                self.release_if_clear(spot, ctx);
                finished
            }
            None => false,
        };

        self.record_history();

        if finished {
            self.complete_current(ctx);
            self.execute_next_task(ctx)?;
        }
        Ok(())
    }

    fn step_cruise(&mut self, v_cruise: f64) -> AgentResult<bool> {
        let Some(active) = self.current.as_mut() else {
            return Ok(false);
        };
        let cfg = &self.config;

        let (steer, index) = self.controller.steering(&self.state, &active.path, active.index)?;
        active.index = index;

        let remaining = active.path.remaining_length(index);
        let target = (cfg.approach_gain * remaining)
            .min(v_cruise)
            .max(cfg.v_maneuver.min(v_cruise));
        let accel = self.controller.speed_command(target, self.state.v, self.is_braking);
        self.controller.integrate_step(&mut self.state, accel, steer)?;

        let Some(goal) = active.path.last_pose() else {
            return Ok(true);
        };
        let rear = self.state.position();
        Ok(index == active.path.last_index()
            && (rear.distance(goal.position) <= cfg.arrival_tolerance || goal.is_passed_by(rear)))
    }

    /// Replay one maneuver pose.  Braking holds the current pose.
    fn step_maneuver(&mut self) -> bool {
        let Some(active) = self.current.as_mut() else {
            return false;
        };
        let last = active.path.last_index();

        if self.is_braking {
            self.state.v = 0.0;
            self.state.accel = 0.0;
            return active.index >= last;
        }

        let prev = self.state;
        active.index = (active.index + 1).min(last);
        let pose = active.path.pose(active.index);
        let dt = self.controller.dt();

        let moved = pose.position - prev.position();
        let v = moved.dot(pose.direction()) / dt;
        self.state = VehicleState {
            x:     pose.position.x,
            y:     pose.position.y,
            psi:   pose.heading,
            v,
            accel: (v - prev.v) / dt,
            steer: 0.0,
        };
        active.index >= last
    }

    /// Hand the spot back once the rear axle is beyond the clearance radius.
    fn release_if_clear(&mut self, spot: SpotId, ctx: &mut AgentContext<'_>) {
        let Some(active) = self.current.as_mut() else {
            return;
        };
        if active.spot_released {
            return;
        }
        let clear = ctx
            .lot
            .spot(spot)
            .map(|s| s.center.distance(self.state.position()) > self.config.clearance_radius)
            .unwrap_or(true);
        if clear {
            ctx.occupancy.release(spot);
            active.spot_released = true;
            log::debug!("{} cleared {spot}", self.id);
        }
    }

    fn complete_current(&mut self, ctx: &mut AgentContext<'_>) {
        let Some(active) = self.current.take() else {
            return;
        };
        log::debug!("{} completed {} at t={:.1}", self.id, active.task.kind(), ctx.time);

        match active.task {
            Task::Cruise { .. } => {}
            Task::Park { spot } => {
                self.place_at_end(&active.path);
                ctx.occupancy.claim(spot);
            }
            Task::Unpark { spot } => {
                self.place_at_end(&active.path);
                if !active.spot_released {
                    ctx.occupancy.release(spot);
                }
            }
        }
    }

    fn place_at_end(&mut self, path: &ReferencePath) {
        if let Some(end) = path.last_pose() {
            self.state = VehicleState::at_pose(end);
        }
    }

    fn record_history(&mut self) {
        if self.history_len == 0 {
            return;
        }
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(self.state);
    }
}
