//! Customer journey model: the per-customer state machine and the
//! process-engine primitives it suspends on.
//!
//! Every handler runs inside one scheduler callback and either finishes the
//! customer, or leaves it suspended on exactly one of:
//!
//! - `await_timer`: a `HoldElapsed` event (AI handling or human service);
//! - `await_grant`: a grant handed over by another customer's release;
//! - `await_race`: the same grant raced against a patience timer.
//!
//! Draw order per customer is fixed: kind, deflection, then either the AI
//! hold or (balk threshold, L1 patience, L1 service, escalation, L2
//! patience, L2 service) as far as the journey gets.

use cs_core::{
    CoreError, CustomerId, QueueDiscipline, RequestKind, SimTime, SupportConfig, Tier,
};
use cs_resource::{
    Grant, RaceStart, ResourcePool, Served, WaitStart, start_race, start_wait,
};
use cs_schedule::Scheduler;
use rand::distributions::Uniform;
use rand_distr::Exp;
use tracing::debug;

use crate::process::Suspension;
use crate::{
    Customer, JourneyEventKind, JourneyRecord, JourneyState, Outcome, SimError, SimEvent,
    SimObserver, SimResult, SupportDesk,
};

// ── Distributions ─────────────────────────────────────────────────────────────

/// Every distribution a run draws from, built once from the config.
#[derive(Clone, Debug)]
pub(crate) struct JourneyDists {
    pub inter_arrival: Exp<f64>,
    ai:                Exp<f64>,
    l1:                Exp<f64>,
    l2:                Exp<f64>,
    l1_patience:       Uniform<f64>,
    l2_patience:       Uniform<f64>,
    balk:              Uniform<u32>,
}

fn exp(what: &'static str, rate: f64) -> SimResult<Exp<f64>> {
    Exp::new(rate).map_err(|_| SimError::Config(CoreError::Distribution { what, value: rate }))
}

impl JourneyDists {
    /// `config` must already be validated: the uniform ranges are not
    /// re-checked here.
    pub fn new(config: &SupportConfig) -> SimResult<Self> {
        let svc = &config.service;
        Ok(Self {
            inter_arrival: exp("arrival_rate", config.arrival_rate)?,
            ai:            exp("service.ai_mean", 1.0 / svc.ai_mean)?,
            l1:            exp("service.l1_mean", 1.0 / svc.l1_mean)?,
            l2:            exp("service.l2_mean", 1.0 / svc.l2_mean)?,
            l1_patience:   Uniform::new_inclusive(config.l1_patience.min, config.l1_patience.max),
            l2_patience:   Uniform::new_inclusive(config.l2_patience.min, config.l2_patience.max),
            balk:          Uniform::new_inclusive(config.balk_threshold.min, config.balk_threshold.max),
        })
    }

    fn service(&self, tier: Tier) -> &Exp<f64> {
        match tier {
            Tier::L1 => &self.l1,
            Tier::L2 => &self.l2,
        }
    }

    fn patience(&self, tier: Tier) -> &Uniform<f64> {
        match tier {
            Tier::L1 => &self.l1_patience,
            Tier::L2 => &self.l2_patience,
        }
    }
}

// ── Process-engine primitives ─────────────────────────────────────────────────

/// Suspend `customer` for `minutes`; it resumes on `HoldElapsed`.
fn await_timer(sched: &mut Scheduler<SimEvent>, customer: CustomerId, minutes: f64) -> SimResult<()> {
    sched.schedule(minutes, SimEvent::HoldElapsed(customer))?;
    Ok(())
}

/// Ask `pool` for a server with no deadline.
///
/// Returns the service when a server was free; otherwise the customer is
/// left suspended until a release hands it one.
fn await_grant(now: SimTime, pool: &mut ResourcePool, customer: &mut Customer) -> Option<Served> {
    match start_wait(pool, customer.id, now) {
        WaitStart::Served(served) => Some(served),
        WaitStart::Pending(wait) => {
            customer.suspension = Some(Suspension::Grant(wait));
            None
        }
    }
}

/// Ask `pool` for a server, racing the request against `patience` minutes.
fn await_race(
    sched:    &mut Scheduler<SimEvent>,
    pool:     &mut ResourcePool,
    customer: &mut Customer,
    patience: f64,
) -> SimResult<Option<Served>> {
    let id = customer.id;
    match start_race(pool, sched, id, patience, SimEvent::PatienceExpired(id))? {
        RaceStart::Served(served) => Ok(Some(served)),
        RaceStart::Pending(race) => {
            customer.suspension = Some(Suspension::Race(race));
            Ok(None)
        }
    }
}

fn unexpected(customer: CustomerId, state: JourneyState, event: SimEvent) -> SimError {
    SimError::UnexpectedWake { customer, state, event: event.name() }
}

fn emit<O: SimObserver>(observer: &mut O, time: SimTime, customer: CustomerId, kind: JourneyEventKind) {
    debug!(time = time.0, customer = customer.0, event = %kind, "journey");
    observer.on_journey_event(&JourneyRecord { time, customer, kind });
}

// ── State machine ─────────────────────────────────────────────────────────────

impl SupportDesk {
    /// Resume whatever process `event` belongs to.
    pub(crate) fn dispatch<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        event:    SimEvent,
        observer: &mut O,
    ) -> SimResult<()> {
        match event {
            SimEvent::Arrival => {
                self.spawn(sched, None)?;
                let gap = self.rng.sample(&self.dists.inter_arrival);
                sched.schedule(gap, SimEvent::Arrival)?;
                Ok(())
            }
            SimEvent::Scripted { kind }  => self.spawn(sched, kind),
            SimEvent::Start(id)          => self.start(sched, id, observer),
            SimEvent::HoldElapsed(id)    => self.on_hold_elapsed(sched, id, observer),
            SimEvent::Granted(id)        => self.on_granted(sched, id, observer),
            SimEvent::PatienceExpired(id) => self.on_patience_expired(sched, id),
            SimEvent::RenegeCommit(id)   => self.on_renege_commit(sched, id, observer),
        }
    }

    fn spawn(&mut self, sched: &mut Scheduler<SimEvent>, forced: Option<RequestKind>) -> SimResult<()> {
        let id = self.processes.spawn(sched.now(), forced);
        self.stats.record_arrival();
        sched.schedule(0.0, SimEvent::Start(id))?;
        Ok(())
    }

    fn start<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        let customer = self.processes.get_mut(id)?;
        if customer.state != JourneyState::Arrived {
            return Err(unexpected(id, customer.state, SimEvent::Start(id)));
        }
        emit(observer, now, id, JourneyEventKind::Arrived);

        customer.state = JourneyState::Classifying;
        let kind = match customer.forced_kind {
            Some(kind) => kind,
            None => RequestKind::ALL[self.rng.gen_range(0..RequestKind::ALL.len())],
        };
        customer.kind = Some(kind);
        emit(observer, now, id, JourneyEventKind::Classified(kind));

        let u: f64 = self.rng.random();
        if u < self.config.deflection_rates.for_kind(kind) {
            customer.state = JourneyState::AiResolving;
            let hold = self.rng.sample(&self.dists.ai);
            return await_timer(sched, id, hold);
        }

        customer.state = JourneyState::CheckingBalk;
        self.enter_l1(sched, id, observer)
    }

    fn enter_l1<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        observer: &mut O,
    ) -> SimResult<()> {
        if self.config.discipline == QueueDiscipline::Impatient {
            let queued = self.pools.l1.queue_length();
            let threshold = self.rng.sample(&self.dists.balk) as usize;
            if queued >= threshold {
                emit(observer, sched.now(), id, JourneyEventKind::Balked);
                return self.finish(id, Outcome::Balked);
            }
        }
        self.join_queue(sched, id, Tier::L1, observer)
    }

    fn join_queue<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        tier:     Tier,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        emit(observer, now, id, JourneyEventKind::Queued(tier));

        let pool = self.pools.get_mut(tier);
        let customer = self.processes.get_mut(id)?;
        customer.state = JourneyState::Waiting(tier);
        let served = match self.config.discipline {
            QueueDiscipline::Impatient => {
                let patience = self.rng.sample(self.dists.patience(tier));
                await_race(sched, pool, customer, patience)?
            }
            QueueDiscipline::Patient => await_grant(now, pool, customer),
        };

        match served {
            Some(served) => {
                customer.staged.stage_wait(tier, served.wait);
                customer.held = Some(served.request);
                self.begin_service(sched, id, tier, observer)
            }
            None => Ok(()),
        }
    }

    fn begin_service<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        tier:     Tier,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        let customer = self.processes.get_mut(id)?;
        customer.state = JourneyState::Serving(tier);
        customer.service_started = now;
        emit(observer, now, id, JourneyEventKind::Started(tier));

        let hold = self.rng.sample(self.dists.service(tier));
        await_timer(sched, id, hold)
    }

    fn on_hold_elapsed<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        observer: &mut O,
    ) -> SimResult<()> {
        let state = self.processes.get_mut(id)?.state;
        match state {
            JourneyState::AiResolving => {
                emit(observer, sched.now(), id, JourneyEventKind::ResolvedByAi);
                self.finish(id, Outcome::AiResolved)
            }
            JourneyState::Serving(tier) => self.end_service(sched, id, tier, observer),
            state => Err(unexpected(id, state, SimEvent::HoldElapsed(id))),
        }
    }

    /// Service finished: record it, free the server, then resolve or escalate.
    fn end_service<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        tier:     Tier,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        let customer = self.processes.get_mut(id)?;
        let Some(request) = customer.held.take() else {
            return Err(unexpected(id, customer.state, SimEvent::HoldElapsed(id)));
        };
        customer.staged.stage_service(tier, now.since(customer.service_started));
        let kind = customer.kind;

        if let Some(grant) = self.pools.get_mut(tier).release(request, now)? {
            self.hand_over(sched, tier, grant)?;
        }

        if tier == Tier::L1 && kind == Some(RequestKind::Complex) {
            let u: f64 = self.rng.random();
            if u < self.config.escalation_probability {
                emit(observer, now, id, JourneyEventKind::Escalated);
                return self.join_queue(sched, id, Tier::L2, observer);
            }
        }
        emit(observer, now, id, JourneyEventKind::Resolved(tier));
        self.finish(id, Outcome::resolved(tier))
    }

    /// The pool granted `grant` to a queued customer on release.  Settle its
    /// wait now (so a patience timer due this instant cannot win) and resume
    /// it through a zero-delay event.
    fn hand_over(&mut self, sched: &mut Scheduler<SimEvent>, tier: Tier, grant: Grant) -> SimResult<()> {
        let next = self.processes.get_mut(grant.customer)?;
        let served = match next.suspension.take() {
            Some(Suspension::Race(race)) => race.granted(sched, &grant),
            Some(Suspension::Grant(wait)) => wait.granted(&grant),
            None => return Err(unexpected(next.id, next.state, SimEvent::Granted(next.id))),
        };
        next.staged.stage_wait(tier, served.wait);
        next.held = Some(served.request);
        sched.schedule(0.0, SimEvent::Granted(grant.customer))?;
        Ok(())
    }

    fn on_granted<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        observer: &mut O,
    ) -> SimResult<()> {
        let customer = self.processes.get_mut(id)?;
        let (state, holding) = (customer.state, customer.held.is_some());
        match state {
            JourneyState::Waiting(tier) if holding => {
                self.begin_service(sched, id, tier, observer)
            }
            state => Err(unexpected(id, state, SimEvent::Granted(id))),
        }
    }

    fn on_patience_expired(&mut self, sched: &mut Scheduler<SimEvent>, id: CustomerId) -> SimResult<()> {
        let customer = self.processes.get_mut(id)?;
        let state = customer.state;
        let Some(Suspension::Race(race)) = customer.suspension.as_mut() else {
            return Err(unexpected(id, state, SimEvent::PatienceExpired(id)));
        };
        race.expire(sched, SimEvent::RenegeCommit(id))?;
        Ok(())
    }

    fn on_renege_commit<O: SimObserver>(
        &mut self,
        sched:    &mut Scheduler<SimEvent>,
        id:       CustomerId,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = sched.now();
        let customer = self.processes.get_mut(id)?;
        let state = customer.state;
        let (JourneyState::Waiting(tier), Some(Suspension::Race(race))) = (state, customer.suspension.take())
        else {
            return Err(unexpected(id, state, SimEvent::RenegeCommit(id)));
        };
        let reneged = race.renege(self.pools.get_mut(tier), now)?;
        debug!(customer = id.0, tier = %tier, waited = reneged.waited, "renege committed");

        emit(observer, now, id, JourneyEventKind::Reneged(tier));
        self.finish(id, Outcome::reneged(tier))
    }

    /// Retire a process and commit its samples.
    fn finish(&mut self, id: CustomerId, outcome: Outcome) -> SimResult<()> {
        let customer = self.processes.remove(id)?;
        self.stats.record_outcome(outcome, customer.staged);
        Ok(())
    }
}
