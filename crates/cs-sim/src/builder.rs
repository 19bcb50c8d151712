//! Fluent builder for constructing a [`Sim`].

use cs_core::{RequestKind, SimRng, SupportConfig};
use cs_schedule::Scheduler;

use crate::journey::JourneyDists;
use crate::{Sim, SimEvent, SimResult, SupportDesk};

/// One customer spawned at a fixed time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScriptedArrival {
    /// Minutes after the start of the run.
    pub at:   f64,
    /// Forces the request kind; `None` draws it as usual.
    pub kind: Option<RequestKind>,
}

impl ScriptedArrival {
    pub fn at(at: f64) -> Self {
        Self { at, kind: None }
    }

    pub fn with_kind(at: f64, kind: RequestKind) -> Self {
        Self { at, kind: Some(kind) }
    }
}

/// Where customers come from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Arrivals {
    /// Exponential inter-arrival gaps at `config.arrival_rate`, for the
    /// whole horizon.
    #[default]
    Poisson,
    /// Exactly these customers and no others.
    Scripted(Vec<ScriptedArrival>),
}

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                  |
/// |-----------------|------------------------------------------|
/// | `.seed(s)`      | `config.seed`, or `DEFAULT_SEED` if unset |
/// | `.arrivals(a)`  | `Arrivals::Poisson`                      |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .seed(7)
///     .arrivals(Arrivals::Scripted(vec![ScriptedArrival::at(0.0)]))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SupportConfig,
    seed:     Option<u64>,
    arrivals: Arrivals,
}

impl SimBuilder {
    pub fn new(config: SupportConfig) -> Self {
        Self { config, seed: None, arrivals: Arrivals::default() }
    }

    /// Override the seed; takes precedence over `config.seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn arrivals(mut self, arrivals: Arrivals) -> Self {
        self.arrivals = arrivals;
        self
    }

    /// Validate the configuration, create the pools and schedule the
    /// arrivals.  Fails with `SimError::Config` before anything runs.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let seed = self.seed.unwrap_or_else(|| self.config.effective_seed());
        let dists = JourneyDists::new(&self.config)?;
        let mut rng = SimRng::new(seed);
        let mut scheduler = Scheduler::new();

        match self.arrivals {
            Arrivals::Poisson => {
                let first = rng.sample(&dists.inter_arrival);
                scheduler.schedule(first, SimEvent::Arrival)?;
            }
            Arrivals::Scripted(script) => {
                for arrival in script {
                    scheduler.schedule(arrival.at, SimEvent::Scripted { kind: arrival.kind })?;
                }
            }
        }

        Ok(Sim {
            scheduler,
            desk: SupportDesk::new(self.config, rng, dists),
            seed,
            finished: false,
        })
    }
}
