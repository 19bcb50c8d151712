//! Unit tests for cs-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CustomerId, RequestId};

    #[test]
    fn sequential_allocation() {
        let first = CustomerId::FIRST;
        assert_eq!(first.index(), 0);
        assert_eq!(first.next(), CustomerId(1));
        assert_eq!(first.next().next().index(), 2);
    }

    #[test]
    fn ordering_follows_creation() {
        assert!(RequestId(0) < RequestId(1));
        assert!(CustomerId(100) > CustomerId(99));
    }

    #[test]
    fn display() {
        assert_eq!(CustomerId(7).to_string(), "CustomerId(7)");
        assert_eq!(RequestId(3).to_string(), "RequestId(3)");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimTime};

    #[test]
    fn time_arithmetic() {
        let t = SimTime(10.0);
        assert_eq!(t + 2.5, SimTime(12.5));
        assert_eq!(t.offset(0.0), t);
        assert_eq!(SimTime(15.0) - SimTime(10.0), 5.0);
        assert_eq!(SimTime(15.0).since(SimTime(4.0)), 11.0);
    }

    #[test]
    fn total_order_usable_as_key() {
        let mut v = vec![SimTime(3.0), SimTime(0.5), SimTime(2.0)];
        v.sort();
        assert_eq!(v, vec![SimTime(0.5), SimTime(2.0), SimTime(3.0)]);
        assert!(SimTime::ZERO < SimTime(1e-12));
    }

    #[test]
    fn clock_is_monotonic() {
        let mut clock = SimClock::new();
        assert!(clock.advance_to(SimTime(5.0)));
        assert!(!clock.advance_to(SimTime(4.0)), "moving backwards must be refused");
        assert_eq!(clock.now(), SimTime(5.0));
        assert!(clock.advance_to(SimTime(5.0)), "same instant is allowed");
    }
}

#[cfg(test)]
mod rng {
    use rand_distr::Exp;

    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn derived_seeds_differ() {
        let a = SimRng::derive_seed(1, 0);
        let b = SimRng::derive_seed(1, 1);
        assert_ne!(a, b, "seeds for adjacent runs should diverge");
        assert_eq!(SimRng::derive_seed(9, 0), 9);
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(2.0f64..=5.0);
            assert!((2.0..=5.0).contains(&v));
            let k = rng.gen_range(1u32..=3);
            assert!((1..=3).contains(&k));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn exponential_samples_are_positive_with_plausible_mean() {
        let mut rng = SimRng::new(7);
        let exp = Exp::new(1.0 / 7.0).unwrap();
        let n = 20_000;
        let total: f64 = (0..n).map(|_| rng.sample(&exp)).sum();
        let mean = total / n as f64;
        assert!((mean - 7.0).abs() < 0.3, "got mean {mean}");
    }
}

#[cfg(test)]
mod kind {
    use crate::{RequestKind, Tier};

    #[test]
    fn display() {
        assert_eq!(RequestKind::Simple.to_string(), "simple");
        assert_eq!(RequestKind::Complex.to_string(), "complex");
        assert_eq!(Tier::L2.to_string(), "L2");
    }
}

#[cfg(test)]
mod config {
    use crate::{BalkRange, CoreError, PatienceRange, SupportConfig, Tier, DEFAULT_SEED};

    #[test]
    fn defaults_are_valid() {
        let cfg = SupportConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.effective_seed(), DEFAULT_SEED);
        assert_eq!(cfg.capacity(Tier::L1), 5);
        assert_eq!(cfg.patience(Tier::L2), PatienceRange::new(3.0, 7.0));
    }

    #[test]
    fn zero_capacity_rejected() {
        let cfg = SupportConfig { l2_capacity: 0, ..SupportConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn probability_out_of_range_rejected() {
        let mut cfg = SupportConfig::default();
        cfg.deflection_rates.complex = 1.5;
        assert!(cfg.validate().is_err());

        let cfg = SupportConfig { escalation_probability: -0.1, ..SupportConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_rate_or_horizon_rejected() {
        for cfg in [
            SupportConfig { horizon: 0.0, ..SupportConfig::default() },
            SupportConfig { arrival_rate: -1.0, ..SupportConfig::default() },
            SupportConfig { arrival_rate: f64::NAN, ..SupportConfig::default() },
            SupportConfig { horizon: f64::INFINITY, ..SupportConfig::default() },
        ] {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn inverted_ranges_rejected() {
        let cfg = SupportConfig {
            l1_patience: PatienceRange::new(5.0, 2.0),
            ..SupportConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SupportConfig {
            balk_threshold: BalkRange { min: 0, max: 3 },
            ..SupportConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn degenerate_ranges_allowed() {
        let cfg = SupportConfig {
            l1_patience:    PatienceRange::new(4.0, 4.0),
            balk_threshold: BalkRange { min: 2, max: 2 },
            ..SupportConfig::default()
        };
        cfg.validate().unwrap();
    }
}
