//! Unit tests for cs-resource.

use cs_core::{CustomerId, SimTime, Tier};
use cs_schedule::Scheduler;

use crate::{RaceStart, RequestState, ResourceError, ResourcePool};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pool(capacity: usize) -> ResourcePool {
    ResourcePool::new(Tier::L1, capacity)
}

fn assert_invariants(p: &ResourcePool) {
    assert!(p.granted_count() <= p.capacity(), "granted {} > capacity {}", p.granted_count(), p.capacity());
}

/// Timer payloads used by the race tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ev {
    Patience,
    Commit,
    Release,
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod resource_pool {
    use super::*;

    #[test]
    fn grants_until_capacity_then_queues() {
        let mut p = pool(2);
        let a = p.acquire(CustomerId(0), SimTime::ZERO);
        let b = p.acquire(CustomerId(1), SimTime::ZERO);
        let c = p.acquire(CustomerId(2), SimTime::ZERO);
        assert_eq!(a.state, RequestState::Granted);
        assert_eq!(b.state, RequestState::Granted);
        assert_eq!(c.state, RequestState::Queued);
        assert_eq!(p.granted_count(), 2);
        assert_eq!(p.queue_length(), 1);
        assert_invariants(&p);
    }

    #[test]
    fn release_hands_over_to_queue_head_at_same_instant() {
        let mut p = pool(1);
        let first = p.acquire(CustomerId(0), SimTime(0.0));
        let second = p.acquire(CustomerId(1), SimTime(1.0));
        let third = p.acquire(CustomerId(2), SimTime(2.0));

        let grant = p.release(first.id, SimTime(6.5)).unwrap().expect("queue was not empty");
        assert_eq!(grant.request, second.id, "FIFO: head of queue goes first");
        assert_eq!(grant.customer, CustomerId(1));
        assert_eq!(grant.granted_at, SimTime(6.5));
        assert_eq!(grant.wait(), 5.5, "wait ends exactly at the release instant");
        assert_eq!(p.state(second.id), Some(RequestState::Granted));
        assert_eq!(p.state(third.id), Some(RequestState::Queued));
        assert_eq!(p.granted_count(), 1, "no service gap");
        assert_eq!(p.queue_length(), 1);
    }

    #[test]
    fn release_with_empty_queue_frees_capacity() {
        let mut p = pool(1);
        let r = p.acquire(CustomerId(0), SimTime::ZERO);
        assert_eq!(p.release(r.id, SimTime(1.0)).unwrap(), None);
        assert_eq!(p.granted_count(), 0);
        assert_eq!(p.state(r.id), None);
    }

    #[test]
    fn releasing_a_queued_or_unknown_request_fails() {
        let mut p = pool(1);
        let _held = p.acquire(CustomerId(0), SimTime::ZERO);
        let queued = p.acquire(CustomerId(1), SimTime::ZERO);
        assert!(matches!(p.release(queued.id, SimTime::ZERO), Err(ResourceError::NotGranted { .. })));

        let released = p.acquire(CustomerId(2), SimTime::ZERO);
        p.cancel(released.id).unwrap();
        assert!(matches!(p.release(released.id, SimTime::ZERO), Err(ResourceError::UnknownRequest { .. })));
    }

    #[test]
    fn cancel_removes_exactly_one_queued_request() {
        let mut p = pool(1);
        let _held = p.acquire(CustomerId(0), SimTime::ZERO);
        let a = p.acquire(CustomerId(1), SimTime::ZERO);
        let b = p.acquire(CustomerId(2), SimTime::ZERO);
        assert_eq!(p.queue_length(), 2);

        let cancelled = p.cancel(a.id).unwrap();
        assert_eq!(cancelled.state, RequestState::Cancelled);
        assert_eq!(p.queue_length(), 1);
        assert_eq!(p.granted_count(), 1, "cancel never changes granted count");
        assert_eq!(p.state(b.id), Some(RequestState::Queued));
    }

    #[test]
    fn cancelling_a_granted_request_is_rejected() {
        let mut p = pool(1);
        let held = p.acquire(CustomerId(0), SimTime::ZERO);
        assert_eq!(
            p.cancel(held.id),
            Err(ResourceError::InvalidCancel { tier: Tier::L1, request: held.id }),
        );
        assert_eq!(p.granted_count(), 1);
    }

    #[test]
    fn queue_length_has_no_side_effects() {
        let mut p = pool(1);
        p.acquire(CustomerId(0), SimTime::ZERO);
        p.acquire(CustomerId(1), SimTime::ZERO);
        for _ in 0..3 {
            assert_eq!(p.queue_length(), 1);
        }
        assert_eq!(p.peak_queue_length(), 1);
    }

    #[test]
    fn churn_keeps_invariants() {
        let mut p = pool(3);
        let mut held = Vec::new();
        for i in 0..10 {
            let r = p.acquire(CustomerId(i), SimTime(i as f64));
            if r.state == RequestState::Granted {
                held.push(r.id);
            }
            assert_invariants(&p);
        }
        assert_eq!(p.queue_length(), 7);
        while let Some(id) = held.pop() {
            if let Some(grant) = p.release(id, SimTime(20.0)).unwrap() {
                held.push(grant.request);
            }
            assert_invariants(&p);
        }
        assert_eq!(p.granted_count(), 0);
        assert_eq!(p.queue_length(), 0);
    }
}

// ── Race combinator ───────────────────────────────────────────────────────────

#[cfg(test)]
mod race {
    use super::*;
    use crate::{PendingRace, WaitStart, start_race, start_wait};

    fn pending(start: RaceStart) -> PendingRace {
        match start {
            RaceStart::Pending(r) => r,
            RaceStart::Served(s) => panic!("expected a queued race, got {s:?}"),
        }
    }

    #[test]
    fn free_server_serves_immediately_and_leaves_no_timer() {
        let mut p = pool(1);
        let mut s: Scheduler<Ev> = Scheduler::new();
        match start_race(&mut p, &mut s, CustomerId(0), 3.0, Ev::Patience).unwrap() {
            RaceStart::Served(served) => assert_eq!(served.wait, 0.0),
            RaceStart::Pending(_) => panic!("server was free"),
        }
        assert!(s.is_empty(), "patience timer must be cleaned up");
    }

    #[test]
    fn grant_before_deadline_cancels_timer() {
        let mut p = pool(1);
        let mut s: Scheduler<Ev> = Scheduler::new();
        let held = p.acquire(CustomerId(0), SimTime::ZERO);
        let race = pending(start_race(&mut p, &mut s, CustomerId(1), 5.0, Ev::Patience).unwrap());
        assert_eq!(race.deadline(), SimTime(5.0));
        s.schedule(2.0, Ev::Release).unwrap();

        let mut race = Some(race);
        let mut served = None;
        s.run(SimTime(10.0), |sched, _h, ev| {
            match ev {
                Ev::Release => {
                    let grant = p.release(held.id, sched.now())?.expect("customer 1 is queued");
                    let r = race.take().expect("race still pending");
                    served = Some(r.granted(sched, &grant));
                }
                other => panic!("unexpected event {other:?}"),
            }
            Ok::<(), ResourceError>(())
        })
        .unwrap();

        let served = served.expect("grant won");
        assert_eq!(served.wait, 2.0);
        assert!(s.is_empty());
    }

    #[test]
    fn deadline_before_grant_reneges() {
        let mut p = pool(1);
        let mut s: Scheduler<Ev> = Scheduler::new();
        let _held = p.acquire(CustomerId(0), SimTime::ZERO);
        let mut race = Some(pending(start_race(&mut p, &mut s, CustomerId(1), 3.0, Ev::Patience).unwrap()));
        assert_eq!(p.queue_length(), 1);

        let mut reneged = None;
        s.run(SimTime(10.0), |sched, _h, ev| {
            match ev {
                Ev::Patience => race.as_mut().expect("pending").expire(sched, Ev::Commit)?,
                Ev::Commit => {
                    let r = race.take().expect("pending");
                    reneged = Some(r.renege(&mut p, sched.now())?);
                }
                Ev::Release => unreachable!(),
            }
            Ok::<(), ResourceError>(())
        })
        .unwrap();

        let reneged = reneged.expect("patience ran out");
        assert_eq!(reneged.waited, 3.0);
        assert_eq!(p.queue_length(), 0, "renege removes the queued request");
        assert_eq!(p.granted_count(), 1, "renege never touches granted count");
    }

    #[test]
    fn same_instant_tie_goes_to_the_grant() {
        // Timer is scheduled *before* the release at the same instant, so it
        // fires first; the deferred commit still lets the release win.
        let mut p = pool(1);
        let mut s: Scheduler<Ev> = Scheduler::new();
        let held = p.acquire(CustomerId(0), SimTime::ZERO);
        let mut race = Some(pending(start_race(&mut p, &mut s, CustomerId(1), 4.0, Ev::Patience).unwrap()));
        s.schedule(4.0, Ev::Release).unwrap();

        let mut order = Vec::new();
        let mut served = None;
        s.run(SimTime(10.0), |sched, _h, ev| {
            order.push(ev);
            match ev {
                Ev::Patience => {
                    let r = race.as_mut().expect("pending");
                    r.expire(sched, Ev::Commit)?;
                    assert!(r.is_expiring());
                }
                Ev::Release => {
                    let grant = p.release(held.id, sched.now())?.expect("queued");
                    served = Some(race.take().expect("pending").granted(sched, &grant));
                }
                Ev::Commit => panic!("commit must have been cancelled"),
            }
            Ok::<(), ResourceError>(())
        })
        .unwrap();

        assert_eq!(order, vec![Ev::Patience, Ev::Release]);
        assert_eq!(served.expect("grant wins the tie").wait, 4.0);
        assert!(s.is_empty(), "commit was cleaned up");
    }

    #[test]
    fn expire_twice_is_noop() {
        let mut p = pool(1);
        let mut s: Scheduler<Ev> = Scheduler::new();
        p.acquire(CustomerId(0), SimTime::ZERO);
        let mut race = pending(start_race(&mut p, &mut s, CustomerId(1), 1.0, Ev::Patience).unwrap());
        race.expire(&mut s, Ev::Commit).unwrap();
        race.expire(&mut s, Ev::Commit).unwrap();
        // Patience timer + one commit.
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn negative_patience_fails_before_acquire() {
        let mut p = pool(0);
        let mut s: Scheduler<Ev> = Scheduler::new();
        let err = start_race(&mut p, &mut s, CustomerId(0), -1.0, Ev::Patience).unwrap_err();
        assert!(matches!(err, ResourceError::Schedule(_)));
        assert_eq!(p.queue_length(), 0, "no dangling request");
    }

    #[test]
    fn renege_after_grant_is_invalid_cancel() {
        let mut p = pool(1);
        let mut s: Scheduler<Ev> = Scheduler::new();
        let held = p.acquire(CustomerId(0), SimTime::ZERO);
        let race = pending(start_race(&mut p, &mut s, CustomerId(1), 1.0, Ev::Patience).unwrap());
        p.release(held.id, SimTime::ZERO).unwrap();
        assert!(matches!(
            race.renege(&mut p, SimTime::ZERO),
            Err(ResourceError::InvalidCancel { .. }),
        ));
    }

    #[test]
    fn plain_wait_has_no_deadline() {
        let mut p = pool(1);
        let held = p.acquire(CustomerId(0), SimTime::ZERO);
        let WaitStart::Pending(wait) = start_wait(&mut p, CustomerId(1), SimTime(1.0)) else {
            panic!("server was busy");
        };
        let grant = p.release(held.id, SimTime(30.0)).unwrap().expect("queued");
        assert_eq!(wait.granted(&grant).wait, 29.0);
    }
}
