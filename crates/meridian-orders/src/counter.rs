//! # Bill Counter
//!
//! Process-wide allocator of `PPP-NNN` bill numbers.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillCounter::new(timeout)          state = 001-000                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  initialize(store, tenant)  ── runs at most once ──┐                    │
//! │       │                                            │                    │
//! │       │  latest_bill_number(tenant) within timeout │                    │
//! │       │   ├── "012-998"      → Recovered, state = 012-998               │
//! │       │   ├── none           → Fresh,     state stays 001-000           │
//! │       │   └── error/timeout/ → Degraded,  state stays 001-000 (warn)    │
//! │       │       malformed                                                 │
//! │       ▼                                                                 │
//! │  next()  ── lock ── state = successor(state) ── unlock ──► "012-999"    │
//! │  next()                                                   ► "013-001"   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `next` never touches the store and cannot fail. Uniqueness holds within
//! one process only; two processes sharing a database can issue the same
//! number.
//!
//! Recovery reads the order with the greatest `created_at`, so orders must
//! be stamped with [`BillCounter::next_stamped`]: the number and the
//! timestamp are taken under the same lock and the timestamps strictly
//! increase, keeping `created_at` order equal to bill-number order.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use meridian_core::BillNumber;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::InitFailure;
use crate::store::OrderStore;

/// Default bound on the startup query.
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_millis(3000);

/// How the counter's starting position was determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterStart {
    /// Continued from the tenant's latest stored bill number.
    Recovered { last: BillNumber },
    /// The tenant has no prior bill number; starting from `001-000`.
    Fresh,
    /// The store could not tell us; starting from `001-000`.
    Degraded(InitFailure),
}

impl CounterStart {
    /// The last-issued position the counter resumes from.
    pub fn resume_from(&self) -> BillNumber {
        match self {
            CounterStart::Recovered { last } => *last,
            CounterStart::Fresh | CounterStart::Degraded(_) => BillNumber::INITIAL,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CounterState {
    last_issued: BillNumber,
    last_stamp: Option<DateTime<Utc>>,
}

impl CounterState {
    fn at(last_issued: BillNumber) -> Self {
        CounterState {
            last_issued,
            last_stamp: None,
        }
    }
}

/// Shared, thread-safe bill number allocator.
///
/// Share one instance per process behind an `Arc`.
#[derive(Debug)]
pub struct BillCounter {
    state: Mutex<CounterState>,
    start: OnceCell<CounterStart>,
    init_timeout: Duration,
}

impl Default for BillCounter {
    fn default() -> Self {
        Self::new(DEFAULT_INIT_TIMEOUT)
    }
}

impl BillCounter {
    /// Creates an uninitialized counter at `001-000`.
    pub fn new(init_timeout: Duration) -> Self {
        BillCounter {
            state: Mutex::new(CounterState::at(BillNumber::INITIAL)),
            start: OnceCell::new(),
            init_timeout,
        }
    }

    /// Creates a counter that resumes after `last` without consulting a store.
    ///
    /// A later [`BillCounter::initialize`] is a no-op.
    pub fn starting_at(last: BillNumber) -> Self {
        BillCounter {
            state: Mutex::new(CounterState::at(last)),
            start: OnceCell::new_with(Some(CounterStart::Recovered { last })),
            init_timeout: DEFAULT_INIT_TIMEOUT,
        }
    }

    /// Lock the state, recovering from poisoning.
    ///
    /// The guarded value is plain `Copy` data that is always valid.
    fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds the counter from the tenant's latest stored bill number.
    ///
    /// Only the first call queries the store; concurrent and later callers
    /// wait for and receive that same outcome. Never fails: store errors,
    /// timeouts and malformed values are logged and the counter starts
    /// from `001-000`.
    pub async fn initialize<S>(&self, store: &S, tenant_id: &str) -> CounterStart
    where
        S: OrderStore,
    {
        self.start
            .get_or_init(|| async {
                let start = self.query_start(store, tenant_id).await;
                self.apply_start(&start, tenant_id);
                start
            })
            .await
            .clone()
    }

    async fn query_start<S>(&self, store: &S, tenant_id: &str) -> CounterStart
    where
        S: OrderStore,
    {
        debug!(tenant_id = %tenant_id, timeout = ?self.init_timeout, "Querying latest bill number");

        let latest = match tokio::time::timeout(self.init_timeout, store.latest_bill_number(tenant_id)).await {
            Err(_) => return CounterStart::Degraded(InitFailure::Timeout(self.init_timeout)),
            Ok(Err(e)) => return CounterStart::Degraded(InitFailure::Store(e.to_string())),
            Ok(Ok(latest)) => latest,
        };

        match latest {
            None => CounterStart::Fresh,
            Some(raw) => match raw.parse::<BillNumber>() {
                Ok(last) => CounterStart::Recovered { last },
                Err(reason) => CounterStart::Degraded(InitFailure::Malformed { value: raw, reason }),
            },
        }
    }

    fn apply_start(&self, start: &CounterStart, tenant_id: &str) {
        match start {
            CounterStart::Recovered { last } => {
                let mut state = self.lock();
                // Numbers handed out before initialization must not be reissued
                if *last > state.last_issued {
                    state.last_issued = *last;
                }
                info!(tenant_id = %tenant_id, last = %last, "Bill counter recovered");
            }
            CounterStart::Fresh => {
                info!(tenant_id = %tenant_id, "No prior bill number, starting from 001-001");
            }
            CounterStart::Degraded(failure) => {
                warn!(
                    tenant_id = %tenant_id,
                    error = %failure,
                    "Bill counter starting from 001-001"
                );
            }
        }
    }

    /// Issues the next bill number.
    ///
    /// Each call returns a value no other call in this process has
    /// returned, greater than every earlier one. Works before and without
    /// initialization.
    pub fn next(&self) -> String {
        self.next_number().to_string()
    }

    /// Typed form of [`BillCounter::next`].
    pub fn next_number(&self) -> BillNumber {
        let issued = {
            let mut state = self.lock();
            state.last_issued = state.last_issued.successor();
            state.last_issued
        };
        debug!(bill_number = %issued, "Bill number issued");
        issued
    }

    /// Issues the next bill number together with its creation timestamp.
    ///
    /// Across calls on one counter, a greater number always carries a
    /// strictly later timestamp.
    pub fn next_stamped(&self) -> (BillNumber, DateTime<Utc>) {
        let (issued, stamp) = {
            let mut state = self.lock();
            let mut stamp = Utc::now();
            if let Some(previous) = state.last_stamp {
                if stamp <= previous {
                    stamp = previous + chrono::Duration::nanoseconds(1);
                }
            }
            state.last_issued = state.last_issued.successor();
            state.last_stamp = Some(stamp);
            (state.last_issued, stamp)
        };
        debug!(bill_number = %issued, created_at = %stamp, "Bill number issued");
        (issued, stamp)
    }

    /// The most recently issued number, or the recovered starting point.
    pub fn current(&self) -> BillNumber {
        self.lock().last_issued
    }

    /// Outcome of initialization, if it has completed.
    pub fn start(&self) -> Option<&CounterStart> {
        self.start.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.start.initialized()
    }
}
