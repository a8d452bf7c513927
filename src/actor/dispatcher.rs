//! Dispatcher: moves log operations from any thread onto the designated one.
//!
//! Producers push onto an unbounded channel and return at once. The first
//! push that finds the dispatcher idle wakes the designated thread; later
//! pushes ride along with the drain that is already scheduled or running.
//!
//! # State machine
//!
//! ```text
//!          submit (CAS wins)         drain starts
//!   Idle ───────────────────▶ Scheduled ─────────▶ Draining
//!    ▲                                                │
//!    └──────────────── queue observed empty ──────────┘
//! ```
//!
//! After storing `Idle` the drain looks at the queue once more. If an
//! operation slipped in before a producer could observe `Idle`, the drain
//! takes `Idle → Draining` itself and keeps going. If a producer got there
//! first, that producer has already woken the designated thread.

use super::messages::PendingOperation;
use crate::sink::DisplaySink;
use crate::surface::Surface;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::fmt;
use std::sync::atomic::{self, AtomicU8, Ordering};
use std::sync::Arc;

/// Dispatcher lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DispatchState {
    /// Nothing queued, no drain pending.
    Idle = 0,
    /// A drain has been requested from the designated thread.
    Scheduled = 1,
    /// The designated thread is applying operations.
    Draining = 2,
}

impl DispatchState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Scheduled,
            2 => Self::Draining,
            _ => Self::Idle,
        }
    }
}

/// Shared atomic holding a [`DispatchState`].
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    const fn new() -> Self {
        Self(AtomicU8::new(DispatchState::Idle as u8))
    }

    fn load(&self) -> DispatchState {
        DispatchState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn store(&self, state: DispatchState) {
        self.0.store(state as u8, Ordering::Release);
    }

    fn transition(&self, from: DispatchState, to: DispatchState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Schedules a drain on the designated thread.
///
/// Called from producer threads, at most once per `Idle → Scheduled`
/// transition. Must not block.
pub trait Waker: Send + Sync {
    /// Request that the designated thread run a drain.
    fn wake(&self);
}

impl<F: Fn() + Send + Sync> Waker for F {
    fn wake(&self) {
        self();
    }
}

/// Thread-safe entry point for log operations.
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Clone)]
pub struct Dispatcher {
    /// Producer end of the operation queue.
    queue: Sender<PendingOperation>,
    /// Shared lifecycle state.
    state: Arc<StateCell>,
    /// Wakes the designated thread.
    waker: Arc<dyn Waker>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("state", &self.state.load())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher and the drain that consumes it.
    ///
    /// The [`Drain`] belongs on the designated thread.
    pub fn new(waker: impl Waker + 'static) -> (Self, Drain) {
        let (queue, rx) = unbounded();
        let state = Arc::new(StateCell::new());

        let dispatcher = Self {
            queue,
            state: Arc::clone(&state),
            waker: Arc::new(waker),
        };
        let drain = Drain { queue: rx, state };

        (dispatcher, drain)
    }

    /// Queue an operation. Never blocks.
    ///
    /// If the designated side is gone the operation is dropped.
    pub fn submit(&self, op: impl Into<PendingOperation>) {
        let op = op.into();
        tracing::trace!(kind = op.kind(), "submit");

        if self.queue.send(op).is_err() {
            tracing::trace!("designated thread gone, dropping operation");
            return;
        }

        // Pairs with the fence in `Drain::run`: either this CAS sees `Idle`
        // or the drain sees the operation just sent.
        atomic::fence(Ordering::SeqCst);
        if self.state.transition(DispatchState::Idle, DispatchState::Scheduled) {
            self.waker.wake();
        }
    }

    /// Queue an append.
    pub fn append(&self, text: impl Into<String>) {
        self.submit(PendingOperation::Append(text.into()));
    }

    /// Queue a tail truncation.
    pub fn truncate_tail(&self, count: usize) {
        self.submit(PendingOperation::TruncateTail(count));
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DispatchState {
        self.state.load()
    }

    /// Number of operations waiting to be drained.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Consumer end of the dispatcher. Lives on the designated thread.
#[derive(Debug)]
pub struct Drain {
    /// Consumer end of the operation queue.
    queue: Receiver<PendingOperation>,
    /// Shared lifecycle state.
    state: Arc<StateCell>,
}

impl Drain {
    /// Current lifecycle state.
    pub fn state(&self) -> DispatchState {
        self.state.load()
    }

    /// Check if a drain has been requested and not yet run.
    pub fn is_scheduled(&self) -> bool {
        self.state.load() == DispatchState::Scheduled
    }

    /// Apply every queued operation to `sink`, in FIFO order, until the
    /// queue is observed empty.
    ///
    /// Returns the number of operations applied. The surface is presented
    /// once at the end if anything changed.
    pub fn run<S: Surface>(&self, sink: &mut DisplaySink<S>) -> usize {
        self.state.store(DispatchState::Draining);

        let mut applied = 0;
        loop {
            while let Ok(op) = self.queue.try_recv() {
                tracing::trace!(kind = op.kind(), "apply");
                sink.apply(op);
                applied += 1;
            }

            self.state.store(DispatchState::Idle);
            atomic::fence(Ordering::SeqCst);

            // Anything queued after the last try_recv but before a producer
            // could see Idle would otherwise wait for the next wake.
            if self.queue.is_empty()
                || !self.state.transition(DispatchState::Idle, DispatchState::Draining)
            {
                break;
            }
        }

        if applied > 0 {
            sink.present();
        }
        tracing::debug!(applied, "drain pass complete");
        applied
    }
}
