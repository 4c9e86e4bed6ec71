//! Streaming producer and the consumer-side tuple stream.
//!
//! Starting a stream spawns one producer task per relation. The task owns the
//! record source exclusively and loops:
//!
//! 1. read one record (synchronously; reads are not cancellable mid-call),
//! 2. parse it against the schema,
//! 3. drop it if the deduplication stage has seen it before,
//! 4. race the handoff to the consumer against the cancellation signal.
//!
//! The run ends in exactly one terminal [`ProducerState`]:
//!
//! | Trigger | State | Error slot |
//! |---|---|---|
//! | end of input | `Completed` | empty |
//! | source or parse failure | `Failed` | first error |
//! | [`CancelHandle::cancel`] or the consumer dropped the stream | `Cancelled` | empty |
//!
//! The producer also notices a dropped stream before each read, so it stops
//! pulling records even when the rest of the source is suppressed duplicates.
//! Once cancelled, the stream yields nothing further, including tuples that
//! were already buffered.
//!
//! In every case the sending half of the channel is dropped exactly once when
//! the task exits, which closes the stream. The error is latched *before*
//! that drop, so a consumer that has seen the stream end can always read the
//! outcome from [`TupleStream::err`].

use crate::dedup::Deduplicator;
use crate::error::{RelCsvError, Result};
use crate::parse::parse_record;
use crate::schema::Schema;
use crate::source::RecordSource;
use crate::tuple::Tuple;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll, ready};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a producer run. Terminal states are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProducerState {
    Idle = 0,
    Running = 1,
    Completed = 2,
    Failed = 3,
    Cancelled = 4,
}

impl ProducerState {
    const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Failed,
            4 => Self::Cancelled,
            _ => Self::Idle,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for ProducerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Point-in-time copy of a run's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Records read and parsed successfully.
    pub records: u64,
    /// Tuples handed to the consumer.
    pub emitted: u64,
    /// Tuples dropped as duplicates.
    pub suppressed: u64,
}

/// State shared between a relation, its producer task and its stream.
///
/// Single writer (the producer), many readers.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    state: AtomicU8,
    error: OnceLock<RelCsvError>,
    records: AtomicU64,
    emitted: AtomicU64,
    suppressed: AtomicU64,
}

impl RunState {
    pub(crate) fn state(&self) -> ProducerState {
        ProducerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ProducerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn error(&self) -> Option<&RelCsvError> {
        self.error.get()
    }

    pub(crate) fn stats(&self) -> StreamStats {
        StreamStats {
            records: self.records.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
        }
    }
}

/// One-shot cancellation signal for a running stream.
///
/// Cloneable; raising it more than once is a no-op.
#[derive(Clone, Debug)]
pub struct CancelHandle(CancellationToken);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }

    /// Resolves once the signal has been raised.
    pub async fn cancelled(&self) {
        self.0.cancelled().await;
    }
}

/// Consumer side of a producer run.
///
/// Yields tuples in source order (minus suppressed duplicates). When it
/// returns `None`, check [`TupleStream::err`] to tell exhaustion from failure,
/// or use [`TupleStream::try_collect`] which does so for you.
pub struct TupleStream {
    rx: mpsc::Receiver<Tuple>,
    run: Arc<RunState>,
    cancel: CancellationToken,
}

impl TupleStream {
    /// Next tuple, or `None` once the producer has finished or the run was
    /// cancelled. Tuples still buffered at cancellation are discarded.
    pub async fn next(&mut self) -> Option<Tuple> {
        if self.cancel.is_cancelled() {
            self.rx.close();
            // Wait for the producer to exit so its terminal state is visible.
            while self.rx.recv().await.is_some() {}
            return None;
        }
        self.rx.recv().await
    }

    /// Blocking variant of [`TupleStream::next`] for synchronous consumers.
    ///
    /// # Panics
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_next(&mut self) -> Option<Tuple> {
        if self.cancel.is_cancelled() {
            self.rx.close();
            while self.rx.blocking_recv().is_some() {}
            return None;
        }
        self.rx.blocking_recv()
    }

    /// The latched terminal error, if the run failed.
    #[must_use]
    pub fn err(&self) -> Option<RelCsvError> {
        self.run.error().cloned()
    }

    #[must_use]
    pub fn state(&self) -> ProducerState {
        self.run.state()
    }

    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.run.stats()
    }

    /// A handle that cancels this run.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.cancel.clone())
    }

    /// Drain every tuple, then report the run's error if it failed.
    ///
    /// # Errors
    /// The latched terminal error.
    pub async fn try_collect(mut self) -> Result<Vec<Tuple>> {
        let mut out = Vec::new();
        while let Some(t) = self.next().await {
            out.push(t);
        }
        match self.run.error() {
            Some(err) => Err(err.clone()),
            None => Ok(out),
        }
    }

    /// Drain the stream counting tuples (the relation's cardinality).
    ///
    /// # Errors
    /// The latched terminal error.
    pub async fn try_count(mut self) -> Result<usize> {
        let mut n = 0usize;
        while self.next().await.is_some() {
            n += 1;
        }
        match self.run.error() {
            Some(err) => Err(err.clone()),
            None => Ok(n),
        }
    }
}

impl Stream for TupleStream {
    type Item = Tuple;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Tuple>> {
        if self.cancel.is_cancelled() {
            self.rx.close();
            while ready!(self.rx.poll_recv(cx)).is_some() {}
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}

impl fmt::Debug for TupleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleStream")
            .field("state", &self.state())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Consecutive suppressed duplicates processed before the producer yields.
const SUPPRESSED_YIELD_INTERVAL: u32 = 128;

enum Outcome {
    Completed,
    Failed(RelCsvError),
    Cancelled { consumer_dropped: bool },
}

/// Everything a producer run owns.
pub(crate) struct Producer<S> {
    pub(crate) source: S,
    pub(crate) schema: Schema,
    pub(crate) dedup: Option<Deduplicator>,
    pub(crate) capacity: usize,
    pub(crate) run: Arc<RunState>,
}

impl<S: RecordSource> Producer<S> {
    /// Spawn the producer on `handle` and return the consumer's stream and
    /// cancellation control.
    pub(crate) fn spawn(self, handle: &Handle) -> (TupleStream, CancelHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(self.capacity.max(1));
        let cancel = CancellationToken::new();
        let stream = TupleStream {
            rx,
            run: Arc::clone(&self.run),
            cancel: cancel.clone(),
        };
        let control = CancelHandle(cancel.clone());
        self.run.set_state(ProducerState::Running);
        let join = handle.spawn(self.run_loop(tx, cancel));
        (stream, control, join)
    }

    async fn run_loop(self, tx: mpsc::Sender<Tuple>, cancel: CancellationToken) {
        let Self {
            mut source,
            schema,
            mut dedup,
            run,
            ..
        } = self;
        tracing::debug!(
            arity = schema.arity(),
            dedup = dedup.is_some(),
            "producer started"
        );

        let mut unyielded = 0u32;
        let outcome = loop {
            if cancel.is_cancelled() {
                break Outcome::Cancelled {
                    consumer_dropped: false,
                };
            }
            if tx.is_closed() {
                break Outcome::Cancelled {
                    consumer_dropped: true,
                };
            }
            let record = match source.read_record() {
                Ok(Some(record)) => record,
                Ok(None) => break Outcome::Completed,
                Err(err) => break Outcome::Failed(err),
            };
            let tuple = match parse_record(&schema, &record) {
                Ok(tuple) => tuple,
                Err(err) => break Outcome::Failed(err),
            };
            run.records.fetch_add(1, Ordering::Relaxed);

            if let Some(seen) = dedup.as_mut()
                && !seen.admit(&tuple)
            {
                run.suppressed.fetch_add(1, Ordering::Relaxed);
                // Long runs of duplicates never reach a send, so yield now and then.
                unyielded += 1;
                if unyielded >= SUPPRESSED_YIELD_INTERVAL {
                    unyielded = 0;
                    tokio::task::yield_now().await;
                }
                continue;
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    break Outcome::Cancelled { consumer_dropped: false };
                }
                sent = tx.send(tuple) => {
                    if sent.is_err() {
                        break Outcome::Cancelled { consumer_dropped: true };
                    }
                    run.emitted.fetch_add(1, Ordering::Relaxed);
                    unyielded = 0;
                }
            }
        };

        let stats = run.stats();
        match outcome {
            Outcome::Completed => {
                tracing::debug!(
                    records = stats.records,
                    emitted = stats.emitted,
                    suppressed = stats.suppressed,
                    "producer completed"
                );
                run.set_state(ProducerState::Completed);
            }
            Outcome::Failed(err) => {
                tracing::warn!(
                    records = stats.records,
                    emitted = stats.emitted,
                    error = %err,
                    "producer failed"
                );
                // Latch before the channel closes below. Single writer.
                let latched = run.error.set(err).is_ok();
                debug_assert!(latched, "terminal error latched twice");
                run.set_state(ProducerState::Failed);
            }
            Outcome::Cancelled { consumer_dropped } => {
                tracing::debug!(
                    records = stats.records,
                    emitted = stats.emitted,
                    consumer_dropped,
                    "producer cancelled"
                );
                run.set_state(ProducerState::Cancelled);
            }
        }
        drop(tx);
    }
}
