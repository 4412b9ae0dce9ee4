//! Ordered asynchronous delivery of encoded records
//!
//! A `Pipeline` owns a FIFO channel of records and exactly one worker thread
//! that writes them to the sink in the order they were enqueued. Closing it
//! is a `Open -> Closing -> Closed` transition that only one caller can win;
//! every caller of [`Pipeline::close`] returns only after the worker drained.
//!
//! Each queued record already ends with [`RECORD_SEPARATOR`], so the sink
//! receives one complete line per `write` call.

use super::encoder::RECORD_SEPARATOR;
use super::error::Result;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

const OPEN: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

/// Queue bounding policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueMode {
    /// Producers never wait; memory grows with the backlog.
    #[default]
    Unbounded,

    /// Producers block while `capacity` records are pending.
    ///
    /// A capacity of zero makes every enqueue a rendezvous with the worker.
    Bounded(usize),
}

/// Lifecycle of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Open,
    Closing,
    Closed,
}

pub struct Pipeline {
    sender: RwLock<Option<Sender<Vec<u8>>>>,
    state: AtomicU8,
    /// Never sent on. Disconnects once the worker has returned.
    done: Receiver<()>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Pipeline {
    /// Spawn the worker and return the open pipeline.
    pub fn start(sink: Box<dyn Sink>, mode: QueueMode, metrics: Arc<LoggerMetrics>) -> Self {
        let (sender, receiver) = match mode {
            QueueMode::Unbounded => unbounded(),
            QueueMode::Bounded(capacity) => bounded(capacity),
        };
        let (done_tx, done_rx) = bounded::<()>(0);
        let metrics_clone = Arc::clone(&metrics);

        let handle = thread::spawn(move || {
            // Dropped on return or unwind, which releases every close() waiter.
            let _done = done_tx;
            Self::run_worker(sink, receiver, &metrics_clone);
        });

        Self {
            sender: RwLock::new(Some(sender)),
            state: AtomicU8::new(OPEN),
            done: done_rx,
            worker: Mutex::new(Some(handle)),
            metrics,
        }
    }

    /// Worker loop: write records in arrival order until the channel is
    /// closed and empty.
    ///
    /// A failed or panicking sink write loses that record only; the loop
    /// moves on to the next one.
    fn run_worker(mut sink: Box<dyn Sink>, receiver: Receiver<Vec<u8>>, metrics: &LoggerMetrics) {
        for record in receiver.iter() {
            let write_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                Self::write_record(sink.as_mut(), &record)
            }));

            match write_result {
                Ok(Ok(())) => {
                    metrics.record_written();
                }
                Ok(Err(_)) | Err(_) => {
                    metrics.record_sink_failure();
                }
            }

            // Flush whenever the backlog is momentarily empty
            if receiver.is_empty() {
                Self::flush_quietly(sink.as_mut());
            }
        }

        Self::flush_quietly(sink.as_mut());
    }

    fn write_record(sink: &mut dyn Sink, record: &[u8]) -> Result<()> {
        sink.write(record)
    }

    fn flush_quietly(sink: &mut dyn Sink) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));
    }

    /// Terminate `record` with the separator and append it to the queue.
    ///
    /// Returns `false` and drops the record if the pipeline is no longer
    /// open. Blocks only in [`QueueMode::Bounded`] while the queue is full.
    pub fn enqueue(&self, mut record: Vec<u8>) -> bool {
        record.extend_from_slice(RECORD_SEPARATOR);
        let sender = self.sender.read();
        let sent = match sender.as_ref() {
            Some(tx) => tx.send(record).is_ok(),
            None => false,
        };

        if sent {
            self.metrics.record_enqueued();
        } else {
            self.metrics.record_rejected_after_close();
        }
        sent
    }

    /// Stop accepting records and wait until the worker has written
    /// everything already queued.
    ///
    /// Returns `true` for the one call that performed the transition out of
    /// `Open`. Concurrent or later calls still wait for the drain, then
    /// return `false`.
    pub fn close(&self) -> bool {
        let won = self
            .state
            .compare_exchange(OPEN, CLOSING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if won {
            // Dropping the only sender lets the worker's iterator finish
            drop(self.sender.write().take());
        }

        // Errors with `Disconnected` exactly when the worker has exited
        let _ = self.done.recv();

        if won {
            if let Some(handle) = self.worker.lock().take() {
                let _ = handle.join();
            }
            self.state.store(CLOSED, Ordering::Release);
        }

        won
    }

    pub fn state(&self) -> PipelineState {
        match self.state.load(Ordering::Acquire) {
            OPEN => PipelineState::Open,
            CLOSING => PipelineState::Closing,
            _ => PipelineState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == PipelineState::Open
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.close();
    }
}
