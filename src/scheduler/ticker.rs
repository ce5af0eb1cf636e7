//! Background tick driver.
//!
//! Invokes a callback at a fixed period on a dedicated thread. Because a
//! single thread runs every callback to completion, ticks are serial and
//! never reentrant.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Message sent to the ticker thread.
#[derive(Debug)]
enum TickerMessage {
    /// Request to stop ticking.
    Shutdown,
}

/// A thread that calls a function once per period until shut down.
pub struct Ticker {
    /// Channel to the ticker thread.
    sender: Sender<TickerMessage>,
    /// Handle to the ticker thread.
    thread_handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Starts ticking. The first call happens one `period` after spawning.
    ///
    /// A panicking callback is logged and the ticker keeps going.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<TickerMessage>();

        let thread_handle = thread::spawn(move || loop {
            match receiver.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    if panic::catch_unwind(AssertUnwindSafe(&mut on_tick)).is_err() {
                        tracing::error!("tick handler panicked; continuing");
                    }
                }
                Ok(TickerMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            sender,
            thread_handle: Some(thread_handle),
        }
    }

    /// Stops the ticker and waits for an in-flight tick to finish.
    pub fn shutdown(&mut self) {
        self.sender.send(TickerMessage::Shutdown).ok();
        if let Some(handle) = self.thread_handle.take() {
            handle.join().ok();
        }
    }

    /// Blocks until the ticker thread exits.
    pub fn join(mut self) {
        if let Some(handle) = self.thread_handle.take() {
            handle.join().ok();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
