/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::JoinHandle;

use flume::{Receiver, Sender, TrySendError};
use slog::{Drain, OwnedKVList, Record};

use super::{LogDropReason, LogStats};

const DEFAULT_CHANNEL_CAPACITY: usize = 4096;

#[derive(Clone, Debug)]
pub struct AsyncLogConfig {
    pub channel_capacity: usize,
    pub thread_name: String,
}

impl AsyncLogConfig {
    pub fn with_name(thread_name: &str) -> Self {
        AsyncLogConfig {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            thread_name: thread_name.to_string(),
        }
    }
}

impl Default for AsyncLogConfig {
    fn default() -> Self {
        AsyncLogConfig::with_name("log-async")
    }
}

/// Turn a slog record into the value handed to the writer thread.
pub trait AsyncLogFormatter<T> {
    fn format_slog(&self, record: &Record, logger_values: &OwnedKVList) -> Result<T, slog::Error>;
}

/// A non-blocking drain: records are formatted on the caller thread and
/// queued to a writer thread, overflow is counted and dropped.
///
/// Dropping the drain closes the channel and waits for the writer thread
/// to finish the queued records.
pub struct AsyncLogger<T, F>
where
    F: AsyncLogFormatter<T>,
{
    sender: Option<Sender<T>>,
    formatter: F,
    stats: Arc<LogStats>,
    writer: Option<AssertUnwindSafe<JoinHandle<()>>>,
}

impl<T, F> AsyncLogger<T, F>
where
    T: Send + 'static,
    F: AsyncLogFormatter<T>,
{
    /// Create the drain and spawn the writer thread which owns the receiving end.
    ///
    /// The writer thread exits once the drain is dropped and the queue is empty.
    pub fn spawn<W>(async_conf: &AsyncLogConfig, formatter: F, writer: W) -> std::io::Result<Self>
    where
        W: FnOnce(Receiver<T>, Arc<LogStats>) + Send + 'static,
    {
        let (sender, receiver) = flume::bounded::<T>(async_conf.channel_capacity);
        let stats = Arc::new(LogStats::default());

        let thread_stats = Arc::clone(&stats);
        let handle = std::thread::Builder::new()
            .name(async_conf.thread_name.clone())
            .spawn(move || writer(receiver, thread_stats))?;

        Ok(AsyncLogger {
            sender: Some(sender),
            formatter,
            stats,
            writer: Some(AssertUnwindSafe(handle)),
        })
    }
}

impl<T, F> AsyncLogger<T, F>
where
    F: AsyncLogFormatter<T>,
{
    pub fn new(sender: Sender<T>, formatter: F, stats: Arc<LogStats>) -> Self {
        AsyncLogger {
            sender: Some(sender),
            formatter,
            stats,
            writer: None,
        }
    }

    pub fn get_stats(&self) -> Arc<LogStats> {
        Arc::clone(&self.stats)
    }
}

impl<T, F> Drop for AsyncLogger<T, F>
where
    F: AsyncLogFormatter<T>,
{
    fn drop(&mut self) {
        // the writer loop ends only after the last sender is gone
        self.sender.take();
        if let Some(handle) = self.writer.take()
            && handle.thread().id() != std::thread::current().id()
        {
            let _ = handle.0.join();
        }
    }
}

impl<T, F> Drain for AsyncLogger<T, F>
where
    F: AsyncLogFormatter<T>,
{
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        self.stats.add_total();

        match self.formatter.format_slog(record, logger_values) {
            Ok(v) => {
                let Some(sender) = &self.sender else {
                    self.stats.add_dropped(LogDropReason::ChannelClosed);
                    return Ok(());
                };
                match sender.try_send(v) {
                    Ok(_) => {}
                    Err(TrySendError::Full(_)) => {
                        self.stats.add_dropped(LogDropReason::ChannelOverflow)
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        self.stats.add_dropped(LogDropReason::ChannelClosed)
                    }
                }
                Ok(())
            }
            Err(e) => {
                self.stats.add_dropped(LogDropReason::FormatFailed);
                Err(e)
            }
        }
    }
}
