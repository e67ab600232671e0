/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogDropReason {
    FormatFailed,
    ChannelClosed,
    ChannelOverflow,
    SinkUnreachable,
}

#[derive(Default, Debug, PartialEq, Eq)]
pub struct LogStatsSnapshot {
    pub total: u64,
    pub passed: u64,
    pub size: u64,
    pub format_failed: u64,
    pub channel_closed: u64,
    pub channel_overflow: u64,
    pub sink_unreachable: u64,
}

impl LogStatsSnapshot {
    pub fn dropped(&self) -> u64 {
        self.format_failed + self.channel_closed + self.channel_overflow + self.sink_unreachable
    }
}

/// Counters shared between a drain and its writer thread.
#[derive(Default)]
pub struct LogStats {
    total: AtomicU64,
    passed: AtomicU64,
    size: AtomicU64,
    format_failed: AtomicU64,
    channel_closed: AtomicU64,
    channel_overflow: AtomicU64,
    sink_unreachable: AtomicU64,
}

impl LogStats {
    pub fn add_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_passed(&self, size: usize) {
        self.passed.fetch_add(1, Ordering::Relaxed);
        self.size.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub fn add_dropped(&self, reason: LogDropReason) {
        let counter = match reason {
            LogDropReason::FormatFailed => &self.format_failed,
            LogDropReason::ChannelClosed => &self.channel_closed,
            LogDropReason::ChannelOverflow => &self.channel_overflow,
            LogDropReason::SinkUnreachable => &self.sink_unreachable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LogStatsSnapshot {
        LogStatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            passed: self.passed.load(Ordering::Relaxed),
            size: self.size.load(Ordering::Relaxed),
            format_failed: self.format_failed.load(Ordering::Relaxed),
            channel_closed: self.channel_closed.load(Ordering::Relaxed),
            channel_overflow: self.channel_overflow.load(Ordering::Relaxed),
            sink_unreachable: self.sink_unreachable.load(Ordering::Relaxed),
        }
    }
}
