/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;

use flume::Receiver;

use logman::ConfigError;
use logman_types::log::{LogDropReason, LogStats};

use crate::config::{OUTPUT_STDERR, OUTPUT_STDOUT};

pub(crate) enum Sink {
    Stderr(io::Stderr),
    Stdout(io::Stdout),
    File(File),
}

impl Sink {
    pub(crate) fn open(output: &str) -> Result<Self, ConfigError> {
        match output {
            OUTPUT_STDERR => Ok(Sink::Stderr(io::stderr())),
            OUTPUT_STDOUT => Ok(Sink::Stdout(io::stdout())),
            path => OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(Sink::File)
                .map_err(|source| ConfigError::Sink {
                    output: path.to_string(),
                    source,
                }),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stderr(s) => s.write(buf),
            Sink::Stdout(s) => s.write(buf),
            Sink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stderr(s) => s.flush(),
            Sink::Stdout(s) => s.flush(),
            Sink::File(f) => f.flush(),
        }
    }
}

/// Body of the writer thread of one channel.
pub(crate) struct SinkWriter<W: Write = Sink> {
    receiver: Receiver<Vec<u8>>,
    stats: Arc<LogStats>,
    sinks: Vec<W>,
}

impl<W: Write> SinkWriter<W> {
    pub(crate) fn new(receiver: Receiver<Vec<u8>>, stats: Arc<LogStats>, sinks: Vec<W>) -> Self {
        SinkWriter {
            receiver,
            stats,
            sinks,
        }
    }

    pub(crate) fn run(mut self) {
        while let Ok(line) = self.receiver.recv() {
            self.write_one(&line);

            while let Ok(line) = self.receiver.try_recv() {
                self.write_one(&line);
            }

            for sink in &mut self.sinks {
                if sink.flush().is_err() {
                    self.stats.add_dropped(LogDropReason::SinkUnreachable);
                }
            }
        }
    }

    fn write_one(&mut self, line: &[u8]) {
        let mut written = false;
        for sink in &mut self.sinks {
            if sink.write_all(line).is_ok() {
                written = true;
            }
        }
        if written {
            self.stats.add_passed(line.len());
        } else {
            self.stats.add_dropped(LogDropReason::SinkUnreachable);
        }
    }
}
