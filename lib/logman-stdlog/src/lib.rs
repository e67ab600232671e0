/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use flume::Receiver;
use slog::Level;

use logman_types::log::{AsyncLogConfig, AsyncLogger, LogDropReason, LogStats};

mod format;
pub use format::StdLogFormatter;

pub struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    datetime: DateTime<Utc>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }

    fn level_label(&self) -> &'static str {
        match self.level {
            Level::Critical => "CRT",
            Level::Error => "ERR",
            Level::Warning => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
        }
    }
}

/// Start a drain writing plain text lines to stderr, or stdout if `use_stdout`.
///
/// Lines are coloured when the target stream is a terminal.
pub fn new_async_logger(
    async_conf: &AsyncLogConfig,
    use_stdout: bool,
) -> io::Result<AsyncLogger<StdLogValue, StdLogFormatter>> {
    AsyncLogger::spawn(async_conf, StdLogFormatter::new(), move |receiver, stats| {
        let io_thread = AsyncIoThread { receiver, stats };
        if use_stdout {
            io_thread.run_with_stdout();
        } else {
            io_thread.run_with_stderr();
        }
    })
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
    stats: Arc<LogStats>,
}

impl AsyncIoThread {
    fn run_with_stderr(self) {
        let stderr = io::stderr();
        let console = stderr.is_terminal();
        self.run(stderr, console)
    }

    fn run_with_stdout(self) {
        let stdout = io::stdout();
        let console = stdout.is_terminal();
        self.run(stdout, console)
    }

    fn run<IO: Write>(&self, mut io: IO, console: bool) {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            self.write_one(&mut io, &mut buf, v, console);

            while let Ok(v) = self.receiver.try_recv() {
                self.write_one(&mut io, &mut buf, v, console);
            }

            if io.flush().is_err() {
                self.stats.add_dropped(LogDropReason::SinkUnreachable);
            }
        }
    }

    fn write_one<IO: Write>(&self, io: &mut IO, buf: &mut Vec<u8>, v: StdLogValue, console: bool) {
        buf.clear();
        let r = if console {
            write_console(buf, &v)
        } else {
            write_plain(buf, &v)
        };
        if r.is_err() {
            self.stats.add_dropped(LogDropReason::FormatFailed);
            return;
        }
        match io.write_all(buf) {
            Ok(_) => self.stats.add_passed(buf.len()),
            Err(_) => self.stats.add_dropped(LogDropReason::SinkUnreachable),
        }
    }
}

fn write_time<IO: Write>(io: &mut IO, v: &StdLogValue) -> io::Result<()> {
    write!(io, "{}", v.datetime.format("%Y/%m/%d %H:%M:%S%.6f"))
}

fn write_plain<IO: Write>(io: &mut IO, v: &StdLogValue) -> io::Result<()> {
    write_time(io, v)?;
    write!(io, " [{}]", v.level_label())?;
    write!(io, " {}", v.message_str())?;
    for (k, v) in &v.kv_pairs {
        write!(io, " {k}={v}")?;
    }
    writeln!(io)?;
    Ok(())
}

fn write_console<IO: Write>(io: &mut IO, v: &StdLogValue) -> io::Result<()> {
    use anstyle::{AnsiColor, Color, Style};

    const COLOR_MAGENTA: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta)));
    const COLOR_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
    const COLOR_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    const COLOR_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    const COLOR_CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    const COLOR_BLUE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue)));
    const STYLE_BOLD: Style = Style::new().bold();

    let bold_s = STYLE_BOLD.render();
    let bold_e = STYLE_BOLD.render_reset();

    write_time(io, v)?;
    let level_color = match v.level {
        Level::Critical => COLOR_MAGENTA,
        Level::Error => COLOR_RED,
        Level::Warning => COLOR_YELLOW,
        Level::Info => COLOR_GREEN,
        Level::Debug => COLOR_CYAN,
        Level::Trace => COLOR_BLUE,
    };
    write!(
        io,
        " [{}{}{}]",
        level_color.render(),
        v.level_label(),
        level_color.render_reset(),
    )?;

    write!(io, " {bold_s}{}{bold_e}", v.message_str())?;
    for (k, v) in &v.kv_pairs {
        write!(io, " {bold_s}{k}{bold_e}={v}")?;
    }
    writeln!(io)?;
    Ok(())
}
