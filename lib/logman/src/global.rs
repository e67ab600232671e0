/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, LazyLock, Mutex};

use arc_swap::ArcSwap;

use logman_types::{Fields, Level};

use crate::{LogmanError, Logger, Manager, Registry, RootConfig};

static CURRENT: LazyLock<ArcSwap<Manager>> =
    LazyLock::new(|| ArcSwap::from_pointee(Manager::new_default()));
static INITIALIZED: Mutex<bool> = Mutex::new(false);

/// The process wide manager.
///
/// Before [`init`] succeeds this is a single `std` channel at info level.
pub fn current() -> Arc<Manager> {
    CURRENT.load_full()
}

pub fn is_initialized() -> bool {
    match INITIALIZED.lock() {
        Ok(done) => *done,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Replace the built-in manager, once per process.
///
/// A failed attempt leaves the built-in manager in place and may be retried.
pub fn init(registry: &Registry, config: RootConfig) -> Result<(), LogmanError> {
    let mut done = match INITIALIZED.lock() {
        Ok(done) => done,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *done {
        return Err(LogmanError::AlreadyInitialized);
    }

    let manager = Manager::new(registry, config)?;
    log::info!(
        "logging initialized with default channel {}",
        manager.default_channel()
    );
    CURRENT.store(Arc::new(manager));
    *done = true;
    Ok(())
}

/// # Panics
///
/// Panics if [`init`] fails.
pub fn init_or_panic(registry: &Registry, config: RootConfig) {
    if let Err(e) = init(registry, config) {
        panic!("failed to init logging: {e}");
    }
}

/// Stop every channel of the current manager and wait for its writer threads
/// to drain their queues.
///
/// Later calls go to a manager which discards everything. Writers of a
/// manager still held through [`current`] finish when the last holder drops
/// it.
pub fn shutdown() {
    let previous = CURRENT.swap(Arc::new(Manager::new_discard()));
    drop(previous);
}

#[track_caller]
pub fn log(level: Level, msg: &str, fields: &[Fields]) {
    CURRENT.load().log(level, msg, fields)
}

#[track_caller]
pub fn debug(msg: &str, fields: &[Fields]) {
    CURRENT.load().debug(msg, fields)
}

#[track_caller]
pub fn info(msg: &str, fields: &[Fields]) {
    CURRENT.load().info(msg, fields)
}

#[track_caller]
pub fn warning(msg: &str, fields: &[Fields]) {
    CURRENT.load().warning(msg, fields)
}

#[track_caller]
pub fn error(msg: &str, fields: &[Fields]) {
    CURRENT.load().error(msg, fields)
}

#[track_caller]
pub fn critical(msg: &str, fields: &[Fields]) {
    CURRENT.load().critical(msg, fields)
}
