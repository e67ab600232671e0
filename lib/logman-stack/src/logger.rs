/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, OnceLock};

use logman::{ChannelLookup, Fields, Level, Logger};

use crate::{StackConfig, StackMember};

struct BoundMember {
    logger: Arc<dyn Logger>,
    disable_bubble: bool,
}

/// Forwards each record to its member channels in order.
///
/// Members are resolved from the owning manager on first use, as they may
/// not be built yet when the stack itself is created.
pub struct StackLogger {
    level: Level,
    members: Vec<StackMember>,
    lookup: ChannelLookup,
    bound: OnceLock<Vec<BoundMember>>,
}

impl StackLogger {
    pub fn new(config: StackConfig, lookup: ChannelLookup) -> Self {
        StackLogger {
            level: config.level,
            members: config.members,
            lookup,
            bound: OnceLock::new(),
        }
    }

    fn bound_members(&self) -> Option<&[BoundMember]> {
        if let Some(bound) = self.bound.get() {
            return Some(bound);
        }

        let names: Vec<&str> = self.members.iter().map(|m| m.name.as_str()).collect();
        let channels = self.lookup.channels(&names)?;
        let bound = self
            .members
            .iter()
            .filter_map(|m| {
                channels.get(&m.name).map(|logger| BoundMember {
                    logger: Arc::clone(logger),
                    disable_bubble: m.disable_bubble,
                })
            })
            .collect::<Vec<_>>();
        log::debug!(
            "stack bound to {} of {} member channels",
            bound.len(),
            self.members.len()
        );
        Some(self.bound.get_or_init(|| bound))
    }
}

impl Logger for StackLogger {
    #[track_caller]
    fn log(&self, level: Level, msg: &str, fields: &[Fields]) {
        if !self.level.accepts(level) {
            return;
        }
        let Some(members) = self.bound_members() else {
            return;
        };

        for member in members {
            if !member.logger.level().accepts(level) {
                continue;
            }
            member.logger.log(level, msg, fields);
            if member.disable_bubble {
                break;
            }
        }
    }

    fn level(&self) -> Level {
        self.level
    }
}
