/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod level;
mod primary;

pub use level::as_level;
pub use primary::{as_bool, as_hash, as_list, as_string};
