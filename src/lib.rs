// SPDX-License-Identifier: MIT

pub mod diff;
pub mod utils;
