// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response token allocation for Threadline.
//!
//! [`TokenSpace`] describes which values may be issued and how the space is
//! scanned. [`ResponseTokenPool`] hands out tokens that are unused at the
//! moment they are returned, safely across concurrent callers.

pub mod pool;
pub mod recording;
pub mod space;

pub use pool::{PoolSettings, ResponseTokenPool};
pub use space::TokenSpace;
