// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend
//!
//! Three pieces, used in order by the camera lifecycle:
//!
//! 1. `enumeration`: lists the platform's media input devices and picks
//!    the preferred video input (bridge marker first, then enumeration
//!    order).
//! 2. `pipeline`: binds a live stream for the selected device and
//!    forwards RGBA frames to the UI.
//! 3. [`StreamHandle`]: owns the resulting hardware tracks until the
//!    lifecycle releases them.

pub mod enumeration;
pub mod pipeline;
pub mod types;

pub use enumeration::{acquire_device, enumerate_devices, select_device};
pub use pipeline::CameraPipeline;
pub use types::*;
