// SPDX-License-Identifier: GPL-3.0-only

//! Platform backends
//!
//! - `camera`: device enumeration, selection, and the preview pipeline
//! - `audio`: input enumeration, the microphone level monitor, and the
//!   portal permission request

pub mod audio;
pub mod camera;
