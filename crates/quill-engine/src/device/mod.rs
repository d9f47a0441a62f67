//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//!
//! Device loss is reported, never fatal; see `DeviceStatus`.

mod gpu;

pub use gpu::{DeviceStatus, Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
