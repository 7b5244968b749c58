//! GPU device + surface management, and the wgpu-backed [`Driver`].
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - translating the immediate-mode driver calls into wgpu passes
//!
//! [`Driver`]: crate::driver::Driver

mod error;
mod frame;
mod gpu;
mod init;
mod reflect;
mod surface;
mod wgpu_driver;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use wgpu_driver::WgpuDriver;
