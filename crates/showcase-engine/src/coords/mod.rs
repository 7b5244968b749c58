//! Surface-size types shared by the transform pipeline and the driver.

mod viewport;

pub use viewport::Viewport;
