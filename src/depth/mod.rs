pub mod builder;
pub mod types;

pub use builder::{build_depth_curve, curve_from_walks};
pub use types::{CurveOptions, DepthCurve, DepthPoint};
