pub mod context;
pub mod kernel;
pub mod ops;
pub mod trace;
pub mod types;

// Re-export public items from submodules
pub use context::{DpContext, EngineRoot, FillState};
pub use kernel::{band_fill, AffineGap, FillExtent, GapScoring, LinearGap};
pub use types::*;
