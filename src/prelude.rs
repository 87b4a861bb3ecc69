//! # Haggis Life Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use haggis_life::prelude::*;
//!
//! let config = LifeConfig::default().with_pattern(LifePattern::GosperGun);
//! LifeApp::new(config)?.run()?;
//! # Ok::<(), LifeError>(())
//! ```

pub use crate::app::LifeApp;
pub use crate::config::LifeConfig;
pub use crate::error::{LifeError, Result};
pub use crate::gfx::GpuContext;
pub use crate::simulation::cpu::CpuLife;
pub use crate::simulation::gpu::GpuLife;
pub use crate::simulation::grid::{EdgePolicy, Generation, GridSize};
pub use crate::simulation::patterns::LifePattern;
