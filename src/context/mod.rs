//! # Fit context
//!
//! This module owns the parameter-partition contract: which parameters of
//! the model are free, which are fixed and at what values, plus the
//! starting guesses and bounds for the free ones. From that declaration it
//! derives the strictly-ordered vectors the optimizer consumes.
//!
//! ## Example Usage
//!
//! ```rust
//! use flexifit::context::FitContext;
//!
//! let full = ["c0", "c1", "c2"];
//! let context = FitContext::builder()
//!     .free(["c0", "c1"])
//!     .fix("c2", 0.35)
//!     .initial("c0", 2.0)
//!     .lower("c0", 0.0)
//!     .upper("c0", 3.0)
//!     .build(&full)
//!     .unwrap();
//!
//! // p0 and bounds are ordered like `free`; unspecified entries default
//! // to 1.0 and +/- infinity.
//! assert_eq!(context.p0().to_vec(), vec![2.0, 1.0]);
//! let (lowers, uppers) = context.bounds();
//! assert_eq!(lowers[0], 0.0);
//! assert_eq!(uppers[1], f64::INFINITY);
//! ```

pub mod bounds;
pub mod context;

// Re-export key types
pub use bounds::{Bounds, BoundsError, BoundsTransform};
pub use context::{FitContext, FitContextBuilder, PartitionError, DEFAULT_INITIAL};
