//! Umbrella crate that re-exports the `rhea-*` building blocks.
//!
//! Enable `planner` for the search and controller, `maze` for the reference
//! forward model, and `serde` to make plans, cursors and reports persistable.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use rhea_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use rhea_tools as tools;

#[cfg(feature = "planner")]
#[cfg_attr(docsrs, doc(cfg(feature = "planner")))]
pub use rhea_planner as planner;

#[cfg(feature = "maze")]
#[cfg_attr(docsrs, doc(cfg(feature = "maze")))]
pub use rhea_maze as maze;
