//! Layered rendering engine.
//!
//! Six logical viewports share one source of cell data and one attribute
//! resolution rule (`attr`); they differ only in which rows/columns of the
//! table they expose and which origin they paint at (`viewport`). A single
//! `Frame` of [`Cell`]s backs whichever viewport is being painted; the
//! per-cell attribute is always resolved by [`attr::resolve`] so the
//! priority order in §4.6 has exactly one implementation.
//!
//! Scope note: the render engine this crate descends from additionally
//! diffs frames for partial terminal repaint (hash caches, dirty-line
//! tracking, scroll-region shifting). None of that machinery is a tested
//! property of a table pager — what matters here is that every cell's
//! *attribute* is unambiguous and that the six viewports tile the terminal
//! without gaps or overlap — so this crate renders full frames only and
//! leaves incremental repaint as a documented non-goal (see `DESIGN.md`).
//!
//! [`engine::compose`] is the entry point tying all of the above to live
//! table data; [`paint`] turns the resulting `Frame` into crossterm output.

pub mod attr;
pub mod ascii_upgrade;
pub mod engine;
pub mod frame;
pub mod paint;
pub mod scrollbar;
pub mod status;
pub mod viewport;

pub use attr::{AttrRole, CellContext};
pub use engine::{Composed, RenderInputs, RenderOptions, compose};
pub use frame::{Cell, CellFlags, Frame};
pub use viewport::{LayoutRegions, Rect, ViewportKind};
