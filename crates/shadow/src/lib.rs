//! Shadow relocation of a running program's own binaries.
//!
//! At startup a program preloads every code unit it references, moves its
//! files into a `_shadow` subdirectory and copies them back. The process keeps
//! running from the shadow copies while the originals stay free to be
//! replaced by an updater.
//!
//! Limitations: the program needs write access to its own directory, only
//! top-level files are relocated, and two instances relocating at once race
//! on the shadow directory.

pub mod error;
pub mod preload;
pub mod relocate;
pub mod unit;

pub use error::UnitError;
pub use preload::preload_references;
pub use relocate::{relocate, relocate_directory, RelocationPlan, SHADOW_DIR_NAME};
pub use unit::{CodeUnit, InventoryHost, UnitHost};

#[doc(hidden)]
pub use inventory;
