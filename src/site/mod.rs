//! Site integration
//!
//! Turns the resolved versions into what the documentation site consumes:
//!
//! - [`setup`]: resolves the versions to serve from configuration
//! - [`collections`]: one content collection per served version
//! - [`switcher`]: version switcher entries for a page
//! - [`routing`]: normalization of the `v` and `lang` route params

pub mod collections;
pub mod routing;
pub mod setup;
pub mod switcher;
