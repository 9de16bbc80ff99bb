//! Control spreadsheet resolution.
//!
//! This module locates the current period's control file under a
//! date-organized directory tree: `<base>/<YYYY>/<YYYY>-<MM>` holds one
//! subfolder per week (named after its Monday), and the weekly subfolder
//! holds the control spreadsheet.

mod control_file;

pub use control_file::{ControlFileResolver, ResolverError};
