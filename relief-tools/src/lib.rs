//! Command-line tools built on the `relief` library.

pub mod tool_util;
