//! Polling change detection
//!
//! - `filter`: include/exclude patterns on file base names
//! - `scanner`: tree walk against a modification-time watermark
//! - `watch_loop`: fixed-interval driver that broadcasts reloads

pub mod filter;
pub mod scanner;
pub mod watch_loop;

pub use filter::{FilterRole, FilterRule, FilterSet};
pub use scanner::{scan, ChangeDetector, ScanResult, Scanner};
pub use watch_loop::WatchLoop;
