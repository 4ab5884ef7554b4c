//! Scan client: collects form input, asks the service for opportunities, and
//! renders them as cards.
//!
//! The pieces meet at three seams so each can be swapped or tested alone:
//! - [`ScanForm`]: where the four scan controls are read from
//! - [`OpportunityFeed`]: who answers the query (HTTP service or in-process)
//! - [`Surface`]: where status and cards are drawn

pub mod feed;
pub mod orchestrator;
pub mod query;
pub mod render;
pub mod status;
pub mod surface;

pub use feed::{HttpFeed, LocalFeed, OpportunityFeed, OPPORTUNITIES_PATH};
pub use orchestrator::{ScanOutcome, Scanner};
pub use query::{FormValues, ScanForm, ScanQuery};
pub use render::{format_fixed, render, BundleLine, Card, BUNDLE_HEADING};
pub use status::{Status, Tone};
pub use surface::{HtmlSurface, MemorySurface, Surface, TerminalSurface};
