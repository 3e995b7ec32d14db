//! Link preview adapters

mod stub;

pub use stub::{normalize_url, StubLinkPreviewer};
