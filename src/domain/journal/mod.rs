//! Journal domain module

mod entry;

pub use entry::JournalEntry;
