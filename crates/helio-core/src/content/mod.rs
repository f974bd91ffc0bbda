pub mod names;
pub mod store;

pub use names::title_case;
pub use store::{Contact, ContentEntry, ContentStore, Link, Project, ResolvedContent};
