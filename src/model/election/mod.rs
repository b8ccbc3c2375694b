pub use election_core::{Election, ElectionMetadata, ResultsStatus};
pub use spec::{ElectionSpec, ElectionUpdate};
pub use view::ElectionView;

mod election_core;
mod spec;
mod view;
