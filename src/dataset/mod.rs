mod load;
mod types;

pub use load::load_dataset;
pub use types::{Dataset, LinkRecord, NodeKind, NodeRecord};
