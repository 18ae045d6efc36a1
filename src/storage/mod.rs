pub mod interface;
pub mod firebase_storage;

pub use interface::*;
pub use firebase_storage::*;
