pub mod tool_interface;
pub mod serper_search;

pub use tool_interface::*;
pub use serper_search::*;
