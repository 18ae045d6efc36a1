pub mod providers;
pub mod stateless_llm;
pub mod system;
pub mod utils;

pub use providers::*;
pub use stateless_llm::*;
pub use system::*;
