pub mod input_types;
pub mod output_types;

pub mod agents;
pub mod stateless_llm;
pub mod tools;

pub use input_types::*;
pub use output_types::*;
pub use agents::*;
pub use stateless_llm::*;
pub use tools::*;
