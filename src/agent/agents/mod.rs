pub mod agent_interface;
pub mod roles;
pub mod sequential_crew;

pub use agent_interface::*;
pub use sequential_crew::*;
