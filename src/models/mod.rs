pub mod milestone;
pub mod project;
pub mod task;

pub use milestone::*;
pub use project::*;
pub use task::*;
