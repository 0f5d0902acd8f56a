pub mod flow;
pub mod message;
pub mod version;

pub use flow::*;
pub use message::*;
pub use version::*;
