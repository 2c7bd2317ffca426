pub mod buffer;
pub mod completion;
pub mod types;

pub use buffer::*;
pub use completion::*;
pub use types::*;
