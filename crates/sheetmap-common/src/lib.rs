pub mod error;
pub mod raw;
pub mod value;

pub use error::*;
pub use raw::*;
pub use value::*;
