pub mod error;
pub mod traits;
pub mod types;
pub mod weighted;

pub use error::*;
pub use traits::*;
pub use types::*;
