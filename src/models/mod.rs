pub mod news;
pub mod quote;
pub mod response;

pub use news::*;
pub use quote::*;
pub use response::*;
