//! Layer configuration: styling, draft validation, and the staged
//! creation flow.

pub mod draft;
pub mod flow;
pub mod style;

pub use draft::*;
pub use flow::*;
pub use style::*;
