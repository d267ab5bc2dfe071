//! Output-convention transforms applied after optimization.

pub mod camel_case;

pub use camel_case::to_camel_case;
