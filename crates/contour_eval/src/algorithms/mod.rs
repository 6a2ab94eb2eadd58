pub mod preprocessing;
pub mod extraction;
pub mod filtering;
pub mod scoring;

pub use preprocessing::*;
pub use extraction::*;
pub use filtering::*;
pub use scoring::*;
