pub mod engine;
pub mod normalize;
pub mod odict;

pub use crate::domain::model::{Entry, State, ValueList};
pub use crate::domain::ports::{StateObject, Storage};
pub use crate::utils::error::Result;
