pub mod consts;
pub mod model;

pub use model::{JobSettings, ResolverSettings, Settings};
