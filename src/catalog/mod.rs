pub mod codec;
pub mod key;
pub mod merge;
pub mod model;

pub use merge::merge;
