pub mod logging;

pub use logging::{init, shorten_title};
