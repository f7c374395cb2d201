pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod extract;
pub mod generate;
pub mod index;
pub mod llama;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod store;
pub mod sync;
pub mod template;

pub use cli::{run, Cli};
pub use error::{Error, ErrorKind};
