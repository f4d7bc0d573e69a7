mod loader;
mod types;

pub use loader::CONFIG_FILE;
pub use types::Config;
