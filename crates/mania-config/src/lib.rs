// Configuration structs (system, playfield layout, key bindings)

pub mod config;
pub mod key_config;
pub mod playfield_config;

pub use config::Config;
pub use key_config::{KeyConfig, MAX_LANES};
pub use playfield_config::PlayfieldConfig;
