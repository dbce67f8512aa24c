mod assets;

pub mod client;
pub mod completion;
pub mod config;
pub mod locale;

pub use crate::assets::get_data_dir;
