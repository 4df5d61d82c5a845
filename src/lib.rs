pub mod config;
pub mod core;
pub mod domain;
pub mod extract;
pub mod markup;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{etl::EtlEngine, pipeline::OrderPipeline};
pub use domain::model::OrderRecord;
pub use extract::OrderAssembler;
pub use utils::error::{EtlError, Result};
