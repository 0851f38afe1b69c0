pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::ProfileConfig;

pub use adapters::http::ReqwestTransport;
pub use core::descriptor::{credential_descriptor, credential_test_request, node_descriptor};
pub use core::dispatch::build_request;
pub use core::executor::NodeRunner;
pub use domain::model::{ApiRequest, Credential, Item, Operation, Parameters, Resource};
pub use domain::ports::{ParameterProvider, StaticParameters, Transport};
pub use utils::error::{ConnectorError, Result};
