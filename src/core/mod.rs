pub mod descriptor;
pub mod dispatch;
pub mod executor;
pub mod options;

pub use crate::domain::model::{ApiRequest, Credential, Item, Operation, Parameters, Resource};
pub use crate::domain::ports::{ParameterProvider, StaticParameters, Transport};
pub use crate::utils::error::Result;
