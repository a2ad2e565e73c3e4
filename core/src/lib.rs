pub mod acknowledgement;
pub mod config;
pub mod errors;
pub mod handler;
pub mod telemetry;

pub use acknowledgement::{Acknowledgement, Outcome};
pub use config::{LogConfig, ServiceConfig, load_config};
pub use errors::{HandlerError, Result};
pub use handler::{Handler, handle_event};
pub use telemetry::{Verbosity, init_tracing};
