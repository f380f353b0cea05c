//! Serve command implementation.

use crate::app::AppContext;
use crate::app::web;
use crate::domain::{AppError, GuidiaConfig};

pub fn run_serve(mut config: GuidiaConfig, bind: Option<String>) -> Result<(), AppError> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    let addr = config.server.socket_addr()?;
    let ctx = AppContext::from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(ctx, addr))
}
