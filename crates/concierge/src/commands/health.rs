//! Server liveness probe.

use concierge_core::{CoreError, HealthStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(h: &HealthStatus) -> String {
    match h.area {
        Some(ref area) => format!("{} ({area})", h.status),
        None => h.status.clone(),
    }
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (conn, _view) = util::open(global, false)?;
    let health = conn
        .widget
        .client()
        .health()
        .await
        .map_err(CoreError::from)?;

    let out = output::render_single(&global.output, &health, detail, |h| h.status.clone());
    output::print_output(&out, global.quiet);

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::ApiError {
            message: format!("server reports status '{}'", health.status),
            status: None,
        })
    }
}
