//! Subcommand execution

use http::{Method, Request};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::args::{Args, Command};
use crate::analytics::{AnalyticsProcessor, AnalyticsRecord};
use crate::config::ApiSpec;
use crate::context::RequestContext;
use crate::errors::{EdgewardError, Result};
use crate::forward;
use crate::middleware::Chain;
use crate::status::ExitStatus;

/// Run the parsed command, writing its report to `out`
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<ExitStatus> {
    match &args.command {
        Command::Inspect { api_def, method, path, headers } => inspect(api_def, method, path, headers, out),
        Command::Analytics { api_def, record } => analytics(api_def, record.as_deref(), out),
    }
}

fn inspect<W: Write>(
    api_def: &Path,
    method: &str,
    path: &str,
    headers: &[String],
    out: &mut W,
) -> Result<ExitStatus> {
    let chain = Chain::for_spec(Arc::new(ApiSpec::load(api_def)?));
    let spec = chain.spec();

    writeln!(out, "API: {} ({})", spec.name, spec.api_id)?;
    let names = chain.names();
    if names.is_empty() {
        writeln!(out, "Middleware: (none)")?;
    } else {
        writeln!(out, "Middleware: {}", names.join(", "))?;
    }

    let (mut ctx, ()) = RequestContext::from_request(build_request(method, path, headers)?);
    chain.process(&mut ctx)?;

    let outbound = forward::prepare_outbound(&mut ctx);
    writeln!(out)?;
    writeln!(out, "{} {} {:?}", outbound.method(), outbound.uri(), outbound.version())?;
    for (name, value) in outbound.headers() {
        if value.is_sensitive() {
            writeln!(out, "{}: <redacted>", name)?;
        } else {
            writeln!(out, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
        }
    }

    Ok(ExitStatus::Success)
}

fn analytics<W: Write>(api_def: &Path, record: Option<&str>, out: &mut W) -> Result<ExitStatus> {
    let spec = ApiSpec::load(api_def)?;
    let processor = AnalyticsProcessor::try_from_config(&spec.analytics_plugin)?;
    if !processor.is_active() {
        info!(api_id = %spec.api_id, "Analytics plugin not enabled, record passes through unchanged");
    }

    let mut record = match record {
        Some(json) => serde_json::from_str(json)?,
        None => {
            let (ctx, ()) = RequestContext::from_request(build_request("GET", "/", &[])?);
            AnalyticsRecord::for_request(&ctx, &spec, http::StatusCode::OK)
        }
    };

    processor.process(&mut record);
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(ExitStatus::Success)
}

/// Build a synthetic inbound request
fn build_request(method: &str, path: &str, headers: &[String]) -> Result<Request<()>> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|e| EdgewardError::Argument(format!("invalid method {:?}: {}", method, e)))?;

    let mut builder = Request::builder().method(method).uri(path);
    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| EdgewardError::Argument(format!("header {:?} is not \"Name: value\"", header)))?;
        builder = builder.header(name.trim(), value.trim());
    }

    builder
        .body(())
        .map_err(|e| EdgewardError::Argument(format!("invalid request: {}", e)))
}
