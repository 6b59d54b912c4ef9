//! Output formats and renderers for CLI payloads.
//!
//! Every payload goes to stdout. JSON payloads are wrapped in an envelope
//! carrying `schema_version`, `run_id`, `generated_at` and `command`.

use crate::estimate::{DiagramFit, MarginalFit, SurfaceMesh};
use crate::SCHEMA_VERSION;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default)
    #[default]
    Json,

    /// Human-readable Markdown
    Md,

    /// One-line summary
    Summary,

    /// Minimal output (exit code only)
    Exitcode,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Md => write!(f, "md"),
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Exitcode => write!(f, "exitcode"),
        }
    }
}

/// Wrap `payload` in the standard JSON envelope.
pub fn json_envelope(run_id: &str, command: &str, payload: serde_json::Value) -> serde_json::Value {
    let mut envelope = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "command": command,
    });
    if let (Some(map), serde_json::Value::Object(fields)) = (envelope.as_object_mut(), payload) {
        map.extend(fields);
    }
    envelope
}

/// One line per diagram fit.
pub fn fit_summary(fit: &DiagramFit) -> String {
    format!(
        "creation MAP {} (n={}) | destruction MAP {} (n={})",
        fit.creation.map.params,
        fit.creation.sample_size,
        fit.destruction.map.params,
        fit.destruction.sample_size
    )
}

/// Markdown report of a diagram fit.
pub fn fit_markdown(fit: &DiagramFit, input: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Intensity estimate: {input}\n");
    marginal_markdown(&mut out, "Creation", &fit.creation);
    marginal_markdown(&mut out, "Destruction", &fit.destruction);
    out
}

fn marginal_markdown(out: &mut String, title: &str, fit: &MarginalFit) {
    let _ = writeln!(out, "## {title}\n");
    let _ = writeln!(out, "| | shape | rate |");
    let _ = writeln!(out, "|---|---|---|");
    let _ = writeln!(
        out,
        "| initial ({}) | {:.6} | {:.6} |",
        fit.initial_method,
        fit.point_estimate.shape(),
        fit.point_estimate.rate()
    );
    let _ = writeln!(
        out,
        "| MAP | {:.6} | {:.6} |",
        fit.map.params.shape(),
        fit.map.params.rate()
    );
    let _ = writeln!(
        out,
        "\n{} candidates per axis, {} observations ({} scored), log score {:.4}\n",
        fit.prior_range.len(),
        fit.sample_size,
        fit.observations_used,
        fit.map.log_score
    );
}

/// One line per sampled surface.
pub fn surface_summary(fit: &DiagramFit, mesh: &SurfaceMesh) -> String {
    let (nx, ny) = mesh.dims();
    match mesh.peak() {
        Some((x, y, z)) => format!(
            "{}x{} mesh, peak {:.6e} at ({:.4}, {:.4}) | {}",
            nx,
            ny,
            z,
            x,
            y,
            fit_summary(fit)
        ),
        None => format!("{}x{} mesh, empty | {}", nx, ny, fit_summary(fit)),
    }
}

/// Markdown report of a sampled surface; the mesh itself is JSON-only.
pub fn surface_markdown(fit: &DiagramFit, mesh: &SurfaceMesh, input: &str) -> String {
    let mut out = fit_markdown(fit, input);
    let (nx, ny) = mesh.dims();
    let _ = writeln!(out, "## Joint intensity\n");
    let _ = writeln!(out, "Mesh: {nx} creation × {ny} destruction values.");
    if let Some((x, y, z)) = mesh.peak() {
        let _ = writeln!(out, "Peak: {z:.6e} at ({x:.4}, {y:.4}).");
    }
    out
}
