//! Batch evaluation over a fixture set.
//!
//! Replays (image, expected label) pairs through the inspection pipeline
//! and reports match/mismatch counts. Tooling over the core, not part of
//! it: a failure in one case never aborts the run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use patina_core::{inspect, provider_from_settings, InspectionResult, Settings, VisionProvider};

#[derive(Debug, Deserialize)]
pub struct EvalCase {
    #[serde(default)]
    pub id: Option<String>,
    /// Image path, relative to the cases file.
    pub image: PathBuf,
    #[serde(default)]
    pub part_type: Option<String>,
    /// Expected classification; cases without one are run but not scored.
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaseOutcome {
    pub id: Option<String>,
    pub image: String,
    /// "ok" | "missing_file" | "error"
    pub status: &'static str,
    pub expected: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub result: Option<InspectionResult>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_cases: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub missing_files: usize,
    pub errors: usize,
}

#[derive(Debug, Serialize)]
struct Report {
    timestamp: u64,
    summary: Summary,
    results: Vec<CaseOutcome>,
}

/// Run the eval with settings and provider from the environment.
pub async fn run(cases_path: &Path, results_path: &Path) -> Result<()> {
    let settings = Settings::from_env();
    let provider = provider_from_settings(&settings);
    run_with(cases_path, results_path, &settings, provider.as_ref()).await
}

/// Run the eval with an explicit provider (tests inject a canned one).
pub async fn run_with(
    cases_path: &Path,
    results_path: &Path,
    settings: &Settings,
    provider: &dyn VisionProvider,
) -> Result<()> {
    let cases_text = fs::read_to_string(cases_path)
        .with_context(|| format!("Missing cases file: {}", cases_path.display()))?;
    let cases: Vec<EvalCase> =
        serde_json::from_str(&cases_text).context("cases file is not a JSON array of cases")?;

    let base_dir = cases_path.parent().unwrap_or_else(|| Path::new("."));

    let mut results = Vec::with_capacity(cases.len());
    for case in cases {
        results.push(run_case(case, base_dir, settings, provider).await);
    }

    let summary = summarize(&results);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let report = Report {
        timestamp,
        summary,
        results,
    };

    fs::write(results_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write {}", results_path.display()))?;

    let s = &report.summary;
    println!(
        "Eval complete: {} match, {} mismatch, {} missing, {} errors ({} cases).",
        s.matches, s.mismatches, s.missing_files, s.errors, s.total_cases
    );
    println!("Details saved to {}", results_path.display());

    Ok(())
}

async fn run_case(
    case: EvalCase,
    base_dir: &Path,
    settings: &Settings,
    provider: &dyn VisionProvider,
) -> CaseOutcome {
    let image_path = base_dir.join(&case.image);
    let image_display = image_path.display().to_string();

    let image_bytes = match fs::read(&image_path) {
        Ok(bytes) => bytes,
        Err(_) => {
            return CaseOutcome {
                id: case.id,
                image: image_display,
                status: "missing_file",
                expected: case.expected,
                notes: case.notes,
                result: None,
                matched: None,
                error: None,
            }
        }
    };

    match inspect(&image_bytes, case.part_type.as_deref(), settings, provider).await {
        Ok(result) => {
            let matched = case
                .expected
                .as_deref()
                .map(|expected| expected == result.classification);
            CaseOutcome {
                id: case.id,
                image: image_display,
                status: "ok",
                expected: case.expected,
                notes: case.notes,
                result: Some(result),
                matched,
                error: None,
            }
        }
        Err(e) => CaseOutcome {
            id: case.id,
            image: image_display,
            status: "error",
            expected: case.expected,
            notes: case.notes,
            result: None,
            matched: None,
            error: Some(e.to_string()),
        },
    }
}

fn summarize(results: &[CaseOutcome]) -> Summary {
    Summary {
        total_cases: results.len(),
        matches: results.iter().filter(|r| r.matched == Some(true)).count(),
        mismatches: results.iter().filter(|r| r.matched == Some(false)).count(),
        missing_files: results
            .iter()
            .filter(|r| r.status == "missing_file")
            .count(),
        errors: results.iter().filter(|r| r.status == "error").count(),
    }
}
