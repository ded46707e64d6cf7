//! `specgate validate` — load a specs directory without starting.
//!
//! Runs the same loader as `specgate run`, so malformed documents fail
//! here exactly as they would at startup. On success it lists every
//! service, marks which ones are proxyable, and flags `baseURL` values
//! that are not absolute http(s) URLs. Output is human-readable text or
//! machine-readable JSON.

use url::Url;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::error::SpecgateError;
use crate::store::{FileSpecStore, SpecStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub name: String,
    pub base_url: Option<String>,
    pub problem: Option<String>,
}

/// Check that a `baseURL` is an absolute http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<(), String> {
    match Url::parse(base_url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{base_url}' is not a valid URL")),
    }
}

#[must_use]
pub fn inspect(store: &dyn SpecStore) -> Vec<ServiceReport> {
    store
        .list()
        .into_iter()
        .map(|name| {
            let base_url = store.get_config(&name).ok().map(|c| c.base_url.clone());
            let problem = base_url
                .as_deref()
                .and_then(|url| validate_base_url(url).err());
            ServiceReport {
                name,
                base_url,
                problem,
            }
        })
        .collect()
}

pub async fn execute(args: &ValidateArgs) -> Result<(), SpecgateError> {
    let store = FileSpecStore::load(args.specs_dir.clone()).await?;
    let reports = inspect(&store);
    let problems = reports.iter().filter(|r| r.problem.is_some()).count();
    let dir = args.specs_dir.display();

    match args.format {
        ValidateFormat::Text => {
            if problems == 0 {
                println!(
                    "\u{2713} {dir}: {} services, {} proxyable",
                    reports.len(),
                    store.proxyable_count()
                );
            } else {
                eprintln!("\u{2717} {dir} has {problems} problems\n");
            }
            for report in &reports {
                match (&report.base_url, &report.problem) {
                    (_, Some(problem)) => eprintln!("  {}: {problem}", report.name),
                    (Some(url), None) => println!("  {} \u{2192} {url}", report.name),
                    (None, None) => println!("  {} (spec only)", report.name),
                }
            }
        }
        ValidateFormat::Json => {
            let services: Vec<serde_json::Value> = reports
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "name": r.name,
                        "proxyable": r.base_url.is_some(),
                        "baseURL": r.base_url,
                        "problem": r.problem,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "valid": problems == 0,
                    "services": services,
                })
            );
        }
    }

    if problems > 0 {
        return Err(SpecgateError::ValidationFailed(problems));
    }
    Ok(())
}
