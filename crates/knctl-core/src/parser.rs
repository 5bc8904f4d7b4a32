//! Interpretation of raw `kn` / `func` output.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::constants::{
    FUNC_MANIFEST, NO_FUNCTIONS, NO_REVISIONS, NO_SERVICES, NO_SOURCES,
};
use crate::error::{KnError, Result};
use crate::model::{FuncManifest, Function, ItemList, Revision, Service, Source};

/// True if `output` is the CLI's "nothing found" message for a resource.
pub fn is_sentinel(output: &str, sentinel: &str) -> bool {
    output.trim().eq_ignore_ascii_case(sentinel)
}

fn parse_items<T: DeserializeOwned>(output: &str, sentinel: &str) -> Result<Vec<T>> {
    if is_sentinel(output, sentinel) {
        debug!("matched sentinel '{}'", sentinel);
        return Ok(Vec::new());
    }
    let list: ItemList<T> = serde_json::from_str(output)?;
    Ok(list.items)
}

pub fn parse_services(output: &str) -> Result<Vec<Service>> {
    parse_items(output, NO_SERVICES)
}

pub fn parse_sources(output: &str) -> Result<Vec<Source>> {
    parse_items(output, NO_SOURCES)
}

/// Parses a revision list, newest generation first.
pub fn parse_revisions(output: &str) -> Result<Vec<Revision>> {
    let mut revisions: Vec<Revision> = parse_items(output, NO_REVISIONS)?;
    sort_revisions(&mut revisions);
    Ok(revisions)
}

/// Stable sort by descending generation; unnumbered names go last.
pub fn sort_revisions(revisions: &mut [Revision]) {
    revisions.sort_by_key(|r| std::cmp::Reverse(r.generation()));
}

/// `func list -o json` prints either a bare array or an `items` envelope.
pub fn parse_functions(output: &str) -> Result<Vec<Function>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FunctionList {
        Bare(Vec<Function>),
        Envelope(ItemList<Function>),
    }

    if is_sentinel(output, NO_FUNCTIONS) {
        debug!("matched sentinel '{}'", NO_FUNCTIONS);
        return Ok(Vec::new());
    }
    match serde_json::from_str::<FunctionList>(output) {
        Ok(FunctionList::Bare(items)) => Ok(items),
        Ok(FunctionList::Envelope(list)) => Ok(list.items),
        Err(e) => Err(KnError::Parse(e.to_string())),
    }
}

pub fn parse_service(output: &str) -> Result<Service> {
    Ok(serde_json::from_str(output)?)
}

pub fn parse_revision(output: &str) -> Result<Revision> {
    Ok(serde_json::from_str(output)?)
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(rename = "ID")]
    id: Option<String>,
}

/// Extracts the execution ID from `func invoke -o json` output.
pub fn parse_invoke_id(output: Option<&str>) -> Result<String> {
    let text = output.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(KnError::MissingInvokeId("Invoke returned no output.".to_string()));
    }
    let response: InvokeResponse = serde_json::from_str(text)
        .map_err(|e| KnError::MissingInvokeId(format!("Unable to parse response: {e}")))?;
    match response.id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(KnError::MissingInvokeId(format!(
            "Response has no ID field: {text}"
        ))),
    }
}

/// Locates `func.yaml` directly inside `dir`.
pub fn find_func_file(dir: &Path) -> Result<PathBuf> {
    let file = dir.join(FUNC_MANIFEST);
    if dir.is_dir() && file.is_file() {
        Ok(file)
    } else {
        Err(KnError::FuncFileNotFound)
    }
}

pub fn parse_func_manifest(text: &str) -> Result<FuncManifest> {
    Ok(serde_yaml::from_str(text)?)
}

/// Version from `kn version` (`Version: v1.x`) or `func version` (first line).
pub fn parse_version(output: &str) -> Option<String> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let first = lines.next()?;
    let tagged = std::iter::once(first)
        .chain(lines)
        .find_map(|line| line.strip_prefix("Version:"));
    Some(tagged.unwrap_or(first).trim().to_string())
}
