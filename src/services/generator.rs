//! The `generate` run: inputs in, documents out.
//!
//! Every output is rendered in memory and staged in a temporary file beside
//! its target. Targets are replaced only once every output is staged, so a
//! fatal error leaves existing outputs untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use keycap_match::{derive_theme, KeyAssignment, KeycapMapper, Overlay, ReducerOptions};

use super::documents::{
    color_code_document, preview_document, to_pretty_json, ThemeDocument,
};
use super::image_loader::load_image;
use super::loader::{load_layout, load_palette, load_template};
use crate::error::GenerateError;
use crate::rendering::{preview_size, render_preview};

/// Inputs and outputs of one run, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub image: PathBuf,
    /// Area of the image the keyboard covers; the whole image if `None`.
    pub overlay: Option<Overlay>,
    pub palette: PathBuf,
    pub layout: PathBuf,
    pub template: PathBuf,
    pub output_field: String,
    pub options: ReducerOptions,
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
    pub preview_png: Option<PathBuf>,
    pub theme: Option<PathBuf>,
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub assignment: KeyAssignment,
    pub written: Vec<PathBuf>,
}

impl GenerateSummary {
    pub fn warning_count(&self) -> usize {
        self.assignment.warnings().count()
    }
}

pub fn generate(request: &GenerateRequest) -> Result<GenerateSummary, GenerateError> {
    let palette = load_palette(&request.palette)?;
    let layout = load_layout(&request.layout)?;
    let template = load_template(&request.template)?;
    let image = load_image(&request.image)?;
    let canvas = image.buffer().map_err(keycap_match::MapError::from)?;

    let overlay = request.overlay.unwrap_or_else(|| Overlay::covering(&canvas));
    let mapper = KeycapMapper::new(&layout, &palette)?.options(request.options.clone());
    let assignment = mapper.process_region(&canvas, overlay)?;

    for (key, color) in assignment.warnings() {
        tracing::debug!(key, code = %color.code, source = ?color.source, "Key needs review");
    }

    let mut outputs: Vec<(PathBuf, Vec<u8>)> = Vec::new();
    let document = color_code_document(&template, &request.output_field, &assignment);
    outputs.push((request.output.clone(), to_pretty_json(&document)?.into_bytes()));

    if let Some(path) = &request.preview {
        let preview = preview_document(&assignment);
        outputs.push((path.clone(), to_pretty_json(&preview)?.into_bytes()));
    }

    if let Some(path) = &request.preview_png {
        let (width, height) = preview_size(overlay.width, overlay.height);
        outputs.push((path.clone(), render_preview(&layout, &assignment, width, height)?));
    }

    if let Some(path) = &request.theme {
        let theme = ThemeDocument::from(derive_theme(&canvas, &overlay, mapper.reducer_options()));
        outputs.push((path.clone(), to_pretty_json(&theme)?.into_bytes()));
    }

    let written = write_outputs(outputs)?;

    Ok(GenerateSummary {
        assignment,
        written,
    })
}

/// Stage every output, then rename the staged files over their targets.
fn write_outputs(outputs: Vec<(PathBuf, Vec<u8>)>) -> Result<Vec<PathBuf>, GenerateError> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, bytes) in outputs {
        match stage(&path, &bytes) {
            Ok(file) => staged.push((path, file)),
            // Dropping `staged` removes the temporary files.
            Err(source) => return Err(GenerateError::Output { path, source }),
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    for (path, file) in staged {
        file.persist(&path).map_err(|e| GenerateError::Output {
            path: path.clone(),
            source: e.error,
        })?;
        tracing::info!(path = %path.display(), "Wrote output");
        written.push(path);
    }
    Ok(written)
}

fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::Builder::new()
        .prefix(".keycap-mapper-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    Ok(file)
}

/// Parse an `x,y,width,height` overlay argument.
pub fn parse_overlay(s: &str) -> Result<Overlay, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid overlay {s:?}: {e}"))?;
    let [x, y, width, height] = parts[..] else {
        return Err(format!(
            "invalid overlay {s:?}: expected x,y,width,height"
        ));
    };
    let overlay = Overlay::new(x, y, width, height);
    overlay.validate().map_err(|e| e.to_string())?;
    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overlay() {
        assert_eq!(
            parse_overlay("10, 20.5,300,100").unwrap(),
            Overlay::new(10.0, 20.5, 300.0, 100.0)
        );
    }

    #[test]
    fn test_parse_overlay_rejects_bad_input() {
        assert!(parse_overlay("1,2,3").is_err());
        assert!(parse_overlay("a,b,c,d").is_err());
        assert!(parse_overlay("0,0,0,100").is_err());
    }

    #[test]
    fn test_staging_failure_leaves_targets_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        std::fs::write(&first, b"previous").unwrap();
        let second = dir.path().join("missing").join("second.json");

        let err = write_outputs(vec![
            (first.clone(), b"new".to_vec()),
            (second.clone(), b"new".to_vec()),
        ])
        .unwrap_err();

        assert!(matches!(err, GenerateError::Output { ref path, .. } if *path == second));
        assert_eq!(std::fs::read(&first).unwrap(), b"previous");
        // Only the original file remains; no staged leftovers.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_outputs_replace_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        std::fs::write(&out, b"previous").unwrap();

        let written = write_outputs(vec![(out.clone(), b"{}".to_vec())]).unwrap();
        assert_eq!(written, vec![out.clone()]);
        assert_eq!(std::fs::read(&out).unwrap(), b"{}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
