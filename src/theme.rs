//! Accent color and icon assets.
//!
//! Four files under the content root are touched, each rewritten whole:
//!
//! | File            | Edit                                             |
//! |-----------------|--------------------------------------------------|
//! | `override_file` | `$accentColor = …` line set to the accent color  |
//! | `svg_icon`      | every `fill="…"` set to the icon color           |
//! | `png_icon`      | re-rendered from the recolored SVG               |
//! | `manifest`      | `theme_color` set to the accent color            |
//!
//! The PNG is rendered at the SVG's intrinsic size.

use crate::config::ThemeConfig;
use crate::types::StepOutput;
use image::{DynamicImage, ImageFormat, RgbaImage};
use regex::Regex;
use resvg::{tiny_skia, usvg};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid SVG {}: {source}", path.display())]
    Svg {
        path: PathBuf,
        #[source]
        source: usvg::Error,
    },
    #[error("cannot render {}: {reason}", path.display())]
    Render { path: PathBuf, reason: String },
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bad pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn read(path: &Path) -> Result<String, ThemeError> {
    fs::read_to_string(path).map_err(|source| ThemeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), ThemeError> {
    fs::write(path, contents).map_err(|source| ThemeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Set the `$accentColor` line. `None` when the stylesheet has no such line.
pub fn recolor_stylesheet(stylesheet: &str, accent: &str) -> Result<Option<String>, ThemeError> {
    let line = Regex::new(r"\$accentColor.+")?;
    if !line.is_match(stylesheet) {
        return Ok(None);
    }
    let replacement = format!("$accentColor = {accent}");
    Ok(Some(
        line.replace(stylesheet, regex::NoExpand(&replacement)).into_owned(),
    ))
}

/// Set every `fill` attribute of an SVG document.
pub fn recolor_svg(svg: &str, color: &str) -> Result<String, ThemeError> {
    let fill = Regex::new(r#"fill="[#0-9A-Za-z(),. %]+""#)?;
    let replacement = format!("fill=\"{color}\"");
    Ok(fill.replace_all(svg, regex::NoExpand(&replacement)).into_owned())
}

/// Render an SVG document to PNG at its intrinsic size.
pub fn rasterize(svg: &str, source: &Path) -> Result<RgbaImage, ThemeError> {
    let tree = usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default()).map_err(|e| {
        ThemeError::Svg {
            path: source.to_path_buf(),
            source: e,
        }
    })?;

    let size = tree.size().to_int_size();
    let mut pixmap =
        tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| ThemeError::Render {
            path: source.to_path_buf(),
            reason: format!("empty canvas {}x{}", size.width(), size.height()),
        })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(size.width(), size.height(), rgba).ok_or_else(|| ThemeError::Render {
        path: source.to_path_buf(),
        reason: "pixel buffer size mismatch".to_string(),
    })
}

/// Set `theme_color`, keeping every other key in place.
pub fn update_manifest(manifest: &str, accent: &str, path: &Path) -> Result<String, ThemeError> {
    let mut doc: Value = serde_json::from_str(manifest).map_err(|source| ThemeError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    let Some(fields) = doc.as_object_mut() else {
        return Err(ThemeError::Manifest {
            path: path.to_path_buf(),
            source: serde::de::Error::custom("manifest is not a JSON object"),
        });
    };
    fields.insert("theme_color".to_string(), Value::from(accent));

    let mut text = serde_json::to_string_pretty(&doc).map_err(|source| ThemeError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    Ok(text)
}

/// Apply the configured colors to every theme asset.
pub fn apply(root: &Path, config: &ThemeConfig) -> Result<StepOutput, ThemeError> {
    let mut output = StepOutput::default();

    let stylesheet_path = root.join(&config.override_file);
    match recolor_stylesheet(&read(&stylesheet_path)?, &config.accent_color)? {
        Some(stylesheet) => {
            write(&stylesheet_path, stylesheet)?;
            output.written.push(PathBuf::from(&config.override_file));
        }
        None => output.warn(format!(
            "no $accentColor line in {}; left unchanged",
            config.override_file
        )),
    }

    let svg_path = root.join(&config.svg_icon);
    let svg = recolor_svg(&read(&svg_path)?, &config.icon_color)?;
    write(&svg_path, &svg)?;
    output.written.push(PathBuf::from(&config.svg_icon));

    let png_path = root.join(&config.png_icon);
    let icon = rasterize(&svg, &svg_path)?;
    if let Some(parent) = png_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ThemeError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    DynamicImage::ImageRgba8(icon)
        .save_with_format(&png_path, ImageFormat::Png)
        .map_err(|source| ThemeError::Encode {
            path: png_path.clone(),
            source,
        })?;
    output.written.push(PathBuf::from(&config.png_icon));

    let manifest_path = root.join(&config.manifest);
    let manifest = update_manifest(&read(&manifest_path)?, &config.accent_color, &manifest_path)?;
    write(&manifest_path, manifest)?;
    output.written.push(PathBuf::from(&config.manifest));

    Ok(output)
}
