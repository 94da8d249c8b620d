//! File-level pipeline: load, pick the target, transform, preview, save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, info, warn};

use crate::color::Color;
use crate::composite;
use crate::error::{Error, Result};
use crate::kernel::TransformOptions;
use crate::palette;

/// Options controlling file processing.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Transform parameters. `transform.target` is used unless `auto_target` is set.
    pub transform: TransformOptions,
    /// Use each image's most frequent color as the target.
    pub auto_target: bool,
    /// Composite the result over this opaque color before saving.
    pub background: Option<Color>,
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Target color that was removed, once known.
    pub target: Option<Color>,
    /// Number of fully transparent pixels in the output.
    pub transparent_pixels: u64,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            target: None,
            transparent_pixels: 0,
            message,
        }
    }
}

/// Applies color-to-alpha to image files.
///
/// Thresholds are validated once at construction, so a bad configuration is
/// reported before any file is touched.
#[derive(Debug, Clone)]
pub struct Engine {
    opts: ProcessOptions,
}

impl Engine {
    /// Create an engine for `opts`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the thresholds do not fit the shape.
    pub fn new(opts: ProcessOptions) -> Result<Self> {
        opts.transform.validate()?;
        Ok(Self { opts })
    }

    /// The options this engine runs with.
    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.opts
    }

    /// Transform an in-memory image, choosing the target and compositing the
    /// preview background as configured.
    ///
    /// Layouts other than 8-bit RGB/RGBA are converted to RGBA first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] for images without pixels, or any
    /// configuration error from the transform.
    pub fn apply(&self, image: &DynamicImage) -> Result<(RgbaImage, Color)> {
        let mut transform = self.opts.transform;
        if self.opts.auto_target {
            transform.target = palette::dominant_color(image).ok_or(Error::EmptyImage)?;
            debug!("dominant color {} selected as target", transform.target);
        }

        let kernel = transform.resolve()?;
        let result = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => kernel.transform(image)?,
            other => {
                debug!("converting {:?} to RGBA8", other.color());
                kernel.transform_buffer(&other.to_rgba8())?
            }
        };

        let result = match self.opts.background {
            Some(bg) => composite::over_background(&result, bg),
            None => result,
        };
        Ok((result, transform.target))
    }

    /// Process a single image file: load, transform, save.
    ///
    /// Returns a [`ProcessResult`] describing success or failure.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        let dyn_img = match image::open(input) {
            Ok(img) => img,
            Err(e) => {
                warn!("failed to load {}: {e}", input.display());
                return ProcessResult::failed(input, format!("Failed to load: {e}"));
            }
        };

        let (result, target) = match self.apply(&dyn_img) {
            Ok(r) => r,
            Err(e) => {
                warn!("failed to transform {}: {e}", input.display());
                return ProcessResult::failed(input, format!("Failed to transform: {e}"));
            }
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failed(
                        input,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        if let Err(e) = save_image(&result, output) {
            warn!("failed to save {}: {e}", output.display());
            return ProcessResult::failed(input, format!("Failed to save: {e}"));
        }

        let transparent_pixels = result.pixels().filter(|p| p[3] == 0).count() as u64;
        info!(
            "{} -> {} (target {target}, {transparent_pixels} transparent pixels)",
            input.display(),
            output.display()
        );

        ProcessResult {
            path: input.to_path_buf(),
            success: true,
            target: Some(target),
            transparent_pixels,
            message: format!("Saved {}", output.display()),
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Each output is written as `<output_dir>/<stem>.png`. Inputs sharing a
    /// stem keep their extension in the name (`a.bmp` becomes `a_bmp.png`);
    /// an input whose output name is still taken by an earlier entry fails
    /// without writing. Files are processed in parallel when the `parallel`
    /// feature is enabled.
    #[must_use]
    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Vec<ProcessResult> {
        let mut entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };
        entries.sort();

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let jobs = plan_outputs(entries, output_dir);
        let run = |(input_path, output): &(PathBuf, OutputSlot)| match output {
            Ok(output_path) => self.process_file(input_path, output_path),
            Err(message) => {
                warn!("skipping {}: {message}", input_path.display());
                ProcessResult::failed(input_path, message.clone())
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            jobs.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            jobs.iter().map(run).collect()
        }
    }
}

/// Output path for a directory entry, or why it has none.
type OutputSlot = std::result::Result<PathBuf, String>;

/// Assign every input a distinct output path inside `output_dir`.
///
/// `entries` must already be sorted; when two inputs would still write the same
/// file, the earlier one keeps it.
fn plan_outputs(entries: Vec<PathBuf>, output_dir: &Path) -> Vec<(PathBuf, OutputSlot)> {
    fn stem_of(path: &Path) -> String {
        path.file_stem().unwrap_or_default().to_string_lossy().into_owned()
    }

    let mut stems: HashMap<String, usize> = HashMap::new();
    for path in &entries {
        *stems.entry(stem_of(path)).or_default() += 1;
    }

    let mut taken: HashMap<PathBuf, PathBuf> = HashMap::new();
    entries
        .into_iter()
        .map(|input| {
            let stem = stem_of(&input);
            let name = if stems.get(&stem).copied().unwrap_or(0) > 1 {
                let ext = input
                    .extension()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_lowercase();
                format!("{stem}_{ext}.png")
            } else {
                format!("{stem}.png")
            };
            let output = output_dir.join(name);
            let slot = match taken.get(&output) {
                Some(first) => Err(format!(
                    "Output {} is already written for {}",
                    output.display(),
                    first.display()
                )),
                None => {
                    taken.insert(output.clone(), input.clone());
                    Ok(output)
                }
            };
            (input, slot)
        })
        .collect()
}

/// Check if a file has a supported input image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGBA image in a format that keeps the alpha channel.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for formats without transparency
/// (such as JPEG) or unknown extensions, or an error if writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Tiff => {
            img.save_with_format(path, format)?;
        }
        ImageFormat::Jpeg => {
            return Err(Error::UnsupportedFormat(
                "JPEG cannot store transparency, use .png".to_string(),
            ));
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_alpha.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_alpha.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Shape;
    use image::{Rgb, RgbImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("color-to-alpha-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_output_path_appends_alpha_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_alpha.png"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(p.file_name().unwrap().to_str().unwrap(), "image_alpha.png");
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn save_image_rejects_jpeg() {
        let img = RgbaImage::new(1, 1);
        let err = save_image(&img, Path::new("out.jpg")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn engine_rejects_bad_thresholds_up_front() {
        let opts = ProcessOptions {
            transform: TransformOptions {
                shape: Shape::Cube,
                opacity_threshold: 400.0,
                ..TransformOptions::default()
            },
            ..ProcessOptions::default()
        };
        assert!(Engine::new(opts).is_err());
    }

    #[test]
    fn apply_with_auto_target_uses_dominant_color() {
        let mut img = RgbImage::from_pixel(6, 6, Rgb([0, 255, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        let engine = Engine::new(ProcessOptions {
            auto_target: true,
            ..ProcessOptions::default()
        })
        .unwrap();

        let (out, target) = engine.apply(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(target, Color::new(0, 255, 0));
        assert_eq!(out.get_pixel(1, 1)[3], 0);
        assert_eq!(out.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn apply_with_background_is_opaque() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let engine = Engine::new(ProcessOptions {
            background: Some(Color::new(0x10, 0xEA, 0xEC)),
            ..ProcessOptions::default()
        })
        .unwrap();

        let (out, _) = engine.apply(&DynamicImage::ImageRgb8(img)).unwrap();
        assert!(out.pixels().all(|p| p.0 == [0x10, 0xEA, 0xEC, 255]));
    }

    #[test]
    fn apply_converts_grayscale_input() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(3, 3, image::Luma([0])));
        let engine = Engine::new(ProcessOptions::default()).unwrap();
        let (out, _) = engine.apply(&img).unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn process_file_round_trips_through_png() {
        let dir = scratch_dir("file");
        let input = dir.join("in.png");
        RgbImage::from_fn(4, 4, |x, _| if x < 2 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) })
            .save(&input)
            .unwrap();

        let engine = Engine::new(ProcessOptions::default()).unwrap();
        let output = default_output_path(&input);
        let result = engine.process_file(&input, &output);
        assert!(result.success, "{}", result.message);
        assert_eq!(result.transparent_pixels, 8);
        assert_eq!(result.target, Some(Color::WHITE));

        let saved = image::open(&output).unwrap().to_rgba8();
        assert_eq!(saved.get_pixel(0, 0)[3], 0);
        assert_eq!(saved.get_pixel(3, 0).0, [0, 0, 0, 255]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn process_file_reports_missing_input() {
        let engine = Engine::new(ProcessOptions::default()).unwrap();
        let result = engine.process_file(Path::new("/nonexistent/in.png"), Path::new("out.png"));
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to load"));
    }

    #[test]
    fn process_directory_writes_png_per_input() {
        let dir = scratch_dir("dir");
        let input_dir = dir.join("in");
        let output_dir = dir.join("out");
        std::fs::create_dir_all(&input_dir).unwrap();
        for name in ["a.png", "b.bmp"] {
            RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]))
                .save(input_dir.join(name))
                .unwrap();
        }
        std::fs::write(input_dir.join("notes.txt"), "skip me").unwrap();

        let engine = Engine::new(ProcessOptions::default()).unwrap();
        let results = engine.process_directory(&input_dir, &output_dir);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert!(output_dir.join("a.png").exists());
        assert!(output_dir.join("b.png").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn process_directory_keeps_extension_for_shared_stems() {
        let dir = scratch_dir("shared-stem");
        let input_dir = dir.join("in");
        let output_dir = dir.join("out");
        std::fs::create_dir_all(&input_dir).unwrap();
        RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]))
            .save(input_dir.join("a.png"))
            .unwrap();
        RgbImage::from_pixel(3, 3, Rgb([255, 0, 0]))
            .save(input_dir.join("a.bmp"))
            .unwrap();

        let engine = Engine::new(ProcessOptions::default()).unwrap();
        let results = engine.process_directory(&input_dir, &output_dir);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success), "{results:?}");
        assert!(!output_dir.join("a.png").exists());

        let from_png = image::open(output_dir.join("a_png.png")).unwrap().to_rgba8();
        let from_bmp = image::open(output_dir.join("a_bmp.png")).unwrap().to_rgba8();
        assert_eq!(from_png.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_eq!(from_bmp.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(std::fs::read_dir(&output_dir).unwrap().count(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn plan_outputs_fails_later_entries_that_still_collide() {
        let out = Path::new("out");
        let entries = vec![
            PathBuf::from("in/a.bmp"),
            PathBuf::from("in/a.png"),
            PathBuf::from("in/a_png.bmp"),
            PathBuf::from("in/b.webp"),
        ];
        let plan = plan_outputs(entries, out);

        assert_eq!(plan[0].1, Ok(out.join("a_bmp.png")));
        assert_eq!(plan[1].1, Ok(out.join("a_png.png")));
        let err = plan[2].1.as_ref().unwrap_err();
        assert!(err.contains("a.png"), "{err}");
        assert_eq!(plan[3].1, Ok(out.join("b.png")));
    }
}
