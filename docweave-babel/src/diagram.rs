//! Diagram pipeline
//!
//!     Fenced code blocks tagged with a diagram language are rendered to images by a
//!     [`DiagramRenderer`] (Kroki in the CLI) and saved next to the document. In inline
//!     mode the rendered blocks are swapped for image references and the document is
//!     written back.
//!
//!     Only exact tags from [`DiagramKind::ALL`] match; ```` ```python ```` or
//!     ```` ```mermaid-js ```` are left alone. Spans are byte offsets into the UTF-8
//!     text, and replacements are applied from the last block to the first so earlier
//!     offsets stay valid.
//!
//!     Each block renders on its own: one failing diagram is reported and skipped, the
//!     rest still render.

use crate::error::{PipelineError, ServiceError};
use crate::service::DiagramRenderer;
use crate::templates::image_reference;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Mermaid,
    PlantUml,
    Graphviz,
    Dot,
    D2,
    Ditaa,
    C4PlantUml,
    Structurizr,
    Vega,
    VegaLite,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 10] = [
        DiagramKind::Mermaid,
        DiagramKind::PlantUml,
        DiagramKind::Graphviz,
        DiagramKind::Dot,
        DiagramKind::D2,
        DiagramKind::Ditaa,
        DiagramKind::C4PlantUml,
        DiagramKind::Structurizr,
        DiagramKind::Vega,
        DiagramKind::VegaLite,
    ];

    /// The fence tag, as written in Markdown.
    pub fn tag(self) -> &'static str {
        match self {
            DiagramKind::Mermaid => "mermaid",
            DiagramKind::PlantUml => "plantuml",
            DiagramKind::Graphviz => "graphviz",
            DiagramKind::Dot => "dot",
            DiagramKind::D2 => "d2",
            DiagramKind::Ditaa => "ditaa",
            DiagramKind::C4PlantUml => "c4plantuml",
            DiagramKind::Structurizr => "structurizr",
            DiagramKind::Vega => "vega",
            DiagramKind::VegaLite => "vegalite",
        }
    }

    /// The type name the renderer expects. `dot` is an alias of `graphviz`.
    pub fn renderer_name(self) -> &'static str {
        match self {
            DiagramKind::Dot => "graphviz",
            other => other.tag(),
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Comma-separated, sorted list of accepted tags.
    pub fn supported_list() -> String {
        let mut tags: Vec<&str> = Self::ALL.iter().map(|kind| kind.tag()).collect();
        tags.sort_unstable();
        tags.join(", ")
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DiagramKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| {
            PipelineError::InvalidInput(format!(
                "Unsupported diagram type: {s}\nSupported: {}",
                Self::supported_list()
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(PipelineError::InvalidInput(format!(
                "Unsupported image format: {other} (expected png or svg)"
            ))),
        }
    }
}

/// A diagram fence found in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    pub kind: DiagramKind,
    /// Body of the fence with surrounding whitespace trimmed.
    pub source: String,
    /// Byte offset of the opening fence.
    pub start: usize,
    /// Byte offset just past the closing fence.
    pub end: usize,
}

static DIAGRAM_FENCE: Lazy<Regex> = Lazy::new(|| {
    let tags: Vec<&str> = DiagramKind::ALL.iter().map(|kind| kind.tag()).collect();
    Regex::new(&format!(
        r"(?ms)^```({})[ \t]*\r?\n(.*?)^```",
        tags.join("|")
    ))
    .expect("static regex")
});

/// All diagram blocks in document order.
pub fn extract_blocks(markdown: &str) -> Vec<DiagramBlock> {
    DIAGRAM_FENCE
        .captures_iter(markdown)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = DiagramKind::from_tag(caps.get(1)?.as_str())?;
            Some(DiagramBlock {
                kind,
                source: caps.get(2)?.as_str().trim().to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Replace `[start, end)` spans with new text. Spans must be sorted by start and not
/// overlap; text outside every span is kept byte for byte.
pub fn replace_spans(text: &str, replacements: &[(usize, usize, String)]) -> String {
    let mut result = text.to_string();
    for (start, end, replacement) in replacements.iter().rev() {
        result.replace_range(*start..*end, replacement);
    }
    result
}

/// A multi-diagram render over one Markdown document.
#[derive(Debug, Clone)]
pub struct DiagramJob<'a> {
    pub markdown: &'a str,
    /// The file the Markdown came from; names the images and receives inline updates.
    pub source_path: Option<&'a Path>,
    pub format: ImageFormat,
    /// Defaults to the source file's directory, else the working directory.
    pub output_dir: Option<PathBuf>,
    pub inline: bool,
}

impl<'a> DiagramJob<'a> {
    pub fn new(markdown: &'a str) -> Self {
        Self {
            markdown,
            source_path: None,
            format: ImageFormat::default(),
            output_dir: None,
            inline: false,
        }
    }

    pub fn with_source_path(mut self, path: &'a Path) -> Self {
        self.source_path = Some(path);
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    fn stem(&self) -> String {
        self.source_path
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "diagram".to_string())
    }

    fn source_dir(&self) -> Option<&Path> {
        self.source_path
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    fn resolve_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| self.source_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// What happened to one block.
#[derive(Debug)]
pub struct DiagramResult {
    /// 1-based position of the block in the document.
    pub index: usize,
    pub kind: DiagramKind,
    pub outcome: Result<PathBuf, ServiceError>,
}

#[derive(Debug, Default)]
pub struct DiagramReport {
    pub results: Vec<DiagramResult>,
    /// Set when inline mode rewrote the source file.
    pub updated_source: Option<PathBuf>,
}

impl DiagramReport {
    pub fn found(&self) -> usize {
        self.results.len()
    }

    pub fn rendered(&self) -> impl Iterator<Item = &Path> {
        self.results
            .iter()
            .filter_map(|result| result.outcome.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_err()).count()
    }
}

/// Render every diagram block of `job`.
///
/// Renderer failures are recorded per block. Failing to create the output
/// directory, write an image or update the source file is fatal.
pub fn render_diagrams(
    renderer: &dyn DiagramRenderer,
    job: &DiagramJob<'_>,
) -> Result<DiagramReport, PipelineError> {
    let blocks = extract_blocks(job.markdown);
    if blocks.is_empty() {
        return Ok(DiagramReport::default());
    }

    let out_dir = job.resolve_output_dir();
    fs::create_dir_all(&out_dir).map_err(|err| {
        PipelineError::io(format!("Cannot create {}", out_dir.display()), err)
    })?;

    let stem = job.stem();
    let extension = job.format.extension();
    let mut report = DiagramReport::default();
    let mut replacements = Vec::new();

    for (offset, block) in blocks.iter().enumerate() {
        let index = offset + 1;
        let path = out_dir.join(format!("{stem}-diagram-{index}.{extension}"));

        let outcome = match renderer.render(block.kind.renderer_name(), extension, &block.source) {
            Ok(bytes) => {
                fs::write(&path, &bytes).map_err(|err| {
                    PipelineError::io(format!("Cannot write {}", path.display()), err)
                })?;
                debug!(index, kind = %block.kind, path = %path.display(), "rendered diagram");
                if job.inline {
                    let alt = format!("{stem} diagram {index}");
                    replacements.push((
                        block.start,
                        block.end,
                        image_reference(&alt, &path, job.source_dir()),
                    ));
                }
                Ok(path)
            }
            Err(err) => {
                warn!(index, kind = %block.kind, error = %err, "diagram failed to render");
                Err(err)
            }
        };
        report.results.push(DiagramResult {
            index,
            kind: block.kind,
            outcome,
        });
    }

    if let Some(source) = job.source_path.filter(|_| !replacements.is_empty()) {
        let updated = replace_spans(job.markdown, &replacements);
        fs::write(source, updated)
            .map_err(|err| PipelineError::io(format!("Cannot update {}", source.display()), err))?;
        info!(path = %source.display(), count = replacements.len(), "inlined diagram images");
        report.updated_source = Some(source.to_path_buf());
    }

    Ok(report)
}

/// Render a single diagram of an explicit kind.
pub fn render_single(
    renderer: &dyn DiagramRenderer,
    kind: DiagramKind,
    format: ImageFormat,
    source: &str,
) -> Result<Vec<u8>, ServiceError> {
    renderer.render(kind.renderer_name(), format.extension(), source)
}
