//! Document orchestration.
//!
//! [`write_document`] drives a [`ContainerInspector`] and writes either a
//! success document (streams, chapters, format) or an error document. The
//! lower-level [`write_container_document`] and [`write_error_document`] are
//! exposed for callers that already hold a [`Container`] or a failure.
//!
//! # Example
//!
//! ```no_run
//! use probe_json::{FfmpegInspector, Outcome, ProbeOptions, write_document};
//!
//! let inspector = FfmpegInspector::new()?;
//! let mut out = Vec::new();
//! match write_document(&inspector, "input.mp4", &ProbeOptions::new(), &mut out)? {
//!     Outcome::Success => println!("{}", String::from_utf8_lossy(&out)),
//!     Outcome::Failure(error) => eprintln!("probe failed: {error}"),
//! }
//! # Ok::<(), probe_json::ProbeError>(())
//! ```

use std::io::{Result as IoResult, Write};

use crate::config::ProbeOptions;
use crate::error::ProbeError;
use crate::formatter::{field_context, write_chapter, write_error, write_format, write_stream};
use crate::inspector::ContainerInspector;
use crate::json::ObjectWriter;
use crate::metadata::Container;
use crate::registry::Registry;

/// Which document was written.
#[must_use]
#[derive(Debug)]
pub enum Outcome {
    /// The container was probed and described.
    Success,
    /// The container could not be probed; an error document was written.
    Failure(ProbeError),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Write the success document for `container`.
///
/// Sections appear in the order streams, chapters, format, each only when
/// enabled in `options`. The document ends with a newline.
pub fn write_container_document<W: Write + ?Sized>(
    out: &mut W,
    container: &Container,
    registry: &dyn Registry,
    options: &ProbeOptions,
) -> IoResult<()> {
    let context = field_context(container, registry);
    let mut root = ObjectWriter::document(out)?;

    if options.streams() {
        let mut streams = root.array("streams")?;
        for stream in &container.streams {
            write_stream(&mut streams, stream, &context)?;
        }
        streams.finish()?;
    }

    if options.chapters() {
        let mut chapters = root.array("chapters")?;
        for chapter in &container.chapters {
            write_chapter(&mut chapters, chapter, &context)?;
        }
        chapters.finish()?;
    }

    if options.format() {
        write_format(&mut root, container, &context)?;
    }

    root.finish()?;
    out.write_all(b"\n")
}

/// Write the error document for a probe failure.
pub fn write_error_document<W: Write + ?Sized>(
    out: &mut W,
    code: i32,
    message: &str,
) -> IoResult<()> {
    let mut root = ObjectWriter::document(out)?;
    write_error(&mut root, code, message)?;
    root.finish()?;
    out.write_all(b"\n")
}

/// Probe `url` with `inspector` and write the resulting document to `out`.
///
/// Open and stream-info failures are not errors of this function: they
/// produce the error document and [`Outcome::Failure`]. The container is
/// dropped before this function returns on both paths.
///
/// # Errors
///
/// Returns [`ProbeError::InvalidOption`] when `options` selects no section,
/// [`ProbeError::IoError`] when `out` fails, and any inspector error other
/// than the two probe failure kinds.
pub fn write_document<I, W>(
    inspector: &I,
    url: &str,
    options: &ProbeOptions,
    out: &mut W,
) -> Result<Outcome, ProbeError>
where
    I: ContainerInspector + ?Sized,
    W: Write + ?Sized,
{
    options.validate()?;
    log::debug!("Probing {url}");

    let container = match inspector.inspect(url) {
        Ok(container) => container,
        Err(error) => {
            let Some((code, message)) = error.failure() else {
                return Err(error);
            };
            log::warn!("Probe of {url} failed with code {code}: {message}");
            write_error_document(out, code, message)?;
            return Ok(Outcome::Failure(error));
        }
    };

    log::info!(
        "Probed {url} as {}: {} streams, {} chapters",
        container.format_name,
        container.streams.len(),
        container.chapters.len()
    );
    write_container_document(out, &container, inspector.registry(), options)?;
    Ok(Outcome::Success)
}

/// Probe `url` and return the document as a string.
///
/// # Errors
///
/// Same as [`write_document`].
pub fn render_document<I>(
    inspector: &I,
    url: &str,
    options: &ProbeOptions,
) -> Result<(Outcome, String), ProbeError>
where
    I: ContainerInspector + ?Sized,
{
    let mut buffer = Vec::new();
    let outcome = write_document(inspector, url, options, &mut buffer)?;
    // Every byte written is either ASCII layout or copied from a `&str`.
    let text = String::from_utf8_lossy(&buffer).into_owned();
    Ok((outcome, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Chapter, Rational, Tags};
    use crate::registry::EmptyRegistry;

    struct Fixed(Result<Container, fn() -> ProbeError>);

    impl ContainerInspector for Fixed {
        fn inspect(&self, _url: &str) -> Result<Container, ProbeError> {
            match &self.0 {
                Ok(container) => Ok(container.clone()),
                Err(make) => Err(make()),
            }
        }

        fn registry(&self) -> &dyn Registry {
            &EmptyRegistry
        }
    }

    #[test]
    fn empty_container_document() {
        let inspector = Fixed(Ok(Container::new("empty.mkv", "matroska,webm")));
        let (outcome, text) =
            render_document(&inspector, "empty.mkv", &ProbeOptions::new()).unwrap();
        assert!(outcome.is_success());
        assert!(text.starts_with("{\n    \"streams\": [\n\n    ],\n    \"chapters\": [\n\n    ],\n"));
        assert!(text.contains("\"nb_streams\": 0"));
        assert!(text.ends_with("\n    }\n}\n"));
    }

    #[test]
    fn open_failure_writes_error_document() {
        let inspector = Fixed(Err(|| ProbeError::Open {
            url: "missing.mp4".to_string(),
            code: -2,
            message: "No such file or directory".to_string(),
        }));
        let (outcome, text) =
            render_document(&inspector, "missing.mp4", &ProbeOptions::new()).unwrap();
        assert!(matches!(outcome, Outcome::Failure(ProbeError::Open { code: -2, .. })));
        assert_eq!(
            text,
            "{\n    \"error\": {\n        \"code\": -2,\n        \"string\": \"No such file or directory\"\n    }\n}\n"
        );
    }

    #[test]
    fn setup_errors_are_returned() {
        let inspector = Fixed(Err(|| ProbeError::Initialization("no demuxers".to_string())));
        let result = render_document(&inspector, "input.mp4", &ProbeOptions::new());
        assert!(matches!(result, Err(ProbeError::Initialization(_))));
    }

    #[test]
    fn options_select_sections() {
        let mut container = Container::new("chapters.mkv", "matroska,webm");
        container.chapters.push(Chapter {
            id: 1,
            time_base: Rational::new(1, 1000),
            start: 0,
            end: 1000,
            tags: Tags::new(),
        });
        let inspector = Fixed(Ok(container));
        let options = ProbeOptions::new().with_streams(false).with_format(false);
        let (_, text) = render_document(&inspector, "chapters.mkv", &options).unwrap();
        assert!(text.starts_with("{\n    \"chapters\": [\n        {\n"));
        assert!(!text.contains("streams"));
        assert!(!text.contains("format"));
        assert!(text.contains("\"end_time\": \"1.000000\""));
    }
}
