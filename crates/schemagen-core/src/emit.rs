//! Output emission: formatting, post-processing and atomic writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, info};
use regex::{NoExpand, Regex};

use crate::error::EmitError;

/// First line of every generated file.
pub const GENERATED_MARKER: &str = "/* AUTO-GENERATED - do not edit */";

/// A text rewrite applied after formatting.
///
/// When `pattern` matches, `replacement` receives the capture groups of the
/// first match (index 0 is the whole match, unmatched groups are empty) and
/// its result replaces every match literally.
pub struct Processor {
    pub pattern: Regex,
    pub replacement: Box<dyn Fn(&[String]) -> String>,
}

impl Processor {
    pub fn new(pattern: Regex, replacement: impl Fn(&[String]) -> String + 'static) -> Self {
        Self {
            pattern,
            replacement: Box::new(replacement),
        }
    }
}

/// Run every processor over `text`, in order.
pub fn post_process(text: &str, processors: &[Processor]) -> String {
    let mut out = text.to_string();
    for processor in processors {
        let Some(caps) = processor.pattern.captures(&out) else {
            continue;
        };
        let groups: Vec<String> = caps
            .iter()
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();
        let replacement = (processor.replacement)(&groups);
        out = processor
            .pattern
            .replace_all(&out, NoExpand(&replacement))
            .into_owned();
    }
    out
}

/// Pretty-prints generated source before it is written.
pub trait Formatter {
    fn format(&self, text: &str, path: &Path) -> Result<String, EmitError>;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, text: &str, _path: &Path) -> Result<String, EmitError> {
        Ok(text.to_string())
    }
}

/// Pipes text through an external command (stdin → stdout).
///
/// `{file}` in any argument is replaced with the target path, which lets
/// prettier pick a parser from the extension.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, text: &str, path: &Path) -> Result<String, EmitError> {
        let file = path.to_string_lossy();
        let args: Vec<String> = self.args.iter().map(|a| a.replace("{file}", &file)).collect();
        let command = self.command_line();
        debug!("formatting {} with `{command}`", path.display());

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EmitError::FormatterSpawn {
                command: command.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a full stdout pipe cannot deadlock us.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = text.to_string();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .map_err(|source| EmitError::FormatterSpawn {
                command: command.clone(),
                source,
            })?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(source)) if output.status.success() => {
                    return Err(EmitError::FormatterSpawn { command, source });
                }
                // A failed write on a formatter that exited non-zero is reported below.
                Ok(Err(_)) | Err(_) => {}
            }
        }

        if !output.status.success() {
            return Err(EmitError::FormatterFailed {
                command,
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| EmitError::FormatterOutput { command })
    }
}

/// Join fragments, format and post-process the content destined for `path`.
pub fn render_output(
    path: &Path,
    fragments: &[String],
    formatter: &dyn Formatter,
    processors: &[Processor],
) -> Result<String, EmitError> {
    let joined = fragments.join("\n");
    let formatted = formatter.format(&joined, path)?;
    Ok(post_process(&formatted, processors))
}

/// [`render_output`], then atomically write to `path`.
///
/// Nothing is written if the formatter fails.
pub fn write_output(
    path: &Path,
    fragments: &[String],
    formatter: &dyn Formatter,
    processors: &[Processor],
) -> Result<(), EmitError> {
    let content = render_output(path, fragments, formatter, processors)?;
    write_atomic(path, &content)?;
    info!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// A formatted file that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Write every staged file, in order.
pub fn write_staged(files: &[StagedFile]) -> Result<(), EmitError> {
    for file in files {
        write_atomic(&file.path, &file.content)?;
        info!("wrote {} ({} bytes)", file.path.display(), file.content.len());
    }
    Ok(())
}

/// Write through a temp file in the target directory and rename it into place.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), EmitError> {
    let io_error = |source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_error)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
    tmp.write_all(content.as_bytes()).map_err(io_error)?;
    tmp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
