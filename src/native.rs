//! Line-oriented native front end.
//!
//! Reads editor commands (one per line) and applies them to a labeling
//! session, so labeling can be scripted or driven from a terminal:
//!
//! ```text
//! load scans/page1.png scans/page2.png
//! down 100 100
//! move 80 70
//! up
//! label A
//! export out/
//! ```
//!
//! Image numbers in `remove` are 1-based, matching `status`. Paths containing
//! spaces can be wrapped in double quotes.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::AppConfig;
use crate::model::BoxId;
use crate::render::Frame;
use crate::session::{LabelingSession, PointerEvent, UploadFile};

/// A parsed driver command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(Vec<PathBuf>),
    Pointer(PointerEvent),
    Label(String),
    Select(BoxId),
    New,
    Delete,
    Next,
    Prev,
    /// 1-based image number; `None` removes the current image.
    Remove(Option<usize>),
    List,
    Status,
    Export(Option<PathBuf>),
    Render(PathBuf),
    MinSize(f32),
    SaveConfig(Option<PathBuf>),
    Help,
    Quit,
}

/// Errors parsing a command line.
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("Unclosed quote in arguments")]
    UnclosedQuote,

    #[error("'{command}' expects {expected}")]
    BadArguments {
        command: &'static str,
        expected: &'static str,
    },
}

const HELP: &str = "\
commands:
  load <path>...      add image files (quote paths with spaces)
  down <x> <y>        press at image coordinates
  move <x> <y>        drag to image coordinates
  up | leave          release
  label [c]           label the selected box (empty clears)
  select <id>         select a box by id
  new                 cancel drawing and clear selection
  delete              delete the selected box
  next | prev         switch image
  remove [n]          remove image n (default: current)
  list                show the box table
  status              show the session status
  export [dir]        write the .box file
  render <file.png>   save the overlay as PNG
  minsize <px>        minimum drag size for new boxes
  save-config [file]  save preferences (default: user config dir)
  quit";

fn coords(command: &'static str, args: &[&str]) -> Result<(f32, f32), CommandError> {
    let bad = CommandError::BadArguments {
        command,
        expected: "<x> <y>",
    };
    match args {
        [x, y] => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Ok((x, y)),
            _ => Err(bad),
        },
        _ => Err(bad),
    }
}

/// Split arguments on whitespace. Double quotes group text containing spaces.
fn split_args(rest: &str) -> Result<Vec<String>, CommandError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;

    for c in rest.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnclosedQuote);
    }
    if started {
        args.push(current);
    }
    Ok(args)
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    // Labels are taken verbatim so a quote is a valid label
    if name == "label" {
        return Ok(Some(Command::Label(rest.to_string())));
    }
    let owned = split_args(rest)?;
    let args: Vec<&str> = owned.iter().map(String::as_str).collect();

    let command = match name {
        "load" if !args.is_empty() => Command::Load(args.iter().map(PathBuf::from).collect()),
        "load" => {
            return Err(CommandError::BadArguments {
                command: "load",
                expected: "one or more paths",
            });
        }
        "down" => {
            let (x, y) = coords("down", &args)?;
            Command::Pointer(PointerEvent::Down { x, y })
        }
        "move" => {
            let (x, y) = coords("move", &args)?;
            Command::Pointer(PointerEvent::Move { x, y })
        }
        "up" => Command::Pointer(PointerEvent::Up),
        "leave" => Command::Pointer(PointerEvent::Leave),
        "select" => match args.as_slice() {
            [id] => Command::Select(id.parse().map_err(|_| CommandError::BadArguments {
                command: "select",
                expected: "a box id",
            })?),
            _ => {
                return Err(CommandError::BadArguments {
                    command: "select",
                    expected: "a box id",
                });
            }
        },
        "new" => Command::New,
        "delete" => Command::Delete,
        "next" => Command::Next,
        "prev" => Command::Prev,
        "remove" => match args.as_slice() {
            [] => Command::Remove(None),
            [n] => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Remove(Some(n)),
                _ => {
                    return Err(CommandError::BadArguments {
                        command: "remove",
                        expected: "an image number starting at 1",
                    });
                }
            },
            _ => {
                return Err(CommandError::BadArguments {
                    command: "remove",
                    expected: "at most one image number",
                });
            }
        },
        "list" => Command::List,
        "status" => Command::Status,
        "export" => Command::Export(args.first().map(PathBuf::from)),
        "render" => match args.as_slice() {
            [path] => Command::Render(PathBuf::from(path)),
            _ => {
                return Err(CommandError::BadArguments {
                    command: "render",
                    expected: "an output path",
                });
            }
        },
        "minsize" => match args.as_slice() {
            [n] => match n.parse::<f32>() {
                Ok(n) if n.is_finite() && n >= 0.0 => Command::MinSize(n),
                _ => {
                    return Err(CommandError::BadArguments {
                        command: "minsize",
                        expected: "a non-negative size",
                    });
                }
            },
            _ => {
                return Err(CommandError::BadArguments {
                    command: "minsize",
                    expected: "a non-negative size",
                });
            }
        },
        "save-config" => Command::SaveConfig(args.first().map(PathBuf::from)),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Whether the driver keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies commands to a session and prints results.
pub struct NativeDriver {
    session: LabelingSession,
    config: AppConfig,
    export_dir: PathBuf,
}

impl NativeDriver {
    pub fn new(config: &AppConfig) -> Self {
        let export_dir = if config.preferences.export_folder.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&config.preferences.export_folder)
        };
        Self {
            session: LabelingSession::default().with_settings(config.preferences.session_settings()),
            config: config.clone(),
            export_dir,
        }
    }

    pub fn session(&self) -> &LabelingSession {
        &self.session
    }

    /// Read commands until end of input or `quit`.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if self.execute(command, out)? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(out, "error: {}", e)?,
            }
        }
        self.session.teardown();
        Ok(())
    }

    /// Load image files from disk. Unreadable files are reported and skipped.
    pub fn load(&mut self, paths: &[PathBuf], out: &mut impl Write) -> io::Result<()> {
        let mut files = Vec::new();
        for path in paths {
            match UploadFile::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    log::warn!("Failed to read {:?}: {}", path, e);
                    writeln!(out, "error: {}: {}", path.display(), e)?;
                }
            }
        }

        let report = self.session.upload_images(files);
        for e in &report.errors {
            writeln!(out, "error: {}", e)?;
        }
        writeln!(out, "loaded {} image(s)", report.accepted)
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            Command::Load(paths) => self.load(&paths, out)?,
            Command::Pointer(event) => {
                if let Some(id) = self.session.handle_pointer(event) {
                    writeln!(out, "added box {}", id)?;
                }
            }
            Command::Label(text) => {
                if self.session.selected_id().is_none() {
                    writeln!(out, "error: no box selected")?;
                } else {
                    self.session.set_label(&text);
                }
            }
            Command::Select(id) => {
                if !self.session.select_box(id) {
                    writeln!(out, "error: no box {} on this image", id)?;
                }
            }
            Command::New => self.session.reset_drawing(),
            Command::Delete => {
                if let Some(b) = self.session.delete_selected() {
                    writeln!(out, "deleted box {}", b.id)?;
                }
            }
            Command::Next => self.navigate(true, out)?,
            Command::Prev => self.navigate(false, out)?,
            Command::Remove(number) => {
                let removed = match number {
                    Some(n) => self.session.remove_image(n - 1),
                    None => self.session.remove_current_image(),
                };
                if !removed {
                    writeln!(out, "error: no such image")?;
                }
                writeln!(out, "{}", self.session.status_text())?;
            }
            Command::List => self.list(out)?,
            Command::Status => self.status(out)?,
            Command::Export(dir) => self.export(dir, out)?,
            Command::Render(path) => self.render(&path, out)?,
            Command::MinSize(size) => {
                self.config.preferences.min_box_size = size;
                self.session
                    .set_settings(self.config.preferences.session_settings());
                writeln!(out, "minimum box size {}", size)?;
            }
            Command::SaveConfig(path) => {
                let result = match &path {
                    Some(path) => self.config.save_to(path),
                    None => self.config.save_to_default_path(),
                };
                match result {
                    Ok(()) => writeln!(out, "configuration saved")?,
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn navigate(&mut self, forward: bool, out: &mut impl Write) -> io::Result<()> {
        let result = if forward {
            self.session.next_image()
        } else {
            self.session.previous_image()
        };
        match result {
            Ok(_) => writeln!(out, "{}", self.session.status_text()),
            Err(e) => writeln!(out, "error: {}", e),
        }
    }

    fn list(&self, out: &mut impl Write) -> io::Result<()> {
        let rows = self.session.box_rows();
        if rows.is_empty() {
            return writeln!(out, "No boxes created yet");
        }
        for row in rows {
            writeln!(
                out,
                "{} {:>14} {:<12} x: {}, y: {}  {} x {}",
                if row.selected { "*" } else { " " },
                row.id,
                row.label,
                row.x,
                row.y,
                row.width,
                row.height
            )?;
        }
        Ok(())
    }

    fn status(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.session.status_text())?;
        if let Some(image) = self.session.current_image() {
            writeln!(
                out,
                "{}: {} x {} pixels | Boxes: {}",
                image.name,
                image.width,
                image.height,
                self.session.boxes().len()
            )?;
        }
        if let Some(e) = self.session.error() {
            writeln!(out, "last error: {}", e)?;
        }
        Ok(())
    }

    fn export(&mut self, dir: Option<PathBuf>, out: &mut impl Write) -> io::Result<()> {
        let dir = dir.unwrap_or_else(|| self.export_dir.clone());
        let Some(file) = self.session.export() else {
            return writeln!(out, "nothing to export");
        };
        match file.write_to(&dir) {
            Ok(path) => writeln!(out, "wrote {} ({} rows)", path.display(), file.rows_exported),
            Err(e) => writeln!(out, "error: {}", e),
        }
    }

    fn render(&self, path: &std::path::Path, out: &mut impl Write) -> io::Result<()> {
        let Some(frame) = Frame::from_session(&self.session) else {
            return writeln!(out, "error: no image loaded");
        };
        match frame.rasterize().save(path) {
            Ok(()) => writeln!(out, "saved overlay to {}", path.display()),
            Err(e) => writeln!(out, "error: {}", e),
        }
    }
}
