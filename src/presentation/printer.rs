//! Terminal event printer
//!
//! One line per event, colored with `crossterm` when the terminal allows.
//! Upload progress redraws a single line on a TTY and is skipped
//! otherwise.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crossterm::style::{Color, Stylize};

use crate::domain::ports::{BridgeEvent, EventSink};

use super::progress::ProgressBar;
use super::terminal::TerminalCapabilities;
use super::theme::{colors, Icons};

/// Rendering switches derived from terminal capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterStyle {
    pub color: bool,
    pub unicode: bool,
    /// Redraw progress in place
    pub live: bool,
}

impl PrinterStyle {
    pub fn from_caps(caps: TerminalCapabilities) -> Self {
        Self {
            color: caps.supports_color && !caps.is_ci,
            unicode: caps.supports_unicode,
            live: caps.is_tty && !caps.is_ci,
        }
    }

    pub fn plain() -> Self {
        Self {
            color: false,
            unicode: false,
            live: false,
        }
    }
}

struct State {
    writer: Box<dyn Write + Send>,
    upload: Option<ProgressBar>,
}

pub struct Printer {
    style: PrinterStyle,
    icons: Icons,
    state: Mutex<State>,
}

impl Printer {
    pub fn stderr(style: PrinterStyle) -> Self {
        Self::with_writer(style, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(style: PrinterStyle, writer: W) -> Self {
        Self {
            style,
            icons: Icons::for_unicode(style.unicode),
            state: Mutex::new(State {
                writer: Box::new(writer),
                upload: None,
            }),
        }
    }

    fn paint(&self, text: impl Display, color: Color) -> String {
        if self.style.color {
            text.to_string().with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&self, state: &mut State, icon: &str, color: Color, text: String) {
        let _ = writeln!(state.writer, "{} {}", self.paint(icon, color), text);
        let _ = state.writer.flush();
    }

    fn detail(&self, state: &mut State, text: String) {
        let arrow = self.paint(self.icons.arrow, colors::DIM);
        let _ = writeln!(state.writer, "  {} {}", arrow, self.paint(text, colors::DIM));
        let _ = state.writer.flush();
    }

    fn redraw(&self, state: &mut State) {
        let Some(bar) = &state.upload else {
            return;
        };
        let rendered = bar.render(self.style.unicode);
        let _ = write!(state.writer, "\r  {}", rendered);
        let _ = state.writer.flush();
    }
}

impl EventSink for Printer {
    fn on_event(&self, event: BridgeEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let state = &mut *state;
        let icons = self.icons;
        match event {
            BridgeEvent::Started { command, packages } => {
                let list = packages.join(" ");
                self.line(state, icons.progress, colors::INFO, format!("{command} {list}"));
            }
            BridgeEvent::NativeInstalled { names } => self.line(
                state,
                icons.success,
                colors::SUCCESS,
                format!("installed {}", names.join(" ")),
            ),
            BridgeEvent::Cloned { address, dir } => {
                self.detail(state, format!("cloned {address} into {}", dir.display()))
            }
            BridgeEvent::Reused { address, dir } => {
                self.detail(state, format!("reusing {} for {address}", dir.display()))
            }
            BridgeEvent::CheckedOut {
                address,
                branch,
                version,
            } => self.detail(state, format!("{address} at {version} ({branch})")),
            BridgeEvent::Resolving {
                address,
                dependencies,
            } => {
                if !dependencies.is_empty() {
                    self.detail(state, format!("{address} needs {}", dependencies.join(" ")));
                }
            }
            BridgeEvent::Building { package } => {
                self.line(state, icons.progress, colors::INFO, format!("building {package}"))
            }
            BridgeEvent::Installed {
                address,
                short_name,
            } => self.line(
                state,
                icons.success,
                colors::SUCCESS,
                format!("installed {short_name} from {address}"),
            ),
            BridgeEvent::Built { package, artifacts } => {
                self.line(state, icons.success, colors::SUCCESS, format!("built {package}"));
                for artifact in artifacts {
                    self.detail(state, display_path(artifact));
                }
            }
            BridgeEvent::Generated { package, files } => {
                self.line(state, icons.success, colors::SUCCESS, format!("generated templates for {package}"));
                for file in files {
                    self.detail(state, display_path(file));
                }
            }
            BridgeEvent::Skipped { address, reason } => self.line(
                state,
                icons.skip,
                colors::WARNING,
                format!("skipped {address}: {reason}"),
            ),
            BridgeEvent::Removed { names } => self.line(
                state,
                icons.success,
                colors::SUCCESS,
                format!("removed {}", names.join(" ")),
            ),
            BridgeEvent::UploadStarted { file, url, size } => {
                self.line(state, icons.progress, colors::INFO, format!("pushing {file} to {url}"));
                state.upload = Some(ProgressBar::new(size, file));
            }
            BridgeEvent::UploadProgress { sent, .. } => {
                if let Some(bar) = state.upload.as_mut() {
                    bar.set(sent);
                }
                if self.style.live {
                    self.redraw(state);
                }
            }
            BridgeEvent::Uploaded { file } => {
                if self.style.live && state.upload.take().is_some() {
                    let _ = writeln!(state.writer);
                }
                state.upload = None;
                self.line(state, icons.success, colors::SUCCESS, format!("pushed {file}"));
            }
            BridgeEvent::Completed { command } => {
                self.line(state, icons.success, colors::SUCCESS, format!("{command} complete"))
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.style.live
    }
}

/// Print a fatal error the way the printer prints events
pub fn render_error(style: PrinterStyle, error: &anyhow::Error) -> String {
    let icons = Icons::for_unicode(style.unicode);
    let icon = if style.color {
        icons.error.with(colors::ERROR).to_string()
    } else {
        icons.error.to_string()
    };
    let mut out = format!("{icon} {error}");
    for cause in error.chain().skip(1) {
        out.push_str(&format!("\n  {} {cause}", icons.arrow));
    }
    out
}

fn display_path(path: PathBuf) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn printer(style: PrinterStyle) -> (Printer, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = TestWriter {
            buffer: buffer.clone(),
        };
        (Printer::with_writer(style, writer), buffer)
    }

    fn text(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn plain_lines_for_install_flow() {
        let (p, buffer) = printer(PrinterStyle::plain());
        p.on_event(BridgeEvent::Started {
            command: "install".into(),
            packages: vec!["vim".into(), "github.com/o/tool".into()],
        });
        p.on_event(BridgeEvent::Cloned {
            address: "github.com/o/tool".into(),
            dir: PathBuf::from("/work/tool"),
        });
        p.on_event(BridgeEvent::Resolving {
            address: "github.com/o/tool".into(),
            dependencies: vec![],
        });
        p.on_event(BridgeEvent::Installed {
            address: "github.com/o/tool".into(),
            short_name: "tool".into(),
        });
        p.on_event(BridgeEvent::Skipped {
            address: "github.com/o/lib".into(),
            reason: "already installed".into(),
        });

        assert_eq!(
            text(&buffer),
            "[..] install vim github.com/o/tool\n\
             \x20 -> cloned github.com/o/tool into /work/tool\n\
             [OK] installed tool from github.com/o/tool\n\
             [ ] skipped github.com/o/lib: already installed\n"
        );
    }

    #[test]
    fn progress_is_dropped_when_not_live() {
        let (p, buffer) = printer(PrinterStyle::plain());
        assert!(!p.wants_detailed_events());
        p.on_event(BridgeEvent::UploadStarted {
            file: "a.pkg.tar.zst".into(),
            url: "https://r/api/push".into(),
            size: 10,
        });
        p.on_event(BridgeEvent::UploadProgress {
            file: "a.pkg.tar.zst".into(),
            sent: 10,
            total: 10,
        });
        p.on_event(BridgeEvent::Uploaded {
            file: "a.pkg.tar.zst".into(),
        });

        assert_eq!(
            text(&buffer),
            "[..] pushing a.pkg.tar.zst to https://r/api/push\n[OK] pushed a.pkg.tar.zst\n"
        );
    }

    #[test]
    fn live_progress_redraws_in_place() {
        let style = PrinterStyle {
            color: false,
            unicode: false,
            live: true,
        };
        let (p, buffer) = printer(style);
        p.on_event(BridgeEvent::UploadStarted {
            file: "a".into(),
            url: "u".into(),
            size: 4,
        });
        p.on_event(BridgeEvent::UploadProgress {
            file: "a".into(),
            sent: 4,
            total: 4,
        });
        p.on_event(BridgeEvent::Uploaded { file: "a".into() });

        let out = text(&buffer);
        assert!(out.contains("\r  a "));
        assert!(out.contains("(100%)\n[OK] pushed a\n"));
    }

    #[test]
    fn error_rendering_lists_causes() {
        let err = anyhow::anyhow!("inner").context("outer");
        assert_eq!(render_error(PrinterStyle::plain(), &err), "[FAIL] outer\n  -> inner");
    }
}
