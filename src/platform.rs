//! Terminal implementations of the triage platform capabilities.

use crate::ui;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use triage::{
    Capabilities, ClipboardError, ClipboardSink, Coordinates, DefaultActionDispatcher,
    DestinationOpener, LocationError, LocationProvider, NominatimClient, Notifier, OpenRequest,
    ShareError, SharePayload, ShareSink, TriageConfig, TriageError,
};

/// Dispatcher wired to the terminal capabilities
pub type TerminalDispatcher = DefaultActionDispatcher<
    ArgumentLocation,
    BrowserOpener,
    SystemClipboard,
    TerminalShare,
    TerminalNotifier,
>;

pub fn terminal_dispatcher(
    config: &TriageConfig,
    location: ArgumentLocation,
    opener: BrowserOpener,
) -> triage::Result<TerminalDispatcher> {
    let geocoder = NominatimClient::new(config.geocoder.clone())?;
    TerminalDispatcher::new(
        config,
        Capabilities {
            location,
            geocoder,
            opener,
            clipboard: SystemClipboard::default(),
            share: TerminalShare,
            notifier: TerminalNotifier,
        },
    )
}

/// Reports notifications on the terminal
#[derive(Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        ui::success_message(message);
    }

    fn error(&self, message: &str) {
        ui::error_message(message);
    }
}

/// Location supplied on the command line; a terminal has no positioning hardware
#[derive(Clone, Copy, Default)]
pub struct ArgumentLocation {
    coordinates: Option<Coordinates>,
}

impl ArgumentLocation {
    pub fn new(lat: Option<f64>, lon: Option<f64>) -> Self {
        let coordinates = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };
        Self { coordinates }
    }
}

impl LocationProvider for ArgumentLocation {
    async fn current_position(&self, _timeout: Duration) -> Result<Coordinates, LocationError> {
        self.coordinates
            .ok_or_else(|| LocationError::Unavailable("no --lat/--lon supplied".to_string()))
    }
}

/// A terminal has no native share sheet
#[derive(Clone, Copy, Default)]
pub struct TerminalShare;

impl ShareSink for TerminalShare {
    fn can_share(&self, _payload: &SharePayload) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Failed("no share sheet in a terminal".to_string()))
    }
}

/// External program that reads text on stdin and places it on the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool {
    program: String,
    args: Vec<String>,
}

impl ClipboardTool {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    async fn pipe(&self, text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        Ok(child.wait().await?.success())
    }
}

/// Clipboard backed by the platform's copy utilities, tried in order
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tools: Vec<ClipboardTool>,
}

impl SystemClipboard {
    pub fn with_tools(tools: Vec<ClipboardTool>) -> Self {
        Self { tools }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        let tools = if cfg!(target_os = "macos") {
            vec![ClipboardTool::new("pbcopy", &[])]
        } else if cfg!(target_os = "windows") {
            vec![ClipboardTool::new("clip", &[])]
        } else {
            vec![
                ClipboardTool::new("wl-copy", &[]),
                ClipboardTool::new("xclip", &["-selection", "clipboard"]),
                ClipboardTool::new("xsel", &["--clipboard", "--input"]),
            ]
        };
        Self::with_tools(tools)
    }
}

impl ClipboardSink for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_failure = None;

        for tool in &self.tools {
            let program = tool.program.as_str();
            match tool.pipe(text).await {
                Ok(true) => {
                    tracing::debug!(program, "Copied text to clipboard");
                    return Ok(());
                }
                Ok(false) => {
                    tracing::debug!(program, "Clipboard utility exited with an error");
                    last_failure = Some(format!("{} exited with an error", program));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(program, "Clipboard utility not installed");
                }
                Err(e) => {
                    tracing::debug!(program, error = %e, "Clipboard utility failed");
                    last_failure = Some(format!("{}: {}", program, e));
                }
            }
        }

        match last_failure {
            Some(message) => Err(ClipboardError::WriteFailed(message)),
            None => Err(ClipboardError::Unavailable(
                "no clipboard utility found".to_string(),
            )),
        }
    }
}

/// Opens destinations in the default browser, or prints them
#[derive(Clone, Copy, Default)]
pub struct BrowserOpener {
    print_only: bool,
}

impl BrowserOpener {
    pub fn new(print_only: bool) -> Self {
        Self { print_only }
    }

    /// Launcher program and arguments for `os`. The URL is always passed as a
    /// single argument that no shell re-parses, so `&` in queries survives.
    fn launcher(os: &str, url: &str) -> (&'static str, Vec<String>) {
        match os {
            "macos" => ("open", vec![url.to_string()]),
            "windows" => (
                "rundll32",
                vec!["url.dll,FileProtocolHandler".to_string(), url.to_string()],
            ),
            _ => ("xdg-open", vec![url.to_string()]),
        }
    }

    fn command(url: &str) -> Command {
        let (program, args) = Self::launcher(std::env::consts::OS, url);
        let mut command = Command::new(program);
        command.args(args);
        command
    }
}

impl DestinationOpener for BrowserOpener {
    async fn open(&self, request: &OpenRequest) -> triage::Result<()> {
        if self.print_only {
            println!("{}", request.url);
            return Ok(());
        }

        // A separate browser process has no handle back to this one, which
        // satisfies the noopener/noreferrer features.
        tracing::debug!(url = %request.url, features = %request.features, "Launching browser");
        let status = Self::command(&request.url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| TriageError::open_failed(request.url.clone(), e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(TriageError::open_failed(
                request.url.clone(),
                format!("browser launcher exited with {}", status),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_argument_location() {
        let location = ArgumentLocation::new(Some(40.75), Some(-73.99));
        let position = location
            .current_position(Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(position, Coordinates::new(40.75, -73.99));

        let missing = ArgumentLocation::new(Some(40.75), None);
        assert!(matches!(
            missing.current_position(Duration::from_secs(5)).await,
            Err(LocationError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_terminal_cannot_share() {
        let payload = SharePayload::new("title", "text");
        assert!(!TerminalShare.can_share(&payload));
    }

    const FIND_A_DERM_RESOLVED: &str =
        "https://find-a-derm.aad.org/search?searchTerm=&searchLocation=10001";

    #[test]
    fn test_windows_launcher_keeps_full_query() {
        let (program, args) = BrowserOpener::launcher("windows", FIND_A_DERM_RESOLVED);
        assert_eq!(program, "rundll32");
        assert_eq!(args.last().map(String::as_str), Some(FIND_A_DERM_RESOLVED));
        assert!(args.iter().all(|arg| arg != "/C"));
    }

    #[test]
    fn test_unix_launchers_pass_url_as_one_argument() {
        for os in ["macos", "linux"] {
            let (_, args) = BrowserOpener::launcher(os, FIND_A_DERM_RESOLVED);
            assert_eq!(args, vec![FIND_A_DERM_RESOLVED.to_string()]);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clipboard_falls_through_failing_tool() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let received = temp_dir.path().join("received.txt");
        let capture = format!("cat > '{}'", received.display());

        let clipboard = SystemClipboard::with_tools(vec![
            ClipboardTool::new("skintag-missing-clipboard-tool", &[]),
            ClipboardTool::new("sh", &["-c", "exit 1"]),
            ClipboardTool::new("sh", &["-c", capture.as_str()]),
        ]);

        clipboard.write_text("hello").await.unwrap();
        assert_eq!(std::fs::read_to_string(&received).unwrap(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clipboard_reports_failure_when_every_tool_fails() {
        let clipboard = SystemClipboard::with_tools(vec![
            ClipboardTool::new("sh", &["-c", "exit 1"]),
            ClipboardTool::new("skintag-missing-clipboard-tool", &[]),
        ]);

        assert!(matches!(
            clipboard.write_text("hello").await,
            Err(ClipboardError::WriteFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_clipboard_unavailable_without_tools() {
        let clipboard = SystemClipboard::with_tools(vec![ClipboardTool::new(
            "skintag-missing-clipboard-tool",
            &[],
        )]);

        assert!(matches!(
            clipboard.write_text("hello").await,
            Err(ClipboardError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_print_only_opener() {
        let opener = BrowserOpener::new(true);
        let request = OpenRequest::isolated("https://example.org");
        assert!(opener.open(&request).await.is_ok());
    }
}
