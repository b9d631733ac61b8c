use color_eyre::eyre::eyre;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Name of the fuzzy selector binary.
const PICKER_BIN: &str = "fzf";

/// One selection screen invocation.
#[derive(Debug, Default, Clone)]
pub struct PickerOpts {
    pub prompt: String,
    /// Static status line above the prompt
    pub header: Option<String>,
    /// Allow selecting more than one line
    pub multi: bool,
    /// Lines carry a hidden tab-separated identifier in field 1; only
    /// field 2 onward is shown
    pub with_fields: bool,
    /// Preview command template, `{}`/`{1}` substituted by the picker
    pub preview: Option<String>,
    /// Key bound to a command executed silently without leaving the screen
    pub inline_execute: Option<(String, String)>,
    /// Keys that finish the screen immediately and are reported back
    pub expect: Vec<String>,
}

/// The key that ended a selection screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerKey {
    /// Plain confirmation
    Enter,
    /// One of the expected keys
    Token(String),
    /// The picker was cancelled or interrupted; callers must unwind
    /// without touching the queue
    Cancel,
}

/// Key pressed plus the lines selected at that moment, in selection order.
/// A bare keypress with nothing selected is valid and yields empty items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub key: PickerKey,
    pub items: Vec<String>,
}

/// Wraps invocations of the external fuzzy selector.
#[derive(Debug, Clone)]
pub struct Picker {
    extra_args: Vec<String>,
}

impl Picker {
    pub fn new(extra_args: Vec<String>) -> Self {
        Self { extra_args }
    }

    /// Verify the selector binary is on PATH. Called once at startup;
    /// a missing selector is fatal before any screen is shown.
    pub fn check_available() -> color_eyre::Result<()> {
        match std::process::Command::new(PICKER_BIN)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(eyre!("{} --version exited with {}", PICKER_BIN, status)),
            Err(e) => Err(eyre!("required tool {} not found: {}", PICKER_BIN, e)),
        }
    }

    /// Run one selection screen. Blocks until the user confirms, presses an
    /// expected key, or cancels. The selector owns the terminal (alternate
    /// screen and raw mode) for the duration of the call and restores it on
    /// every exit path, including interrupts.
    pub async fn show(&self, items: &[String], opts: &PickerOpts) -> color_eyre::Result<Selection> {
        let mut cmd = Command::new(PICKER_BIN);
        cmd.arg("--prompt").arg(format!("{}> ", opts.prompt));
        if !opts.expect.is_empty() {
            cmd.arg("--expect").arg(opts.expect.join(","));
        }
        if opts.multi {
            cmd.arg("--multi");
        }
        if let Some(header) = &opts.header {
            cmd.arg("--header").arg(header);
        }
        if let Some(preview) = &opts.preview {
            cmd.arg("--preview").arg(preview);
        }
        if let Some((key, command)) = &opts.inline_execute {
            cmd.arg("--bind")
                .arg(format!("{}:execute-silent({})", key, command));
        }
        if opts.with_fields {
            cmd.arg("--delimiter").arg("\t").arg("--with-nth").arg("2..");
        }
        cmd.args(&self.extra_args);

        log::debug!(
            "Running picker: prompt={:?} items={} expect={:?}",
            opts.prompt,
            items.len(),
            opts.expect
        );

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| eyre!("failed to spawn {}: {}", PICKER_BIN, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = items.join("\n");
            input.push('\n');
            // The selector may exit before reading everything; a broken
            // pipe here is not an error
            let _ = stdin.write_all(input.as_bytes()).await;
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_output(output.status.code(), &stdout, !opts.expect.is_empty())
    }
}

/// Interpret the selector's exit status and stdout.
///
/// With `--expect`, the first output line names the key that finished the
/// screen (empty for plain enter) and the remaining lines are the selected
/// items. Exit code 1 means no match, 130 means interrupted or cancelled;
/// a signal death is treated as cancellation too.
fn parse_output(
    code: Option<i32>,
    stdout: &str,
    has_expect: bool,
) -> color_eyre::Result<Selection> {
    match code {
        Some(0) | Some(1) => {}
        Some(130) | None => {
            return Ok(Selection {
                key: PickerKey::Cancel,
                items: Vec::new(),
            });
        }
        Some(other) => return Err(eyre!("{} exited with code {}", PICKER_BIN, other)),
    }

    let mut lines = stdout.lines();
    let key = if has_expect {
        match lines.next() {
            Some("") | None => PickerKey::Enter,
            Some(token) => PickerKey::Token(token.to_string()),
        }
    } else {
        PickerKey::Enter
    };
    let items: Vec<String> = lines
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    Ok(Selection { key, items })
}

/// Quote a string for inclusion in a command executed by the selector's
/// shell.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_with_selection() {
        let sel = parse_output(Some(0), "\nsong a\nsong b\n", true).unwrap();
        assert_eq!(sel.key, PickerKey::Enter);
        assert_eq!(sel.items, vec!["song a", "song b"]);
    }

    #[test]
    fn expected_key_with_selection() {
        let sel = parse_output(Some(0), "f1\nsong a\n", true).unwrap();
        assert_eq!(sel.key, PickerKey::Token("f1".to_string()));
        assert_eq!(sel.items, vec!["song a"]);
    }

    #[test]
    fn bare_keypress_with_empty_selection_is_valid() {
        let sel = parse_output(Some(1), ">\n", true).unwrap();
        assert_eq!(sel.key, PickerKey::Token(">".to_string()));
        assert!(sel.items.is_empty());
    }

    #[test]
    fn empty_output_is_plain_enter() {
        let sel = parse_output(Some(1), "", true).unwrap();
        assert_eq!(sel.key, PickerKey::Enter);
        assert!(sel.items.is_empty());
    }

    #[test]
    fn interrupt_maps_to_cancel() {
        let sel = parse_output(Some(130), "", true).unwrap();
        assert_eq!(sel.key, PickerKey::Cancel);
        let sel = parse_output(None, "", true).unwrap();
        assert_eq!(sel.key, PickerKey::Cancel);
    }

    #[test]
    fn unexpected_exit_code_is_an_error() {
        assert!(parse_output(Some(2), "", true).is_err());
    }

    #[test]
    fn without_expect_all_lines_are_items() {
        let sel = parse_output(Some(0), "song a\nsong b\n", false).unwrap();
        assert_eq!(sel.key, PickerKey::Enter);
        assert_eq!(sel.items, vec!["song a", "song b"]);
    }

    #[test]
    fn shell_quoting_handles_single_quotes() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }
}
