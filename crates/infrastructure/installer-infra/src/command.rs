use std::borrow::Cow;
use std::process::Command;

use crate::process::ProcessError;

const REDACTED: &str = "***";

/// The installer invocation, already assembled and escaped by whoever built it.
/// It is executed as-is and never inspected, except for display redaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    Argv(Vec<String>),
    /// Run through the platform shell, like `popen` would.
    Shell(String),
}

impl CommandSpec {
    pub fn argv<I, S>(parts: I) -> Result<Self, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        Ok(Self::Argv(parts))
    }

    pub fn shell(line: impl Into<String>) -> Result<Self, ProcessError> {
        let line = line.into();
        if line.trim().is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        Ok(Self::Shell(line))
    }

    /// Splits a POSIX shell line into argv without involving a shell.
    pub fn split(line: &str) -> Result<Self, ProcessError> {
        let parts = shlex::split(line).ok_or(ProcessError::ParseError)?;
        Self::argv(parts)
    }

    pub fn program(&self) -> &str {
        match self {
            CommandSpec::Argv(parts) => parts.first().map(String::as_str).unwrap_or_default(),
            CommandSpec::Shell(line) => line.split_whitespace().next().unwrap_or_default(),
        }
    }

    pub(crate) fn to_command(&self) -> Result<Command, ProcessError> {
        match self {
            CommandSpec::Argv(parts) => {
                let (program, args) = parts.split_first().ok_or(ProcessError::EmptyCommand)?;
                let mut cmd = Command::new(program);
                cmd.args(args);
                Ok(cmd)
            }
            CommandSpec::Shell(line) => Ok(shell_command(line)),
        }
    }

    /// Printable form with the values of `secret_flags` masked. Accepts both
    /// `--flag=value` and `--flag value`.
    pub fn redacted(&self, secret_flags: &[&str]) -> String {
        let parts = match self {
            CommandSpec::Argv(parts) => Cow::Borrowed(parts),
            CommandSpec::Shell(line) => match shlex::split(line) {
                Some(parts) => Cow::Owned(parts),
                None => return format!("{} (arguments hidden)", self.program()),
            },
        };

        let mut out = Vec::with_capacity(parts.len());
        let mut mask_next = false;
        for part in parts.iter() {
            if mask_next {
                out.push(REDACTED.to_string());
                mask_next = false;
                continue;
            }
            if secret_flags.contains(&part.as_str()) {
                mask_next = true;
                out.push(part.clone());
                continue;
            }
            let masked = secret_flags.iter().find_map(|flag| {
                part.strip_prefix(flag)
                    .filter(|rest| rest.starts_with('='))
                    .map(|_| format!("{flag}={REDACTED}"))
            });
            match masked {
                Some(masked) => out.push(masked),
                None => out.push(quote(part)),
            }
        }
        out.join(" ")
    }
}

fn quote(part: &str) -> String {
    if !part.chars().any(char::is_whitespace) {
        return part.to_string();
    }
    shlex::try_quote(part)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| part.to_string())
}

#[cfg(target_os = "windows")]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", line]);
    cmd
}

#[cfg(not(target_os = "windows"))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", line]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAGS: [&str; 2] = ["--password", "--root-password"];

    #[test]
    fn empty_commands_are_rejected() {
        assert!(matches!(
            CommandSpec::argv(Vec::<String>::new()),
            Err(ProcessError::EmptyCommand)
        ));
        assert!(matches!(
            CommandSpec::shell("   "),
            Err(ProcessError::EmptyCommand)
        ));
    }

    #[test]
    fn split_respects_quotes() {
        let cmd = CommandSpec::split("sudo core-installer.sh install --realname='Ana Maria'")
            .expect("valid line");
        assert_eq!(
            cmd,
            CommandSpec::Argv(vec![
                "sudo".into(),
                "core-installer.sh".into(),
                "install".into(),
                "--realname=Ana Maria".into(),
            ])
        );
        assert_eq!(cmd.program(), "sudo");
    }

    #[test]
    fn unbalanced_quotes_fail_to_split() {
        assert!(matches!(
            CommandSpec::split("install --realname='Ana"),
            Err(ProcessError::ParseError)
        ));
    }

    #[test]
    fn redaction_masks_both_flag_forms() {
        let cmd = CommandSpec::argv([
            "core-installer.sh",
            "--username=ana",
            "--password=hunter2",
            "--root-password",
            "toor",
        ])
        .unwrap();
        let shown = cmd.redacted(&FLAGS);
        assert_eq!(
            shown,
            "core-installer.sh --username=ana --password=*** --root-password ***"
        );
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("toor"));
    }

    #[test]
    fn redaction_does_not_match_flag_prefixes() {
        let cmd = CommandSpec::argv(["x", "--password-hint=cat"]).unwrap();
        assert_eq!(cmd.redacted(&FLAGS), "x --password-hint=cat");
    }

    #[test]
    fn shell_lines_are_redacted_after_splitting() {
        let cmd = CommandSpec::shell("sudo install --password='a b' 2>&1").unwrap();
        let shown = cmd.redacted(&FLAGS);
        assert!(shown.contains("--password=***"));
        assert!(!shown.contains("a b"));
    }

    #[test]
    fn unparseable_shell_line_hides_arguments() {
        let cmd = CommandSpec::shell("sudo install --password='oops").unwrap();
        assert_eq!(cmd.redacted(&FLAGS), "sudo (arguments hidden)");
    }
}
