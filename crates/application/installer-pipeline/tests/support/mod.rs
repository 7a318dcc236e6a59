use std::collections::VecDeque;
use std::io;

use installer_infra::{CommandSpec, InstallerProcess, ProcessError, ProcessLauncher};

/// Replays fixed output and exit code instead of spawning anything.
pub struct ScriptedLauncher {
    lines: Vec<io::Result<String>>,
    exit_code: i32,
    fail_spawn: bool,
}

impl ScriptedLauncher {
    pub fn new(lines: &[&str], exit_code: i32) -> Self {
        Self {
            lines: lines.iter().map(|l| Ok(l.to_string())).collect(),
            exit_code,
            fail_spawn: false,
        }
    }

    pub fn failing_spawn() -> Self {
        Self {
            fail_spawn: true,
            ..Self::new(&[], 0)
        }
    }

    pub fn with_read_error_after(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| Ok(l.to_string())).collect();
        self.lines
            .push(Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")));
        self
    }
}

pub struct ScriptedProcess {
    lines: VecDeque<io::Result<String>>,
    exit_code: i32,
}

impl InstallerProcess for ScriptedProcess {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.lines.pop_front()
    }

    fn wait(&mut self) -> io::Result<i32> {
        Ok(self.exit_code)
    }
}

impl ProcessLauncher for ScriptedLauncher {
    type Process = ScriptedProcess;

    fn launch(&self, command: &CommandSpec) -> Result<ScriptedProcess, ProcessError> {
        if self.fail_spawn {
            return Err(ProcessError::Spawn {
                program: command.program().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            });
        }
        let lines = self
            .lines
            .iter()
            .map(|l| match l {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            })
            .collect();
        Ok(ScriptedProcess {
            lines,
            exit_code: self.exit_code,
        })
    }
}
