//! Running the `bw` executable and decoding what it prints.

use std::{
    fmt, io,
    process::{Command, Stdio},
};

use log::debug;
use serde::de::DeserializeOwned;

use crate::{BwError, Session};

const SESSION_FLAG: &str = "--session";
const REDACTED: &str = "[REDACTED]";

/// A single command line to run, plus any extra environment for the child.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl Invocation {
    #[allow(missing_docs)]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Append `--session <token>` as the final two arguments, unless the session is empty.
    pub fn with_session(mut self, session: &Session) -> Self {
        if !session.is_empty() {
            self.args.push(SESSION_FLAG.to_string());
            self.args.push(session.expose().to_string());
        }
        self
    }

    #[allow(missing_docs)]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[allow(missing_docs)]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[allow(missing_docs)]
    pub fn envs(&self) -> &[(String, String)] {
        &self.envs
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)));
        command
    }
}

/// Renders the command line with the session token and environment values hidden.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        let mut redact_next = false;
        for arg in &self.args {
            if redact_next {
                write!(f, " {REDACTED}")?;
            } else {
                write!(f, " {arg}")?;
            }
            redact_next = arg == SESSION_FLAG;
        }
        Ok(())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.to_string())
            .field(
                "envs",
                &self.envs.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// What a finished child process left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    #[allow(missing_docs)]
    pub stdout: Vec<u8>,
    /// Captured standard error. Always empty for interactive runs.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// A successful run that printed `stdout`.
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// A run that exited with `code` after printing `stderr`.
    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    #[allow(missing_docs)]
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Runs [Invocation]s. Blocks until the child exits.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run with standard input closed, capturing standard output and standard error.
    fn output(&self, invocation: &Invocation) -> io::Result<CommandOutput>;

    /// Run with standard input and standard error connected to this process, so a human can
    /// answer prompts. Only standard output is captured.
    fn interactive(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

/// [CommandRunner] backed by [std::process::Command].
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn output(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        invocation
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map(Into::into)
    }

    fn interactive(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        invocation
            .to_command()
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdout(Stdio::piped())
            .output()
            .map(Into::into)
    }
}

/// Turn a finished run into its standard output, or a [BwError] carrying the command line and
/// whatever it wrote to standard error.
pub(crate) fn check_output(
    invocation: &Invocation,
    result: io::Result<CommandOutput>,
) -> Result<Vec<u8>, BwError> {
    let output = result.map_err(|source| BwError::Spawn {
        command: invocation.to_string(),
        source,
    })?;

    if !output.is_success() {
        return Err(BwError::CommandFailed {
            command: invocation.to_string(),
            status: output.status_text(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output.stdout)
}

/// Run a non-interactive command and return its standard output.
pub fn run<R: CommandRunner + ?Sized>(
    runner: &R,
    invocation: &Invocation,
) -> Result<Vec<u8>, BwError> {
    debug!("running {invocation}");
    check_output(invocation, runner.output(invocation))
}

/// Run a non-interactive command and decode its standard output as `T`.
pub fn run_json<T, R>(runner: &R, invocation: &Invocation) -> Result<T, BwError>
where
    T: DeserializeOwned,
    R: CommandRunner + ?Sized,
{
    let stdout = run(runner, invocation)?;
    serde_json::from_slice(&stdout).map_err(|source| BwError::Decode {
        target: short_type_name::<T>(),
        source,
    })
}

/// `alloc::vec::Vec<my_crate::item::Item>` becomes `Vec<Item>`.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut ident = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' {
            ident.push(c);
        } else if c == ':' {
            ident.clear();
        } else {
            short.push_str(&ident);
            ident.clear();
            short.push(c);
        }
    }
    short.push_str(&ident);
    short
}
