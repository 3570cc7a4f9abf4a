//! Test mail delivery through a local sendmail-compatible MTA.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

pub const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";
pub const DEFAULT_FROM: &str = "no-reply@info2.informatik.uni-tuebingen.de";
pub const DEFAULT_TO: &str = "patrick.wieschollek@uni-tuebingen.de";
pub const DEFAULT_SUBJECT: &str = "TestSubject";
pub const DEFAULT_BODY: &str = "body of the mail";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

impl Message {
    /// Headers, blank separator line, body
    pub fn to_mail_text(&self) -> String {
        format!(
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            self.from, self.to, self.subject, self.body
        )
    }
}

/// Pipes messages into a sendmail binary
#[derive(Debug, Clone)]
pub struct Mailer {
    program: PathBuf,
    args: Vec<String>,
}

impl Mailer {
    /// `program -t`: recipients are read from the message headers
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["-t".to_string()],
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Run the MTA once and wait for it.
    ///
    /// A non-zero exit is reported through the returned status, not as an
    /// error. Failing to start the program or to hand it the message is an
    /// error, returned only after the child has exited.
    pub fn send(&self, message: &Message) -> io::Result<ExitStatus> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(message.to_mail_text().as_bytes()),
            None => Ok(()),
        };

        // stdin is closed here; always reap the child before reporting
        let status = child.wait()?;
        match written {
            // the MTA exited before reading; its status tells why
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(status),
            Err(e) => Err(e),
            Ok(()) => Ok(status),
        }
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new(DEFAULT_SENDMAIL)
    }
}
