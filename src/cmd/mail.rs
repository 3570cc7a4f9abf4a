//! Send-mail command CLI handler.

use crate::mail::{Mailer, Message};
use std::path::PathBuf;

pub fn run(
    sendmail: PathBuf,
    from: String,
    to: String,
    subject: String,
    body: String,
) -> anyhow::Result<()> {
    let message = Message {
        from,
        to,
        subject,
        body,
    };

    let status = Mailer::new(sendmail).send(&message)?;
    if !status.success() {
        match status.code() {
            Some(code) => eprintln!("Sendmail exit status {}", code),
            None => eprintln!("Sendmail terminated by signal ({})", status),
        }
    }

    Ok(())
}
