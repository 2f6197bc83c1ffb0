use anyhow::{Context, Result};
use std::io::BufRead;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};

use crate::events::{COMMAND_HELP, Command};

/// Blocking reader: one command per line until EOF or `quit`.
///
/// Must run off the async runtime (`spawn_blocking` or a plain thread).
/// Returning drops `commands`, which lets the controller drain what is
/// queued and stop.
pub fn read_commands<R: BufRead>(mut reader: R, commands: Sender<Command>) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .context("reading command input")?;
        if n == 0 {
            break;
        }
        // Non-UTF-8 bytes are replaced rather than ending the session.
        let line = String::from_utf8_lossy(&buf);
        match line.parse::<Command>() {
            Ok(cmd) => {
                let quit = cmd == Command::Quit;
                if commands.blocking_send(cmd).is_err() {
                    debug!("controller gone; stop reading input");
                    return Ok(());
                }
                if quit {
                    return Ok(());
                }
            }
            Err(err) => {
                warn!("{err}");
                eprintln!("{err}\n{COMMAND_HELP}");
            }
        }
    }
    info!("input closed");
    Ok(())
}
