use anyhow::{Context, Result};
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Render the completion script for `shell` as a string
pub fn script(shell: Shell, cmd: &mut Command) -> Result<String> {
    let bin_name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shell, cmd, bin_name.as_str(), &mut buf);

    tracing::debug!(
        "Generated {} bytes of {} completions for {}",
        buf.len(),
        shell,
        bin_name
    );

    String::from_utf8(buf).context("Completion script is not valid UTF-8")
}

pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let script = script(shell, cmd)?;
    io::stdout()
        .lock()
        .write_all(script.as_bytes())
        .context("Failed to write completion script")?;
    Ok(())
}
