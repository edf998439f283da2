pub mod formats;

use flexi_logger::{Logger, LoggerHandle};

use crate::Error;

/// Log spec for a `-v` count; `RUST_LOG` still wins when set.
fn default_spec(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info,sqlx=warn",
        1 => "debug,sqlx=info",
        _ => "trace",
    }
}

/// Log to stderr so stdout carries only command output, such as a generated password.
pub fn init(verbosity: u8) -> Result<LoggerHandle, Error> {
    let handle = Logger::try_with_env_or_str(default_spec(verbosity))?
        .format(formats::cli_format)
        .log_to_stderr()
        .start()?;
    Ok(handle)
}
