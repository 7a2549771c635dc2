use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Format: `[HH:MM:SS] [LEVEL] message`. `level` is the fallback when
/// `RUST_LOG` is unset; unparseable values fall back to `info`.
pub fn init_logger(level: &str) {
    let default = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    Builder::from_env(Env::default().default_filter_or(default.to_string()))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
