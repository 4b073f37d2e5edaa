// Custom logger

use chrono::Local;
use env_logger::{Builder, Env};
use std::io::Write;

/// Timestamped log lines on stderr. Info by default, `RUST_LOG` overrides.
pub fn init_log() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
