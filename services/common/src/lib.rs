use std::{
    env, fs, io,
    net::SocketAddr,
    panic,
    path::{Path, PathBuf},
    str::FromStr,
    thread,
    time::{Duration, SystemTime},
};
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

const DEFAULT_LOG_DIR: &str = "/var/log/risk-alert";

/// Keeps the non-blocking file writer alive; drop it only on exit.
pub struct TracingGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Where and for how long rolling log files are kept.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub retention_days: u64,
    pub cleanup_interval_minutes: u64,
}

impl LogSettings {
    pub fn from_env(service_name: &str) -> Self {
        let root = env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
        Self {
            dir: PathBuf::from(root).join(service_name),
            retention_days: env_or("LOG_RETENTION_DAYS", 14u64),
            cleanup_interval_minutes: env_or("LOG_CLEANUP_INTERVAL_MINUTES", 360u64),
        }
    }

    fn cleanup_enabled(&self) -> bool {
        self.retention_days > 0 && self.cleanup_interval_minutes > 0
    }
}

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// under `LOG_DIR/<service_name>` when that directory is writable.
pub fn init_tracing(service_name: &str) -> TracingGuards {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let settings = LogSettings::from_env(service_name);

    let (file_layer, file_guard) = match rolling_writer(&settings.dir, service_name) {
        Some((writer, guard)) => {
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(io::stdout))
        .with(file_layer);
    let _ = tracing::subscriber::set_global_default(subscriber);

    if file_guard.is_some() && settings.cleanup_enabled() {
        spawn_log_cleanup(settings);
    } else if file_guard.is_none() {
        tracing::warn!(
            dir = %settings.dir.display(),
            "log directory unavailable, logging to stdout only"
        );
    }

    TracingGuards {
        _file_guard: file_guard,
    }
}

fn rolling_writer(
    dir: &Path,
    service_name: &str,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir).ok()?;
    // The rolling appender panics when the directory is not writable.
    let appender = panic::catch_unwind(|| {
        tracing_appender::rolling::daily(dir, format!("{service_name}.log"))
    })
    .ok()?;
    Some(tracing_appender::non_blocking(appender))
}

/// Reads `key` from the environment, falling back to `default` when it is
/// unset or does not parse as `T`.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn spawn_log_cleanup(settings: LogSettings) {
    let retention = Duration::from_secs(settings.retention_days * 24 * 60 * 60);
    let interval = Duration::from_secs(settings.cleanup_interval_minutes * 60);

    thread::spawn(move || loop {
        if let Some(cutoff) = SystemTime::now().checked_sub(retention) {
            let removed = cleanup_old_logs(&settings.dir, cutoff);
            if removed > 0 {
                tracing::info!(removed, dir = %settings.dir.display(), "old log files removed");
            }
        }
        thread::sleep(interval);
    });
}

/// Removes files under `root` last modified before `cutoff`. Returns how many
/// were deleted.
fn cleanup_old_logs(root: &Path, cutoff: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(root) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            removed += cleanup_old_logs(&path, cutoff);
            continue;
        }
        let modified = match entry.metadata().and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        if modified < cutoff && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

/// Binds on all interfaces so the service is reachable from inside a container.
pub async fn bind_listener(port: u16) -> io::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    Ok(listener)
}

/// Resolves on ctrl-c or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "sigterm handler unavailable");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("risk-alert-common-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("RISK_ALERT_TEST_UNSET_KEY", 42u16), 42);
    }

    #[test]
    fn env_or_falls_back_when_unparsable() {
        env::set_var("RISK_ALERT_TEST_BAD_PORT", "not-a-port");
        assert_eq!(env_or("RISK_ALERT_TEST_BAD_PORT", 8000u16), 8000);
    }

    #[test]
    fn env_or_parses_value() {
        env::set_var("RISK_ALERT_TEST_LIMIT", " 2048 ");
        assert_eq!(env_or("RISK_ALERT_TEST_LIMIT", 0usize), 2048);
    }

    #[test]
    fn cleanup_removes_files_older_than_cutoff() {
        let dir = scratch_dir("old");
        let nested = dir.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.join("a.log"), b"a").unwrap();
        fs::write(nested.join("b.log"), b"b").unwrap();

        let cutoff = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(cleanup_old_logs(&dir, cutoff), 2);
        assert!(!dir.join("a.log").exists());
        assert!(!nested.join("b.log").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn cleanup_keeps_recent_files() {
        let dir = scratch_dir("recent");
        fs::write(dir.join("today.log"), b"t").unwrap();

        let cutoff = SystemTime::now() - Duration::from_secs(3600);
        assert_eq!(cleanup_old_logs(&dir, cutoff), 0);
        assert!(dir.join("today.log").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn cleanup_of_missing_dir_is_noop() {
        let dir = env::temp_dir().join("risk-alert-common-does-not-exist");
        assert_eq!(cleanup_old_logs(&dir, SystemTime::now()), 0);
    }

    #[test]
    fn log_settings_nest_service_dir() {
        let settings = LogSettings::from_env("risk-alert-service");
        assert!(settings.dir.ends_with("risk-alert-service"));
    }
}
