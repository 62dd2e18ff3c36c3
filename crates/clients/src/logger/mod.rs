use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 이 구조체가 drop되기 전까지 로그가 flush된다. main에서 들고 있어야 한다.
pub struct TracingGuards {
    _file: WorkerGuard,
    _stdout: WorkerGuard,
}

/// stdout과 날짜별 파일 로그를 함께 설정한다.
///
/// stdout은 `RUST_LOG`를 따르고(기본 info), 파일에는 debug 이상을 남긴다.
/// 요청 쿼리 문자열은 trace 레벨이라 파일에는 기록되지 않는다.
pub fn init_tracing(log_dir: impl AsRef<Path>) -> io::Result<TracingGuards> {
    let (file_writer, file_guard) = daily_file_appender(log_dir.as_ref(), "owl")?;
    let (stdout_writer, stdout_guard) = non_blocking(io::stdout());

    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_filter = EnvFilter::new("debug");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(stdout_writer)
                .with_ansi(true)
                .with_filter(stdout_filter),
        )
        .init();

    Ok(TracingGuards {
        _file: file_guard,
        _stdout: stdout_guard,
    })
}

/// `logs/owl.2025-11-29.log` 형식. 날짜는 시작 시점 기준이다.
fn daily_file_appender(base_dir: &Path, prefix: &str) -> io::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(base_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(base_dir, prefix, &Local::now().format("%Y-%m-%d").to_string()))?;

    Ok(non_blocking(file))
}

fn log_file_path(base_dir: &Path, prefix: &str, date: &str) -> PathBuf {
    base_dir.join(format!("{prefix}.{date}.log"))
}
