//! Daily rotating file sink.
//!
//! # Responsibilities
//! - Create the logs directory and its access-control marker
//! - Append one structured line per record to `<facility>.<YYYY-MM-DD>.log`
//!
//! # Design Decisions
//! - Rotation is delegated to tracing-appender (UTC calendar days)
//! - The marker is written once and never overwritten
//! - Each line goes out in a single `write_all` through the appender lock

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, SecondsFormat, Utc};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::FileConfig;
use crate::logger::LogRecord;
use crate::sink::{Sink, SinkError};

/// Name of the marker denying web access to the logs directory.
pub const MARKER_FILE: &str = ".htaccess";

/// Contents of the access-control marker.
pub const MARKER_CONTENTS: &str = "Options -Indexes\norder deny,allow\ndeny from all";

/// Writes records to a dated file per day.
pub struct FileSink {
    appender: RollingFileAppender,
    dir: PathBuf,
    facility: String,
}

impl FileSink {
    /// Prepare the logs directory and open the rolling appender.
    pub fn open(facility: &str, config: &FileConfig) -> Result<Self, SinkError> {
        let dir = config.logs_dir();
        prepare_logs_dir(&dir)?;

        let mut builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(facility)
            .filename_suffix("log");
        if let Some(max_files) = config.max_files {
            builder = builder.max_log_files(max_files);
        }
        let appender = builder.build(&dir)?;

        tracing::debug!(
            dir = %dir.display(),
            facility = %facility,
            "Rolling log file opened"
        );

        Ok(Self {
            appender,
            dir,
            facility: facility.to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file records are written to today.
    pub fn current_path(&self) -> PathBuf {
        self.dir
            .join(dated_file_name(&self.facility, Utc::now().date_naive()))
    }
}

impl Sink for FileSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = format_line(record)?;
        let mut writer = self.appender.make_writer();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("dir", &self.dir)
            .field("facility", &self.facility)
            .finish()
    }
}

/// File name used for a facility on a given day.
pub fn dated_file_name(facility: &str, date: NaiveDate) -> String {
    format!("{facility}.{}.log", date.format("%Y-%m-%d"))
}

/// Create the logs directory if needed and write the marker if missing.
///
/// Returns whether the marker was written by this call.
pub fn prepare_logs_dir(dir: &Path) -> io::Result<bool> {
    if !dir.is_dir() {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o770);
        }
        builder.create(dir)?;
    }

    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dir.join(MARKER_FILE))
    {
        Ok(mut marker) => {
            marker.write_all(MARKER_CONTENTS.as_bytes())?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

/// Render a record as `[datetime] facility.LEVEL: message {context}`.
pub fn format_line(record: &LogRecord) -> Result<String, SinkError> {
    let message = record.message.replace("\r\n", " ").replace(['\r', '\n'], " ");
    Ok(format!(
        "[{}] {}.{}: {} {}\n",
        record.datetime.to_rfc3339_opts(SecondsFormat::Micros, false),
        record.channel,
        record.level.name(),
        message,
        serde_json::to_string(&record.context)?,
    ))
}
