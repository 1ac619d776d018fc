use chrono::NaiveDateTime;

/// Where a capture timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    DateTimeOriginal,
    DateTimeDigitized,
    DateTime,
    FileModified,
}

impl TimestampSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::DateTimeOriginal => "DateTimeOriginal",
            Self::DateTimeDigitized => "DateTimeDigitized",
            Self::DateTime => "DateTime",
            Self::FileModified => "file modification time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRecord {
    pub timestamp: NaiveDateTime,
    pub source: TimestampSource,
}

impl CaptureRecord {
    pub fn embedded(timestamp: NaiveDateTime, source: TimestampSource) -> Self {
        Self { timestamp, source }
    }

    pub fn fallback(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            source: TimestampSource::FileModified,
        }
    }

    /// True when no embedded tag could be used and the file's mtime stands in.
    pub fn used_fallback(&self) -> bool {
        self.source == TimestampSource::FileModified
    }
}
