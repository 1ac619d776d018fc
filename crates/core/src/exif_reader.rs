use crate::error::SortError;
use crate::metadata::{CaptureRecord, TimestampSource};
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use exif::{Exif, In, Reader, Tag, Value};
use image::ImageReader;
use log::debug;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

// Tried in order; the first tag that parses wins.
const DATE_TAGS: &[(Tag, TimestampSource)] = &[
    (Tag::DateTimeOriginal, TimestampSource::DateTimeOriginal),
    (Tag::DateTimeDigitized, TimestampSource::DateTimeDigitized),
    (Tag::DateTime, TimestampSource::DateTime),
];

/// Reads the capture time of an image.
///
/// The file must open and decode as an image, otherwise the error is returned
/// and the file should be skipped. A missing EXIF block or unusable date tags
/// are not errors: the file's modification time is used instead and the
/// record is flagged as a fallback.
pub fn read_capture_record(path: &Path) -> Result<CaptureRecord, SortError> {
    probe_image(path)?;

    if let Some(record) = read_exif(path).and_then(|exif| find_embedded_timestamp(&exif)) {
        debug!(
            "{}: using {} {}",
            path.display(),
            record.source.label(),
            record.timestamp
        );
        return Ok(record);
    }

    let modified = file_modified(path)?;
    debug!(
        "{}: no usable EXIF date, using modification time {}",
        path.display(),
        modified
    );
    Ok(CaptureRecord::fallback(modified))
}

fn probe_image(path: &Path) -> Result<(), SortError> {
    let open_err = |source: io::Error| SortError::Open {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?
        .into_dimensions()
        .map_err(|source| SortError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

fn read_exif(path: &Path) -> Option<Exif> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    match Reader::new().read_from_container(&mut buf) {
        Ok(exif) => Some(exif),
        Err(err) => {
            debug!("{}: no EXIF block ({err})", path.display());
            None
        }
    }
}

fn find_embedded_timestamp(exif: &Exif) -> Option<CaptureRecord> {
    DATE_TAGS.iter().find_map(|&(tag, source)| {
        let field = exif.get_field(tag, In::PRIMARY)?;
        let timestamp = ascii_value(&field.value).and_then(parse_exif_datetime);
        if timestamp.is_none() {
            debug!("ignoring unparsable {tag} value");
        }
        Some(CaptureRecord::embedded(timestamp?, source))
    })
}

fn ascii_value(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(lines) => lines
            .first()
            .and_then(|line| std::str::from_utf8(line).ok()),
        _ => None,
    }
}

fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATE_FORMAT).ok()
}

fn file_modified(path: &Path) -> Result<NaiveDateTime, SortError> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| SortError::Modified {
            path: path.to_path_buf(),
            source,
        })?;
    let local = DateTime::<Local>::from(modified).naive_local();
    Ok(local.with_nanosecond(0).unwrap_or(local))
}

#[cfg(test)]
mod tests {
    use super::{parse_exif_datetime, read_capture_record};
    use crate::error::SortError;
    use crate::metadata::TimestampSource;
    use crate::test_support::{datetime, set_modified, write_jpeg_with_exif, write_png};
    use exif::Tag;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_exif_datetime_accepts_padded_values() {
        let expected = datetime("2023-05-17 14:30:00");
        assert_eq!(parse_exif_datetime("2023:05:17 14:30:00"), Some(expected));
        assert_eq!(parse_exif_datetime(" 2023:05:17 14:30:00\0"), Some(expected));
    }

    #[test]
    fn parse_exif_datetime_rejects_other_shapes() {
        assert_eq!(parse_exif_datetime("2023-05-17 14:30:00"), None);
        assert_eq!(parse_exif_datetime("0000:00:00 00:00:00"), None);
        assert_eq!(parse_exif_datetime("    :  :     :  :  "), None);
        assert_eq!(parse_exif_datetime(""), None);
    }

    #[test]
    fn reads_date_time_original() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("photo.jpg");
        write_jpeg_with_exif(&path, &[(Tag::DateTimeOriginal, "2023:05:17 14:30:00")]);

        let record = read_capture_record(&path).expect("record");
        assert_eq!(record.timestamp, datetime("2023-05-17 14:30:00"));
        assert_eq!(record.source, TimestampSource::DateTimeOriginal);
        assert!(!record.used_fallback());
    }

    #[test]
    fn original_wins_over_digitized_and_generic() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("photo.jpg");
        write_jpeg_with_exif(
            &path,
            &[
                (Tag::DateTime, "2021:01:01 00:00:00"),
                (Tag::DateTimeDigitized, "2022:02:02 02:02:02"),
                (Tag::DateTimeOriginal, "2023:03:03 03:03:03"),
            ],
        );

        let record = read_capture_record(&path).expect("record");
        assert_eq!(record.source, TimestampSource::DateTimeOriginal);
        assert_eq!(record.timestamp, datetime("2023-03-03 03:03:03"));
    }

    #[test]
    fn unparsable_tag_falls_through_to_next() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("photo.jpg");
        write_jpeg_with_exif(
            &path,
            &[
                (Tag::DateTime, "2021:01:01 00:00:00"),
                (Tag::DateTimeDigitized, "2022:02:02 02:02:02"),
                (Tag::DateTimeOriginal, "0000:00:00 00:00:00"),
            ],
        );

        let record = read_capture_record(&path).expect("record");
        assert_eq!(record.source, TimestampSource::DateTimeDigitized);
        assert_eq!(record.timestamp, datetime("2022-02-02 02:02:02"));
    }

    #[test]
    fn generic_date_time_is_used_last() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("photo.jpg");
        write_jpeg_with_exif(&path, &[(Tag::DateTime, "2021:01:01 08:09:10")]);

        let record = read_capture_record(&path).expect("record");
        assert_eq!(record.source, TimestampSource::DateTime);
        assert_eq!(record.timestamp, datetime("2021-01-01 08:09:10"));
    }

    #[test]
    fn garbage_tags_fall_back_to_modification_time() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("photo.jpg");
        write_jpeg_with_exif(&path, &[(Tag::DateTimeOriginal, "not a timestamp")]);
        set_modified(&path, datetime("2020-06-30 23:59:58"));

        let record = read_capture_record(&path).expect("record");
        assert!(record.used_fallback());
        assert_eq!(record.timestamp, datetime("2020-06-30 23:59:58"));
    }

    #[test]
    fn image_without_exif_uses_modification_time() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("scan.png");
        write_png(&path);
        set_modified(&path, datetime("2022-01-01 00:00:00"));

        let record = read_capture_record(&path).expect("record");
        assert_eq!(record.source, TimestampSource::FileModified);
        assert_eq!(record.timestamp, datetime("2022-01-01 00:00:00"));
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").expect("write broken");

        let err = read_capture_record(&path).expect_err("broken image should fail");
        assert!(matches!(err, SortError::Decode { .. }), "got {err:?}");
        assert!(!err.is_fatal());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let temp = tempdir().expect("tempdir");
        let err = read_capture_record(&temp.path().join("gone.png"))
            .expect_err("missing file should fail");
        assert!(matches!(err, SortError::Open { .. }), "got {err:?}");
    }
}
