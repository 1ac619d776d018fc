//! Fixture helpers shared by the unit tests.

use chrono::{Local, NaiveDateTime, TimeZone};
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::{DynamicImage, ImageFormat};
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

pub fn datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").expect("valid datetime")
}

pub fn write_png(path: &Path) {
    DynamicImage::new_rgb8(4, 4)
        .save_with_format(path, ImageFormat::Png)
        .expect("write png");
}

/// Writes a small JPEG carrying the given ASCII tags in an APP1 EXIF segment.
pub fn write_jpeg_with_exif(path: &Path, tags: &[(Tag, &str)]) {
    let mut jpeg = Vec::new();
    DynamicImage::new_rgb8(4, 4)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .expect("encode jpeg");

    let tiff = build_tiff(tags);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("segment fits");

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    fs::write(path, out).expect("write jpeg");
}

pub fn set_modified(path: &Path, at: NaiveDateTime) {
    let local = Local
        .from_local_datetime(&at)
        .single()
        .expect("unambiguous local time");
    File::options()
        .write(true)
        .open(path)
        .expect("open for mtime")
        .set_modified(SystemTime::from(local))
        .expect("set mtime");
}

/// Every entry below `root`, relative and sorted.
pub fn snapshot(root: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.expect("walk entry"))
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .expect("under root")
                .to_path_buf()
        })
        .collect();
    entries.sort();
    entries
}

fn build_tiff(tags: &[(Tag, &str)]) -> Vec<u8> {
    let fields: Vec<Field> = tags
        .iter()
        .map(|&(tag, value)| Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        })
        .collect();

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, true).expect("write exif");
    tiff.into_inner()
}
