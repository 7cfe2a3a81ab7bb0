#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read as _};
use std::path::Path;

use image::ImageFormat;

pub fn png(width: u32, height: u32, shade: u8) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::from_pixel(width, height, image::Rgb([shade, shade, shade]))
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut out, ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

/// Writes a 12x17 `cover.png` and the given pages, each with distinct bytes.
pub fn write_book(dir: &Path, pages: &[&str]) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("cover.png"), png(12, 17, 0))?;
    for (idx, name) in pages.iter().enumerate() {
        fs::write(dir.join(name), png(12, 17, (idx + 1) as u8))?;
    }
    Ok(())
}

pub fn entry_names(epub: &Path) -> anyhow::Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(fs::File::open(epub)?)?;
    let mut names = Vec::new();
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_owned());
    }
    Ok(names)
}

pub fn read_entry(epub: &Path, name: &str) -> anyhow::Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(fs::File::open(epub)?)?;
    let mut entry = archive.by_name(name)?;
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}

pub fn read_text(epub: &Path, name: &str) -> anyhow::Result<String> {
    Ok(String::from_utf8(read_entry(epub, name)?)?)
}
