//! Texture atlas text parser.
//!
//! Accepts both the 3.x layout (`xy`/`size`/`orig`/`offset`/`index` per region) and the keyed
//! 4.x layout (`bounds`/`offsets`).

use crate::{Error, TextureRegion};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Atlas {
    pub pages: Vec<AtlasPage>,
    pub regions: HashMap<String, AtlasRegion>,
}

impl Atlas {
    pub fn parse(input: &str) -> Result<Self, Error> {
        parse_atlas(input)
    }

    pub fn region(&self, name: &str) -> Option<&AtlasRegion> {
        self.regions.get(name)
    }

    pub fn page(&self, index: usize) -> Option<&AtlasPage> {
        self.pages.get(index)
    }

    /// Normalized texture coordinates for the named region. Rotated regions swap the packed
    /// width and height along u and v.
    pub fn texture_region(&self, name: &str) -> Option<TextureRegion> {
        let region = self.region(name)?;
        let page = self.page(region.page)?;
        let page_w = page.width as f32;
        let page_h = page.height as f32;
        let x = region.x as f32;
        let y = region.y as f32;
        let w = region.width as f32;
        let h = region.height as f32;
        let (u2, v2) = if region.degrees == 90 {
            ((x + h) / page_w, (y + w) / page_h)
        } else {
            ((x + w) / page_w, (y + h) / page_h)
        };
        Some(TextureRegion {
            page: Some(region.page),
            u: x / page_w,
            v: y / page_h,
            u2,
            v2,
            degrees: region.degrees,
            offset_x: region.offset_x as f32,
            offset_y: region.offset_y as f32,
            width: w,
            height: h,
            original_width: region.original_width as f32,
            original_height: region.original_height as f32,
        })
    }
}

impl FromStr for Atlas {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_atlas(s)
    }
}

#[derive(Clone, Debug)]
pub struct AtlasPage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
    pub scale: f32,
    pub pma: bool,
    pub min_filter: AtlasFilter,
    pub mag_filter: AtlasFilter,
    pub wrap_u: AtlasWrap,
    pub wrap_v: AtlasWrap,
}

impl AtlasPage {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 0,
            height: 0,
            format: None,
            scale: 1.0,
            pma: false,
            min_filter: AtlasFilter::default(),
            mag_filter: AtlasFilter::default(),
            wrap_u: AtlasWrap::default(),
            wrap_v: AtlasWrap::default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum AtlasFilter {
    Nearest,
    #[default]
    Linear,
    MipMap,
    MipMapNearestNearest,
    MipMapNearestLinear,
    MipMapLinearNearest,
    MipMapLinearLinear,
    Other(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum AtlasWrap {
    #[default]
    ClampToEdge,
    Repeat,
}

#[derive(Clone, Debug)]
pub struct AtlasRegion {
    pub name: String,
    pub page: usize,
    pub degrees: u16,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub original_width: u32,
    pub original_height: u32,
    /// Frame index for sequences; -1 when the region is not part of one.
    pub index: i32,
    /// Nine-patch split lines (left, right, top, bottom).
    pub splits: Option<[i32; 4]>,
    pub pads: Option<[i32; 4]>,
}

impl AtlasRegion {
    fn new(name: &str, page: usize) -> Self {
        Self {
            name: name.to_string(),
            page,
            degrees: 0,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            offset_x: 0,
            offset_y: 0,
            original_width: 0,
            original_height: 0,
            index: -1,
            splits: None,
            pads: None,
        }
    }

    fn finish(mut self) -> Self {
        if self.original_width == 0 {
            self.original_width = self.width;
        }
        if self.original_height == 0 {
            self.original_height = self.height;
        }
        self
    }
}

fn atlas_error(what: &str, value: &str) -> Error {
    Error::AtlasParse {
        message: format!("invalid {what}: {value}"),
    }
}

#[derive(Default)]
struct AtlasBuilder {
    pages: Vec<AtlasPage>,
    regions: HashMap<String, AtlasRegion>,
    region: Option<AtlasRegion>,
    expect_page: bool,
    page_has_regions: bool,
}

impl AtlasBuilder {
    fn flush_region(&mut self) {
        if let Some(region) = self.region.take() {
            let region = region.finish();
            self.regions.insert(region.name.clone(), region);
            self.page_has_regions = true;
        }
    }

    fn region_field(region: &mut AtlasRegion, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "rotate" => region.degrees = parse_degrees(value),
            "xy" => {
                let [x, y] = parse_ints::<u32, 2>(value).ok_or_else(|| atlas_error("region xy", value))?;
                region.x = x;
                region.y = y;
            }
            "size" => {
                let [w, h] =
                    parse_ints::<u32, 2>(value).ok_or_else(|| atlas_error("region size", value))?;
                region.width = w;
                region.height = h;
            }
            "bounds" => {
                let [x, y, w, h] =
                    parse_ints::<u32, 4>(value).ok_or_else(|| atlas_error("region bounds", value))?;
                region.x = x;
                region.y = y;
                region.width = w;
                region.height = h;
            }
            "orig" => {
                let [w, h] =
                    parse_ints::<u32, 2>(value).ok_or_else(|| atlas_error("region orig", value))?;
                region.original_width = w;
                region.original_height = h;
            }
            "offset" => {
                let [x, y] =
                    parse_ints::<i32, 2>(value).ok_or_else(|| atlas_error("region offset", value))?;
                region.offset_x = x;
                region.offset_y = y;
            }
            "offsets" => {
                let [x, y, w, h] = parse_ints::<i32, 4>(value)
                    .ok_or_else(|| atlas_error("region offsets", value))?;
                region.offset_x = x;
                region.offset_y = y;
                region.original_width = w.max(0) as u32;
                region.original_height = h.max(0) as u32;
            }
            "index" => {
                region.index = value
                    .parse()
                    .map_err(|_| atlas_error("region index", value))?;
            }
            "split" => {
                region.splits =
                    Some(parse_ints::<i32, 4>(value).ok_or_else(|| atlas_error("region split", value))?);
            }
            "pad" => {
                region.pads =
                    Some(parse_ints::<i32, 4>(value).ok_or_else(|| atlas_error("region pad", value))?);
            }
            other => log::debug!("atlas: ignoring region field '{other}'"),
        }
        Ok(())
    }

    fn page_field(page: &mut AtlasPage, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "size" => {
                let [w, h] =
                    parse_ints::<u32, 2>(value).ok_or_else(|| atlas_error("page size", value))?;
                page.width = w;
                page.height = h;
            }
            "format" => page.format = Some(value.to_string()),
            "scale" => {
                let s: f32 = value.parse().map_err(|_| atlas_error("page scale", value))?;
                page.scale = if s.is_finite() { s } else { 1.0 };
            }
            "filter" => {
                let (min, mag) = match value.split_once(',') {
                    Some((a, b)) => (parse_filter(a.trim()), parse_filter(b.trim())),
                    None => (parse_filter(value), parse_filter(value)),
                };
                page.min_filter = min;
                page.mag_filter = mag;
            }
            "repeat" => {
                (page.wrap_u, page.wrap_v) = parse_repeat(value);
            }
            "pma" => page.pma = value == "true",
            other => log::debug!("atlas: ignoring page field '{other}'"),
        }
        Ok(())
    }

    fn line(&mut self, raw_line: &str) -> Result<(), Error> {
        if raw_line.trim().is_empty() {
            self.flush_region();
            // A blank line between page fields and the first region does not start a new page.
            if self.page_has_regions {
                self.expect_page = true;
            }
            return Ok(());
        }

        let indented = raw_line.starts_with([' ', '\t']);
        let line = raw_line.trim();

        if self.pages.is_empty() || self.expect_page {
            self.flush_region();
            self.pages.push(AtlasPage::new(line));
            self.expect_page = false;
            self.page_has_regions = false;
            return Ok(());
        }

        let page_index = self.pages.len() - 1;
        let keyed = line.split_once(':');

        if !indented && keyed.is_none() {
            self.flush_region();
            self.region = Some(AtlasRegion::new(line, page_index));
            return Ok(());
        }

        let Some((key, value)) = keyed else {
            return Err(Error::AtlasParse {
                message: format!("expected 'key: value', got '{line}'"),
            });
        };
        let (key, value) = (key.trim(), value.trim());

        match self.region.as_mut() {
            Some(region) => Self::region_field(region, key, value),
            None => Self::page_field(&mut self.pages[page_index], key, value),
        }
    }

    fn finish(mut self) -> Result<Atlas, Error> {
        self.flush_region();
        if self.pages.is_empty() {
            return Err(Error::AtlasParse {
                message: "empty atlas".to_string(),
            });
        }
        log::debug!(
            "atlas: parsed {} page(s), {} region(s)",
            self.pages.len(),
            self.regions.len()
        );
        Ok(Atlas {
            pages: self.pages,
            regions: self.regions,
        })
    }
}

fn parse_atlas(input: &str) -> Result<Atlas, Error> {
    let mut builder = AtlasBuilder {
        expect_page: true,
        ..AtlasBuilder::default()
    };
    for raw_line in input.lines() {
        builder.line(raw_line.trim_end_matches('\r'))?;
    }
    builder.finish()
}

fn parse_ints<T: FromStr, const N: usize>(value: &str) -> Option<[T; N]> {
    let parsed: Vec<T> = value
        .split(',')
        .map(|s| s.trim().parse::<T>().ok())
        .collect::<Option<_>>()?;
    parsed.try_into().ok()
}

fn parse_degrees(value: &str) -> u16 {
    match value {
        "true" => 90,
        "false" => 0,
        _ => value
            .parse::<i32>()
            .map(|raw| raw.rem_euclid(360) as u16)
            .unwrap_or(0),
    }
}

fn parse_filter(value: &str) -> AtlasFilter {
    match value {
        "Nearest" => AtlasFilter::Nearest,
        "Linear" => AtlasFilter::Linear,
        "MipMap" => AtlasFilter::MipMap,
        "MipMapNearestNearest" => AtlasFilter::MipMapNearestNearest,
        "MipMapNearestLinear" => AtlasFilter::MipMapNearestLinear,
        "MipMapLinearNearest" => AtlasFilter::MipMapLinearNearest,
        "MipMapLinearLinear" => AtlasFilter::MipMapLinearLinear,
        other => AtlasFilter::Other(other.to_string()),
    }
}

fn parse_repeat(value: &str) -> (AtlasWrap, AtlasWrap) {
    match value {
        "x" => (AtlasWrap::Repeat, AtlasWrap::ClampToEdge),
        "y" => (AtlasWrap::ClampToEdge, AtlasWrap::Repeat),
        "xy" => (AtlasWrap::Repeat, AtlasWrap::Repeat),
        _ => (AtlasWrap::ClampToEdge, AtlasWrap::ClampToEdge),
    }
}
