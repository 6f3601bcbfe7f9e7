//! Station page scraping.
//!
//! The page is read line by line with three markers. Everything that depends
//! on the layout of the third-party page lives in this module; callers only
//! see a [`Station`] or a [`CheckError`].

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::{CheckError, Field, Result};
use crate::models::{Price, PriceTable, Station};
use crate::utils::exchange_special_characters;

static STATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"itemprop="name"[^>]*>\s*([^<]*?)\s*<"#).unwrap());
static STATION_STREET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"itemprop="streetAddress"[^>]*>\s*([^<]*?)\s*<"#).unwrap());
static FUEL_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="price-type-name"[^>]*>\s*([^<]*?)\s*<"#).unwrap());
static PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+\.\d+)").unwrap());

/// The price sits this many lines below its fuel label.
const PRICE_LINE_OFFSET: usize = 3;

pub fn extract_station(body: &str) -> Result<Station> {
    let lines: Vec<&str> = body.lines().collect();

    let mut name: Option<String> = None;
    let mut street: Option<String> = None;
    let mut prices = PriceTable::new();

    for (index, line) in lines.iter().enumerate() {
        if name.is_none() {
            if let Some(caps) = STATION_NAME.captures(line) {
                name = Some(exchange_special_characters(&caps[1]));
            }
        }

        if street.is_none() {
            if let Some(caps) = STATION_STREET.captures(line) {
                street = Some(exchange_special_characters(&caps[1]));
            }
        }

        if let Some(caps) = FUEL_TYPE.captures(line) {
            let fuel = caps[1].to_string();
            let price = price_at(&lines, index + PRICE_LINE_OFFSET)?;
            debug!("Found {} at {}", fuel, price);
            prices.insert(fuel, price);
        }
    }

    let name = name.filter(|n| !n.is_empty()).ok_or(CheckError::MissingField(Field::StationName))?;
    let street = street.filter(|s| !s.is_empty()).ok_or(CheckError::MissingField(Field::Street))?;

    Ok(Station {
        name,
        street,
        prices,
    })
}

fn price_at(lines: &[&str], index: usize) -> Result<Price> {
    let malformed = |line: &str| CheckError::MalformedPrice {
        line_no: index + 1,
        line: line.trim().to_string(),
    };

    let line = lines.get(index).copied().ok_or_else(|| malformed("<end of page>"))?;
    let caps = PRICE.captures(line).ok_or_else(|| malformed(line))?;
    caps[1].parse::<Price>().map_err(|_| malformed(line))
}
