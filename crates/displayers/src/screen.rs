//! Status screen composition for the 128x64 display
//!
//! Works on any `BinaryColor` draw target: the in-memory raster behind the
//! frame-file backend, or a panel driver's buffer.

use chrono::DateTime;
use chrono_tz::Tz;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use wx_station_types::{format_value, Reading, DISPLAY_PLACEHOLDER};

const CLOCK_FORMAT: &str = "%I:%M:%S %p";
const CLOCK_Y: i32 = 1;
const SEPARATOR_Y: i32 = 12;
const LABEL_Y: i32 = 15;
const VALUE_Y: i32 = 27;
const UNIT_Y: i32 = 50;

fn small() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_6X10, BinaryColor::On)
}

fn large() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_10X20, BinaryColor::On)
}

fn centered() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build()
}

fn stroke() -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_stroke(BinaryColor::On, 1)
}

#[derive(Clone, Copy)]
enum Icon {
    Thermometer,
    Droplet,
}

/// Draw the clock line, separator and both value sections
pub fn compose_status<D>(
    target: &mut D,
    reading: Option<&Reading>,
    now: DateTime<Tz>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    let size = target.bounding_box().size;
    let (width, height) = (size.width as i32, size.height as i32);
    let half = width / 2;

    let clock = now.format(CLOCK_FORMAT).to_string();
    Text::with_text_style(&clock, Point::new(half, CLOCK_Y), small(), centered()).draw(target)?;
    Line::new(Point::new(0, SEPARATOR_Y), Point::new(width - 1, SEPARATOR_Y))
        .into_styled(stroke())
        .draw(target)?;
    Line::new(Point::new(half, SEPARATOR_Y + 4), Point::new(half, height - 2))
        .into_styled(stroke())
        .draw(target)?;

    let temperature = format_value(reading.and_then(|r| r.temperature), DISPLAY_PLACEHOLDER);
    let humidity = format_value(reading.and_then(|r| r.humidity), DISPLAY_PLACEHOLDER);

    draw_section(target, 0, half, "T", Icon::Thermometer, &temperature, "°C")?;
    draw_section(target, half, half, "H", Icon::Droplet, &humidity, "%")?;
    Ok(())
}

/// Draw one message centered on an otherwise blank screen.
///
/// Long messages drop to the small font so they still fit.
pub fn compose_message<D>(target: &mut D, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    let size = target.bounding_box().size;
    let style = if text_width(&FONT_10X20, text) <= size.width { large() } else { small() };
    let middle = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let center = Point::new(size.width as i32 / 2, size.height as i32 / 2);
    Text::with_text_style(text, center, style, middle).draw(target)?;
    Ok(())
}

fn text_width(font: &MonoFont<'_>, text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars * (font.character_size.width + font.character_spacing)
}

fn draw_section<D>(
    target: &mut D,
    left: i32,
    width: i32,
    label: &str,
    icon: Icon,
    value: &str,
    unit: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let center = left + width / 2;
    Text::with_baseline(label, Point::new(left + 6, LABEL_Y), small(), Baseline::Top).draw(target)?;
    draw_icon(target, icon, Point::new(left + 16, LABEL_Y - 1))?;
    Text::with_text_style(value, Point::new(center, VALUE_Y), large(), centered()).draw(target)?;
    Text::with_text_style(unit, Point::new(center, UNIT_Y), small(), centered()).draw(target)?;
    Ok(())
}

fn draw_icon<D>(target: &mut D, icon: Icon, at: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    match icon {
        Icon::Thermometer => {
            Rectangle::new(at + Point::new(1, 0), Size::new(3, 7))
                .into_styled(stroke())
                .draw(target)?;
            Circle::new(at + Point::new(0, 6), 5)
                .into_styled(fill)
                .draw(target)?;
        }
        Icon::Droplet => {
            Triangle::new(at + Point::new(2, 0), at + Point::new(0, 5), at + Point::new(4, 5))
                .into_styled(fill)
                .draw(target)?;
            Circle::new(at + Point::new(0, 4), 5)
                .into_styled(fill)
                .draw(target)?;
        }
    }
    Ok(())
}
