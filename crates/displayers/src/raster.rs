//! In-memory monochrome framebuffer
//!
//! Implements `DrawTarget` so the status screen is drawn with the regular
//! embedded-graphics text and primitive styles, the same way it would be
//! drawn onto an SSD1306 buffer.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use std::convert::Infallible;

/// One bit per pixel, row-major. Drawing outside the bounds is clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoRaster {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl MonoRaster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Number of lit pixels
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Serialize as a plain (P1) netpbm bitmap; 1 = lit
    pub fn to_pbm(&self) -> String {
        let mut out = String::with_capacity(self.pixels.len() * 2 + 16);
        out.push_str(&format!("P1\n{} {}\n", self.width, self.height));
        for row in self.pixels.chunks(self.width) {
            let line: Vec<&str> = row.iter().map(|p| if *p { "1" } else { "0" }).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

impl OriginDimensions for MonoRaster {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for MonoRaster {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x < self.width && y < self.height {
                self.pixels[y * self.width + x] = color.is_on();
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.is_on());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_drawing_is_clipped() {
        let mut raster = MonoRaster::new(8, 4);
        raster
            .draw_iter([
                Pixel(Point::new(100, 100), BinaryColor::On),
                Pixel(Point::new(-1, 0), BinaryColor::On),
            ])
            .unwrap();
        Line::new(Point::new(6, 0), Point::new(20, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut raster)
            .unwrap();
        assert_eq!(raster.lit(), 2);
        assert!(raster.get(7, 0));
        assert!(!raster.get(8, 0));
    }

    #[test]
    fn test_clear_fills_everything() {
        let mut raster = MonoRaster::new(4, 4);
        raster.clear(BinaryColor::On).unwrap();
        assert_eq!(raster.lit(), 16);
        raster.clear(BinaryColor::Off).unwrap();
        assert_eq!(raster.lit(), 0);
    }

    #[test]
    fn test_pbm_layout() {
        let mut raster = MonoRaster::new(3, 2);
        raster
            .draw_iter([
                Pixel(Point::new(0, 0), BinaryColor::On),
                Pixel(Point::new(2, 1), BinaryColor::On),
            ])
            .unwrap();
        assert_eq!(raster.to_pbm(), "P1\n3 2\n1 0 0\n0 0 1\n");
    }
}
