//! A plotters drawing backend that writes PDF vector operators.
//!
//! Backend coordinates are PDF points with the origin at the top-left, as
//! plotters expects; they are flipped to PDF's bottom-left origin on output.
//! Text uses the base-14 Helvetica font registered as `/F1`, so no font files
//! are needed.

use std::convert::Infallible;

use pdf_writer::{Content, Name, Str};
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};

/// Resource name of the page font.
pub const FONT_NAME: Name<'static> = Name(b"F1");

/// Average Helvetica glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f64 = 0.52;
const ASCENT: f64 = 0.72;
const DESCENT: f64 = 0.21;
/// Cubic Bezier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

pub struct PdfCanvas<'a> {
    content: &'a mut Content,
    size: (u32, u32),
}

impl<'a> PdfCanvas<'a> {
    pub fn new(content: &'a mut Content, size: (u32, u32)) -> Self {
        Self { content, size }
    }

    fn x(&self, x: i32) -> f32 {
        x as f32
    }

    fn y(&self, y: i32) -> f32 {
        self.size.1 as f32 - y as f32
    }

    fn stroke_with<S: BackendStyle>(&mut self, style: &S) -> bool {
        let color = style.color();
        if color.alpha <= 0.0 {
            return false;
        }
        let (r, g, b) = blend_on_white(color);
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(style.stroke_width().max(1) as f32);
        true
    }

    fn fill_with(&mut self, color: BackendColor) -> bool {
        if color.alpha <= 0.0 {
            return false;
        }
        let (r, g, b) = blend_on_white(color);
        self.content.set_fill_rgb(r, g, b);
        true
    }
}

/// Pages are drawn on white, so translucency is flattened by blending with white.
fn blend_on_white(color: BackendColor) -> (f32, f32, f32) {
    let alpha = color.alpha.clamp(0.0, 1.0) as f32;
    let channel = |c: u8| 1.0 - (1.0 - c as f32 / 255.0) * alpha;
    (
        channel(color.rgb.0),
        channel(color.rgb.1),
        channel(color.rgb.2),
    )
}

/// Encode text for a WinAnsi font. Characters outside the encoding become `?`.
pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 || ((c as u32) >= 0xA0 && (c as u32) <= 0xFF) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * GLYPH_WIDTH
}

impl DrawingBackend for PdfCanvas<'_> {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> Result<(), DrawingErrorKind<Infallible>> {
        if self.fill_with(color) {
            let (x, y) = (self.x(point.0), self.y(point.1));
            self.content.rect(x, y - 1.0, 1.0, 1.0);
            self.content.fill_nonzero();
        }
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if self.stroke_with(style) {
            let (x0, y0, x1, y1) = (self.x(from.0), self.y(from.1), self.x(to.0), self.y(to.1));
            self.content.move_to(x0, y0);
            self.content.line_to(x1, y1);
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let x = self.x(upper_left.0);
        let y = self.y(bottom_right.1);
        let w = (bottom_right.0 - upper_left.0) as f32;
        let h = (bottom_right.1 - upper_left.1) as f32;

        if fill {
            if self.fill_with(style.color()) {
                self.content.rect(x, y, w, h);
                self.content.fill_nonzero();
            }
        } else if self.stroke_with(style) {
            self.content.rect(x, y, w, h);
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if !self.stroke_with(style) {
            return Ok(());
        }
        let mut started = false;
        for (px, py) in path {
            let (x, y) = (self.x(px), self.y(py));
            if started {
                self.content.line_to(x, y);
            } else {
                self.content.move_to(x, y);
                started = true;
            }
        }
        if started {
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let painted = if fill {
            self.fill_with(style.color())
        } else {
            self.stroke_with(style)
        };
        if !painted {
            return Ok(());
        }

        let (cx, cy) = (self.x(center.0), self.y(center.1));
        let r = radius as f32;
        let k = r * KAPPA;
        self.content.move_to(cx + r, cy);
        self.content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        self.content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        self.content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        self.content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        self.content.close_path();

        if fill {
            self.content.fill_nonzero();
        } else {
            self.content.stroke();
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if !self.fill_with(style.color()) {
            return Ok(());
        }
        let mut started = false;
        for (px, py) in vert {
            let (x, y) = (self.x(px), self.y(py));
            if started {
                self.content.line_to(x, y);
            } else {
                self.content.move_to(x, y);
                started = true;
            }
        }
        if started {
            self.content.close_path();
            self.content.fill_nonzero();
        }
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        if text.is_empty() || !self.fill_with(style.color()) {
            return Ok(());
        }

        let size = style.size();
        let anchor = style.anchor();
        let along = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => text_width(text, size) / 2.0,
            HPos::Right => text_width(text, size),
        };
        // Offset from the anchor down to the baseline, in text-space units
        let baseline = match anchor.v_pos {
            VPos::Top => ASCENT * size,
            VPos::Center => (ASCENT - DESCENT) * size / 2.0,
            VPos::Bottom => -DESCENT * size,
        };

        // Unit vectors of the text direction (u) and its "up" (v) in PDF space
        let (u, v): ((f64, f64), (f64, f64)) = match style.transform() {
            FontTransform::None => ((1.0, 0.0), (0.0, 1.0)),
            FontTransform::Rotate90 => ((0.0, -1.0), (1.0, 0.0)),
            FontTransform::Rotate180 => ((-1.0, 0.0), (0.0, -1.0)),
            FontTransform::Rotate270 => ((0.0, 1.0), (-1.0, 0.0)),
        };

        let ax = self.x(pos.0) as f64;
        let ay = self.y(pos.1) as f64;
        let ox = ax - u.0 * along - v.0 * baseline;
        let oy = ay - u.1 * along - v.1 * baseline;

        self.content.begin_text();
        self.content.set_font(FONT_NAME, size as f32);
        self.content.set_text_matrix([
            u.0 as f32, u.1 as f32, v.0 as f32, v.1 as f32, ox as f32, oy as f32,
        ]);
        self.content.show(Str(&win_ansi_bytes(text)));
        self.content.end_text();
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Infallible>> {
        let size = style.size();
        let width = text_width(text, size).ceil() as u32;
        let height = ((ASCENT + DESCENT) * size).ceil() as u32;
        Ok(match style.transform() {
            FontTransform::Rotate90 | FontTransform::Rotate270 => (height, width),
            _ => (width, height),
        })
    }
}
