//! SVG path data parsing and flattening.
//!
//! Covers the full path grammar (all commands, absolute and relative,
//! implicit repetition, compact numbers, packed arc flags). Segments are
//! normalized to absolute coordinates. Parsing stops at the first error;
//! the lenient entry point keeps everything before it, which is what a
//! browser draws for broken path data.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    QuadTo { c: Point, to: Point },
    ArcTo {
        rx: f32,
        ry: f32,
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    Close,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid path data at byte {offset}: {message}")]
pub struct PathError {
    pub offset: usize,
    pub message: String,
}

/// Parse path data, failing on the first syntax error.
pub fn parse_path(d: &str) -> Result<Vec<PathSegment>, PathError> {
    match parse_path_lenient(d) {
        (segments, None) => Ok(segments),
        (_, Some(err)) => Err(err),
    }
}

/// Parse path data, returning the segments before the first error (if any).
pub fn parse_path_lenient(d: &str) -> (Vec<PathSegment>, Option<PathError>) {
    let mut parser = Parser {
        src: d.as_bytes(),
        pos: 0,
        segments: Vec::new(),
        current: Point::new(0.0, 0.0),
        start: Point::new(0.0, 0.0),
        last_cubic: None,
        last_quad: None,
    };
    let err = parser.run().err();
    (parser.segments, err)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    segments: Vec<PathSegment>,
    current: Point,
    start: Point,
    // control points kept for S/T reflection
    last_cubic: Option<Point>,
    last_quad: Option<Point>,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> PathError {
        PathError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')) {
            self.pos += 1;
        }
    }

    fn skip_separator(&mut self) {
        self.skip_ws();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.skip_ws();
        }
    }

    fn at_number(&self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'9' | b'.' | b'-' | b'+'))
    }

    fn digits(&mut self) -> usize {
        let begin = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - begin
    }

    fn number(&mut self) -> Result<f32, PathError> {
        self.skip_separator();
        let begin = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let mut count = self.digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            count += self.digits();
        }
        if count == 0 {
            self.pos = begin;
            return Err(self.error("expected number"));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.error("malformed exponent"));
            }
        }
        let text = std::str::from_utf8(&self.src[begin..self.pos]).map_err(|_| self.error("invalid utf-8"))?;
        let value: f32 = text.parse().map_err(|_| PathError {
            offset: begin,
            message: format!("invalid number {:?}", text),
        })?;
        if !value.is_finite() {
            return Err(PathError {
                offset: begin,
                message: format!("number out of range {:?}", text),
            });
        }
        Ok(value)
    }

    fn flag(&mut self) -> Result<bool, PathError> {
        self.skip_separator();
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected arc flag 0 or 1")),
        }
    }

    fn point(&mut self, relative: bool) -> Result<Point, PathError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(self.resolve(Point::new(x, y), relative))
    }

    fn resolve(&self, p: Point, relative: bool) -> Point {
        if relative {
            Point::new(self.current.x + p.x, self.current.y + p.y)
        } else {
            p
        }
    }

    fn reflect(&self, control: Option<Point>) -> Point {
        match control {
            Some(c) => Point::new(2.0 * self.current.x - c.x, 2.0 * self.current.y - c.y),
            None => self.current,
        }
    }

    fn run(&mut self) -> Result<(), PathError> {
        let mut previous: Option<u8> = None;
        loop {
            self.skip_separator();
            let Some(c) = self.peek() else { return Ok(()) };

            let command = if c.is_ascii_alphabetic() {
                self.pos += 1;
                c
            } else if self.at_number() {
                match previous {
                    Some(b'M') => b'L',
                    Some(b'm') => b'l',
                    Some(b'Z' | b'z') | None => return Err(self.error("expected command")),
                    Some(p) => p,
                }
            } else {
                return Err(self.error(format!("unexpected character {:?}", c as char)));
            };

            if previous.is_none() && !matches!(command, b'M' | b'm') {
                self.pos -= 1;
                return Err(self.error("path must start with a moveto"));
            }

            let relative = command.is_ascii_lowercase();
            let mut cubic = None;
            let mut quad = None;
            match command.to_ascii_uppercase() {
                b'M' => {
                    let to = self.point(relative)?;
                    self.segments.push(PathSegment::MoveTo(to));
                    self.current = to;
                    self.start = to;
                }
                b'L' => {
                    let to = self.point(relative)?;
                    self.line_to(to);
                }
                b'H' => {
                    let x = self.number()?;
                    let x = if relative { self.current.x + x } else { x };
                    self.line_to(Point::new(x, self.current.y));
                }
                b'V' => {
                    let y = self.number()?;
                    let y = if relative { self.current.y + y } else { y };
                    self.line_to(Point::new(self.current.x, y));
                }
                b'C' => {
                    let c1 = self.point(relative)?;
                    let c2 = self.point(relative)?;
                    let to = self.point(relative)?;
                    self.segments.push(PathSegment::CubicTo { c1, c2, to });
                    self.current = to;
                    cubic = Some(c2);
                }
                b'S' => {
                    let c1 = self.reflect(self.last_cubic);
                    let c2 = self.point(relative)?;
                    let to = self.point(relative)?;
                    self.segments.push(PathSegment::CubicTo { c1, c2, to });
                    self.current = to;
                    cubic = Some(c2);
                }
                b'Q' => {
                    let c = self.point(relative)?;
                    let to = self.point(relative)?;
                    self.segments.push(PathSegment::QuadTo { c, to });
                    self.current = to;
                    quad = Some(c);
                }
                b'T' => {
                    let c = self.reflect(self.last_quad);
                    let to = self.point(relative)?;
                    self.segments.push(PathSegment::QuadTo { c, to });
                    self.current = to;
                    quad = Some(c);
                }
                b'A' => {
                    let rx = self.number()?.abs();
                    let ry = self.number()?.abs();
                    let rotation = self.number()?;
                    let large_arc = self.flag()?;
                    let sweep = self.flag()?;
                    let to = self.point(relative)?;
                    self.segments.push(PathSegment::ArcTo { rx, ry, rotation, large_arc, sweep, to });
                    self.current = to;
                }
                b'Z' => {
                    self.segments.push(PathSegment::Close);
                    self.current = self.start;
                }
                _ => {
                    self.pos -= 1;
                    return Err(self.error(format!("unknown command {:?}", command as char)));
                }
            }
            self.last_cubic = cubic;
            self.last_quad = quad;
            previous = Some(command);
        }
    }

    fn line_to(&mut self, to: Point) {
        self.segments.push(PathSegment::LineTo(to));
        self.current = to;
    }
}

const CURVE_STEPS: usize = 16;

/// Flatten segments into polylines, one per subpath.
pub fn flatten(segments: &[PathSegment]) -> Vec<Vec<Point>> {
    let mut lines: Vec<Vec<Point>> = Vec::new();
    let mut current = Point::new(0.0, 0.0);
    let mut start = current;

    for seg in segments {
        match *seg {
            PathSegment::MoveTo(p) => {
                lines.push(vec![p]);
                current = p;
                start = p;
                continue;
            }
            PathSegment::Close => {
                if let Some(line) = lines.last_mut() {
                    line.push(start);
                }
                current = start;
                continue;
            }
            _ => {}
        }

        if lines.is_empty() {
            lines.push(vec![current]);
        }
        let Some(line) = lines.last_mut() else { continue };
        match *seg {
            PathSegment::LineTo(p) => {
                line.push(p);
                current = p;
            }
            PathSegment::CubicTo { c1, c2, to } => {
                for i in 1..=CURVE_STEPS {
                    let t = i as f32 / CURVE_STEPS as f32;
                    let u = 1.0 - t;
                    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                    line.push(Point::new(
                        a * current.x + b * c1.x + c * c2.x + d * to.x,
                        a * current.y + b * c1.y + c * c2.y + d * to.y,
                    ));
                }
                current = to;
            }
            PathSegment::QuadTo { c, to } => {
                for i in 1..=CURVE_STEPS {
                    let t = i as f32 / CURVE_STEPS as f32;
                    let u = 1.0 - t;
                    line.push(Point::new(
                        u * u * current.x + 2.0 * u * t * c.x + t * t * to.x,
                        u * u * current.y + 2.0 * u * t * c.y + t * t * to.y,
                    ));
                }
                current = to;
            }
            PathSegment::ArcTo { rx, ry, rotation, large_arc, sweep, to } => {
                line.extend(arc_points(current, rx, ry, rotation, large_arc, sweep, to));
                current = to;
            }
            PathSegment::MoveTo(_) | PathSegment::Close => unreachable!(),
        }
    }
    lines
}

fn vector_angle(ux: f32, uy: f32, vx: f32, vy: f32) -> f32 {
    (ux * vy - uy * vx).atan2(ux * vx + uy * vy)
}

/// Endpoint-parameterized elliptical arc to points (SVG implementation notes F.6.5).
#[allow(clippy::too_many_arguments)]
fn arc_points(from: Point, rx: f32, ry: f32, rotation: f32, large_arc: bool, sweep: bool, to: Point) -> Vec<Point> {
    if from == to {
        return Vec::new();
    }
    if rx == 0.0 || ry == 0.0 {
        return vec![to];
    }
    let (sin, cos) = rotation.to_radians().sin_cos();
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1 = cos * dx2 + sin * dy2;
    let y1 = -sin * dx2 + cos * dy2;

    let (mut rx, mut ry) = (rx, ry);
    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }

    let num = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
    let den = rx * rx * y1 * y1 + ry * ry * x1 * x1;
    let mut coef = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1 / ry;
    let cyp = -coef * ry * x1 / rx;
    let cx = cos * cxp - sin * cyp + (from.x + to.x) / 2.0;
    let cy = sin * cxp + cos * cyp + (from.y + to.y) / 2.0;

    let ux = (x1 - cxp) / rx;
    let uy = (y1 - cyp) / ry;
    let vx = (-x1 - cxp) / rx;
    let vy = (-y1 - cyp) / ry;
    let theta = vector_angle(1.0, 0.0, ux, uy);
    let mut delta = vector_angle(ux, uy, vx, vy);
    let tau = std::f32::consts::TAU;
    if !sweep && delta > 0.0 {
        delta -= tau;
    } else if sweep && delta < 0.0 {
        delta += tau;
    }

    let steps = ((delta.abs() / (std::f32::consts::PI / 16.0)).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps);
    for i in 1..steps {
        let t = theta + delta * i as f32 / steps as f32;
        let (st, ct) = t.sin_cos();
        points.push(Point::new(
            cos * rx * ct - sin * ry * st + cx,
            sin * rx * ct + cos * ry * st + cy,
        ));
    }
    points.push(to);
    points
}
