use glam::DVec2;
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

use crate::BooleanError;
use crate::path::path_segment::{ARC_MAX_DELTA_THETA, ArcSegment, PathSegment, arc_segment_to_cubics};
use crate::path::{PathVector, SubPath, quadratic_to_cubic};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?P<command>[MmLlHhVvCcSsQqTtAaZz])|(?P<number>[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)|(?P<separator>[\s,]+)|(?P<other>.)").unwrap()
});

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
	Command(char),
	Number(f64),
}

fn parse_number(offset: usize, text: &str) -> Result<Token, BooleanError> {
	text.parse().map(Token::Number).map_err(|_| invalid(offset, format!("`{text}` is not a number")))
}

fn tokenize(data: &str) -> Result<Vec<(usize, Token)>, BooleanError> {
	let mut tokens = Vec::new();
	// Index of the next argument while inside an arc command
	let mut arc_argument: Option<usize> = None;
	for captures in TOKEN.captures_iter(data) {
		if let Some(command) = captures.name("command") {
			let letter = command.as_str().chars().next().unwrap_or('Z');
			arc_argument = matches!(letter, 'A' | 'a').then_some(0);
			tokens.push((command.start(), Token::Command(letter)));
		} else if let Some(number) = captures.name("number") {
			let (mut offset, mut text) = (number.start(), number.as_str());
			if let Some(argument) = arc_argument.as_mut() {
				// Flags are a single digit and may run into whatever follows them
				while matches!(*argument % 7, 3 | 4) && text.len() > 1 && text.starts_with(['0', '1']) {
					let (flag, rest) = text.split_at(1);
					tokens.push((offset, parse_number(offset, flag)?));
					*argument += 1;
					offset += 1;
					text = rest;
				}
				*argument += 1;
			}
			tokens.push((offset, parse_number(offset, text)?));
		} else if let Some(other) = captures.name("other") {
			return Err(invalid(other.start(), format!("unexpected character `{}`", other.as_str())));
		}
	}
	Ok(tokens)
}

fn invalid(offset: usize, message: impl Into<String>) -> BooleanError {
	BooleanError::InvalidPathData { offset, message: message.into() }
}

fn reflect_control_point(point: DVec2, control_point: DVec2) -> DVec2 {
	point * 2. - control_point
}

#[derive(Clone, Copy)]
enum LastControl {
	None,
	Cubic(DVec2),
	Quadratic(DVec2),
}

struct PathBuilder {
	subpaths: Vec<SubPath>,
	segments: Vec<PathSegment>,
	start: DVec2,
	current: DVec2,
	last_control: LastControl,
}

impl PathBuilder {
	fn new() -> Self {
		Self {
			subpaths: Vec::new(),
			segments: Vec::new(),
			start: DVec2::ZERO,
			current: DVec2::ZERO,
			last_control: LastControl::None,
		}
	}

	fn finish_subpath(&mut self, closed: bool) {
		if closed && !self.segments.is_empty() && self.current != self.start {
			self.segments.push(PathSegment::Line(self.current, self.start));
		}
		if !self.segments.is_empty() {
			self.subpaths.push(SubPath::new(std::mem::take(&mut self.segments), closed));
		}
		if closed {
			self.current = self.start;
		}
		self.last_control = LastControl::None;
	}

	fn move_to(&mut self, point: DVec2) {
		self.finish_subpath(false);
		self.start = point;
		self.current = point;
	}

	fn push(&mut self, segment: PathSegment, last_control: LastControl) {
		if self.segments.is_empty() {
			self.start = self.current;
		}
		self.current = segment.end();
		self.segments.push(segment);
		self.last_control = last_control;
	}

	fn line_to(&mut self, end: DVec2) {
		self.push(PathSegment::Line(self.current, end), LastControl::None);
	}

	fn cubic_to(&mut self, handle1: DVec2, handle2: DVec2, end: DVec2) {
		self.push(PathSegment::Cubic(self.current, handle1, handle2, end), LastControl::Cubic(handle2));
	}

	fn smooth_cubic_to(&mut self, handle2: DVec2, end: DVec2) {
		let handle1 = match self.last_control {
			LastControl::Cubic(control) => reflect_control_point(self.current, control),
			_ => self.current,
		};
		self.cubic_to(handle1, handle2, end);
	}

	fn quadratic_to(&mut self, handle: DVec2, end: DVec2) {
		self.push(quadratic_to_cubic(self.current, handle, end), LastControl::Quadratic(handle));
	}

	fn smooth_quadratic_to(&mut self, end: DVec2) {
		let handle = match self.last_control {
			LastControl::Quadratic(control) => reflect_control_point(self.current, control),
			_ => self.current,
		};
		self.quadratic_to(handle, end);
	}

	fn arc_to(&mut self, arc: ArcSegment) {
		for cubic in arc_segment_to_cubics(&arc, ARC_MAX_DELTA_THETA) {
			self.push(cubic, LastControl::None);
		}
	}

	fn finish(mut self) -> PathVector {
		self.finish_subpath(false);
		PathVector::new(self.subpaths)
	}
}

struct Arguments<'a> {
	tokens: &'a [(usize, Token)],
	position: usize,
	end_offset: usize,
}

impl Arguments<'_> {
	fn has_number(&self) -> bool {
		matches!(self.tokens.get(self.position), Some((_, Token::Number(_))))
	}

	fn number(&mut self) -> Result<f64, BooleanError> {
		match self.tokens.get(self.position) {
			Some(&(_, Token::Number(value))) => {
				self.position += 1;
				Ok(value)
			}
			Some(&(offset, Token::Command(letter))) => Err(invalid(offset, format!("expected a number, found command `{letter}`"))),
			None => Err(invalid(self.end_offset, "unexpected end of path data")),
		}
	}

	fn point(&mut self) -> Result<DVec2, BooleanError> {
		Ok(DVec2::new(self.number()?, self.number()?))
	}

	fn flag(&mut self) -> Result<bool, BooleanError> {
		let offset = self.tokens.get(self.position).map_or(self.end_offset, |(offset, _)| *offset);
		let value = self.number()?;
		if value == 0. {
			Ok(false)
		} else if value == 1. {
			Ok(true)
		} else {
			Err(invalid(offset, format!("arc flag must be 0 or 1, found {value}")))
		}
	}
}

/// Parses SVG path data into a [`PathVector`].
///
/// All commands are supported in absolute and relative form. Quadratic segments are elevated to cubics and elliptical arcs are
/// approximated with cubics. `Z` closes the subpath with a straight line when the current point is not already at its start.
pub fn path_from_path_data(data: &str) -> Result<PathVector, BooleanError> {
	let tokens = tokenize(data)?;
	let mut builder = PathBuilder::new();
	let mut args = Arguments {
		tokens: &tokens,
		position: 0,
		end_offset: data.len(),
	};

	if let Some(&(offset, token)) = tokens.first() {
		if !matches!(token, Token::Command('M' | 'm')) {
			return Err(invalid(offset, "path data must start with a moveto command"));
		}
	}

	while let Some(&(offset, token)) = tokens.get(args.position) {
		let Token::Command(command) = token else {
			return Err(invalid(offset, "path data must begin each run of numbers with a command"));
		};
		args.position += 1;

		if matches!(command, 'Z' | 'z') {
			builder.finish_subpath(true);
			continue;
		}

		let relative = command.is_ascii_lowercase();
		let mut first = true;
		loop {
			let origin = if relative { builder.current } else { DVec2::ZERO };
			match command.to_ascii_uppercase() {
				'M' => {
					let point = origin + args.point()?;
					if first {
						builder.move_to(point);
					} else {
						builder.line_to(point);
					}
				}
				'L' => {
					let point = origin + args.point()?;
					builder.line_to(point);
				}
				'H' => {
					let x = args.number()? + origin.x;
					builder.line_to(DVec2::new(x, builder.current.y));
				}
				'V' => {
					let y = args.number()? + origin.y;
					builder.line_to(DVec2::new(builder.current.x, y));
				}
				'C' => {
					let handle1 = origin + args.point()?;
					let handle2 = origin + args.point()?;
					let end = origin + args.point()?;
					builder.cubic_to(handle1, handle2, end);
				}
				'S' => {
					let handle2 = origin + args.point()?;
					let end = origin + args.point()?;
					builder.smooth_cubic_to(handle2, end);
				}
				'Q' => {
					let handle = origin + args.point()?;
					let end = origin + args.point()?;
					builder.quadratic_to(handle, end);
				}
				'T' => {
					let end = origin + args.point()?;
					builder.smooth_quadratic_to(end);
				}
				'A' => {
					let rx = args.number()?;
					let ry = args.number()?;
					let x_axis_rotation = args.number()?;
					let large_arc = args.flag()?;
					let sweep = args.flag()?;
					let end = origin + args.point()?;
					builder.arc_to(ArcSegment {
						start: builder.current,
						rx,
						ry,
						x_axis_rotation,
						large_arc,
						sweep,
						end,
					});
				}
				_ => return Err(invalid(offset, format!("unknown command `{command}`"))),
			}
			first = false;
			if !args.has_number() {
				break;
			}
		}
	}

	Ok(builder.finish())
}

fn format_number(value: f64) -> String {
	let rounded = (value * 1e9).round() / 1e9;
	// Avoid printing "-0"
	let rounded = if rounded == 0. { 0. } else { rounded };
	format!("{rounded}")
}

fn format_point(point: DVec2) -> String {
	format!("{},{}", format_number(point.x), format_number(point.y))
}

/// Writes a [`PathVector`] as absolute SVG path data of the form `M x,y L x,y C x,y x,y x,y Z`.
///
/// The straight segment that closes a closed subpath is implied by `Z` and not written.
pub fn path_to_path_data(path: &PathVector) -> String {
	let mut data = String::new();

	for subpath in path.iter() {
		let Some(start) = subpath.start() else { continue };
		if !data.is_empty() {
			data.push(' ');
		}
		let _ = write!(data, "M{}", format_point(start));

		let mut segments = subpath.segments.as_slice();
		if subpath.closed {
			if let Some((PathSegment::Line(_, end), rest)) = segments.split_last() {
				if *end == start && !rest.is_empty() {
					segments = rest;
				}
			}
		}

		for segment in segments {
			let _ = match *segment {
				PathSegment::Line(_, end) => write!(data, " L{}", format_point(end)),
				PathSegment::Cubic(_, handle1, handle2, end) => write!(data, " C{} {} {}", format_point(handle1), format_point(handle2), format_point(end)),
			};
		}

		if subpath.closed {
			data.push_str(" Z");
		}
	}

	data
}
