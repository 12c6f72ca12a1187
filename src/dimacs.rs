//! Reading and writing max flow problems in the DIMACS text format.
//!
//! ```text
//! c a comment
//! p max 4 5
//! n 1 s
//! n 4 t
//! a 1 2 10
//! ```
//!
//! Vertex ids are 1-based in the file and 0-based in [`FlowProblem`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;
use core::str::FromStr;

use crate::arc::FlowArc;
use crate::capacity::Capacity;
use crate::error::Error;
use crate::problem::FlowProblem;

struct Header {
    vertex_count: usize,
    arc_count: usize,
}

/// Parses a DIMACS max flow problem.
pub fn parse<C>(input: &str) -> Result<FlowProblem<C>, Error>
where
    C: Capacity + FromStr,
{
    let mut header = None;
    let (mut source, mut sink) = (None, None);
    let mut arcs = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let line_no = number + 1;
        let err = |reason| Error::Parse {
            line: line_no,
            reason,
        };
        let mut fields = line.split_whitespace();

        match fields.next() {
            None | Some("c") => continue,
            Some("p") => {
                if header.is_some() {
                    return Err(err("duplicate problem line"));
                }
                if fields.next() != Some("max") {
                    return Err(err("expected a `max` problem"));
                }
                let vertex_count = number_field(&mut fields)
                    .ok_or_else(|| err("invalid vertex count"))?;
                let arc_count = number_field(&mut fields)
                    .ok_or_else(|| err("invalid arc count"))?;
                header = Some(Header {
                    vertex_count,
                    arc_count,
                });
            }
            Some("n") => {
                let header = header
                    .as_ref()
                    .ok_or_else(|| err("node line before problem line"))?;
                let id = vertex_field(&mut fields, header)
                    .ok_or_else(|| err("invalid node id"))?;
                match fields.next() {
                    Some("s") => source = Some(id),
                    Some("t") => sink = Some(id),
                    _ => return Err(err("expected `s` or `t` designator")),
                }
            }
            Some("a") => {
                let header = header
                    .as_ref()
                    .ok_or_else(|| err("arc line before problem line"))?;
                let from = vertex_field(&mut fields, header)
                    .ok_or_else(|| err("invalid arc tail"))?;
                let to = vertex_field(&mut fields, header)
                    .ok_or_else(|| err("invalid arc head"))?;
                let capacity: C = fields
                    .next()
                    .and_then(|c| c.parse().ok())
                    .ok_or_else(|| err("invalid arc capacity"))?;
                if capacity.is_zero() {
                    log::trace!("line {}: skipping zero capacity arc", line_no);
                    continue;
                }
                let arc = FlowArc::new(from, to, capacity)
                    .map_err(|_| err("invalid arc"))?;
                arcs.push(arc);
            }
            Some(_) => return Err(err("unknown line type")),
        }
    }

    let last = input.lines().count();
    let header = header.ok_or(Error::Parse {
        line: last,
        reason: "missing problem line",
    })?;
    let source = source.ok_or(Error::Parse {
        line: last,
        reason: "missing source designator",
    })?;
    let sink = sink.ok_or(Error::Parse {
        line: last,
        reason: "missing sink designator",
    })?;

    if arcs.len() != header.arc_count {
        log::warn!(
            "problem line announces {} arcs but {} were read",
            header.arc_count,
            arcs.len()
        );
    }

    FlowProblem::from_arcs(header.vertex_count, source, sink, arcs)
}

/// Formats a problem as DIMACS, arcs in ascending `(from, to)` order.
pub fn write<C: Capacity>(problem: &FlowProblem<C>) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = writeln!(out, "c");
    let _ = writeln!(out, "c max flow problem");
    let _ = writeln!(out, "c");
    let _ = writeln!(out, "p max {} {}", problem.vertex_count(), problem.arc_count());
    let _ = writeln!(out, "n {} s", problem.source() + 1);
    let _ = writeln!(out, "n {} t", problem.sink() + 1);
    for (u, v, c) in problem.arcs() {
        let _ = writeln!(out, "a {} {} {}", u + 1, v + 1, c);
    }
    out
}

fn number_field<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Option<usize> {
    fields.next()?.parse().ok()
}

// Reads a 1-based vertex id and converts it to a 0-based index.
fn vertex_field<'a>(fields: &mut impl Iterator<Item = &'a str>, header: &Header) -> Option<usize> {
    let id = number_field(fields)?;
    (1..=header.vertex_count).contains(&id).then(|| id - 1)
}
