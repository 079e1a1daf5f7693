/// ASCII STL writer, and a reader for documents it produces
use std::fmt;
use std::io::Write;

use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending, space0},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::{ReliefError, Result};
use crate::geometry::{Mesh, Vertex};

/// Float in normalized scientific notation with a signed exponent, using
/// the shortest digits that read back to the same `f32` (`1.25e+1`,
/// `-5e-1`, `0e+0`).
#[derive(Debug, Clone, Copy)]
pub struct Sci(pub f32);

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.0 prints as 0e+0
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&text),
        }
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ReliefError::configuration(format!(
            "solid name must be a single non-empty token, got {name:?}"
        )));
    }
    Ok(())
}

/// Write `mesh` as an ASCII STL solid called `name`.
///
/// Facets follow face order; normals are computed per face. An empty mesh
/// gives a document with no facets. `cancel` is polled before the header
/// and before each facet.
pub fn write_ascii_stl<W: Write>(
    mesh: &Mesh,
    name: &str,
    writer: &mut W,
    cancel: &CancelToken,
) -> Result<()> {
    check_name(name)?;
    cancel.check()?;
    writeln!(writer, "solid {name}")?;

    for triangle in mesh.triangles() {
        cancel.check()?;
        let n = triangle.normal();
        writeln!(writer, "  facet normal {} {} {}", Sci(n.x), Sci(n.y), Sci(n.z))?;
        writeln!(writer, "    outer loop")?;
        for v in &triangle.vertices {
            writeln!(writer, "      vertex {} {} {}", Sci(v.x), Sci(v.y), Sci(v.z))?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {name}")?;
    debug!(solid = name, facets = mesh.faces().len(), "wrote ASCII STL");
    Ok(())
}

/// Serialize `mesh` into an in-memory ASCII STL document.
pub fn to_ascii_stl(mesh: &Mesh, name: &str) -> Result<Vec<u8>> {
    to_ascii_stl_cancellable(mesh, name, &CancelToken::none())
}

pub fn to_ascii_stl_cancellable(mesh: &Mesh, name: &str, cancel: &CancelToken) -> Result<Vec<u8>> {
    // Roughly 250 bytes per facet
    let mut out = Vec::with_capacity(64 + mesh.faces().len() * 256);
    write_ascii_stl(mesh, name, &mut out, cancel)?;
    Ok(out)
}

/// One facet as read back from ASCII STL
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub normal: Vector3<f32>,
    pub vertices: [Vertex; 3],
}

/// Parsed ASCII STL solid
#[derive(Debug, Clone, PartialEq)]
pub struct StlDocument {
    pub name: String,
    pub facets: Vec<Facet>,
}

/// Parse an ASCII STL document.
pub fn parse_ascii_stl(input: &str) -> Result<StlDocument> {
    match parse_document(input) {
        Ok((rest, document)) if rest.trim().is_empty() => Ok(document),
        Ok((rest, _)) => Err(ReliefError::parse(format!(
            "trailing content after endsolid: {:?}",
            snippet(rest)
        ))),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ReliefError::parse(format!(
            "unexpected input near {:?}",
            snippet(e.input)
        ))),
        Err(nom::Err::Incomplete(_)) => Err(ReliefError::parse("unexpected end of input")),
    }
}

fn snippet(input: &str) -> &str {
    let trimmed = input.trim_start();
    let end = trimmed
        .char_indices()
        .nth(32)
        .map_or(trimmed.len(), |(i, _)| i);
    &trimmed[..end]
}

fn parse_document(input: &str) -> IResult<&str, StlDocument> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, name) = preceded(space0, not_line_ending)(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;

    Ok((
        input,
        StlDocument {
            name: name.trim().to_string(),
            facets,
        },
    ))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        Facet {
            normal: Vector3::new(normal.0, normal.1, normal.2),
            vertices: [v1, v2, v3],
        },
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}
