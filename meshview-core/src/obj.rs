//! Wavefront OBJ subset parser: `v` and `f` records only
use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::many1,
    number::complete::double,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::geometry::Vec3;
use crate::mesh::{face_problem, Face, Mesh};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Vertex,
    Face,
    Ignored,
}

/// Classify a line by its two-character prefix (`v ` or `f `).
fn classify(line: &str) -> Record {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('v'), Some(' ' | '\t')) => Record::Vertex,
        (Some('f'), Some(' ' | '\t')) => Record::Face,
        _ => Record::Ignored,
    }
}

/// Load a mesh from an OBJ file on disk
pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MeshError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_obj(&text)?;
    info!(path = %path.display(), "loaded mesh: {mesh}");
    Ok(mesh)
}

/// Parse OBJ text into a validated mesh
///
/// Every face index is checked against the final vertex count, so a mesh is
/// either returned whole or not at all.
pub fn parse_obj(input: &str) -> MeshResult<Mesh> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut face_lines = Vec::new();
    let mut ignored = 0usize;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        match classify(line) {
            Record::Vertex => vertices.push(parse_vertex_record(line, line_no)?),
            Record::Face => {
                faces.push(parse_face_record(line, line_no)?);
                face_lines.push(line_no);
            }
            Record::Ignored => ignored += 1,
        }
    }

    for (face, &line_no) in faces.iter().zip(&face_lines) {
        if let Some(reason) = face_problem(face, vertices.len()) {
            return Err(MeshError::malformed(line_no, reason));
        }
    }
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        ignored,
        "parsed OBJ records"
    );
    Ok(Mesh::assemble(vertices, faces))
}

fn parse_vertex_record(line: &str, line_no: usize) -> MeshResult<Vec3> {
    match all_consuming(vertex_record)(line) {
        Ok((_, v)) if [v.x, v.y, v.z].iter().all(|c| c.is_finite()) => Ok(v),
        Ok(_) => Err(MeshError::malformed(
            line_no,
            format!("vertex coordinates must be finite, got `{line}`"),
        )),
        Err(_) => Err(MeshError::malformed(
            line_no,
            format!("expected `v x y z`, got `{line}`"),
        )),
    }
}

fn parse_face_record(line: &str, line_no: usize) -> MeshResult<Face> {
    let refs = match all_consuming(face_record)(line) {
        Ok((_, refs)) => refs,
        Err(_) => {
            return Err(MeshError::malformed(
                line_no,
                format!("expected `f i j k ...`, got `{line}`"),
            ))
        }
    };

    let mut indices = Vec::with_capacity(refs.len());
    for index in refs {
        if index < 1 {
            return Err(MeshError::malformed(
                line_no,
                format!("vertex index {index} is not a positive 1-based index"),
            ));
        }
        indices.push((index - 1) as usize);
    }
    if indices.len() < 3 {
        return Err(MeshError::malformed(
            line_no,
            format!("face needs at least 3 vertices, got {}", indices.len()),
        ));
    }
    Ok(Face::new(indices))
}

/// `v x y z [w]`; the optional homogeneous weight is accepted and dropped.
fn vertex_record(input: &str) -> IResult<&str, Vec3> {
    let (input, _) = tag("v")(input)?;
    let (input, (x, y, z)) = tuple((
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    ))(input)?;
    let (input, _) = opt(preceded(space1, double))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

fn face_record(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, _) = tag("f")(input)?;
    let (input, refs) = many1(preceded(space1, vertex_ref))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, refs))
}

/// A face vertex reference such as `7`, `7/2` or `7//3`. Only the position
/// index is kept.
fn vertex_ref(input: &str) -> IResult<&str, i64> {
    terminated(
        map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i64>),
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}
