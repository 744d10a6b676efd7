//! Binary log I/O (component J): the polyhedra header, the append-only
//! certificate log, and the checkpoint file.
//!
//! Ported from `cpp/src/pipeline/{importer,exporter}.hpp`'s record shapes.
//! Little-endian, fixed-width, no external serialization crate — every
//! record is written with explicit `to_le_bytes`/`from_le_bytes`, matching
//! `original_source`'s raw `istream::read`/`ostream::write` of POD structs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::IoError;
use crate::subdiv::{Box2, Box3, EliminatedBox3, Range};

fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<(), IoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, IoError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn write_u16<W: Write>(w: &mut W, v: u16) -> Result<(), IoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_u16<R: Read>(r: &mut R) -> Result<u16, IoError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn write_f64<W: Write>(w: &mut W, v: f64) -> Result<(), IoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_f64<R: Read>(r: &mut R) -> Result<f64, IoError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// `range16`: `Range::pack()` truncated to `u16`. Depths below `D_MAX` (16)
/// always fit (`1 << depth | bits <= 0xffff`); an overflowed range packs to
/// `0`, the same sentinel `original_source`'s `Id::pack` uses for
/// `is_invalid()`.
fn write_range16<W: Write>(w: &mut W, range: Range) -> Result<(), IoError> {
    let packed = if range.is_overflow() { 0 } else { range.pack() as u16 };
    write_u16(w, packed)
}

fn read_range16<R: Read>(r: &mut R) -> Result<Range, IoError> {
    let packed = read_u16(r)?;
    if packed == 0 {
        return Ok(Range::new(crate::subdiv::D_MAX, 0));
    }
    Ok(Range::unpack(packed as u32))
}

fn write_box3<W: Write>(w: &mut W, box3: &Box3) -> Result<(), IoError> {
    for range in box3.ranges {
        write_range16(w, range)?;
    }
    Ok(())
}

fn read_box3<R: Read>(r: &mut R) -> Result<Box3, IoError> {
    Ok(Box3::new(read_range16(r)?, read_range16(r)?, read_range16(r)?))
}

fn write_box2<W: Write>(w: &mut W, box2: &Box2) -> Result<(), IoError> {
    for range in box2.ranges {
        write_range16(w, range)?;
    }
    Ok(())
}

fn read_box2<R: Read>(r: &mut R) -> Result<Box2, IoError> {
    Ok(Box2::new(read_range16(r)?, read_range16(r)?))
}

fn write_eliminated_box3<W: Write>(w: &mut W, eliminated: &EliminatedBox3) -> Result<(), IoError> {
    write_box3(w, &eliminated.box3)?;
    write_u32(w, eliminated.eliminated.len() as u32)?;
    for rectangle in &eliminated.eliminated {
        write_box2(w, rectangle)?;
    }
    Ok(())
}

fn read_eliminated_box3<R: Read>(r: &mut R) -> Result<EliminatedBox3, IoError> {
    let box3 = read_box3(r)?;
    let count = read_u32(r)?;
    let mut eliminated = Vec::with_capacity(count as usize);
    for _ in 0..count {
        eliminated.push(read_box2(r)?);
    }
    Ok(EliminatedBox3 { box3, eliminated })
}

fn write_vertex<W: Write>(w: &mut W, vertex: (f64, f64, f64)) -> Result<(), IoError> {
    write_f64(w, vertex.0)?;
    write_f64(w, vertex.1)?;
    write_f64(w, vertex.2)
}

fn read_vertex<R: Read>(r: &mut R) -> Result<(f64, f64, f64), IoError> {
    Ok((read_f64(r)?, read_f64(r)?, read_f64(r)?))
}

fn write_polyhedron<W: Write>(w: &mut W, vertices: &[(f64, f64, f64)]) -> Result<(), IoError> {
    write_u32(w, vertices.len() as u32)?;
    for &v in vertices {
        write_vertex(w, v)?;
    }
    Ok(())
}

fn read_polyhedron<R: Read>(r: &mut R) -> Result<Vec<(f64, f64, f64)>, IoError> {
    let count = read_u32(r)?;
    let mut vertices = Vec::with_capacity(count as usize);
    for _ in 0..count {
        vertices.push(read_vertex(r)?);
    }
    Ok(vertices)
}

/// The hole and plug vertex sets, written once per run (truncating on
/// write — see spec's "one polyhedra header (written once, truncating)").
/// Also carries `hull_epsilon_factor`, the divisor behind the hole-shadow
/// hull merge tolerance this run's certificate log was produced under
/// (spec's open-question resolution to record the ε actually used).
pub struct PolyhedraHeader {
    pub hole: Vec<(f64, f64, f64)>,
    pub plug: Vec<(f64, f64, f64)>,
    pub hull_epsilon_factor: f64,
}

pub fn write_polyhedra_header(path: &Path, header: &PolyhedraHeader) -> Result<(), IoError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_polyhedron(&mut w, &header.hole)?;
    write_polyhedron(&mut w, &header.plug)?;
    write_f64(&mut w, header.hull_epsilon_factor)?;
    w.flush()?;
    Ok(())
}

pub fn read_polyhedra_header(path: &Path) -> Result<PolyhedraHeader, IoError> {
    let mut r = BufReader::new(File::open(path)?);
    let hole = read_polyhedron(&mut r)?;
    let plug = read_polyhedron(&mut r)?;
    let hull_epsilon_factor = read_f64(&mut r)?;
    Ok(PolyhedraHeader { hole, plug, hull_epsilon_factor })
}

/// Appends one certificate record to the (append-only) certificate log.
pub fn append_certificate(path: &Path, eliminated: &EliminatedBox3) -> Result<(), IoError> {
    let mut w = BufWriter::new(File::options().create(true).append(true).open(path)?);
    write_eliminated_box3(&mut w, eliminated)?;
    w.flush()?;
    Ok(())
}

/// Appends many certificate records in one file open — the exporter's
/// drain-and-write path.
pub fn append_certificates(path: &Path, eliminated: &[EliminatedBox3]) -> Result<(), IoError> {
    let mut w = BufWriter::new(File::options().create(true).append(true).open(path)?);
    for e in eliminated {
        write_eliminated_box3(&mut w, e)?;
    }
    w.flush()?;
    Ok(())
}

/// Reads every certificate record in the log, in append order. Used by
/// tests and by tooling that inspects a finished run; the pipeline itself
/// never reads its own certificate log back (it restores from the
/// checkpoint instead).
pub fn read_certificate_log(path: &Path) -> Result<Vec<EliminatedBox3>, IoError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut r = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    loop {
        match read_box3(&mut r) {
            Ok(box3) => {
                let count = read_u32(&mut r)?;
                let mut eliminated = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    eliminated.push(read_box2(&mut r)?);
                }
                out.push(EliminatedBox3 { box3, eliminated });
            }
            Err(IoError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/// The outer queue's pending boxes at the moment the checkpoint was taken —
/// everything the importer needs to resume without reprocessing already
/// eliminated boxes.
pub struct Checkpoint {
    pub pending: Vec<Box3>,
}

/// Rewrites the checkpoint atomically: write to a sibling temp file, then
/// rename over the real path (`original_source`'s exporter writes the
/// checkpoint directly and can leave a torn file on a crash mid-write;
/// spec's error-handling design calls for restart-from-root on a torn
/// checkpoint, which a rename makes unreachable except for pre-existing,
/// already-torn files from a prior crash).
pub fn write_checkpoint_atomic(path: &Path, checkpoint: &Checkpoint) -> Result<(), IoError> {
    let tmp_path = path.with_extension("tmp");
    {
        let mut w = BufWriter::new(File::create(&tmp_path)?);
        write_u32(&mut w, checkpoint.pending.len() as u32)?;
        for box3 in &checkpoint.pending {
            write_box3(&mut w, box3)?;
        }
        w.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// `Ok(None)` when no checkpoint exists yet. A size-mismatched (torn)
/// checkpoint is reported as `IoError::TornCheckpoint`; the pipeline treats
/// that the same as "no checkpoint" and starts from the root box (spec §7,
/// category 5).
pub fn read_checkpoint(path: &Path) -> Result<Option<Checkpoint>, IoError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut r = BufReader::new(File::open(path)?);
    let count = read_u32(&mut r)?;
    let mut pending = Vec::with_capacity(count as usize);
    for _ in 0..count {
        match read_box3(&mut r) {
            Ok(box3) => pending.push(box3),
            Err(_) => {
                return Err(IoError::TornCheckpoint { path: path.to_path_buf() });
            }
        }
    }
    Ok(Some(Checkpoint { pending }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range16_roundtrips_every_valid_depth() {
        for depth in 0..crate::subdiv::D_MAX {
            for bits in 0..(1u32 << depth) {
                let range = Range::new(depth, bits);
                let mut buf = Vec::new();
                write_range16(&mut buf, range).unwrap();
                let mut cursor = &buf[..];
                assert_eq!(read_range16(&mut cursor).unwrap(), range);
            }
        }
    }

    #[test]
    fn overflow_range_packs_to_sentinel_zero() {
        let overflow = Range::new(crate::subdiv::D_MAX, 0);
        let mut buf = Vec::new();
        write_range16(&mut buf, overflow).unwrap();
        assert_eq!(buf, vec![0, 0]);
        let mut cursor = &buf[..];
        assert!(read_range16(&mut cursor).unwrap().is_overflow());
    }

    #[test]
    fn eliminated_box3_roundtrips() {
        let box3 = Box3::new(Range::new(2, 1), Range::new(1, 0), Range::root());
        let eliminated = EliminatedBox3 {
            box3,
            eliminated: vec![Box2::new(Range::new(3, 5), Range::new(3, 2)), Box2::root()],
        };
        let mut buf = Vec::new();
        write_eliminated_box3(&mut buf, &eliminated).unwrap();
        let mut cursor = &buf[..];
        let read_back = read_eliminated_box3(&mut cursor).unwrap();
        assert_eq!(read_back.box3, eliminated.box3);
        assert_eq!(read_back.eliminated, eliminated.eliminated);
    }

    #[test]
    fn polyhedra_header_roundtrips() {
        let dir = std::env::temp_dir();
        let path = dir.join("rupert_io_test_header.bin");
        let header = PolyhedraHeader {
            hole: vec![(1.0, 2.0, 3.0), (-1.0, -2.0, -3.0)],
            plug: vec![(0.5, 0.0, 0.0)],
            hull_epsilon_factor: 1.0 / 16.0,
        };
        write_polyhedra_header(&path, &header).unwrap();
        let read_back = read_polyhedra_header(&path).unwrap();
        assert_eq!(read_back.hole, header.hole);
        assert_eq!(read_back.plug, header.plug);
        assert_eq!(read_back.hull_epsilon_factor, header.hull_epsilon_factor);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn certificate_log_accumulates_across_appends() {
        let dir = std::env::temp_dir();
        let path = dir.join("rupert_io_test_certificates.bin");
        fs::remove_file(&path).ok();
        let a = EliminatedBox3 {
            box3: Box3::root(),
            eliminated: vec![Box2::root()],
        };
        let b = EliminatedBox3 {
            box3: Box3::new(Range::new(1, 0), Range::root(), Range::root()),
            eliminated: vec![],
        };
        append_certificate(&path, &a).unwrap();
        append_certificate(&path, &b).unwrap();
        let read_back = read_certificate_log(&path).unwrap();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].box3, a.box3);
        assert_eq!(read_back[1].box3, b.box3);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn checkpoint_roundtrips_and_missing_file_is_none() {
        let dir = std::env::temp_dir();
        let path = dir.join("rupert_io_test_checkpoint.bin");
        fs::remove_file(&path).ok();
        assert!(read_checkpoint(&path).unwrap().is_none());

        let checkpoint = Checkpoint {
            pending: vec![Box3::root(), Box3::new(Range::new(1, 1), Range::root(), Range::root())],
        };
        write_checkpoint_atomic(&path, &checkpoint).unwrap();
        let read_back = read_checkpoint(&path).unwrap().unwrap();
        assert_eq!(read_back.pending, checkpoint.pending);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn torn_checkpoint_is_reported_not_silently_truncated() {
        let dir = std::env::temp_dir();
        let path = dir.join("rupert_io_test_torn_checkpoint.bin");
        // Claims 5 boxes but the file only has room for part of one.
        let mut w = BufWriter::new(File::create(&path).unwrap());
        write_u32(&mut w, 5).unwrap();
        w.write_all(&[0u8, 0u8]).unwrap();
        w.flush().unwrap();
        drop(w);
        assert!(matches!(read_checkpoint(&path), Err(IoError::TornCheckpoint { .. })));
        fs::remove_file(&path).ok();
    }
}
