//! Trace-header-only SEG-Y reading
//!
//! Receiver coordinates come from the standard per-trace header fields;
//! traces are read positionally, so inline/crossline geometry from the
//! binary header is never interpreted. The binary header is consulted
//! only for the trace stride (samples per trace, sample format) and the
//! sampling interval.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use masw_common::models::GeometryPoint;

use super::ExtractError;

const TEXT_HEADER_LEN: u64 = 3200;
const BINARY_HEADER_LEN: usize = 400;
const TRACE_HEADER_LEN: usize = 240;

// Byte offsets within the 400-byte binary header (0-based).
const BIN_SAMPLE_INTERVAL: usize = 16; // bytes 3217-3218, microseconds
const BIN_SAMPLES_PER_TRACE: usize = 20; // bytes 3221-3222
const BIN_SAMPLE_FORMAT: usize = 24; // bytes 3225-3226

// Byte offsets within the 240-byte trace header (0-based). Standard
// SEG-Y rev1 positions, quoted 1-based in the comments.
const TRC_RECEIVER_ELEVATION: usize = 40; // bytes 41-44, i32
const TRC_ELEVATION_SCALAR: usize = 68; // bytes 69-70, i16
const TRC_SOURCE_GROUP_SCALAR: usize = 70; // bytes 71-72, i16
const TRC_GROUP_X: usize = 80; // bytes 81-84, i32
const TRC_GROUP_Y: usize = 84; // bytes 85-88, i32
const TRC_SAMPLES_THIS_TRACE: usize = 114; // bytes 115-116, i16

/// Extract receiver geometry from a SEG-Y file on disk.
///
/// One point per trace, in trace order, indexed from zero. The file
/// handle is scoped to this call and released on every path.
pub fn extract_geometry(path: &Path) -> Result<Vec<GeometryPoint>, ExtractError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(TEXT_HEADER_LEN))?;

    let mut bin = [0u8; BINARY_HEADER_LEN];
    read_required(&mut reader, &mut bin, "binary header")?;
    let default_samples = BigEndian::read_i16(&bin[BIN_SAMPLES_PER_TRACE..]) as i64;
    let sample_len = bytes_per_sample(BigEndian::read_i16(&bin[BIN_SAMPLE_FORMAT..]))?;

    let mut points = Vec::new();
    let mut header = [0u8; TRACE_HEADER_LEN];
    loop {
        if !read_trace_header(&mut reader, &mut header)? {
            break;
        }
        points.push(point_from_header(points.len(), &header));

        // Per-trace sample count wins over the binary header when set.
        let samples = match BigEndian::read_i16(&header[TRC_SAMPLES_THIS_TRACE..]) {
            0 => default_samples,
            n => n as i64,
        };
        reader.seek(SeekFrom::Current(samples * sample_len))?;
    }

    Ok(points)
}

/// Sampling parameters from the binary header: (samples per trace,
/// sample rate in Hz). Takes any seekable reader, so it works on a
/// buffered upload as well as a file.
pub fn sampling<R: Read + Seek>(mut reader: R) -> Result<(usize, f64), ExtractError> {
    reader.seek(SeekFrom::Start(TEXT_HEADER_LEN))?;

    let mut bin = [0u8; BINARY_HEADER_LEN];
    read_required(&mut reader, &mut bin, "binary header")?;

    let samples = BigEndian::read_i16(&bin[BIN_SAMPLES_PER_TRACE..]);
    if samples <= 0 {
        return Err(ExtractError::MissingField("SamplesPerTrace"));
    }
    let interval_us = BigEndian::read_i16(&bin[BIN_SAMPLE_INTERVAL..]);
    if interval_us <= 0 {
        return Err(ExtractError::MissingField("SampleInterval"));
    }

    Ok((samples as usize, 1e6 / interval_us as f64))
}

/// Build a point from one trace header.
///
/// Scalars apply as absolute divisors to both coordinates and elevation;
/// the signed multiply-or-divide convention is intentionally not used
/// here, so files written either way rescale the same direction.
fn point_from_header(index: usize, header: &[u8; TRACE_HEADER_LEN]) -> GeometryPoint {
    let group_scalar = f64::from(BigEndian::read_i16(&header[TRC_SOURCE_GROUP_SCALAR..])).abs();
    let elevation_scalar = f64::from(BigEndian::read_i16(&header[TRC_ELEVATION_SCALAR..])).abs();

    GeometryPoint {
        index: index.into(),
        x: f64::from(BigEndian::read_i32(&header[TRC_GROUP_X..])) / group_scalar,
        y: f64::from(BigEndian::read_i32(&header[TRC_GROUP_Y..])) / group_scalar,
        z: f64::from(BigEndian::read_i32(&header[TRC_RECEIVER_ELEVATION..])) / elevation_scalar,
    }
}

/// Read a full trace header. Returns false on a clean end-of-file at a
/// trace boundary; a header that starts but ends short is an error
/// naming the first field that could not be read.
fn read_trace_header<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool, ExtractError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(ExtractError::MissingField(first_missing_field(filled)));
        }
        filled += n;
    }
    Ok(true)
}

fn first_missing_field(filled: usize) -> &'static str {
    if filled < TRC_RECEIVER_ELEVATION + 4 {
        "ReceiverGroupElevation"
    } else if filled < TRC_ELEVATION_SCALAR + 2 {
        "ElevationScalar"
    } else if filled < TRC_SOURCE_GROUP_SCALAR + 2 {
        "SourceGroupScalar"
    } else if filled < TRC_GROUP_X + 4 {
        "GroupX"
    } else if filled < TRC_GROUP_Y + 4 {
        "GroupY"
    } else {
        "SamplesThisTrace"
    }
}

fn read_required<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), ExtractError> {
    reader
        .read_exact(buf)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ExtractError::MissingField(what),
            _ => ExtractError::Io(e),
        })
}

/// Sample width in bytes for the binary-header format code.
fn bytes_per_sample(code: i16) -> Result<i64, ExtractError> {
    match code {
        1 | 2 | 4 | 5 | 10 => Ok(4),
        3 | 11 => Ok(2),
        6 | 9 | 12 => Ok(8),
        8 | 16 => Ok(1),
        other => Err(ExtractError::UnsupportedSampleFormat(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masw_common::models::StationId;

    fn header_with(
        elevation: i32,
        elevation_scalar: i16,
        group_scalar: i16,
        group_x: i32,
        group_y: i32,
    ) -> [u8; TRACE_HEADER_LEN] {
        let mut header = [0u8; TRACE_HEADER_LEN];
        BigEndian::write_i32(&mut header[TRC_RECEIVER_ELEVATION..], elevation);
        BigEndian::write_i16(&mut header[TRC_ELEVATION_SCALAR..], elevation_scalar);
        BigEndian::write_i16(&mut header[TRC_SOURCE_GROUP_SCALAR..], group_scalar);
        BigEndian::write_i32(&mut header[TRC_GROUP_X..], group_x);
        BigEndian::write_i32(&mut header[TRC_GROUP_Y..], group_y);
        header
    }

    #[test]
    fn negative_scalars_divide_by_absolute_value() {
        let header = header_with(500, -10, -100, 123400, 567800);
        let point = point_from_header(3, &header);

        assert_eq!(point.index, StationId::Number(3));
        assert_eq!(point.x, 1234.0);
        assert_eq!(point.y, 5678.0);
        assert_eq!(point.z, 50.0);
    }

    #[test]
    fn positive_scalars_also_divide() {
        let header = header_with(500, 10, 100, 123400, 567800);
        let point = point_from_header(0, &header);

        // Same result as the negative-scalar case.
        assert_eq!(point.x, 1234.0);
        assert_eq!(point.y, 5678.0);
        assert_eq!(point.z, 50.0);
    }

    #[test]
    fn sample_width_by_format_code() {
        assert_eq!(bytes_per_sample(1).unwrap(), 4); // IBM float
        assert_eq!(bytes_per_sample(5).unwrap(), 4); // IEEE float
        assert_eq!(bytes_per_sample(3).unwrap(), 2);
        assert_eq!(bytes_per_sample(8).unwrap(), 1);
        assert!(matches!(
            bytes_per_sample(0),
            Err(ExtractError::UnsupportedSampleFormat(0))
        ));
        assert!(matches!(
            bytes_per_sample(7),
            Err(ExtractError::UnsupportedSampleFormat(7))
        ));
    }

    #[test]
    fn truncated_header_names_first_missing_field() {
        assert_eq!(first_missing_field(10), "ReceiverGroupElevation");
        assert_eq!(first_missing_field(44), "ElevationScalar");
        assert_eq!(first_missing_field(70), "SourceGroupScalar");
        assert_eq!(first_missing_field(72), "GroupX");
        assert_eq!(first_missing_field(84), "GroupY");
        assert_eq!(first_missing_field(100), "SamplesThisTrace");
    }
}
