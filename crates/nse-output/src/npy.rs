//! Dense `f32` matrices in NumPy `.npy` format (version 1.0).
//!
//! Layout: the magic `\x93NUMPY`, version bytes `1 0`, a little-endian
//! `u16` header length, then an ASCII dict header padded with spaces and a
//! trailing newline so the data starts on a 64-byte boundary, then
//! row-major little-endian `f32` values.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{OutputError, OutputResult};

const MAGIC: &[u8] = b"\x93NUMPY";
const ALIGN: usize = 64;

/// Row-major `rows × cols` matrix of `f32`.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> OutputResult<Self> {
        if data.len() != rows * cols {
            return Err(OutputError::Shape { rows, cols, len: data.len() });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

fn header(rows: usize, cols: usize) -> Vec<u8> {
    let dict = format!("{{'descr': '<f4', 'fortran_order': False, 'shape': ({rows}, {cols}), }}");
    // magic + 2 version bytes + 2 length bytes
    let prefix = MAGIC.len() + 4;
    let unpadded = prefix + dict.len() + 1;
    let pad = (ALIGN - unpadded % ALIGN) % ALIGN;

    let mut out = Vec::with_capacity(unpadded + pad);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&((dict.len() + pad + 1) as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.extend(std::iter::repeat_n(b' ', pad));
    out.push(b'\n');
    out
}

pub fn write_npy(path: &Path, m: &Matrix) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&header(m.rows, m.cols))?;
    for v in &m.data {
        out.write_all(&v.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Read back a 2-D little-endian `f32` C-order file such as those written by
/// [`write_npy`].
pub fn read_npy(path: &Path) -> OutputResult<Matrix> {
    let mut input = BufReader::new(File::open(path)?);

    let mut pre = [0u8; 10];
    input.read_exact(&mut pre)?;
    if &pre[..6] != MAGIC || pre[6] != 1 {
        return Err(OutputError::Npy("bad magic or version".to_string()));
    }
    let len = u16::from_le_bytes([pre[8], pre[9]]) as usize;
    let mut hdr = vec![0u8; len];
    input.read_exact(&mut hdr)?;
    let hdr = String::from_utf8_lossy(&hdr);

    if !hdr.contains("'descr': '<f4'") || !hdr.contains("'fortran_order': False") {
        return Err(OutputError::Npy(format!("unsupported header {hdr}")));
    }
    let (rows, cols) = parse_shape(&hdr)
        .ok_or_else(|| OutputError::Npy(format!("no 2-D shape in {hdr}")))?;

    let mut bytes = Vec::with_capacity(rows * cols * 4);
    input.read_to_end(&mut bytes)?;
    let data = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Matrix::new(rows, cols, data)
}

fn parse_shape(hdr: &str) -> Option<(usize, usize)> {
    let start = hdr.find("'shape': (")? + "'shape': (".len();
    let end = start + hdr[start..].find(')')?;
    let mut dims = hdr[start..end].split(',').map(str::trim).filter(|s| !s.is_empty());
    let rows = dims.next()?.parse().ok()?;
    let cols = dims.next()?.parse().ok()?;
    if dims.next().is_some() {
        return None;
    }
    Some((rows, cols))
}
