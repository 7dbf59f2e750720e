//! On-disk index artifacts.
//!
//! Vector file (little endian):
//!
//! ```text
//! magic     8 bytes  "FCTIDX01"
//! dimension u32
//! count     u64
//! name_len  u16
//! name      name_len bytes (UTF-8 embedder name)
//! values    count * dimension f32
//! ```
//!
//! Statement file: CSV with header `id,statement`, one row per vector, ids
//! dense and in order. Both files are written to a `.tmp` sibling and
//! renamed into place.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IndexError, Result};
use crate::flat::FlatL2Index;

pub const MAGIC: &[u8; 8] = b"FCTIDX01";

pub const VECTOR_FILE: &str = "facts.index";
pub const STATEMENT_FILE: &str = "statements.csv";

/// Locations of the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub vectors: PathBuf,
    pub statements: PathBuf,
}

impl IndexPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vectors: dir.join(VECTOR_FILE),
            statements: dir.join(STATEMENT_FILE),
        }
    }
}

/// Header of a persisted vector file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorHeader {
    pub embedder: String,
    pub dimension: usize,
    pub count: usize,
}

pub fn write_vectors(path: &Path, embedder: &str, index: &FlatL2Index) -> Result<()> {
    let name = embedder.as_bytes();
    let name_len = u16::try_from(name.len())
        .map_err(|_| IndexError::corrupt(path, "embedder name longer than 65535 bytes"))?;
    let dimension = u32::try_from(index.dimension())
        .map_err(|_| IndexError::corrupt(path, "dimension does not fit in u32"))?;

    write_atomically(path, |out| {
        out.write_all(MAGIC)?;
        out.write_all(&dimension.to_le_bytes())?;
        out.write_all(&(index.len() as u64).to_le_bytes())?;
        out.write_all(&name_len.to_le_bytes())?;
        out.write_all(name)?;
        for value in index.raw() {
            out.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    })?;

    debug!("Wrote {} vectors to {}", index.len(), path.display());
    Ok(())
}

pub fn read_vectors(path: &Path) -> Result<(VectorHeader, FlatL2Index)> {
    let bytes = read_existing(path)?;
    let mut cursor = Cursor::new(path, &bytes);

    if cursor.take(MAGIC.len())? != MAGIC {
        return Err(IndexError::corrupt(path, "bad magic"));
    }
    let dimension = u32::from_le_bytes(cursor.array()?) as usize;
    let count = u64::from_le_bytes(cursor.array()?);
    let name_len = u16::from_le_bytes(cursor.array()?) as usize;
    let embedder = std::str::from_utf8(cursor.take(name_len)?)
        .map_err(|_| IndexError::corrupt(path, "embedder name is not UTF-8"))?
        .to_string();

    if dimension == 0 {
        return Err(IndexError::corrupt(path, "zero dimension"));
    }
    let count = usize::try_from(count)
        .map_err(|_| IndexError::corrupt(path, "vector count overflows"))?;
    let expected = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| IndexError::corrupt(path, "vector payload size overflows"))?;

    let payload = cursor.rest();
    if payload.len() != expected {
        return Err(IndexError::corrupt(
            path,
            format!(
                "expected {expected} payload bytes for {count} vectors, found {}",
                payload.len()
            ),
        ));
    }

    let data = payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok((
        VectorHeader {
            embedder,
            dimension,
            count,
        },
        FlatL2Index::from_raw(dimension, data),
    ))
}

pub fn write_statements(path: &Path, statements: &[String]) -> Result<()> {
    write_atomically(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["id", "statement"])?;
        for (id, statement) in statements.iter().enumerate() {
            writer.write_record([id.to_string().as_str(), statement.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    })
}

pub fn read_statements(path: &Path) -> Result<Vec<String>> {
    let bytes = read_existing(path)?;
    let mut reader = csv::Reader::from_reader(bytes.as_slice());

    let headers = reader.headers()?.clone();
    if headers.len() != 2 || &headers[0] != "id" || &headers[1] != "statement" {
        return Err(IndexError::corrupt(path, "expected header id,statement"));
    }

    let mut statements = Vec::new();
    for (expected, record) in reader.records().enumerate() {
        let record = record?;
        let id: usize = record[0]
            .parse()
            .map_err(|_| IndexError::corrupt(path, format!("bad id {:?}", &record[0])))?;
        if id != expected {
            return Err(IndexError::corrupt(
                path,
                format!("ids are not dense: expected {expected}, found {id}"),
            ));
        }
        statements.push(record[1].to_string());
    }
    Ok(statements)
}

fn read_existing(path: &Path) -> Result<Vec<u8>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IndexError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Write through a `.tmp` sibling, then rename over `path`.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let result = File::create(&tmp)
        .map_err(IndexError::from)
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            write(&mut out)?;
            out.flush()?;
            out.get_ref().sync_all()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&tmp, path).map_err(IndexError::from));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

struct Cursor<'a> {
    path: &'a Path,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(path: &'a Path, bytes: &'a [u8]) -> Self {
        Self {
            path,
            bytes,
            pos: 0,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| IndexError::corrupt(self.path, "truncated header"))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}
