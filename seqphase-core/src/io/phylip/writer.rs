use crate::error::{BioError, BioResult};
use crate::seq::Alignment;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Symbols per output line.
pub const LINE_WIDTH: usize = 60;
/// Symbols per space-separated group.
pub const CHUNK_WIDTH: usize = 10;

/// Names are single whitespace-free tokens in block format.
fn check_name(name: &str) -> BioResult<()> {
    if name.is_empty() || name.bytes().any(|b| b.is_ascii_whitespace()) {
        return Err(BioError::InvalidParameter {
            msg: format!("sequence name '{name}' cannot be written in block format"),
        });
    }
    Ok(())
}

/// Renders `al` in interleaved block format. Fails on empty names or names
/// containing whitespace.
pub fn write_phylip(al: &Alignment) -> BioResult<String> {
    for seq in al.iter() {
        check_name(seq.name())?;
    }
    let len = al.length();
    let mut out = format!("  {}   {}\n", al.len(), len);

    let mut start = 0;
    while start < len {
        let end = (start + LINE_WIDTH).min(len);
        if start > 0 {
            out.push('\n');
        }
        for seq in al.iter() {
            if start == 0 {
                out.push_str(seq.name());
                out.push_str("  ");
            }
            for (i, chunk) in seq.as_bytes()[start..end].chunks(CHUNK_WIDTH).enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&String::from_utf8_lossy(chunk));
            }
            out.push('\n');
        }
        start = end;
    }
    Ok(out)
}

pub fn write_phylip_to<W: Write>(al: &Alignment, mut writer: W) -> BioResult<()> {
    writer.write_all(write_phylip(al)?.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn write_phylip_to_path(al: &Alignment, path: impl AsRef<Path>) -> BioResult<()> {
    let file = File::create(path)?;
    write_phylip_to(al, BufWriter::new(file))
}
