use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Resolves a user-supplied ROM argument to an on-disk path.
///
/// Tries, in order: the argument as a direct path, the argument with a
/// `.ch8` extension, and both forms under a `roms/` directory.
pub fn resolve_rom_path(arg: &str) -> Result<PathBuf, Error> {
    let direct = PathBuf::from(arg);
    if direct.is_file() {
        return Ok(direct);
    }

    let mut candidates = Vec::new();
    if direct.extension().is_none() {
        candidates.push(direct.with_extension("ch8"));
    }
    candidates.push(Path::new("roms").join(arg));
    if direct.extension().is_none() {
        candidates.push(Path::new("roms").join(arg).with_extension("ch8"));
    }

    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(Error::Rom(format!(
        "no rom found matching '{}' (tried the path directly, with .ch8, and under roms/)",
        arg
    )))
}

/// Reads a ROM image from disk. Size validation against the machine's
/// address space happens at load time, not here.
pub fn read_rom(path: &Path) -> Result<Vec<u8>, Error> {
    let data = fs::read(path)?;
    log::info!("read {} byte rom from {}", data.len(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn resolve_accepts_a_direct_path() {
        let path = env::temp_dir().join("resolve_direct.ch8");
        fs::write(&path, [0x00u8, 0xE0]).unwrap();
        let resolved = resolve_rom_path(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved, path);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn resolve_infers_the_ch8_extension() {
        let path = env::temp_dir().join("resolve_inferred.ch8");
        fs::write(&path, [0x00u8, 0xE0]).unwrap();
        let stem = env::temp_dir().join("resolve_inferred");
        let resolved = resolve_rom_path(stem.to_str().unwrap()).unwrap();
        assert_eq!(resolved, path);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn resolve_reports_missing_roms() {
        assert!(matches!(
            resolve_rom_path("definitely_not_a_rom_here"),
            Err(Error::Rom(_))
        ));
    }

    #[test]
    fn read_propagates_io_errors() {
        assert!(matches!(
            read_rom(Path::new("definitely_not_a_rom_here.ch8")),
            Err(Error::Io(_))
        ));
    }
}
