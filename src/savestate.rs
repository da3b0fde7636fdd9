use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cpu::{Cpu, DISPLAY_CELLS, MEMORY_SIZE};
use crate::error::Error;

/// A complete snapshot of the machine, serializable with bincode.
///
/// Memory and framebuffer travel as `Vec<u8>` so the on-disk format stays
/// independent of the fixed array sizes; `apply` validates the lengths.
#[derive(Serialize, Deserialize)]
pub struct SaveState {
    pub version: u32,
    pub timestamp: u64,
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: Vec<u16>,
    pub memory: Vec<u8>,
    pub framebuffer: Vec<u8>,
}

impl SaveState {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn capture(cpu: &Cpu) -> Self {
        SaveState {
            version: Self::CURRENT_VERSION,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            v: cpu.v,
            i: cpu.i,
            pc: cpu.pc,
            stack: cpu.stack.clone(),
            memory: cpu.memory.to_vec(),
            framebuffer: cpu.framebuffer.to_vec(),
        }
    }

    /// Restores a captured snapshot into the machine.
    pub fn apply(&self, cpu: &mut Cpu) -> Result<(), Error> {
        if self.version > Self::CURRENT_VERSION {
            return Err(Error::SaveState(format!(
                "save state version {} is newer than supported version {}",
                self.version,
                Self::CURRENT_VERSION
            )));
        }
        if self.memory.len() != MEMORY_SIZE {
            return Err(Error::SaveState(format!(
                "memory snapshot is {} bytes, expected {}",
                self.memory.len(),
                MEMORY_SIZE
            )));
        }
        if self.framebuffer.len() != DISPLAY_CELLS {
            return Err(Error::SaveState(format!(
                "framebuffer snapshot is {} cells, expected {}",
                self.framebuffer.len(),
                DISPLAY_CELLS
            )));
        }

        cpu.v = self.v;
        cpu.i = self.i;
        cpu.pc = self.pc;
        cpu.stack = self.stack.clone();
        cpu.memory.copy_from_slice(&self.memory);
        cpu.framebuffer.copy_from_slice(&self.framebuffer);
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), Error> {
        let data = bincode::serialize(self)
            .map_err(|e| Error::SaveState(format!("failed to serialize save state: {}", e)))?;
        fs::write(path, data)?;
        log::info!("save state written to {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let data = fs::read(path)?;
        let state: SaveState = bincode::deserialize(&data)
            .map_err(|e| Error::SaveState(format!("failed to deserialize save state: {}", e)))?;
        log::info!("save state loaded from {}", path.display());
        Ok(state)
    }
}
