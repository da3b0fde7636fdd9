use crate::error::{Error, ExecutionFault};
use crate::instruction::{Instruction, Opcode};


pub const MEMORY_SIZE: usize = 4096;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_CELLS: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// Programs are loaded at 0x200; everything below is reserved.
pub const ROM_START: usize = 0x200;

/// The CHIP-8 machine: memory, registers, call stack and framebuffer,
/// stepped one fetch/execute cycle at a time.
///
/// All mutation funnels through [`Cpu::step`]. The driver decides pacing
/// and lifetime; the cpu itself never sleeps or blocks.
pub struct Cpu {
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// General registers V0-VF. VF doubles as the carry/borrow/collision
    /// flag, with the exact set-only quirks preserved per opcode.
    pub(crate) v: [u8; 16],
    /// Index register; base address for sprite reads.
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: Vec<u16>,
    /// Flat row-major 64x32 grid, one byte per cell, each 0 or 1.
    pub(crate) framebuffer: [u8; DISPLAY_CELLS],
    /// The instruction decoded by the most recent fetch.
    current: Instruction,
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: ROM_START as u16,
            stack: Vec::new(),
            framebuffer: [0; DISPLAY_CELLS],
            current: Instruction::decode(0, 0),
        }
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies a ROM image into memory at 0x200 and points the program
    /// counter at it. Rejects images that would run past the end of
    /// memory instead of truncating.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Error> {
        let end = ROM_START + rom.len();
        if end > MEMORY_SIZE {
            return Err(Error::Rom(format!(
                "rom is {} bytes but only {} fit above {:#05X}",
                rom.len(),
                MEMORY_SIZE - ROM_START,
                ROM_START
            )));
        }
        self.memory[ROM_START..end].copy_from_slice(rom);
        self.pc = ROM_START as u16;
        log::info!("loaded {} byte rom at {:#05X}", rom.len(), ROM_START);
        Ok(())
    }

    /// Runs one fetch/execute cycle.
    pub fn step(&mut self) -> Result<(), Error> {
        self.fetch()?;
        self.execute()
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Read-only framebuffer snapshot for the renderer. Cell `i` maps to
    /// grid position `(i % 64, i / 64)`.
    pub fn framebuffer(&self) -> &[u8; DISPLAY_CELLS] {
        &self.framebuffer
    }

    fn read_byte(&self, addr: u16) -> Result<u8, Error> {
        self.memory
            .get(addr as usize)
            .copied()
            .ok_or(Error::MemoryFault { addr })
    }

    /// Reads the two bytes at the program counter, decodes them, and
    /// advances past them. Faults if the program counter has run off the
    /// end of memory.
    fn fetch(&mut self) -> Result<(), Error> {
        let b0 = self.read_byte(self.pc)?;
        let b1 = self.read_byte(self.pc + 1)?;
        self.current = Instruction::decode(b0, b1);
        self.pc += 2;
        Ok(())
    }

    /// Executes the instruction stored by the last fetch.
    ///
    /// Several opcodes carry deliberate quirks inherited from the machine
    /// being modeled: the 8xy4/8xy5/8xy7 flag writes happen only on their
    /// true branch (VF is never cleared back to 0), the shifts operate on
    /// V[x] rather than the conventional V[y], and 8xyE stores the raw
    /// masked high bit. None of these may be "corrected".
    fn execute(&mut self) -> Result<(), Error> {
        match self.current.opcode() {
            Opcode::Clear => {
                self.framebuffer.fill(0);
            }
            Opcode::Return => {
                self.pc = self.stack.pop().ok_or(ExecutionFault::StackUnderflow {
                    pc: self.pc.wrapping_sub(2),
                })?;
            }
            Opcode::Jump { addr } => {
                self.pc = addr;
            }
            Opcode::Call { addr } => {
                self.stack.push(self.pc);
                self.pc = addr;
            }
            Opcode::SkipEqImm { x, nn } => {
                if self.v[x as usize] == nn {
                    self.pc += 2;
                }
            }
            Opcode::SkipNeImm { x, nn } => {
                if self.v[x as usize] != nn {
                    self.pc += 2;
                }
            }
            Opcode::SkipEqReg { x, y } => {
                if self.v[x as usize] == self.v[y as usize] {
                    self.pc += 2;
                }
            }
            Opcode::LoadImm { x, nn } => {
                self.v[x as usize] = nn;
            }
            Opcode::AddImm { x, nn } => {
                self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
            }
            Opcode::Move { x, y } => {
                self.v[x as usize] = self.v[y as usize];
            }
            Opcode::Or { x, y } => {
                self.v[x as usize] |= self.v[y as usize];
            }
            Opcode::And { x, y } => {
                self.v[x as usize] &= self.v[y as usize];
            }
            Opcode::Xor { x, y } => {
                self.v[x as usize] ^= self.v[y as usize];
            }
            Opcode::Add { x, y } => {
                // Widen deliberately so the carry check is explicit.
                let sum = self.v[x as usize] as u16 + self.v[y as usize] as u16;
                if sum > 0xFF {
                    self.v[0xF] = 1;
                }
                self.v[x as usize] = (sum & 0xFF) as u8;
            }
            Opcode::Sub { x, y } => {
                if self.v[x as usize] > self.v[y as usize] {
                    self.v[0xF] = 1;
                }
                self.v[x as usize] = self.v[x as usize].wrapping_sub(self.v[y as usize]);
            }
            Opcode::ShiftRight { x } => {
                self.v[0xF] = self.v[x as usize] & 1;
                self.v[x as usize] >>= 1;
            }
            Opcode::SubNeg { x, y } => {
                if self.v[x as usize] < self.v[y as usize] {
                    self.v[0xF] = 1;
                }
                self.v[x as usize] = self.v[y as usize].wrapping_sub(self.v[x as usize]);
            }
            Opcode::ShiftLeft { x } => {
                self.v[0xF] = self.v[x as usize] & 0x80;
                self.v[x as usize] = self.v[x as usize].wrapping_mul(2);
            }
            Opcode::SkipNeReg { x, y } => {
                if self.v[x as usize] != self.v[y as usize] {
                    self.pc += 2;
                }
            }
            Opcode::LoadIndex { addr } => {
                self.i = addr;
            }
            Opcode::JumpOffset { addr } => {
                self.pc = addr + self.v[0] as u16;
            }
            Opcode::Draw { x, y, n } => {
                self.draw(x, y, n)?;
            }
            Opcode::Unknown => {
                // Unrecognized encodings are silently ignored.
                log::trace!(
                    "ignoring opcode {:01X}{:01X}{:02X} at pc {:#06X}",
                    self.current.family,
                    self.current.x,
                    self.current.nn,
                    self.pc.wrapping_sub(2)
                );
            }
        }
        Ok(())
    }

    /// Dxyn: XOR an 8-wide, n-tall sprite read from I into the
    /// framebuffer at (V[x], V[y]), flagging collisions in VF.
    ///
    /// Two addressing quirks are preserved exactly: the bottom-edge check
    /// tests the sprite's base row once (a sprite starting on-screen draws
    /// all n rows), and cells are indexed by a single modulo over the flat
    /// buffer, so horizontal overflow wraps into the next row rather than
    /// clipping.
    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), Error> {
        let x_coord = self.v[x as usize] as usize;
        let y_coord = self.v[y as usize] as usize;
        self.v[0xF] = 0;

        for row in 0..n as usize {
            if y_coord >= DISPLAY_HEIGHT {
                break;
            }
            let sprite = self.read_byte(self.i + row as u16)?;
            for bit in 0..8 {
                if sprite & (0x80 >> bit) == 0 {
                    continue;
                }
                let cell = ((x_coord + bit) + DISPLAY_WIDTH * (y_coord + row)) % DISPLAY_CELLS;
                if self.framebuffer[cell] == 1 {
                    self.v[0xF] = 1;
                }
                self.framebuffer[cell] ^= 1;
            }
        }
        Ok(())
    }
}
