/// A decoded CHIP-8 instruction.
///
/// Instructions are 16 bits, stored big-endian in memory. Every field is a
/// fixed slice of those bits, so decoding is total: any two bytes decode to
/// *some* instruction. Whether the result means anything is decided by the
/// cpu's dispatch, not here.
///
/// Field layout (nibbles of the raw word `FXYN`):
/// - `family` the high nibble of the first byte; selects the opcode group
/// - `x`      the low nibble of the first byte; a register index
/// - `y`      the high nibble of the second byte; a register index
/// - `n`      the low nibble of the second byte; a small immediate
/// - `nn`     the entire second byte; an 8-bit immediate
/// - `nnn`    the low 12 bits of the word; an address immediate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub family: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Instruction {
    pub fn decode(b0: u8, b1: u8) -> Self {
        Instruction {
            family: b0 >> 4,
            x: b0 & 0x0F,
            y: b1 >> 4,
            n: b1 & 0x0F,
            nn: b1,
            nnn: ((b0 as u16 & 0x0F) << 8) | b1 as u16,
        }
    }

    /// Classifies the instruction into its executable form.
    ///
    /// Dispatch is keyed on the family nibble alone, except family 0x0
    /// (keyed on the full low byte) and family 0x8 (keyed on the low
    /// nibble). Anything that matches no implemented opcode becomes
    /// `Unknown`, which the cpu executes as a no-op.
    pub fn opcode(&self) -> Opcode {
        let Instruction { x, y, n, nn, nnn, .. } = *self;
        match (self.family, n) {
            (0x0, _) if nn == 0xE0 => Opcode::Clear,
            (0x0, _) if nn == 0xEE => Opcode::Return,
            (0x1, _) => Opcode::Jump { addr: nnn },
            (0x2, _) => Opcode::Call { addr: nnn },
            (0x3, _) => Opcode::SkipEqImm { x, nn },
            (0x4, _) => Opcode::SkipNeImm { x, nn },
            (0x5, _) => Opcode::SkipEqReg { x, y },
            (0x6, _) => Opcode::LoadImm { x, nn },
            (0x7, _) => Opcode::AddImm { x, nn },
            (0x8, 0x0) => Opcode::Move { x, y },
            (0x8, 0x1) => Opcode::Or { x, y },
            (0x8, 0x2) => Opcode::And { x, y },
            (0x8, 0x3) => Opcode::Xor { x, y },
            (0x8, 0x4) => Opcode::Add { x, y },
            (0x8, 0x5) => Opcode::Sub { x, y },
            (0x8, 0x6) => Opcode::ShiftRight { x },
            (0x8, 0x7) => Opcode::SubNeg { x, y },
            (0x8, 0xE) => Opcode::ShiftLeft { x },
            (0x9, _) => Opcode::SkipNeReg { x, y },
            (0xA, _) => Opcode::LoadIndex { addr: nnn },
            (0xB, _) => Opcode::JumpOffset { addr: nnn },
            (0xD, _) => Opcode::Draw { x, y, n },
            _ => Opcode::Unknown,
        }
    }
}

/// The executable form of an instruction.
///
/// `Unknown` covers every unimplemented encoding (the remaining 0x0 forms
/// and all of 0xC/0xE/0xF among them) and is an explicit, tested no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 00E0: clear the framebuffer.
    Clear,
    /// 00EE: pop the call stack into the program counter.
    Return,
    /// 1nnn: jump to addr.
    Jump { addr: u16 },
    /// 2nnn: push the program counter, then jump to addr.
    Call { addr: u16 },
    /// 3xnn: skip the next instruction if V[x] == nn.
    SkipEqImm { x: u8, nn: u8 },
    /// 4xnn: skip the next instruction if V[x] != nn.
    SkipNeImm { x: u8, nn: u8 },
    /// 5xy0: skip the next instruction if V[x] == V[y].
    SkipEqReg { x: u8, y: u8 },
    /// 6xnn: V[x] = nn.
    LoadImm { x: u8, nn: u8 },
    /// 7xnn: V[x] += nn, wrapping, no flag effect.
    AddImm { x: u8, nn: u8 },
    /// 8xy0: V[x] = V[y].
    Move { x: u8, y: u8 },
    /// 8xy1: V[x] |= V[y].
    Or { x: u8, y: u8 },
    /// 8xy2: V[x] &= V[y].
    And { x: u8, y: u8 },
    /// 8xy3: V[x] ^= V[y].
    Xor { x: u8, y: u8 },
    /// 8xy4: V[x] += V[y]; VF set to 1 on carry, untouched otherwise.
    Add { x: u8, y: u8 },
    /// 8xy5: V[x] -= V[y]; VF set to 1 when V[x] > V[y], untouched otherwise.
    Sub { x: u8, y: u8 },
    /// 8xy6: VF = V[x] & 1, then V[x] >>= 1. Shifts V[x], not V[y].
    ShiftRight { x: u8 },
    /// 8xy7: V[x] = V[y] - V[x]; VF set to 1 when V[x] < V[y].
    SubNeg { x: u8, y: u8 },
    /// 8xyE: VF = V[x] & 0x80 (not normalized), then V[x] <<= 1.
    ShiftLeft { x: u8 },
    /// 9xy0: skip the next instruction if V[x] != V[y].
    SkipNeReg { x: u8, y: u8 },
    /// Annn: I = addr.
    LoadIndex { addr: u16 },
    /// Bnnn: jump to addr + V[0].
    JumpOffset { addr: u16 },
    /// Dxyn: XOR an 8-wide, n-tall sprite at (V[x], V[y]).
    Draw { x: u8, y: u8, n: u8 },
    /// Any unimplemented encoding; executes as a no-op.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_splits_fields() {
        let instruction = Instruction::decode(0xAB, 0xCD);
        assert_eq!(instruction.family, 0xA);
        assert_eq!(instruction.x, 0xB);
        assert_eq!(instruction.y, 0xC);
        assert_eq!(instruction.n, 0xD);
        assert_eq!(instruction.nn, 0xCD);
        assert_eq!(instruction.nnn, 0xBCD);
    }

    #[test]
    fn decode_is_total() {
        // Every two-byte input decodes; spot-check the extremes.
        let zero = Instruction::decode(0x00, 0x00);
        assert_eq!(zero.nnn, 0x000);
        let ones = Instruction::decode(0xFF, 0xFF);
        assert_eq!(ones.family, 0xF);
        assert_eq!(ones.nnn, 0xFFF);
    }

    #[test]
    fn classify_control_flow() {
        assert_eq!(Instruction::decode(0x00, 0xE0).opcode(), Opcode::Clear);
        assert_eq!(Instruction::decode(0x00, 0xEE).opcode(), Opcode::Return);
        assert_eq!(
            Instruction::decode(0x1A, 0xBC).opcode(),
            Opcode::Jump { addr: 0xABC }
        );
        assert_eq!(
            Instruction::decode(0x2A, 0xBC).opcode(),
            Opcode::Call { addr: 0xABC }
        );
        assert_eq!(
            Instruction::decode(0xB1, 0x23).opcode(),
            Opcode::JumpOffset { addr: 0x123 }
        );
    }

    #[test]
    fn classify_arithmetic_family_on_low_nibble() {
        assert_eq!(
            Instruction::decode(0x81, 0x24).opcode(),
            Opcode::Add { x: 1, y: 2 }
        );
        assert_eq!(
            Instruction::decode(0x81, 0x26).opcode(),
            Opcode::ShiftRight { x: 1 }
        );
        assert_eq!(
            Instruction::decode(0x81, 0x2E).opcode(),
            Opcode::ShiftLeft { x: 1 }
        );
        // 8xy8..8xyD have no assigned meaning.
        assert_eq!(Instruction::decode(0x81, 0x28).opcode(), Opcode::Unknown);
    }

    #[test]
    fn skip_families_ignore_low_nibble() {
        // Dispatch keys on the family nibble only, so 5xy7 still compares.
        assert_eq!(
            Instruction::decode(0x51, 0x27).opcode(),
            Opcode::SkipEqReg { x: 1, y: 2 }
        );
        assert_eq!(
            Instruction::decode(0x91, 0x23).opcode(),
            Opcode::SkipNeReg { x: 1, y: 2 }
        );
    }

    #[test]
    fn unimplemented_families_are_unknown() {
        assert_eq!(Instruction::decode(0x00, 0x00).opcode(), Opcode::Unknown);
        assert_eq!(Instruction::decode(0xC1, 0x23).opcode(), Opcode::Unknown);
        assert_eq!(Instruction::decode(0xE1, 0x9E).opcode(), Opcode::Unknown);
        assert_eq!(Instruction::decode(0xF1, 0x65).opcode(), Opcode::Unknown);
    }
}
