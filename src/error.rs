use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Crate-wide error type.
///
/// The two fault variants are the core's whole error taxonomy: everything
/// else the machine can hit (wrapping arithmetic, unknown opcodes) is
/// defined behavior, not an error.
#[derive(Debug)]
pub enum Error {
    /// I/O errors (reading a ROM file, writing a save state).
    Io(io::Error),
    /// A ROM that cannot be loaded (missing, or too large for memory).
    Rom(String),
    /// An access outside the 4096-byte address space. The source of a
    /// fetch past the end of memory or a sprite read past 0xFFF.
    MemoryFault { addr: u16 },
    /// A fault raised by instruction execution itself.
    ExecutionFault(ExecutionFault),
    /// Errors from the sdl2 video layer.
    Video(String),
    /// A save state that cannot be applied to this machine.
    SaveState(String),
}

/// Fatal conditions hit while executing an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionFault {
    /// 00EE executed with an empty call stack; there is no return target.
    StackUnderflow { pc: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Rom(msg) => write!(f, "rom error: {}", msg),
            Error::MemoryFault { addr } => {
                write!(f, "memory fault: address {:#06X} is out of bounds", addr)
            }
            Error::ExecutionFault(fault) => write!(f, "execution fault: {}", fault),
            Error::Video(msg) => write!(f, "video error: {}", msg),
            Error::SaveState(msg) => write!(f, "save state error: {}", msg),
        }
    }
}

impl fmt::Display for ExecutionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionFault::StackUnderflow { pc } => {
                write!(f, "stack underflow on return at pc {:#06X}", pc)
            }
        }
    }
}

impl StdError for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ExecutionFault> for Error {
    fn from(fault: ExecutionFault) -> Self {
        Error::ExecutionFault(fault)
    }
}
