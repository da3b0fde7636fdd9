use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use crate::cpu::Cpu;
use crate::display::Display;
use crate::error::Error;
use crate::savestate::SaveState;

/// Instructions per 60 Hz frame, ~600 steps/sec overall. The cpu itself
/// imposes no timing; all pacing lives here.
const STEPS_PER_FRAME: u32 = 10;
const FRAME_TIME: Duration = Duration::from_micros(16_667);
const DISPLAY_SCALE: u32 = 10;

/// The outer driver: owns the cpu, paces its stepping, renders frames and
/// services the event pump. A fault from the cpu ends the loop; the cpu
/// has no shutdown protocol of its own.
pub struct Emulator {
    cpu: Cpu,
    save_path: PathBuf,
}

impl Emulator {
    pub fn new(cpu: Cpu, save_path: PathBuf) -> Self {
        Emulator { cpu, save_path }
    }

    pub fn run(&mut self) -> Result<(), Error> {
        let sdl = sdl2::init().map_err(Error::Video)?;
        let mut display = Display::new(&sdl, DISPLAY_SCALE)?;
        let mut events = sdl.event_pump().map_err(Error::Video)?;

        log::info!("starting emulation, save slot at {}", self.save_path.display());
        'running: loop {
            let frame_start = Instant::now();

            for event in events.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'running,
                    Event::KeyDown {
                        keycode: Some(Keycode::F5),
                        ..
                    } => {
                        if let Err(e) = SaveState::capture(&self.cpu).save_to_file(&self.save_path)
                        {
                            log::warn!("could not write save state: {}", e);
                        }
                    }
                    Event::KeyDown {
                        keycode: Some(Keycode::F9),
                        ..
                    } => {
                        let loaded = SaveState::load_from_file(&self.save_path)
                            .and_then(|state| state.apply(&mut self.cpu));
                        if let Err(e) = loaded {
                            log::warn!("could not load save state: {}", e);
                        }
                    }
                    _ => {}
                }
            }

            for _ in 0..STEPS_PER_FRAME {
                if let Err(e) = self.cpu.step() {
                    log::error!("halting at pc {:#06X}: {}", self.cpu.pc(), e);
                    return Err(e);
                }
            }

            display.render(self.cpu.framebuffer())?;

            if let Some(remaining) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
                thread::sleep(remaining);
            }
        }

        log::info!("emulation stopped");
        Ok(())
    }
}
