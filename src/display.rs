use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use crate::cpu::{DISPLAY_CELLS, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Error;

const WINDOW_TITLE: &str = "chip8-emulator";

/// The sdl2 window the framebuffer is rendered into.
///
/// The 64x32 monochrome framebuffer is uploaded as an RGB24 streaming
/// texture and scaled up to the window by the canvas copy.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, Error> {
        let video = sdl.video().map_err(Error::Video)?;
        let window = video
            .window(
                WINDOW_TITLE,
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| Error::Video(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| Error::Video(e.to_string()))?;
        Ok(Display { canvas })
    }

    /// Expands the flat 0/1 framebuffer into RGB24 bytes: each cell
    /// becomes three channel bytes at full or zero intensity.
    fn frame_to_texture(frame: &[u8; DISPLAY_CELLS]) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|cell| std::iter::repeat(cell * 255).take(3))
            .collect()
    }

    pub fn render(&mut self, frame: &[u8; DISPLAY_CELLS]) -> Result<(), Error> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| Error::Video(e.to_string()))?;

        let pixels = Display::frame_to_texture(frame);
        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&pixels);
            })
            .map_err(Error::Video)?;

        self.canvas.copy(&texture, None, None).map_err(Error::Video)?;
        self.canvas.present();
        Ok(())
    }
}
