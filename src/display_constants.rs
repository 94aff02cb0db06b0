/// Panel width in pixels (`EPD_7IN3E_WIDTH`).
pub const WIDTH: usize = 800;
/// Panel height in pixels (`EPD_7IN3E_HEIGHT`).
pub const HEIGHT: usize = 480;

/// bytes are packed so one byte is two four-bit colors. an odd trailing pixel still takes a byte
pub const BYTE_WIDTH: usize = WIDTH.div_ceil(2);
pub const BUFFER_SIZE: usize = BYTE_WIDTH * HEIGHT;
