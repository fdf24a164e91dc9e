use anyhow::Result;
use minifb::{Key, Window, WindowOptions};

use crate::render::canvas::Canvas;

/// minifbを使用したビューア
pub struct MinifbViewer {
    window: Window,
}

impl MinifbViewer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        // 静止画なので低フレームレートで十分
        window.set_target_fps(30);

        Ok(Self { window })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// キーが押された瞬間か（押しっぱなしは無視）
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, minifb::KeyRepeat::No)
    }

    /// キャンバスをウィンドウに表示
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.window
            .update_with_buffer(canvas.buffer(), canvas.width(), canvas.height())?;
        Ok(())
    }
}
