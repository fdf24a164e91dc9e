use crate::geometry::pitch_rotation;
use crate::pose::{project_skeleton, rotate_by_quaternion, rotate_skeleton, Skeleton2d, Skeleton3d};
use crate::render::skeleton::{BACKGROUND_COLOR, EDGE_COLORS, FRAME_COLOR, UPPER_BODY_EDGES};

/// 描画領域（ピクセル）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Panel {
    /// ウィンドウを rows × cols に分割したうちの1枚
    pub fn grid(width: usize, height: usize, rows: usize, cols: usize, row: usize, col: usize) -> Self {
        let w = width / cols.max(1);
        let h = height / rows.max(1);
        Self {
            x: col * w,
            y: row * h,
            width: w,
            height: h,
        }
    }

    /// 骨格座標 [-limit, limit] をパネル内のピクセルへ
    ///
    /// Y は下向き（画像座標と同じ）。正方形に収まるよう短辺に合わせる。
    pub fn to_pixel(&self, x: f64, y: f64, limit: f64) -> (i32, i32) {
        let side = self.width.min(self.height) as f64;
        let cx = self.x as f64 + self.width as f64 / 2.0;
        let cy = self.y as f64 + self.height as f64 / 2.0;
        let s = side / (2.0 * limit);
        ((cx + x * s).round() as i32, (cy + y * s).round() as i32)
    }
}

/// 3Dビュー用のカメラ（正射影）
#[derive(Debug, Clone, Copy)]
pub struct ViewCamera {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl ViewCamera {
    /// 方位角で鉛直軸まわり、仰角で水平軸まわりに回してから Z を落とす
    pub fn project(&self, skel: &Skeleton3d) -> Skeleton2d {
        let turned = rotate_skeleton(skel, self.azimuth_deg);
        let tilted = rotate_by_quaternion(&turned, &pitch_rotation(self.elevation_deg.to_radians()));
        project_skeleton(&tilted)
    }
}

/// u32 (0RGB) ピクセルバッファ
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![BACKGROUND_COLOR; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.buffer.fill(BACKGROUND_COLOR);
    }

    /// パネルの枠線
    pub fn draw_panel_frame(&mut self, panel: &Panel) {
        let x0 = panel.x as i32;
        let y0 = panel.y as i32;
        let x1 = (panel.x + panel.width) as i32 - 1;
        let y1 = (panel.y + panel.height) as i32 - 1;
        self.draw_line(x0, y0, x1, y0, FRAME_COLOR);
        self.draw_line(x1, y0, x1, y1, FRAME_COLOR);
        self.draw_line(x1, y1, x0, y1, FRAME_COLOR);
        self.draw_line(x0, y1, x0, y0, FRAME_COLOR);
    }

    /// 2D骨格の上半身を描画
    pub fn draw_skeleton_2d(&mut self, panel: &Panel, skel: &Skeleton2d, limit: f64) {
        for (edge, &color) in UPPER_BODY_EDGES.iter().zip(EDGE_COLORS.iter()) {
            let (a, b) = (edge.0 as usize, edge.1 as usize);
            let (x1, y1) = panel.to_pixel(skel[(0, a)], skel[(1, a)], limit);
            let (x2, y2) = panel.to_pixel(skel[(0, b)], skel[(1, b)], limit);
            self.draw_line(x1, y1, x2, y2, color);
        }
    }

    /// 3D骨格をカメラから見た正射影で描画
    pub fn draw_skeleton_3d(&mut self, panel: &Panel, skel: &Skeleton3d, camera: &ViewCamera, limit: f64) {
        let view = camera.project(skel);
        self.draw_skeleton_2d(panel, &view, limit);
    }

    /// Bresenhamのアルゴリズムで線を描画
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}
