use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};
use frogger::leaderboard::{ScoreStore, NAME_MAX};
use frogger::session::{Phase, Session};
use std::io::{self, Stdout, Write};
use std::time::Instant;

pub(crate) const FOOTER_ROWS: u16 = 1;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    name: &'static str,
    hud_fg: Color,
    hud_bg: Color,
    safe_bg: Color,
    road_bg: Color,
    frog_fg: Color,
    accent_fg: Color,
    flash_bg: Color,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

const THEMES: [Theme; 3] = [
    Theme {
        name: "Mint CRT",
        hud_fg: rgb(160, 255, 210),
        hud_bg: rgb(5, 7, 10),
        safe_bg: rgb(10, 26, 12),
        road_bg: rgb(14, 14, 18),
        frog_fg: rgb(180, 255, 120),
        accent_fg: rgb(255, 220, 140),
        flash_bg: rgb(90, 10, 10),
    },
    Theme {
        name: "Amber Terminal",
        hud_fg: rgb(255, 190, 95),
        hud_bg: rgb(7, 6, 3),
        safe_bg: rgb(22, 16, 6),
        road_bg: rgb(12, 10, 8),
        frog_fg: rgb(255, 220, 120),
        accent_fg: rgb(255, 235, 160),
        flash_bg: rgb(80, 24, 0),
    },
    Theme {
        name: "JoshNet Purple",
        hud_fg: rgb(200, 150, 255),
        hud_bg: rgb(10, 5, 15),
        safe_bg: rgb(18, 12, 30),
        road_bg: rgb(12, 8, 18),
        frog_fg: rgb(200, 255, 180),
        accent_fg: rgb(255, 220, 140),
        flash_bg: rgb(70, 10, 50),
    },
];

/// Vehicle colours; the level's palette index picks the starting slot.
const LEVEL_TINTS: [Color; 9] = [
    rgb(255, 160, 140),
    rgb(255, 200, 90),
    rgb(140, 200, 255),
    rgb(255, 120, 200),
    rgb(170, 255, 150),
    rgb(255, 110, 90),
    rgb(200, 170, 255),
    rgb(120, 240, 230),
    rgb(240, 240, 240),
];

pub(crate) fn theme_count() -> usize {
    THEMES.len()
}

#[derive(Clone, Copy, PartialEq)]
struct FrameCell {
    ch: char,
    fg: Color,
    bg: Color,
}

pub(crate) struct Renderer {
    w: u16,
    h: u16,
    prev: Vec<FrameCell>,
    cur: Vec<FrameCell>,
}

impl Renderer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        let blank = FrameCell {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        };
        // prev starts as NUL so the first flush paints everything
        let stale = FrameCell { ch: '\0', ..blank };
        Self {
            w,
            h,
            prev: vec![stale; (w as usize) * (h as usize)],
            cur: vec![blank; (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn resize(&mut self, w: u16, h: u16) {
        *self = Self::new(w, h);
    }

    fn clear_to(&mut self, fg: Color, bg: Color) {
        for c in &mut self.cur {
            *c = FrameCell { ch: ' ', fg, bg };
        }
    }

    fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return;
        }
        let i = (y as usize) * (self.w as usize) + (x as usize);
        self.cur[i] = FrameCell { ch, fg, bg };
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i as i32, y, ch, fg, bg);
        }
    }

    fn fill_row(&mut self, y: i32, fg: Color, bg: Color) {
        for x in 0..self.w as i32 {
            self.put(x, y, ' ', fg, bg);
        }
    }

    pub(crate) fn flush_diff(&mut self, out: &mut Stdout) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut cur_fg = None::<Color>;
        let mut cur_bg = None::<Color>;

        for y in 0..self.h {
            let row_off = (y as usize) * (self.w as usize);
            for x in 0..self.w {
                let i = row_off + (x as usize);
                let a = self.cur[i];
                if a == self.prev[i] {
                    continue;
                }
                queue!(out, cursor::MoveTo(x, y))?;
                if cur_fg != Some(a.fg) {
                    queue!(out, SetForegroundColor(a.fg))?;
                    cur_fg = Some(a.fg);
                }
                if cur_bg != Some(a.bg) {
                    queue!(out, SetBackgroundColor(a.bg))?;
                    cur_bg = Some(a.bg);
                }
                queue!(out, Print(a.ch))?;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;
        self.prev.copy_from_slice(&self.cur);
        Ok(())
    }
}

pub(crate) fn render_frame<S: ScoreStore>(
    r: &mut Renderer,
    s: &Session<S>,
    theme_idx: usize,
    now: Instant,
) {
    let theme = THEMES[theme_idx % THEMES.len()];
    let road = s.road();
    let level = s.level();
    let ledger = s.ledger();

    let flashing = match s.phase() {
        Phase::DeathFlash { until } | Phase::GameOverFlash { until } => {
            (until.saturating_duration_since(now).as_millis() / 150) % 2 == 0
        }
        _ => false,
    };

    r.clear_to(theme.hud_fg, theme.hud_bg);

    for y in 1..road.height {
        let bg = if flashing {
            theme.flash_bg
        } else if road.is_safe_row(y) {
            theme.safe_bg
        } else {
            theme.road_bg
        };
        r.fill_row(y, theme.hud_fg, bg);
        if road.is_safe_row(y) {
            for x in (y * 7 % 11..road.width).step_by(11) {
                r.put(x, y, '"', theme.accent_fg, bg);
            }
        }
    }

    for lane in &road.lanes {
        let bg = if flashing { theme.flash_bg } else { theme.road_bg };
        let tint = LEVEL_TINTS[(level.palette_index() + lane.vehicle_length as usize) % LEVEL_TINTS.len()];
        for &left in &lane.positions {
            for (i, &ch) in lane.glyphs.iter().enumerate() {
                let x = (left + i as i32).rem_euclid(road.width.max(1));
                r.put(x, lane.row, ch, tint, bg);
            }
        }
    }

    if !matches!(s.phase(), Phase::StartScreen) {
        let p = s.player();
        let bg = if road.is_safe_row(p.y) {
            theme.safe_bg
        } else {
            theme.road_bg
        };
        r.put(p.x, p.y, '@', theme.frog_fg, bg);
    }

    // HUD
    let hi = ledger
        .top_score
        .max(s.leaderboard().top_score().unwrap_or(0));
    let hud = format!(
        " FROGGER  |  Score {:06}  Hi {:06}  Lives {}  Level {}",
        ledger.score,
        hi,
        "♥".repeat(ledger.lives as usize),
        level.number
    );
    r.fill_row(0, theme.hud_fg, theme.hud_bg);
    r.put_str(0, 0, &hud, theme.hud_fg, theme.hud_bg);

    let footer_y = road.height.max(1);
    let footer = match s.phase() {
        Phase::Paused { .. } => "PAUSED  |  Space resume   T theme   Q quit".to_string(),
        Phase::NameEntry { .. } => "Type your name   Enter save   Esc skip".to_string(),
        _ => format!(
            "Arrows/WASD move   Space pause   T theme   Q quit   |  {}",
            theme.name
        ),
    };
    r.fill_row(footer_y, theme.hud_fg, theme.hud_bg);
    r.put_str(1, footer_y, &footer, theme.hud_fg, theme.hud_bg);

    match s.phase() {
        Phase::StartScreen => {
            let mut lines = vec![
                "Get to the top row. Don't get hit.".to_string(),
                String::new(),
            ];
            if s.leaderboard().is_empty() {
                lines.push("No high scores yet.".to_string());
            }
            for (i, e) in s.leaderboard().entries().iter().enumerate() {
                lines.push(format!(
                    "{:>2}. {:<width$} {:>7}  {}",
                    i + 1,
                    e.name,
                    e.score,
                    e.date_stamp,
                    width = NAME_MAX
                ));
            }
            lines.push(String::new());
            lines.push("Press any key to start".to_string());
            draw_box(r, theme, "F R O G G E R", &lines);
        }
        Phase::Paused { .. } => draw_box(r, theme, "Paused", &["Space to resume".to_string()]),
        Phase::GameOverFlash { .. } => draw_box(
            r,
            theme,
            "GAME OVER",
            &[format!("Final score {}", ledger.score)],
        ),
        Phase::NameEntry { name } => {
            let mut preview = name.clone();
            if preview.chars().count() < NAME_MAX {
                preview.push('_');
            }
            draw_box(
                r,
                theme,
                "New high score!",
                &[
                    format!("Score {}", ledger.score),
                    String::new(),
                    format!("Name: {}", preview),
                ],
            );
        }
        _ => {}
    }
}

fn draw_box(r: &mut Renderer, theme: Theme, title: &str, lines: &[String]) {
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0) as i32
        + 4;
    let inner_h = lines.len() as i32 + 2;
    let bw = inner_w.min(r.w as i32);
    let bh = (inner_h + 2).min(r.h as i32);
    let x0 = (r.w as i32 - bw) / 2;
    let y0 = (r.h as i32 - bh) / 2;
    let (fg, bg) = (theme.hud_fg, theme.hud_bg);

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            let edge_x = x == x0 || x == x0 + bw - 1;
            let edge_y = y == y0 || y == y0 + bh - 1;
            let ch = match (edge_x, edge_y) {
                (true, true) => '+',
                (false, true) => '-',
                (true, false) => '|',
                (false, false) => ' ',
            };
            r.put(x, y, ch, fg, bg);
        }
    }
    r.put_str(x0 + 2, y0 + 1, title, theme.accent_fg, bg);
    for (i, line) in lines.iter().enumerate() {
        let y = y0 + 3 + i as i32;
        if y >= y0 + bh - 1 {
            break;
        }
        r.put_str(x0 + 2, y, line, fg, bg);
    }
}
