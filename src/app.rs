use crate::config::{
    init_logging, load_settings, project_paths, save_settings_atomic, Args, Paths, Settings,
};
use crate::input::{collect_input_nonblocking, map_key, HostKey, InputEvent, Mapped};
use crate::render::{render_frame, theme_count, Renderer, FOOTER_ROWS};
use anyhow::Context;
use crossterm::{
    cursor, execute,
    style::ResetColor,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};
use frogger::session::{Action, Session};
use frogger::storage::JsonFileStore;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    session: Session<JsonFileStore>,
    renderer: Renderer,
    should_quit: bool,
}

fn playfield(cols: u16, rows: u16) -> (i32, i32) {
    (cols as i32, rows.saturating_sub(FOOTER_ROWS) as i32)
}

impl App {
    fn init(args: Args) -> anyhow::Result<Self> {
        let paths = project_paths()?;
        init_logging(&paths.log_path);

        let mut settings = load_settings(&paths.settings_path);
        settings.apply_args(&args);
        let seed = settings.resolve_seed();
        log::info!("starting with seed {seed}, tick {}ms", settings.tick_ms);

        let store = JsonFileStore::new(
            args.scores
                .clone()
                .unwrap_or_else(|| paths.scores_path.clone()),
        );

        let (cols, rows) = terminal::size().context("reading terminal size")?;
        let (w, h) = playfield(cols, rows);
        let session = Session::new(w, h, seed, store);

        Ok(Self {
            settings,
            paths,
            session,
            renderer: Renderer::new(cols, rows),
            should_quit: false,
        })
    }

    fn run(&mut self, out: &mut Stdout) -> anyhow::Result<()> {
        let tick = Duration::from_millis(self.settings.tick_ms);
        let mut last = Instant::now();
        let mut acc = Duration::ZERO;

        while !self.should_quit {
            for ev in collect_input_nonblocking(tick)? {
                self.handle(ev);
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            acc = acc.saturating_add(now.saturating_duration_since(last));
            last = now;
            while acc >= tick {
                self.session.on_tick(Instant::now());
                acc -= tick;
            }

            render_frame(&mut self.renderer, &self.session, self.settings.theme, now);
            self.renderer.flush_diff(out)?;

            // light frame cap
            std::thread::sleep(Duration::from_millis(2));
        }
        Ok(())
    }

    fn handle(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Resize(cols, rows) => {
                self.renderer.resize(cols, rows);
                let (w, h) = playfield(cols, rows);
                self.session.resize(w, h);
            }
            InputEvent::Key { key, mods } => match map_key(self.session.phase(), key, mods) {
                Some(Mapped::Action(Action::Quit)) => self.should_quit = true,
                Some(Mapped::Action(action)) => self.session.on_input(action, Instant::now()),
                Some(Mapped::Host(HostKey::CycleTheme)) => {
                    self.settings.theme = (self.settings.theme + 1) % theme_count();
                }
                None => {}
            },
        }
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(args)?;
    let mut out = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(
        out,
        EnterAlternateScreen,
        cursor::Hide,
        DisableLineWrap,
        terminal::Clear(terminal::ClearType::All)
    )?;

    let res = app.run(&mut out);

    // restore
    let _ = execute!(
        out,
        EnableLineWrap,
        cursor::Show,
        LeaveAlternateScreen,
        ResetColor
    );
    let _ = terminal::disable_raw_mode();

    if let Err(e) = save_settings_atomic(&app.paths.settings_path, &app.settings) {
        log::warn!("settings not saved: {e:#}");
    }
    res
}
