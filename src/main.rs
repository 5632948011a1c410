use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use typestorm::app::App;
use typestorm::config::Config;
use typestorm::event::{AppEvent, EventHandler};
use typestorm::session::phrase::PhraseSource;
use typestorm::ui::components::progress_bar::ProgressBar;
use typestorm::ui::components::stats_sidebar::StatsSidebar;
use typestorm::ui::components::typing_area::TypingArea;
use typestorm::ui::layout::{AppLayout, pack_hint_lines};
use typestorm::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "typestorm", version, about = "Hard-mode typing exercise: no backspace, live WPM")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long = "phrase", help = "Phrase to practise (repeatable; replaces the pool)")]
    phrases: Vec<String>,

    #[arg(long, help = "Seed for phrase selection")]
    seed: Option<u64>,

    #[arg(long, help = "Config file (defaults to the user config dir)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Write debug logs to this file")]
    log_file: Option<PathBuf>,

    #[arg(long, help = "Write the effective config to the config file and exit")]
    write_config: bool,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

fn init_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .context("log file path has no file name")?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("typestorm=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))?;
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| std::env::var_os("TYPESTORM_LOG").map(PathBuf::from));
    let _log_guard = match log_path {
        Some(path) => Some(init_logging(&path)?),
        None => None,
    };

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if !cli.phrases.is_empty() {
        config.phrases = Some(cli.phrases);
    }

    if cli.write_config {
        config.save_to(&config_path)?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    let source: PhraseSource = config.phrase_source()?;
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });

    info!(phrases = source.count(), theme = %theme.name, "starting");
    let mut app = App::new(config, theme, source, cli.seed, Instant::now());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new();
    let result = run_app(&mut terminal, &mut app, &events);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let timeout = app.wait_timeout(Instant::now());
        match events.next(timeout)? {
            AppEvent::Key(key) => {
                app.handle_key(key, Instant::now());
            }
            AppEvent::Click => app.on_click(),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            info!("quit");
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = app.session();
    let now = Instant::now();

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);

    // Header: title, live WPM, progress
    let header_block = Block::bordered()
        .border_style(Style::default().fg(colors.border()))
        .style(Style::default().bg(colors.header_bg()));
    let header_inner = header_block.inner(layout.header);
    frame.render_widget(header_block, layout.header);

    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(header_inner);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "TYPE",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " STORM",
            Style::default()
                .fg(colors.header_fg())
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    frame.render_widget(title, header_cols[0]);
    frame.render_widget(
        ProgressBar::new(session.typed_len(), session.phrase().len(), &app.theme),
        header_cols[1],
    );
    let wpm = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {}", session.wpm()),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" WPM", Style::default().fg(colors.text_pending())),
    ]));
    frame.render_widget(wpm, header_cols[2]);

    frame.render_widget(TypingArea::new(session, &app.theme), layout.main);

    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(StatsSidebar::new(session, now, &app.theme), sidebar);
    }

    let advance_hint = if session.completed() {
        "[Enter/Tab] next challenge"
    } else {
        "[Tab] restart"
    };
    let engage_hint = if session.engaged() {
        "[Esc] pause"
    } else {
        "[Enter/click] resume"
    };
    let hints = [advance_hint, engage_hint, "[Ctrl-C] quit"];
    let hint_lines: Vec<Line> = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(hint_lines), layout.footer);
}
