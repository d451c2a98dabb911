use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io::stdout, time::Instant};

use tcolumns::config::Args;
use tcolumns::game::{GameState, Session};
use tcolumns::input::handle_input;
use tcolumns::logging;
use tcolumns::ui::ui;
use tcolumns::vlog;

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        logging::init_log_file(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        if args.verbose {
            logging::enable_verbose_logging();
        }
    }

    let state = GameState::new(args.rows.into(), args.columns.into())
        .context("invalid board dimensions")?;
    let mut session = Session::new(state, args.seed, args.tick_delay(), Instant::now());
    vlog!("start: {}x{} board, seed {:?}", args.columns, args.rows, args.seed);

    // Restore the terminal before the panic message is printed
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        eprint!("{panic_info}\n\n");
    }));

    // Setup terminal
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session, &args);

    // Cleanup
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    args: &Args,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, session)).context("failed to draw frame")?;

        if event::poll(args.frame_delay())? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if !handle_input(session, code, kind, Instant::now())? {
                    break;
                }
            }
        }

        // Game over leaves the final board on screen until quit or restart
        session.update(Instant::now())?;
    }
    vlog!("quit");
    Ok(())
}
