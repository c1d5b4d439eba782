//! wpm-speedometer - live typing speed meter
//!
//! Shows the current words-per-minute figure in a small terminal readout
//! while you type anywhere on the desktop.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode as CtKeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use wpm_speedometer::{
    config::{CaptureBackend, CaptureConfig, Config},
    estimator::RateEstimator,
    keyboard::{CaptureSource, DeviceQueryCapture, InputClassifier},
    monitor::{AlwaysGranted, Monitor, PermissionGate},
    ui::{App, AppState, StatsPanel, StatusBar, ThemeColors, WpmReadout},
};

#[cfg(target_os = "linux")]
use wpm_speedometer::{keyboard::EvdevCapture, monitor::DeviceAccessGate};

/// Pick the capture backend and the permission gate that guards it
fn build_capture(config: &CaptureConfig) -> (Box<dyn CaptureSource>, Box<dyn PermissionGate>) {
    let device_query = || -> (Box<dyn CaptureSource>, Box<dyn PermissionGate>) {
        (
            Box::new(DeviceQueryCapture::new(config.poll_interval())),
            Box::new(AlwaysGranted),
        )
    };

    #[cfg(target_os = "linux")]
    {
        let evdev = || -> (Box<dyn CaptureSource>, Box<dyn PermissionGate>) {
            (
                Box::new(EvdevCapture::new(config.poll_interval())),
                Box::new(DeviceAccessGate),
            )
        };
        match config.backend {
            CaptureBackend::Evdev => evdev(),
            CaptureBackend::DeviceQuery => device_query(),
            CaptureBackend::Auto => {
                if DeviceAccessGate.check().is_granted() {
                    evdev()
                } else {
                    log::info!("evdev unavailable, falling back to device_query");
                    device_query()
                }
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        if config.backend == CaptureBackend::Evdev {
            log::warn!("evdev capture is only available on Linux, using device_query");
        }
        device_query()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("using default config: {}", e);
            Config::default()
        }
    };

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))?;
    }

    // Composition root: the estimator is shared by the monitor and the readout
    let estimator = Arc::new(RateEstimator::from_config(&config.estimator));
    let (capture, gate) = build_capture(&config.capture);
    let monitor = Monitor::new(
        estimator,
        InputClassifier::new(),
        gate,
        capture,
        config.telemetry.emit_interval(),
    );
    let mut app = App::new(config.clone(), monitor);
    if let Err(e) = app.start() {
        log::warn!("{}", e);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let colors = ThemeColors::from_theme(config.ui.theme);
    let tick_rate = config.refresh_interval();

    loop {
        let metric = app.refresh();

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5), // Readout
                    Constraint::Min(10),   // Session stats
                    Constraint::Length(1), // Status bar
                ])
                .split(frame.area());

            frame.render_widget(
                WpmReadout::new(metric.rounded(), metric.is_active, colors),
                chunks[0],
            );

            let rows = app.summary_rows();
            frame.render_widget(StatsPanel::new(&rows, colors), chunks[1]);

            let elapsed = app.stats.elapsed_formatted();
            let status = StatusBar::new(app.state.label(), &elapsed, colors).message(app.get_status());
            frame.render_widget(status, chunks[2]);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        CtKeyCode::Char('q') | CtKeyCode::Esc => app.quit(),
                        CtKeyCode::Char(' ') => app.toggle_pause(),
                        CtKeyCode::Char('r') => app.reset_stats(),
                        CtKeyCode::Char('e') => {
                            let filename = format!(
                                "wpm_report_{}.json",
                                chrono::Utc::now().format("%Y%m%d_%H%M%S")
                            );
                            if let Err(e) = app.export_report(&filename) {
                                app.set_status(format!("Export failed: {}", e));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if interrupted.load(Ordering::SeqCst) {
            app.quit();
        }

        if app.state == AppState::Quitting {
            break;
        }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    println!("\nwpm-speedometer session complete.");
    if let Some(peak) = app.stats.peak_wpm {
        println!("Peak speed: {} WPM", peak);
    }
    println!("Keystrokes counted: {}", app.monitor.sink().accepted());
    println!("Session duration: {}", app.stats.elapsed_formatted());

    Ok(())
}
