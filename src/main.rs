use std::io::{self, Stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use indoc::indoc;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use unicode_segmentation::UnicodeSegmentation;

use link_label::{
    GridLayout, LinkDetector, LinkLabel, LinkTheme, PatternDetector, PatternOptions, PointerEvent,
    SubstringDetector, logging,
};

const SAMPLE: &str = indoc! {"
    Hi @amy, the #release notes are up at https://example.com/notes.
    Ping @bob with questions or follow #rust for updates.
"};

type LabelTerminal = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "link-label",
    version = env!("CARGO_PKG_VERSION"),
    about = "Render text with tappable mentions, hashtags and URLs in the terminal"
)]
struct Cli {
    /// Text to display. A short sample is used when omitted.
    text: Option<String>,

    /// Link `@mentions`.
    #[arg(long)]
    mentions: bool,

    /// Link `#hashtags`.
    #[arg(long)]
    hashtags: bool,

    /// Link URLs.
    #[arg(long)]
    urls: bool,

    /// Link the first occurrence of a literal string. Repeatable.
    #[arg(long = "substring", value_name = "TEXT")]
    substrings: Vec<String>,

    /// Link every match of a regular expression. Repeatable.
    #[arg(long = "pattern", value_name = "REGEX")]
    patterns: Vec<String>,

    /// Compile `--pattern` expressions case-insensitively.
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Keep each line on one row instead of wrapping at the label width.
    #[arg(long)]
    no_wrap: bool,

    #[arg(long, value_enum, default_value_t = Align::Left)]
    align: Align,

    /// Open tapped URLs in the default browser.
    #[arg(long)]
    open_urls: bool,

    /// Append debug logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn detectors(&self) -> link_label::Result<Vec<Box<dyn LinkDetector>>> {
        let none_selected = !self.mentions
            && !self.hashtags
            && !self.urls
            && self.substrings.is_empty()
            && self.patterns.is_empty();
        let mut detectors: Vec<Box<dyn LinkDetector>> = Vec::new();
        if self.mentions || none_selected {
            detectors.push(Box::new(PatternDetector::mention()));
        }
        if self.hashtags || none_selected {
            detectors.push(Box::new(PatternDetector::hashtag()));
        }
        if self.urls || none_selected {
            let mut url = PatternDetector::url();
            if self.open_urls {
                url = url.with_callback(|matched| {
                    let target = if matched.contains("://") {
                        matched.to_string()
                    } else {
                        format!("https://{matched}")
                    };
                    if let Err(err) = webbrowser::open(&target) {
                        tracing::warn!(url = %target, error = %err, "failed to open url");
                    }
                });
            }
            detectors.push(Box::new(url));
        }
        for substring in &self.substrings {
            detectors.push(Box::new(SubstringDetector::new(substring.clone())));
        }
        let options = PatternOptions {
            case_insensitive: self.ignore_case,
            ..PatternOptions::default()
        };
        for pattern in &self.patterns {
            detectors.push(Box::new(PatternDetector::try_new(pattern, options)?));
        }
        Ok(detectors)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("link-label: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> link_label::Result<()> {
    logging::init_default(cli.log_file.as_deref())?;

    let text = cli.text.clone().unwrap_or_else(|| SAMPLE.trim_end().to_string());
    let mut app = App::new(text, cli)?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

struct App {
    label: LinkLabel,
    wrap: bool,
    last_tap: Arc<Mutex<Option<String>>>,
    layout: GridLayout,
}

impl App {
    fn new(text: String, cli: &Cli) -> link_label::Result<Self> {
        let theme = LinkTheme {
            alignment: cli.align.into(),
            ..LinkTheme::default()
        };
        let mut label = LinkLabel::new(text).with_theme(theme);
        label.set_detectors(cli.detectors()?);

        let last_tap = Arc::new(Mutex::new(None));
        let sink = last_tap.clone();
        label.when_link_is_tapped(move |matched| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(matched.to_string());
            }
        });

        Ok(Self {
            label,
            wrap: !cli.no_wrap,
            last_tap,
            layout: GridLayout::default(),
        })
    }

    fn run(&mut self, terminal: &mut LabelTerminal) -> link_label::Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL));
                    if quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(pointer) = PointerEvent::from_mouse(&mouse) {
                        self.label.handle_pointer(pointer, &self.layout);
                    }
                }
                Event::FocusLost => {
                    self.label.handle_pointer(PointerEvent::Cancelled, &self.layout);
                }
                _ => {}
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.width < 3 || area.height < 4 {
            return;
        }
        let body = Rect {
            height: area.height - 1,
            ..area
        };
        let status = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };

        let block = Block::default().borders(Borders::ALL).title(" link-label ");
        let inner = block.inner(body);
        frame.render_widget(block, body);

        let attributed = self.label.attributed_text();
        self.layout = GridLayout::new(attributed.text(), inner, self.wrap, attributed.alignment());
        let buffer = frame.buffer_mut();
        for (index, (grapheme, style)) in attributed
            .text()
            .graphemes(true)
            .zip(attributed.grapheme_styles())
            .enumerate()
        {
            if matches!(grapheme, "\n" | "\r\n") {
                continue;
            }
            if let Some(position) = self.layout.position_of(index)
                && inner.contains(position)
            {
                buffer.set_string(position.x, position.y, grapheme, style);
            }
        }

        let message = match self.last_tap.lock().ok().and_then(|slot| slot.clone()) {
            Some(tapped) => format!("tapped: {tapped}"),
            None => "click a link, q to quit".to_string(),
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
            status,
        );
    }
}
