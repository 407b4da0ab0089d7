mod app;

use anyhow::{Context, Result};
use app::{App, Pane};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};
use textlens_config::Config;
use textlens_engine::{
    AnalysisError, AnalysisRequest, AnalysisService, EditorSession, HttpAnalysisService,
    IssueType, LeafDecoration, RunPath, SessionOptions, analysis::AnalysisResponse,
    editing::flatten_visible, io,
};

/// Idle tick when no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(50);

type WorkerReply = (AnalysisRequest, Result<AnalysisResponse, AnalysisError>);

enum Mode {
    Edit(PathBuf),
    Check(PathBuf),
    Paraphrase(PathBuf),
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <file>");
    eprintln!("       {program} --check <file>");
    eprintln!("       {program} --paraphrase <file>");
    process::exit(1);
}

fn parse_args(args: &[String]) -> Mode {
    let program = args.first().map(String::as_str).unwrap_or("textlens-cli");
    match args {
        [_, flag, path] if flag == "--check" => Mode::Check(PathBuf::from(path)),
        [_, flag, path] if flag == "--paraphrase" => Mode::Paraphrase(PathBuf::from(path)),
        [_, path] if !path.starts_with("--") => Mode::Edit(PathBuf::from(path)),
        _ => usage(program),
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            Config::default()
        }
    }
}

fn init_logging(config: &Config) {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    // The terminal belongs to the editor, so logs go to a file
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Warning: cannot open log file {}: {e}", log_path.display()),
    }
    let _ = builder.try_init();
}

fn session_options(config: &Config) -> SessionOptions {
    let filter = match config.default_filter.as_str() {
        "all" => None,
        name => match name.parse::<IssueType>() {
            Ok(issue_type) => Some(issue_type),
            Err(e) => {
                log::warn!("{e}, falling back to grammar");
                Some(IssueType::Grammar)
            }
        },
    };
    SessionOptions {
        change_debounce: config.change_debounce(),
        analysis_debounce: config.analysis_debounce(),
        decoration_debounce: config.decoration_debounce(),
        should_analyze: true,
        filter,
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mode = parse_args(&args);
    let config = load_config();
    init_logging(&config);

    let service = HttpAnalysisService::new(config.api_url.clone(), config.api_key.clone())
        .context("failed to create analysis client")?;
    log::info!("using analysis service at {}", service.base_url());

    match mode {
        Mode::Check(path) => check(&path, &config, &service),
        Mode::Paraphrase(path) => paraphrase(&path, &service),
        Mode::Edit(path) => edit(path, &config, service),
    }
}

fn read_or_exit(path: &Path) -> textlens_engine::Document {
    match io::read_document(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Analyze once and print every issue as `line:col [type] message`
fn check(path: &Path, config: &Config, service: &HttpAnalysisService) -> Result<()> {
    let doc = read_or_exit(path);
    let mut session = EditorSession::new(doc, session_options(config));

    match session.analyze_blocking(service, Instant::now()) {
        None => {
            println!("{}: nothing to analyze", path.display());
            return Ok(());
        }
        Some(textlens_engine::Completion::Failed(message)) => {
            eprintln!("Error: {message}");
            process::exit(2);
        }
        Some(_) => {}
    }

    let visible = flatten_visible(session.document(), session.viewport());
    let issues = session.issues();
    for issue in &issues {
        let (line, column) = visible.map.locate(issue.start).unwrap_or((0, issue.start));
        let suggestion = issue
            .suggestions
            .first()
            .map(|s| format!(" -> {s}"))
            .unwrap_or_default();
        println!(
            "{}:{}:{} [{}] {}{}",
            path.display(),
            line + 1,
            column + 1,
            issue.issue_type,
            issue.message,
            suggestion
        );
    }

    let summary = session.summary();
    println!("{}", summary_line(&summary));
    session.shutdown();
    if issues.is_empty() { Ok(()) } else { process::exit(3) }
}

fn paraphrase(path: &Path, service: &HttpAnalysisService) -> Result<()> {
    let doc = read_or_exit(path);
    let text = doc.text();
    if text.trim().is_empty() {
        println!("{}: nothing to paraphrase", path.display());
        return Ok(());
    }
    let paraphrased = service.paraphrase(&text)?;
    println!("{paraphrased}");
    Ok(())
}

fn summary_line(summary: &textlens_engine::AnalysisSummary) -> String {
    let mut parts = vec![format!("{} issues", summary.stats.active)];
    for issue_type in IssueType::ALL {
        let count = summary.stats.count(issue_type);
        if count > 0 {
            parts.push(format!("{}: {count}", issue_type.label()));
        }
    }
    if let Some(level) = &summary.readability_level {
        parts.push(format!("readability: {level}"));
    }
    if let Some(tone) = &summary.tone {
        parts.push(format!("tone: {tone}"));
    }
    if let Some(voice) = &summary.voice {
        parts.push(format!("voice: {voice}"));
    }
    parts.join(" | ")
}

/// Runs analysis requests off the UI thread
fn spawn_worker(service: HttpAnalysisService) -> (Sender<AnalysisRequest>, Receiver<WorkerReply>) {
    let (request_tx, request_rx) = mpsc::channel::<AnalysisRequest>();
    let (reply_tx, reply_rx) = mpsc::channel::<WorkerReply>();
    thread::spawn(move || {
        for request in request_rx {
            log::debug!("analyzing {} chars", request.text.chars().count());
            let outcome = service.analyze(&request.text);
            if reply_tx.send((request, outcome)).is_err() {
                break;
            }
        }
    });
    (request_tx, reply_rx)
}

fn edit(path: PathBuf, config: &Config, service: HttpAnalysisService) -> Result<()> {
    let doc = if path.exists() {
        read_or_exit(&path)
    } else {
        textlens_engine::Document::new()
    };
    let mut session = EditorSession::new(doc, session_options(config));
    // Analyze whatever was loaded without waiting for an edit
    session.request_analysis(Instant::now());
    let mut app = App::new(path, session);

    let (requests, replies) = spawn_worker(service);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &requests, &replies);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.session.shutdown();
    if app.dirty {
        log::info!("quit with unsaved changes to {}", app.path.display());
    }

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    requests: &Sender<AnalysisRequest>,
    replies: &Receiver<WorkerReply>,
) -> Result<()> {
    loop {
        let now = Instant::now();
        let editor_height = terminal.size()?.height.saturating_sub(5) as usize;
        app.update_viewport(editor_height, now);

        if let Some(request) = app.session.poll(now) {
            requests
                .send(request)
                .context("analysis worker stopped")?;
        }
        while let Ok((request, outcome)) = replies.try_recv() {
            let completion = app.session.complete_analysis(request, outcome, Instant::now());
            log::debug!("analysis completed: {completion:?}");
        }
        app.refresh();

        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .session
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Instant::now())?;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn issue_color(issue_type: IssueType) -> Color {
    match issue_type {
        IssueType::Grammar => Color::Red,
        IssueType::Inclusive => Color::Yellow,
        IssueType::Synonym => Color::Magenta,
        IssueType::Readability => Color::Blue,
    }
}

fn decoration_style(leaf: &LeafDecoration) -> Style {
    // Grammar wins when several types overlap
    let color = if leaf.is_grammar_error {
        Color::Red
    } else if leaf.is_inclusive_language_error {
        Color::Yellow
    } else if leaf.is_synonym_suggestion {
        Color::Magenta
    } else {
        Color::Blue
    };
    let style = Style::default()
        .fg(color)
        .add_modifier(Modifier::UNDERLINED);
    if leaf.is_selected {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

/// Split one run into spans according to its decorations
fn run_spans(text: &str, leaves: &[LeafDecoration]) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let mut styles = vec![Style::default(); chars.len()];
    for leaf in leaves {
        let end = leaf.range.end.min(chars.len());
        let style = decoration_style(leaf);
        for slot in styles.iter_mut().take(end).skip(leaf.range.start) {
            *slot = style;
        }
    }

    let mut spans = Vec::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        if i == chars.len() || styles[i] != styles[start] {
            let segment: String = chars[start..i].iter().collect();
            spans.push(Span::styled(segment, styles[start]));
            start = i;
        }
    }
    spans
}

fn editor_lines(app: &App, height: usize) -> Vec<Line<'static>> {
    let doc = app.document();
    (app.scroll..doc.block_count().min(app.scroll + height))
        .filter_map(|index| doc.block(index).map(|block| (index, block)))
        .map(|(index, block)| {
            let spans = block
                .runs()
                .iter()
                .enumerate()
                .flat_map(|(run, r)| {
                    let leaves = app.session.leaf_decorations(RunPath::new(index, run));
                    run_spans(&r.text, &leaves)
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(rows[0]);

    render_editor(f, app, columns[0]);
    render_issues(f, app, columns[1]);
    render_status(f, app, rows[1]);
}

fn render_editor(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let title = format!(
        "{}{}",
        app.path.display(),
        if app.dirty { " [+]" } else { "" }
    );
    let editor = Paragraph::new(editor_lines(app, height))
        .block(pane_block(title, app.pane == Pane::Editor));
    f.render_widget(editor, area);

    if app.pane == Pane::Editor && app.cursor.block >= app.scroll {
        let x = area.x + 1 + app.cursor.column as u16;
        let y = area.y + 1 + (app.cursor.block - app.scroll) as u16;
        if x < area.right() && y < area.bottom() {
            f.set_cursor_position((x, y));
        }
    }
}

fn render_issues(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .issues
        .iter()
        .map(|issue| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    format!("{} ", issue.issue_type.label()),
                    Style::default().fg(issue_color(issue.issue_type)),
                ),
                Span::raw(issue.message.clone()),
            ])];
            if let Some(first) = issue.suggestions.first() {
                lines.push(Line::from(Span::styled(
                    format!("  -> {first}"),
                    Style::default().fg(Color::Green),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let filter = app
        .session
        .filter()
        .map(|issue_type| issue_type.label())
        .unwrap_or("All");
    let list = List::new(items)
        .block(pane_block(
            format!("Issues: {filter} ({})", app.issues.len()),
            app.pane == Pane::Issues,
        ))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, area, &mut app.issue_list_state);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let state = if app.session.is_loading() {
        Span::styled("Analyzing...", Style::default().fg(Color::Cyan))
    } else if let Some(error) = app.session.error() {
        Span::styled(error.to_string(), Style::default().fg(Color::Red))
    } else {
        Span::raw(summary_line(&app.session.summary()))
    };

    let mut spans = vec![state];
    if let Some(status) = &app.status {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }
    let help = Line::from(Span::styled(
        "Tab: Switch pane | j/k: Issue | Enter: Apply | u: Undo | f: Filter | Ctrl-S: Save | Esc: Quit",
        Style::default().fg(Color::DarkGray),
    ));

    let status = Paragraph::new(vec![Line::from(spans), help]).block(Block::default());
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(range: std::ops::Range<usize>, grammar: bool, selected: bool) -> LeafDecoration {
        LeafDecoration {
            range,
            is_grammar_error: grammar,
            is_readability_issue: !grammar,
            is_selected: selected,
            ..LeafDecoration::default()
        }
    }

    fn texts(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(matches!(parse_args(&args(&["tl", "a.txt"])), Mode::Edit(p) if p == Path::new("a.txt")));
        assert!(matches!(parse_args(&args(&["tl", "--check", "a.txt"])), Mode::Check(_)));
        assert!(matches!(
            parse_args(&args(&["tl", "--paraphrase", "a.txt"])),
            Mode::Paraphrase(_)
        ));
    }

    #[test]
    fn test_run_spans_split_on_decorations() {
        let spans = run_spans("Their is a problem", &[leaf(0..5, true, false), leaf(11..18, false, true)]);

        assert_eq!(texts(&spans), vec!["Their", " is a ", "problem"]);
        assert_eq!(spans[0].style.fg, Some(Color::Red));
        assert_eq!(spans[1].style, Style::default());
        assert!(spans[2].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_run_spans_clamp_to_run() {
        let spans = run_spans("abc", &[leaf(1..10, true, false)]);

        assert_eq!(texts(&spans), vec!["a", "bc"]);
    }

    #[test]
    fn test_session_options_from_config() {
        let config = Config {
            default_filter: "all".to_string(),
            analysis_debounce_ms: 20,
            ..Config::default()
        };
        let options = session_options(&config);
        assert_eq!(options.filter, None);
        assert_eq!(options.analysis_debounce, Duration::from_millis(20));

        let config = Config {
            default_filter: "nonsense".to_string(),
            ..Config::default()
        };
        assert_eq!(session_options(&config).filter, Some(IssueType::Grammar));
    }
}
