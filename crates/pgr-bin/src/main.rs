//! Entrypoint: wires every `pgr-*` crate into one single-threaded,
//! cooperative event loop (§5). Nothing downstream knows about terminals,
//! signals, or keystrokes -- this is where those ambient concerns live.

mod keymap;

use anyhow::Result;
use clap::Parser;
use pgr_config::{CliArgs, EffectiveOptions};
use pgr_events::{Command, Event, EventSourceRegistry, ExportTarget, InputEvent, KeyCode, MouseEventKind};
use pgr_export::{Format, NullPolicy, RowColScope, Scope};
use pgr_model::{BorderType, DataDesc, DetectHints, InputFormat};
use pgr_render::{LayoutRegions, RenderInputs, RenderOptions};
use pgr_search::{CasePolicy, SearchEngine};
use pgr_state::{MarkMode, NavCommand, NavigationState, Selection, Viewport};
use pgr_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use pgr_text::LineStore;
use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const STATUS_ROWS: u16 = 1;

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    store: LineStore,
    desc: DataDesc,
    options: EffectiveOptions,
    path: Option<PathBuf>,
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        // Mouse drag-to-select (§4.5) is a described in-scope behavior, not a
        // CLI-gated one, so mode 1002 is on unconditionally.
        Self { backend: CrosstermBackend::with_mouse(true), log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = std::path::Path::new(".");
        let log_path = log_dir.join("pgr.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }
        let file_appender = tracing_appender::rolling::never(log_dir, "pgr.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => self.log_guard = Some(guard),
            Err(_) => {
                // A subscriber is already installed (e.g. under a test harness); drop
                // the guard so the non-blocking writer thread shuts down cleanly.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn run<'a>(&'a mut self) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let args = CliArgs::parse();
        let config_path = args.config.clone().unwrap_or_else(pgr_config::file::discover);
        let persisted = pgr_config::file::load(&config_path)?;
        let options = EffectiveOptions::resolve(&args, &persisted);

        let (mut store, path) = load_source(args.path.clone())?;
        let desc = pgr_model::detect_with_hints(&mut store, &detect_hints(&options));
        info!(
            target: "runtime.startup",
            rows = store.len(),
            columns = desc.columns,
            "bootstrap_complete"
        );

        self.backend.set_title("pgr")?;
        let guard = self.backend.enter_guard()?;

        Ok(RuntimeContext { store, desc, options, path, terminal_guard: guard })
    }
}

/// Map the resolved CLI/config options onto the detector's hint inputs
/// (§4.2): `--border=N` forces `border_type`; `--csv`/`--tsv` reformat the
/// input into a column grid before the usual heuristics run over it.
fn detect_hints(options: &EffectiveOptions) -> DetectHints {
    let border_override = options.border_override.and_then(BorderType::from_u8);
    let input_format = match options.input_format {
        Some(Format::Csv) => InputFormat::Csv,
        Some(Format::TsvC) => InputFormat::Tsv,
        _ => InputFormat::Auto,
    };
    DetectHints { border_override, input_format }
}

fn load_source(path: Option<PathBuf>) -> Result<(LineStore, Option<PathBuf>)> {
    let mut store = LineStore::new();
    match &path {
        Some(p) => {
            let content = std::fs::read_to_string(p)?;
            for line in content.lines() {
                store.append(line);
            }
        }
        None => {
            let mut content = String::new();
            std::io::stdin().lock().read_to_string(&mut content)?;
            for line in content.lines() {
                store.append(line);
            }
        }
    }
    Ok((store, path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    CtrlCTwice,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::CtrlCTwice => "ctrl_c_twice",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

/// Active text-entry prompt (search term or goto-line digits). The prompt
/// owns its own buffer; keys are routed here instead of the normal keymap
/// while it is `Some`.
enum Prompt {
    Search { backward: bool, buffer: String },
    Goto { buffer: String },
}

struct PagerRuntime<'a> {
    store: LineStore,
    desc: DataDesc,
    nav: NavigationState,
    selection: Selection,
    search: SearchEngine,
    options: EffectiveOptions,
    render_options: RenderOptions,
    path: Option<PathBuf>,
    paused: bool,
    error: Option<String>,
    prompt: Option<Prompt>,
    digit_prefix: String,
    last_regions: Option<LayoutRegions>,
    history_path: PathBuf,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<pgr_input::InputShutdown>,
    _terminal_guard: TerminalGuard<'a>,
}

impl<'a> PagerRuntime<'a> {
    #[allow(clippy::too_many_arguments)]
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: JoinHandle<()>,
        input_shutdown: pgr_input::InputShutdown,
        source_handles: Vec<JoinHandle<()>>,
    ) -> Self {
        let RuntimeContext { store, desc, options, path, terminal_guard } = context;
        let render_options = RenderOptions {
            show_cursor: options.show_cursor,
            show_scrollbar: options.show_scrollbar,
            highlight_search: options.highlight_search,
            highlight_lines: options.highlight_lines,
            highlight_odd_rec: options.highlight_odd_rec,
            hide_header_line: options.hide_header_line,
            force_uniborder: false,
            rownum: false,
        };
        let mut nav = NavigationState::new(options.freeze_cols);
        nav.vertical_cursor_enabled = options.vertical_cursor;
        Self {
            store,
            desc,
            nav,
            selection: Selection::default(),
            search: SearchEngine::new(),
            history_path: pgr_config::history::discover(),
            options,
            render_options,
            path,
            paused: false,
            error: None,
            prompt: None,
            digit_prefix: String::new(),
            last_regions: None,
            rx,
            tx: Some(tx),
            source_handles,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    fn viewport(&self) -> Viewport {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let frozen_rows = if self.desc.headline_transl.is_some() && !self.render_options.hide_header_line {
            self.desc.first_data_row
        } else {
            0
        };
        let footer_rows = if self.desc.footer_row.is_some() { 1 } else { 0 };
        let frozen_cols_width = self.nav.frozen_width(&self.desc);
        let rows = (h as usize)
            .saturating_sub(STATUS_ROWS as usize)
            .saturating_sub(frozen_rows)
            .saturating_sub(footer_rows);
        let cols = (w as usize).saturating_sub(frozen_cols_width);
        Viewport { rows: rows.max(1), cols: cols.max(1) }
    }

    /// `--quit-if-one-screen`: the whole table already fits, so there is
    /// nothing to page through.
    fn fits_one_screen(&self) -> bool {
        let viewport = self.viewport();
        let total_rows = self.desc.last_data_row.saturating_sub(self.desc.first_data_row) + 1;
        total_rows <= viewport.rows
    }

    async fn run(&mut self) -> Result<()> {
        self.render()?;
        if self.options.quit_if_one_screen && self.fits_one_screen() {
            self.rx.close();
            self.finalize_shutdown(ShutdownReason::Quit).await;
            return Ok(());
        }
        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = self.handle_event(event);
            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue => {
                    if let Err(e) = self.render() {
                        error!(target: "render", ?e, "render_failed");
                        self.error = Some(e.to_string());
                    }
                }
            }
        }
        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", reason = reason.as_str(), "begin");
        if let Some(tx) = self.tx.take() {
            drop(tx);
        }
        while let Some(handle) = self.source_handles.pop() {
            let _ = tokio::time::timeout(Duration::from_millis(200), handle).await;
        }
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            let _ = handle.await;
        }
        info!(target: "runtime.shutdown", reason = reason.as_str(), "complete");
    }

    fn render(&mut self) -> Result<()> {
        let (w, h) = crossterm::terminal::size()?;
        let inputs = RenderInputs {
            store: &self.store,
            desc: &self.desc,
            nav: &self.nav,
            selection: &self.selection,
            search: &self.search,
            options: &self.render_options,
            watch_seconds_left: if self.paused { None } else { self.options.watch_seconds },
            error: self.error.take(),
        };
        let composed = pgr_render::compose(w, h, STATUS_ROWS, &inputs);
        self.last_regions = Some(composed.regions);
        let mut out = std::io::stdout();
        pgr_render::paint::paint(&mut out, &composed, self.render_options.highlight_lines)?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> LoopControl {
        match event {
            Event::Input(input) => self.handle_input(&input),
            Event::Command(cmd) => self.handle_command(cmd),
            Event::Resize(_, _) | Event::RenderRequested => LoopControl::Continue,
            Event::WatchTick => self.handle_watch_tick(),
            Event::DataAppended => LoopControl::Continue,
            Event::Shutdown => LoopControl::Break { reason: ShutdownReason::ShutdownEvent },
        }
    }

    fn handle_watch_tick(&mut self) -> LoopControl {
        if self.paused {
            return LoopControl::Continue;
        }
        let Some(path) = self.path.clone() else {
            return LoopControl::Continue;
        };
        match load_source(Some(path)) {
            Ok((mut store, _)) => {
                let desc = pgr_model::detect_with_hints(&mut store, &detect_hints(&self.options));
                let viewport = self.viewport();
                self.store = store;
                self.desc = desc;
                self.nav.rebind(&self.desc, viewport);
            }
            Err(e) => {
                warn!(target: "watch", ?e, "reload_failed");
                self.error = Some(format!("watch reload failed: {e}"));
            }
        }
        LoopControl::Continue
    }

    fn handle_input(&mut self, input: &InputEvent) -> LoopControl {
        match input {
            InputEvent::Key(key) => self.handle_key(*key),
            InputEvent::Mouse(mouse) => self.handle_mouse(*mouse),
            InputEvent::TextCommit(_) => LoopControl::Continue,
            InputEvent::CtrlC => self.handle_ctrl_c(),
        }
    }

    /// §5: first Ctrl-C clears search/selection; a second press (with
    /// nothing left to clear) exits.
    fn handle_ctrl_c(&mut self) -> LoopControl {
        let had_search = self.search.is_active();
        let had_selection = self.selection.mode != MarkMode::None;
        if had_search || had_selection {
            self.search.clear(&mut self.store);
            self.selection.unmark();
            LoopControl::Continue
        } else {
            LoopControl::Break { reason: ShutdownReason::CtrlCTwice }
        }
    }

    fn handle_key(&mut self, key: pgr_events::KeyEvent) -> LoopControl {
        if key.code == KeyCode::Char('c') && key.mods.contains(pgr_events::KeyModifiers::CTRL) {
            return self.handle_ctrl_c();
        }
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        match keymap::translate(key, !self.digit_prefix.is_empty()) {
            keymap::Intent::Digit(d) => {
                self.digit_prefix.push_str(&d.to_string());
                LoopControl::Continue
            }
            keymap::Intent::StartGoto => {
                self.prompt = Some(Prompt::Goto { buffer: std::mem::take(&mut self.digit_prefix) });
                LoopControl::Continue
            }
            keymap::Intent::StartSearch { backward } => {
                self.digit_prefix.clear();
                self.prompt = Some(Prompt::Search { backward, buffer: String::new() });
                LoopControl::Continue
            }
            keymap::Intent::Nav(nav_cmd) => {
                self.digit_prefix.clear();
                self.selection.collapse_cursor();
                let viewport = self.viewport();
                self.nav.apply(nav_cmd, &self.desc, viewport);
                LoopControl::Continue
            }
            keymap::Intent::Cmd(cmd) => {
                self.digit_prefix.clear();
                self.dispatch_command(cmd)
            }
            keymap::Intent::None => LoopControl::Continue,
        }
    }

    fn handle_prompt_key(&mut self, key: pgr_events::KeyEvent) -> LoopControl {
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                LoopControl::Continue
            }
            KeyCode::Enter => self.commit_prompt(),
            KeyCode::Backspace => {
                match &mut self.prompt {
                    Some(Prompt::Search { buffer, .. }) => {
                        buffer.pop();
                    }
                    Some(Prompt::Goto { buffer }) => {
                        buffer.pop();
                    }
                    None => {}
                }
                LoopControl::Continue
            }
            KeyCode::Char(c) => {
                match &mut self.prompt {
                    Some(Prompt::Search { buffer, .. }) => buffer.push(c),
                    Some(Prompt::Goto { buffer }) if c.is_ascii_digit() || c == '-' => buffer.push(c),
                    _ => {}
                }
                LoopControl::Continue
            }
            _ => LoopControl::Continue,
        }
    }

    fn commit_prompt(&mut self) -> LoopControl {
        match self.prompt.take() {
            Some(Prompt::Search { backward, buffer }) => {
                if !buffer.is_empty() {
                    self.search.set_pattern(&buffer, self.options.case_policy, &mut self.store);
                    let _ = pgr_config::history::append(&self.history_path, &buffer);
                    self.run_search(backward);
                }
            }
            Some(Prompt::Goto { buffer }) => {
                if let Ok(n) = buffer.parse::<i64>() {
                    let viewport = self.viewport();
                    self.nav.apply(NavCommand::GotoLine(n), &self.desc, viewport);
                }
            }
            None => {}
        }
        LoopControl::Continue
    }

    fn run_search(&mut self, backward: bool) {
        let Some((logical, _, _)) = self.store.display_at(self.desc.first_data_row + self.nav.cursor_row) else {
            return;
        };
        let found = if backward {
            self.search.search_prev(&mut self.store, logical, usize::MAX)
        } else {
            self.search.search_next(&mut self.store, logical, 0)
        };
        if let Some(m) = found {
            self.jump_to_logical_line(m.line);
        }
    }

    fn jump_to_logical_line(&mut self, logical: usize) {
        let Some(rel) = logical.checked_sub(self.desc.first_data_row) else { return };
        let viewport = self.viewport();
        self.nav.apply(NavCommand::GotoLine(rel as i64 + 1), &self.desc, viewport);
    }

    fn dispatch_command(&mut self, cmd: Command) -> LoopControl {
        match cmd {
            Command::Navigate(nc) => {
                self.selection.collapse_cursor();
                let viewport = self.viewport();
                self.nav.apply(nc, &self.desc, viewport);
            }
            Command::EnterSearch { backward } => {
                self.prompt = Some(Prompt::Search { backward, buffer: String::new() });
            }
            Command::SearchNext => self.run_search(false),
            Command::SearchPrev => self.run_search(true),
            Command::ClearSearch => {
                self.search.clear(&mut self.store);
                self.selection.unmark();
            }
            Command::ToggleBookmark => {
                if let Some((logical, _, _)) = self.store.display_at(self.desc.first_data_row + self.nav.cursor_row) {
                    self.store.xor_mark(logical, pgr_text::LineMask::BOOKMARK);
                }
            }
            Command::MarkRows => self.selection.mark_rows(self.nav.cursor_row),
            Command::MarkBlock => {
                let col = self.vertical_cursor_abs_col();
                self.selection.mark_block(self.nav.cursor_row, col);
            }
            Command::MarkColumns => {
                let col = self.vertical_cursor_abs_col();
                self.selection.mark_mouse_columns(col);
            }
            Command::CancelMark => self.selection.unmark(),
            Command::Export { target } => self.export(target),
            Command::ToggleFreeze => {
                self.nav.freezed_cols = if self.nav.freezed_cols == 0 { 1 } else { 0 };
            }
            Command::SetFreezeCols(n) => self.nav.freezed_cols = n.min(9),
            Command::Sort { column, descending } => self.sort_by_column(column, descending),
            Command::ClearSort => self.store.apply_order_map(None),
            Command::ToggleSearchHighlight => {
                self.render_options.highlight_search = !self.render_options.highlight_search;
            }
            Command::ToggleLineHighlight => {
                self.render_options.highlight_lines = !self.render_options.highlight_lines;
            }
            Command::TogglePause => self.paused = !self.paused,
            Command::Refresh => {}
            Command::Quit => return LoopControl::Break { reason: ShutdownReason::Quit },
        }
        LoopControl::Continue
    }

    fn vertical_cursor_abs_col(&self) -> usize {
        match self.desc.cranges.get(self.nav.vertical_cursor_column.saturating_sub(1)) {
            Some(c) if self.nav.vertical_cursor_column > 0 => c.xmin,
            _ => self.nav.frozen_width(&self.desc) + self.nav.cursor_col,
        }
    }

    /// Sort data rows by the text of column `column`'s display range,
    /// leaving title/border/footer rows fixed in place.
    fn sort_by_column(&mut self, column: usize, descending: bool) {
        let column = if self.nav.vertical_cursor_column > 0 {
            self.nav.vertical_cursor_column - 1
        } else {
            column
        };
        let Some(crange) = self.desc.cranges.get(column).copied() else { return };
        let first = self.desc.first_data_row;
        let last = self.desc.last_data_row;
        if first > last {
            return;
        }
        let mut data_rows: Vec<usize> = (first..=last).collect();
        data_rows.sort_by_key(|&idx| {
            let text = self.store.text(idx).unwrap_or("");
            let lo = pgr_text::width::display_col_to_byte(text, crange.xmin);
            let hi = pgr_text::width::display_col_to_byte(text, crange.xmax + 1).min(text.len());
            let field = if lo < hi { text[lo..hi].trim().to_string() } else { String::new() };
            field
        });
        if descending {
            data_rows.reverse();
        }
        let total = self.store.len();
        let mut perm: Vec<usize> = (0..total).collect();
        for (offset, &logical) in data_rows.iter().enumerate() {
            perm[first + offset] = logical;
        }
        self.store.apply_order_map(Some(perm));
    }

    fn export(&mut self, target: ExportTarget) {
        let scope = if self.selection.mode != MarkMode::None {
            let rect = self.selection.rect(self.nav.cursor_row, self.vertical_cursor_abs_col(), &self.desc);
            Scope::Selected(RowColScope {
                first_row_rel: rect.first_row,
                rows: rect.rows,
                first_col_abs: rect.first_column,
                col_width: rect.columns,
            })
        } else {
            Scope::CurrentLine(self.nav.cursor_row)
        };
        let null_policy = self.options.null_policy.clone();
        let mut buf = Vec::new();
        let result = pgr_export::export(&self.store, &self.desc, &scope, Format::Csv, &null_policy, "pgr", &mut buf);
        match result {
            Ok(()) => self.deliver_export(target, &buf),
            Err(e) => self.error = Some(format!("export failed: {e}")),
        }
    }

    fn deliver_export(&mut self, target: ExportTarget, buf: &[u8]) {
        match target {
            ExportTarget::File => {
                let secs = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                let path = format!("pgr_export_{secs}.csv");
                if let Err(e) = std::fs::write(&path, buf) {
                    self.error = Some(format!("export write failed: {e}"));
                } else {
                    info!(target: "export", path, "export_written");
                }
            }
            ExportTarget::Clipboard => {
                if let Err(e) = write_to_clipboard(buf) {
                    // A broken pipe on a downstream consumer that exited
                    // successfully is not a failure (§4.7/§7).
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        self.error = Some(format!("clipboard export failed: {e}"));
                    }
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: pgr_events::MouseEvent) -> LoopControl {
        let viewport = self.viewport();
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.nav.apply(NavCommand::ScrollUp, &self.desc, viewport);
            }
            MouseEventKind::ScrollDown => {
                self.nav.apply(NavCommand::ScrollDown, &self.desc, viewport);
            }
            MouseEventKind::Down(_) => {
                if let Some(row) = self.row_under(mouse.row) {
                    self.nav.cursor_row = row;
                    self.selection.mark_mouse(row, mouse.column as usize, false);
                }
            }
            MouseEventKind::Drag(_) => {
                if let Some(row) = self.row_under(mouse.row) {
                    self.nav.cursor_row = row;
                }
            }
            MouseEventKind::Up(_) => {
                self.selection.cancel_if_mouse();
            }
        }
        LoopControl::Continue
    }

    /// Map a terminal row back to a data-row-relative cursor position using
    /// the region layout from the last repaint.
    fn row_under(&self, term_row: u16) -> Option<usize> {
        let regions = self.last_regions.as_ref()?;
        let rows_rect = regions.rows;
        if term_row < rows_rect.y || term_row >= rows_rect.y + rows_rect.h {
            return None;
        }
        Some(self.nav.first_row + (term_row - rows_rect.y) as usize)
    }
}

fn write_to_clipboard(buf: &[u8]) -> std::io::Result<()> {
    let program = if cfg!(target_os = "macos") { "pbcopy" } else { "xclip" };
    let mut args: Vec<&str> = Vec::new();
    if program == "xclip" {
        args.push("-selection");
        args.push("clipboard");
    }
    let mut child = std::process::Command::new(program)
        .args(&args)
        .stdin(std::process::Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(buf)?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("clipboard process exited with failure status"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    let context = startup.run()?;
    let (tx, rx) = mpsc::channel::<Event>(pgr_events::EVENT_CHANNEL_CAP);

    let (input_task, input_shutdown) = {
        let (source, shutdown) = pgr_input::TerminalInputSource::new();
        let handle = Box::new(source).spawn(tx.clone());
        (handle, shutdown)
    };

    let mut registry = EventSourceRegistry::new();
    if let Some(secs) = context.options.watch_seconds {
        registry.register(pgr_events::WatchTickSource::new(Duration::from_secs(secs)));
    }
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = PagerRuntime::new(context, tx, rx, input_task, input_shutdown, source_handles);
    debug!(target: "runtime", "entering event loop");
    runtime.run().await
}
