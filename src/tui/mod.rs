// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal front end: login view, tab bar, diagram surface and footer.
//!
//! The event loop runs on a blocking thread. Network work goes through [`bridge::Bridge`] and
//! comes back as completions that are drained once per tick, so every state change happens here.

mod bridge;
mod canvas_view;
mod login;
mod theme;

use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, info, warn};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use self::bridge::{Bridge, Command, Completion};
use self::canvas_view::{cell_center, origin_of, CanvasView};
use self::login::{LoginAction, LoginForm, LoginMode};
use self::theme::TuiTheme;
use crate::api::{ApiClient, ApiError, CanvasRecord};
use crate::canvas::ZOOM_STEP;
use crate::interact::{CanvasController, Notice, Response};
use crate::model::{CanvasId, TabId, Vector};
use crate::tabs::{LoadDecision, TabError, TabManager};

const TOAST_TTL: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DOUBLE_CLICK: Duration = Duration::from_millis(400);
const KEY_PAN_STEP: f64 = 40.0;

/// What the process knows before the first frame.
#[derive(Debug, Clone, Default)]
pub struct Launch {
    /// A stored session was hydrated; start on the canvas instead of the login view.
    pub authenticated: bool,
    /// Canvas to load right away (after login when unauthenticated).
    pub open_canvas: Option<CanvasId>,
}

/// Runs the interactive terminal UI until the user quits.
///
/// Must be called from a thread that can reach a tokio runtime (for example inside
/// `tokio::task::spawn_blocking`): API requests are spawned onto it.
pub fn run(client: ApiClient, launch: Launch) -> Result<(), Box<dyn Error>> {
    let bridge = Bridge::spawn(client);
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(bridge, TuiTheme::from_env(), launch);
    info!("event=tui_start module=tui");

    while !app.should_quit {
        app.drain_completions();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            app.handle_event(event::read()?);
        }
    }

    info!("event=tui_stop module=tui");
    Ok(())
}

enum Screen {
    Login(LoginForm),
    Canvas,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    error: bool,
    expires_at: Instant,
}

struct CanvasBrowser {
    /// `None` while the list request is in flight.
    items: Option<Vec<CanvasRecord>>,
    selected: usize,
    confirm_delete: bool,
}

impl CanvasBrowser {
    fn selected_record(&self) -> Option<&CanvasRecord> {
        self.items.as_ref()?.get(self.selected)
    }

    fn move_selection(&mut self, step: isize) {
        let len = self.items.as_ref().map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + step).clamp(0, len as isize - 1) as usize;
        self.confirm_delete = false;
    }
}

enum Overlay {
    None,
    Rename { tab_id: TabId, name: String },
    Browser(CanvasBrowser),
}

struct App {
    screen: Screen,
    tabs: TabManager,
    controller: CanvasController,
    bridge: Bridge,
    theme: TuiTheme,
    overlay: Overlay,
    toast: Option<Toast>,
    deferred_open: Option<CanvasId>,
    shown_tab: Option<TabId>,
    tab_hits: Vec<(TabId, Rect)>,
    last_tab_click: Option<(TabId, Instant)>,
    canvas_area: Rect,
    should_quit: bool,
}

impl App {
    fn new(bridge: Bridge, theme: TuiTheme, launch: Launch) -> Self {
        let mut tabs = TabManager::new();
        tabs.new_tab();
        let shown_tab = tabs.active_id();

        let mut app = Self {
            screen: if launch.authenticated {
                Screen::Canvas
            } else {
                Screen::Login(LoginForm::default())
            },
            tabs,
            controller: CanvasController::new(),
            bridge,
            theme,
            overlay: Overlay::None,
            toast: None,
            deferred_open: launch.open_canvas,
            shown_tab,
            tab_hits: Vec::new(),
            last_tab_click: None,
            canvas_area: Rect::default(),
            should_quit: false,
        };
        if launch.authenticated {
            app.open_deferred();
        }
        app
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            error: false,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            error: true,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    /// Surfaces a request failure; auth failures send the user back to the login view.
    fn report(&mut self, err: ApiError) {
        warn!("event=request_failed module=tui error={err}");
        if err.requires_login() {
            self.tabs.cancel_pending_loads();
            self.overlay = Overlay::None;
            self.controller.blur();
            self.screen = Screen::Login(LoginForm::new(Some(err.to_string())));
            return;
        }
        self.set_error(err.to_string());
    }

    fn dispatch(&mut self, command: Command) -> bool {
        if self.bridge.send(command) {
            return true;
        }
        warn!("event=bridge_closed module=tui");
        self.set_error("Background worker stopped; restart Flowdesk");
        false
    }

    fn drain_completions(&mut self) {
        while let Some(completion) = self.bridge.try_recv() {
            self.handle_completion(completion);
        }
        self.sync_active();
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Authenticated(Ok(Some(_))) => {
                self.screen = Screen::Canvas;
                self.set_toast("Signed in");
                self.open_deferred();
            }
            Completion::Authenticated(Ok(None)) => {
                if let Screen::Login(form) = &mut self.screen {
                    form.set_message("Account created. Confirm your email, then sign in.");
                }
            }
            Completion::Authenticated(Err(err)) => {
                if let Screen::Login(form) = &mut self.screen {
                    form.set_message(err.to_string());
                }
            }
            Completion::LoggedOut => debug!("event=logout_done module=tui"),
            Completion::Loaded { ticket, result } => match result {
                Ok(record) => match self.tabs.complete_load(&ticket, &record.name, &record.content)
                {
                    Ok(_) => self.set_toast(format!("Opened {}", record.name)),
                    Err(TabError::StaleTicket { generation }) => {
                        debug!("event=load_discarded module=tui ticket={generation}");
                    }
                    Err(err) => self.set_error(format!("Could not open {}: {err}", record.name)),
                },
                Err(err) => {
                    self.tabs.fail_load(&ticket);
                    self.report(err);
                }
            },
            Completion::Saved {
                tab_id,
                rev,
                result,
            } => match result {
                Ok(canvas_id) => match self.tabs.complete_save(tab_id, canvas_id, rev) {
                    Ok(()) => self.set_toast("Saved"),
                    Err(err) => debug!("event=save_untracked module=tui error={err}"),
                },
                Err(err) => {
                    self.tabs.fail_save(tab_id);
                    self.report(err);
                }
            },
            Completion::Listed(result) => match result {
                Ok(records) => {
                    if let Overlay::Browser(browser) = &mut self.overlay {
                        browser.selected = browser.selected.min(records.len().saturating_sub(1));
                        browser.items = Some(records);
                    }
                }
                Err(err) => {
                    if matches!(self.overlay, Overlay::Browser(_)) {
                        self.overlay = Overlay::None;
                    }
                    self.report(err);
                }
            },
            Completion::Deleted { canvas_id, result } => match result {
                Ok(()) => {
                    self.tabs.forget_resource(&canvas_id);
                    if let Overlay::Browser(browser) = &mut self.overlay {
                        if let Some(items) = &mut browser.items {
                            items.retain(|record| record.id != canvas_id);
                            browser.selected =
                                browser.selected.min(items.len().saturating_sub(1));
                        }
                    }
                    self.set_toast("Canvas deleted");
                }
                Err(err) => self.report(err),
            },
        }
    }

    fn open_deferred(&mut self) {
        if let Some(canvas_id) = self.deferred_open.take() {
            self.open_canvas(&canvas_id);
        }
    }

    fn open_canvas(&mut self, canvas_id: &CanvasId) {
        match self.tabs.request_load(canvas_id) {
            LoadDecision::Activated(_) => {}
            LoadDecision::AlreadyPending => self.set_toast("Already loading"),
            LoadDecision::Fetch(ticket) => {
                if !self.dispatch(Command::Load(ticket.clone())) {
                    self.tabs.fail_load(&ticket);
                }
            }
        }
    }

    fn save(&mut self) {
        match self.tabs.prepare_save() {
            Ok(request) => {
                let tab_id = request.tab_id;
                if !self.dispatch(Command::Save(request)) {
                    self.tabs.fail_save(tab_id);
                }
            }
            Err(TabError::SaveInFlight { .. }) => self.set_toast("Save already in progress"),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn logout(&mut self) {
        self.dispatch(Command::Logout);
        self.tabs.reset();
        self.tabs.new_tab();
        self.controller.blur();
        self.overlay = Overlay::None;
        self.screen = Screen::Login(LoginForm::default());
    }

    fn begin_rename(&mut self, tab_id: TabId) {
        let Some(tab) = self.tabs.tab(tab_id) else {
            return;
        };
        self.overlay = Overlay::Rename {
            tab_id,
            name: tab.name().to_owned(),
        };
    }

    fn commit_rename(&mut self) {
        if let Overlay::Rename { tab_id, name } =
            std::mem::replace(&mut self.overlay, Overlay::None)
        {
            if let Err(err) = self.tabs.rename(tab_id, name) {
                debug!("event=rename_skipped module=tui error={err}");
            }
        }
    }

    fn open_browser(&mut self) {
        self.overlay = Overlay::Browser(CanvasBrowser {
            items: None,
            selected: 0,
            confirm_delete: false,
        });
        if !self.dispatch(Command::ListCanvases) {
            self.overlay = Overlay::None;
        }
    }

    /// Applies controller output to the active diagram.
    fn apply(&mut self, response: Response) {
        if response.notice == Some(Notice::SelfLoopRejected) {
            self.set_error("A node cannot be connected to itself");
        }
        if !response.ops.is_empty() {
            if let Err(err) = self.tabs.apply_to_active(&response.ops) {
                warn!("event=apply_failed module=tui error={err}");
                self.set_error(err.to_string());
            }
        }
        self.sync_active();
    }

    /// Resets per-diagram UI state when the active tab changed and drops stale references.
    fn sync_active(&mut self) {
        let active = self.tabs.active_id();
        if active != self.shown_tab {
            self.controller.reset_for_activation();
            self.shown_tab = active;
        }
        if let Some(diagram) = self.tabs.active_diagram() {
            self.controller.sync_with(diagram);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusLost => {
                self.commit_rename();
                self.controller.blur();
            }
            _ => {}
        }
        self.sync_active();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Screen::Login(form) = &mut self.screen {
            match form.handle_key(key.code) {
                LoginAction::None => {}
                LoginAction::Quit => self.should_quit = true,
                LoginAction::Submit { mode, credentials } => {
                    let command = match mode {
                        LoginMode::SignIn => Command::Login(credentials),
                        LoginMode::Register => Command::Register(credentials),
                    };
                    if !self.dispatch(command) {
                        if let Screen::Login(form) = &mut self.screen {
                            form.set_message("Background worker stopped");
                        }
                    }
                }
            }
            return;
        }

        match &mut self.overlay {
            Overlay::Rename { name, .. } => {
                match key.code {
                    KeyCode::Enter => self.commit_rename(),
                    KeyCode::Esc => self.overlay = Overlay::None,
                    KeyCode::Backspace => {
                        name.pop();
                    }
                    KeyCode::Char(ch) => name.push(ch),
                    _ => {}
                }
                return;
            }
            Overlay::Browser(_) => {
                self.handle_browser_key(key.code);
                return;
            }
            Overlay::None => {}
        }

        if self.controller.editing().is_some() {
            self.handle_edit_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                self.controller.escape();
            }
            KeyCode::Char('n') => {
                self.tabs.new_tab();
            }
            KeyCode::Char('w') => {
                if let Some(tab_id) = self.tabs.active_id() {
                    let _ = self.tabs.close(tab_id);
                }
            }
            KeyCode::Char('[') => self.tabs.cycle(-1),
            KeyCode::Char(']') => self.tabs.cycle(1),
            KeyCode::Char('r') => {
                if let Some(tab_id) = self.tabs.active_id() {
                    self.begin_rename(tab_id);
                }
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('o') => self.open_browser(),
            KeyCode::Char('+' | '=') => self.controller.zoom_in(),
            KeyCode::Char('-') => self.controller.zoom_out(),
            KeyCode::Char('0') => self.controller.reset_view(),
            KeyCode::Char('L') => self.logout(),
            KeyCode::Left => self.pan(Vector::new(KEY_PAN_STEP, 0.0)),
            KeyCode::Right => self.pan(Vector::new(-KEY_PAN_STEP, 0.0)),
            KeyCode::Up => self.pan(Vector::new(0.0, KEY_PAN_STEP)),
            KeyCode::Down => self.pan(Vector::new(0.0, -KEY_PAN_STEP)),
            _ => {}
        }
    }

    fn pan(&mut self, delta: Vector) {
        self.controller.viewport_mut().pan_by(delta);
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let response = match (code, self.tabs.active_diagram()) {
            (KeyCode::Enter | KeyCode::Esc, _) => {
                self.controller.commit_edit();
                return;
            }
            (KeyCode::Backspace, Some(diagram)) => self.controller.backspace(diagram),
            (KeyCode::Char(ch), Some(diagram)) => self.controller.type_char(diagram, ch),
            _ => return,
        };
        self.apply(response);
    }

    fn handle_browser_key(&mut self, code: KeyCode) {
        let Overlay::Browser(browser) = &mut self.overlay else {
            return;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('o' | 'q') => self.overlay = Overlay::None,
            KeyCode::Up | KeyCode::Char('k') => browser.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => browser.move_selection(1),
            KeyCode::Enter => {
                let Some(canvas_id) = browser.selected_record().map(|record| record.id.clone())
                else {
                    return;
                };
                self.overlay = Overlay::None;
                self.open_canvas(&canvas_id);
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let Some(canvas_id) = browser.selected_record().map(|record| record.id.clone())
                else {
                    return;
                };
                if !browser.confirm_delete {
                    browser.confirm_delete = true;
                    return;
                }
                browser.confirm_delete = false;
                self.dispatch(Command::DeleteCanvas(canvas_id));
            }
            KeyCode::Char('R') => {
                browser.items = None;
                self.dispatch(Command::ListCanvases);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(self.screen, Screen::Canvas) || matches!(self.overlay, Overlay::Browser(_)) {
            return;
        }
        self.controller
            .set_pan_modifier(mouse.modifiers.contains(KeyModifiers::CONTROL));

        let cell = Position::new(mouse.column, mouse.row);
        let screen = cell_center(mouse.column, mouse.row);
        let on_canvas = self.canvas_area.contains(cell);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if matches!(self.overlay, Overlay::Rename { .. }) {
                    self.commit_rename();
                }
                if let Some(tab_id) = self.tab_at(cell) {
                    self.click_tab(tab_id);
                } else if on_canvas {
                    let response = self
                        .controller
                        .pointer_down(self.tabs.active_diagram(), screen);
                    self.apply(response);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if on_canvas {
                    let response = self.controller.pointer_move(screen);
                    self.apply(response);
                } else {
                    self.controller.pointer_leave();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let response = self.controller.pointer_up(screen);
                self.apply(response);
            }
            MouseEventKind::ScrollUp if on_canvas => self.controller.zoom_at(screen, ZOOM_STEP),
            MouseEventKind::ScrollDown if on_canvas => {
                self.controller.zoom_at(screen, 1.0 / ZOOM_STEP);
            }
            _ => {}
        }
    }

    fn tab_at(&self, cell: Position) -> Option<TabId> {
        self.tab_hits
            .iter()
            .find(|(_, rect)| rect.contains(cell))
            .map(|(tab_id, _)| *tab_id)
    }

    fn click_tab(&mut self, tab_id: TabId) {
        let now = Instant::now();
        let double = self
            .last_tab_click
            .is_some_and(|(last, at)| last == tab_id && now.duration_since(at) <= DOUBLE_CLICK);
        self.last_tab_click = Some((tab_id, now));
        if self.tabs.activate(tab_id).is_err() {
            return;
        }
        if double {
            self.last_tab_click = None;
            self.begin_rename(tab_id);
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    if app
        .toast
        .as_ref()
        .is_some_and(|toast| Instant::now() >= toast.expires_at)
    {
        app.toast = None;
    }

    if let Screen::Login(form) = &app.screen {
        app.tab_hits.clear();
        form.render(frame, area, &app.theme);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let (tab_area, canvas_area, footer_area) = (rows[0], rows[1], rows[2]);

    app.canvas_area = canvas_area;
    app.controller.set_origin(origin_of(canvas_area));

    draw_tab_bar(frame, tab_area, app);
    match app.tabs.active_diagram() {
        Some(diagram) => {
            CanvasView::new(diagram, &app.controller, &app.theme).render(frame, canvas_area);
        }
        None => {
            frame.render_widget(
                Paragraph::new("No canvas open. Press n for a new one or o to open a saved one.")
                    .style(app.theme.footer_label_style())
                    .alignment(Alignment::Center),
                canvas_area,
            );
        }
    }

    match &app.overlay {
        Overlay::None => {}
        Overlay::Rename { name, .. } => draw_rename(frame, canvas_area, name, &app.theme),
        Overlay::Browser(browser) => {
            draw_browser(frame, canvas_area, browser, &app.tabs, &app.theme);
        }
    }

    frame.render_widget(Paragraph::new(footer_line(app)), footer_area);
}

fn draw_tab_bar(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    app.tab_hits.clear();
    let active = app.tabs.active_id();
    let mut spans = Vec::new();
    let mut x = area.x;

    for tab in app.tabs.tabs() {
        let mut label = format!(" {} ", tab.name());
        if tab.is_dirty() {
            label.push_str("• ");
        }
        if tab.save_in_flight() {
            label.push_str("⟳ ");
        }
        let width = label.chars().count() as u16;
        if x >= area.right() {
            break;
        }
        let visible = width.min(area.right() - x);
        app.tab_hits
            .push((tab.tab_id(), Rect::new(x, area.y, visible, 1)));
        spans.push(Span::styled(
            label,
            app.theme.tab_style(Some(tab.tab_id()) == active),
        ));
        spans.push(Span::raw("│"));
        x = x.saturating_add(width + 1);
    }
    if app.tabs.pending_load_count() > 0 {
        spans.push(Span::styled(" loading…", app.theme.footer_label_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer_line(app: &App) -> Line<'static> {
    if let Some(toast) = &app.toast {
        return Line::styled(toast.message.clone(), app.theme.toast_style(toast.error));
    }

    let key = app.theme.footer_key_style();
    let label = app.theme.footer_label_style();
    let hints: &[(&'static str, &'static str)] = match app.overlay {
        Overlay::Rename { .. } => &[("Enter", "rename"), ("Esc", "cancel")],
        Overlay::Browser(_) => &[
            ("↑↓", "select"),
            ("Enter", "open"),
            ("x", "delete"),
            ("R", "refresh"),
            ("Esc", "close"),
        ],
        Overlay::None if app.controller.editing().is_some() => {
            &[("type", "edit text"), ("Enter/Esc", "done")]
        }
        Overlay::None => &[
            ("n", "new"),
            ("w", "close"),
            ("[ ]", "switch"),
            ("r", "rename"),
            ("s", "save"),
            ("o", "open"),
            ("+/-", "zoom"),
            ("0", "reset"),
            ("ctrl+drag", "pan"),
            ("L", "logout"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::new();
    for (keys, what) in hints {
        spans.push(Span::styled(*keys, key));
        spans.push(Span::styled(format!(" {what}  "), label));
    }
    spans.push(Span::styled(
        format!("{:.0}%", app.controller.viewport().zoom() * 100.0),
        label,
    ));
    Line::from(spans)
}

fn draw_rename(frame: &mut Frame<'_>, area: Rect, name: &str, theme: &TuiTheme) {
    let width = area.width.min(48);
    let popup = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height.min(3));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(format!("{name}▏")).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Rename tab ")
                .border_style(theme.panel_border_style(true)),
        ),
        popup,
    );
}

fn draw_browser(
    frame: &mut Frame<'_>,
    area: Rect,
    browser: &CanvasBrowser,
    tabs: &TabManager,
    theme: &TuiTheme,
) {
    let width = area.width.min(60);
    let height = area.height.min(16);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let title = if browser.confirm_delete {
        " Press x again to delete "
    } else {
        " Saved canvases "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.panel_border_style(true));
    frame.render_widget(Clear, popup);

    let Some(items) = &browser.items else {
        frame.render_widget(Paragraph::new("Loading…").block(block), popup);
        return;
    };
    if items.is_empty() {
        frame.render_widget(Paragraph::new("No saved canvases yet.").block(block), popup);
        return;
    }

    let rows: Vec<ListItem<'_>> = items
        .iter()
        .map(|record| {
            let open = tabs
                .tabs()
                .iter()
                .any(|tab| tab.resource_id() == Some(&record.id));
            let mut line = vec![Span::raw(if record.name.is_empty() {
                "(untitled)".to_owned()
            } else {
                record.name.clone()
            })];
            if open {
                line.push(Span::styled("  open", theme.footer_label_style()));
            }
            ListItem::new(Line::from(line))
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(browser.selected));
    frame.render_stateful_widget(
        List::new(rows)
            .block(block)
            .highlight_style(theme.selection_style()),
        popup,
        &mut state,
    );
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )
        .map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
}

#[cfg(test)]
pub(crate) mod testing {
    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc::error::TryRecvError;

    use super::bridge::{Bridge, BridgeRemote, Command, Completion};
    use super::theme::{ColorDepth, TuiTheme};
    use super::{draw, App, Launch};

    /// Drives an [`App`] without a terminal: input goes straight to the handlers, frames go to
    /// a [`TestBackend`], and the network side is the test itself.
    pub(crate) struct HeadlessTui {
        pub(super) app: App,
        terminal: Terminal<TestBackend>,
        remote: BridgeRemote,
    }

    impl HeadlessTui {
        pub(crate) fn new(launch: Launch) -> Self {
            let (bridge, remote) = Bridge::pair();
            let app = App::new(bridge, TuiTheme::new(ColorDepth::Monochrome), launch);
            let terminal = Terminal::new(TestBackend::new(120, 40)).expect("test terminal");
            let mut tui = Self {
                app,
                terminal,
                remote,
            };
            tui.render();
            tui
        }

        pub(crate) fn render(&mut self) {
            let app = &mut self.app;
            self.terminal
                .draw(|frame| draw(frame, app))
                .expect("draw frame");
        }

        fn send(&mut self, event: Event) {
            self.app.handle_event(event);
            self.render();
        }

        pub(crate) fn press(&mut self, code: KeyCode) {
            self.press_with(code, KeyModifiers::NONE);
        }

        pub(crate) fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) {
            self.send(Event::Key(KeyEvent::new(code, modifiers)));
        }

        pub(crate) fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        pub(crate) fn mouse(
            &mut self,
            kind: MouseEventKind,
            column: u16,
            row: u16,
            modifiers: KeyModifiers,
        ) {
            self.send(Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers,
            }));
        }

        pub(crate) fn click(&mut self, column: u16, row: u16) {
            let left = MouseButton::Left;
            self.mouse(MouseEventKind::Down(left), column, row, KeyModifiers::NONE);
            self.mouse(MouseEventKind::Up(left), column, row, KeyModifiers::NONE);
        }

        pub(crate) fn drag(&mut self, from: (u16, u16), to: (u16, u16), modifiers: KeyModifiers) {
            let left = MouseButton::Left;
            self.mouse(MouseEventKind::Down(left), from.0, from.1, modifiers);
            self.mouse(MouseEventKind::Drag(left), to.0, to.1, modifiers);
            self.mouse(MouseEventKind::Up(left), to.0, to.1, modifiers);
        }

        pub(crate) fn focus_lost(&mut self) {
            self.send(Event::FocusLost);
        }

        pub(crate) fn next_command(&mut self) -> Option<Command> {
            match self.remote.commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
            }
        }

        pub(crate) fn complete(&mut self, completion: Completion) {
            self.remote
                .completions
                .send(completion)
                .expect("ui side alive");
            self.app.drain_completions();
            self.render();
        }

        pub(crate) fn screen_text(&self) -> String {
            let buffer = self.terminal.backend().buffer();
            let mut text = String::new();
            for y in 0..buffer.area.height {
                for x in 0..buffer.area.width {
                    text.push_str(buffer[(x, y)].symbol());
                }
                text.push('\n');
            }
            text
        }
    }
}
