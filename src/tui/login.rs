// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::theme::TuiTheme;
use crate::api::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoginMode {
    SignIn,
    Register,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoginAction {
    None,
    Submit {
        mode: LoginMode,
        credentials: Credentials,
    },
    Quit,
}

#[derive(Debug, Clone)]
pub(crate) struct LoginForm {
    email: String,
    password: String,
    field: LoginField,
    mode: LoginMode,
    message: Option<String>,
    pending: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LoginForm {
    pub(crate) fn new(message: Option<String>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            field: LoginField::Email,
            mode: LoginMode::SignIn,
            message,
            pending: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn field(&self) -> LoginField {
        self.field
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> LoginMode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.pending = false;
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> LoginAction {
        if self.pending {
            return match code {
                KeyCode::Esc => LoginAction::Quit,
                _ => LoginAction::None,
            };
        }
        match code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                self.field = match self.field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::F(2) => {
                self.mode = match self.mode {
                    LoginMode::SignIn => LoginMode::Register,
                    LoginMode::Register => LoginMode::SignIn,
                };
            }
            KeyCode::Backspace => {
                self.active_mut().pop();
            }
            KeyCode::Char(ch) => self.active_mut().push(ch),
            KeyCode::Enter => return self.submit(),
            _ => {}
        }
        LoginAction::None
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn submit(&mut self) -> LoginAction {
        if self.field == LoginField::Email && self.password.is_empty() {
            self.field = LoginField::Password;
            return LoginAction::None;
        }
        let credentials = Credentials::new(self.email.trim(), self.password.clone());
        if let Err(err) = credentials.validate() {
            self.message = Some(err.to_string());
            return LoginAction::None;
        }
        self.pending = true;
        self.message = None;
        LoginAction::Submit {
            mode: self.mode,
            credentials,
        }
    }

    pub(crate) fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &TuiTheme) {
        let width = area.width.min(52);
        let height = area.height.min(10);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        let title = match self.mode {
            LoginMode::SignIn => " Flowdesk · sign in ",
            LoginMode::Register => " Flowdesk · create account ",
        };
        let field_line = |label: &'static str, value: String, field: LoginField| {
            let style = if self.field == field {
                theme.selection_style()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{label:>9} "), theme.footer_label_style()),
                Span::styled(value, style),
            ])
        };

        let mut lines = vec![
            Line::default(),
            field_line("email", self.email.clone(), LoginField::Email),
            field_line(
                "password",
                "•".repeat(self.password.chars().count()),
                LoginField::Password,
            ),
            Line::default(),
        ];
        if self.pending {
            lines.push(Line::from("Contacting server…"));
        } else if let Some(message) = &self.message {
            lines.push(Line::styled(message.clone(), theme.toast_style(true)));
        }
        lines.push(Line::from(vec![
            Span::styled("Enter", theme.footer_key_style()),
            Span::raw(" submit  "),
            Span::styled("Tab", theme.footer_key_style()),
            Span::raw(" field  "),
            Span::styled("F2", theme.footer_key_style()),
            Span::raw(" sign in/register  "),
            Span::styled("Esc", theme.footer_key_style()),
            Span::raw(" quit"),
        ]));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(theme.panel_border_style(true)),
            ),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::{LoginAction, LoginField, LoginForm, LoginMode};

    fn type_text(form: &mut LoginForm, text: &str) {
        for ch in text.chars() {
            form.handle_key(KeyCode::Char(ch));
        }
    }

    #[test]
    fn enter_on_email_moves_to_password_then_submits() {
        let mut form = LoginForm::default();
        type_text(&mut form, "ada@example.com");
        assert_eq!(form.handle_key(KeyCode::Enter), LoginAction::None);
        assert_eq!(form.field(), LoginField::Password);

        type_text(&mut form, "hunter22");
        let LoginAction::Submit { mode, credentials } = form.handle_key(KeyCode::Enter) else {
            panic!("expected submit");
        };
        assert_eq!(mode, LoginMode::SignIn);
        assert_eq!(credentials.email, "ada@example.com");
        assert!(form.is_pending());
        assert_eq!(form.handle_key(KeyCode::Char('x')), LoginAction::None);
    }

    #[test]
    fn invalid_email_is_reported_without_submitting() {
        let mut form = LoginForm::default();
        type_text(&mut form, "ada");
        form.handle_key(KeyCode::Tab);
        type_text(&mut form, "hunter22");
        form.handle_key(KeyCode::F(2));

        assert_eq!(form.handle_key(KeyCode::Enter), LoginAction::None);
        assert_eq!(form.mode(), LoginMode::Register);
        assert!(form.message().expect("message").contains("email"));
        assert!(!form.is_pending());
    }
}
