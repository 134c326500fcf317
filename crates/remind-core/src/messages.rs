//! Locale-keyed message templates for reminder and alert text.
//!
//! The catalog is supplied by the caller; the planner only looks up
//! `(kind, locale)` and fills placeholders written as `{name}`.

use std::collections::HashMap;

use remind_domain::{AlertKind, Locale, ReminderKind};

/// Every message the scheduler can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    AdvanceReminder,
    DueToday,
    BudgetOverspend,
    OverdueSummary,
}

impl From<ReminderKind> for MessageKind {
    fn from(kind: ReminderKind) -> Self {
        match kind {
            ReminderKind::AdvanceReminder => MessageKind::AdvanceReminder,
            ReminderKind::DueToday => MessageKind::DueToday,
        }
    }
}

impl From<AlertKind> for MessageKind {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::BudgetOverspend => MessageKind::BudgetOverspend,
            AlertKind::OverdueSummary => MessageKind::OverdueSummary,
        }
    }
}

/// Title and body patterns for one message kind in one locale.
///
/// `body_with_amount` is used instead of `body` when the rendered subject carries
/// an amount and the template defines one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub title: String,
    pub body: String,
    pub body_with_amount: Option<String>,
}

impl MessageTemplate {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            body_with_amount: None,
        }
    }

    pub fn with_amount_body(mut self, body: impl Into<String>) -> Self {
        self.body_with_amount = Some(body.into());
        self
    }

    /// Renders `(title, body)`, substituting every `{key}` from `values`.
    pub fn render(&self, values: &[(&str, String)]) -> (String, String) {
        let has_amount = values.iter().any(|(key, _)| *key == "amount");
        let body = match (&self.body_with_amount, has_amount) {
            (Some(with_amount), true) => with_amount,
            _ => &self.body,
        };
        (fill(&self.title, values), fill(body, values))
    }
}

/// Substitutes `{key}` tokens in one pass over `pattern`. Inserted values are never
/// rescanned; unknown keys and unbalanced braces are copied through unchanged.
fn fill(pattern: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        let key = &tail[1..close];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Template lookup keyed by `(kind, locale)`.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    templates: HashMap<(MessageKind, Locale), MessageTemplate>,
}

impl MessageCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// English and Korean templates for every message kind.
    pub fn builtin() -> Self {
        use Locale::*;
        use MessageKind::*;

        Self::empty()
            .with_template(
                AdvanceReminder,
                English,
                MessageTemplate::new(
                    "Upcoming bill: {name}",
                    "{name} is due in {days} day(s).",
                )
                .with_amount_body("{name} ({amount}) is due in {days} day(s)."),
            )
            .with_template(
                AdvanceReminder,
                Korean,
                MessageTemplate::new("결제 예정: {name}", "{name} 결제일이 {days}일 남았습니다.")
                    .with_amount_body("{name} 결제일이 {days}일 남았습니다. 금액: {amount}"),
            )
            .with_template(
                DueToday,
                English,
                MessageTemplate::new("Bill due today: {name}", "{name} is due today.")
                    .with_amount_body("{name} ({amount}) is due today."),
            )
            .with_template(
                DueToday,
                Korean,
                MessageTemplate::new("오늘 결제일: {name}", "오늘은 {name} 결제일입니다.")
                    .with_amount_body("오늘은 {name} 결제일입니다. 금액: {amount}"),
            )
            .with_template(
                BudgetOverspend,
                English,
                MessageTemplate::new(
                    "Budget alert: {category}",
                    "You have used {percent}% of your {category} budget.",
                ),
            )
            .with_template(
                BudgetOverspend,
                Korean,
                MessageTemplate::new(
                    "예산 경고: {category}",
                    "{category} 예산의 {percent}%를 사용했습니다.",
                ),
            )
            .with_template(
                OverdueSummary,
                English,
                MessageTemplate::new("Overdue bills", "{count} overdue bill(s): {names}"),
            )
            .with_template(
                OverdueSummary,
                Korean,
                MessageTemplate::new("연체된 청구서", "연체된 청구서 {count}건: {names}"),
            )
    }

    pub fn with_template(
        mut self,
        kind: MessageKind,
        locale: Locale,
        template: MessageTemplate,
    ) -> Self {
        self.insert(kind, locale, template);
        self
    }

    pub fn insert(&mut self, kind: MessageKind, locale: Locale, template: MessageTemplate) {
        self.templates.insert((kind, locale), template);
    }

    pub fn get(&self, kind: MessageKind, locale: Locale) -> Option<&MessageTemplate> {
        self.templates.get(&(kind, locale))
    }

    /// Renders the template for `(kind, locale)`; `None` when the catalog lacks it.
    pub fn render(
        &self,
        kind: MessageKind,
        locale: Locale,
        values: &[(&str, String)],
    ) -> Option<(String, String)> {
        self.get(kind, locale).map(|template| template.render(values))
    }
}

/// Formats a monetary amount with two decimals and thousands separators.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
