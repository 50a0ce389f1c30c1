use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dashmap::DashMap;
use futures::{channel::mpsc, StreamExt};
use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, UserId},
};
use tokio::time::Instant;

/// How long the pager waits for a control press before closing.
pub const PAGER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PagerControl {
    First,
    Prev,
    Next,
    Last,
}

impl PagerControl {
    pub const ALL: [PagerControl; 4] = [
        PagerControl::First,
        PagerControl::Prev,
        PagerControl::Next,
        PagerControl::Last,
    ];

    pub fn as_data(&self) -> &'static str {
        match self {
            PagerControl::First => "first",
            PagerControl::Prev => "prev",
            PagerControl::Next => "next",
            PagerControl::Last => "last",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PagerControl::First => "⏮",
            PagerControl::Prev => "◀",
            PagerControl::Next => "▶",
            PagerControl::Last => "⏭",
        }
    }

    pub fn from_data(data: &str) -> Option<PagerControl> {
        match data {
            "first" => Some(PagerControl::First),
            "prev" => Some(PagerControl::Prev),
            "next" => Some(PagerControl::Next),
            "last" => Some(PagerControl::Last),
            _ => None,
        }
    }
}

/// Page cursor with clamped navigation. The closed state is the run loop
/// having exited; once closed nothing re-enters it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PagerState {
    index: usize,
    last: usize,
}

impl PagerState {
    pub fn new(page_count: usize) -> Self {
        Self {
            index: 0,
            last: page_count.saturating_sub(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn apply(&mut self, control: PagerControl) -> usize {
        self.index = match control {
            PagerControl::First => 0,
            PagerControl::Prev => self.index.saturating_sub(1),
            PagerControl::Next => (self.index + 1).min(self.last),
            PagerControl::Last => self.last,
        };

        self.index
    }
}

#[derive(Debug)]
pub struct PagerEvent {
    pub user_id: UserId,
    pub control: PagerControl,
}

/// What the display side should do after one wait-for-control step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PagerStep {
    /// Redraw at the new index and extend the wait.
    Show(usize),
    /// Accepted but the index didn't move; still extends the wait.
    Unchanged,
    /// Someone other than the owner pressed a button; the wait is untouched.
    Ignored,
    /// The pager is done; detach the controls.
    Closed,
}

/// One user's pager over N pages. Consumes the outcome of the driver's
/// "wait for the next control activation or timeout" step; `None` means the
/// wait timed out. Closed is terminal.
pub struct PagerSession {
    owner: UserId,
    state: PagerState,
    closed: bool,
}

impl PagerSession {
    pub fn new(owner: UserId, page_count: usize) -> Self {
        Self {
            owner,
            state: PagerState::new(page_count),
            closed: false,
        }
    }

    pub fn index(&self) -> usize {
        self.state.index()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn step(&mut self, activation: Option<&PagerEvent>) -> PagerStep {
        if self.closed {
            return PagerStep::Closed;
        }

        let event = match activation {
            None => {
                self.closed = true;
                return PagerStep::Closed;
            }
            Some(event) => event,
        };

        if event.user_id != self.owner {
            return PagerStep::Ignored;
        }

        let previous = self.state.index();
        let index = self.state.apply(event.control);

        if index != previous {
            PagerStep::Show(index)
        } else {
            PagerStep::Unchanged
        }
    }
}

type PagerKey = (ChatId, i32);

/// Routes callback queries to the pager task owning the message. Entries are
/// inserted when a pager starts and removed on every exit path.
pub type PagerMap = Arc<DashMap<PagerKey, mpsc::UnboundedSender<PagerEvent>>>;

pub fn create_pager_map() -> PagerMap {
    Arc::new(DashMap::new())
}

fn pager_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([PagerControl::ALL
        .iter()
        .map(|control| InlineKeyboardButton::callback(control.label(), control.as_data()))
        .collect::<Vec<_>>()])
}

/// Shows `pages[0]` with navigation buttons and steps through the pages as
/// the invoking user presses them. Closes after [`PAGER_TIMEOUT`] of
/// inactivity, leaving the last page visible without its buttons.
pub async fn run_pager(
    bot: &AutoSend<Bot>,
    chat_id: ChatId,
    owner: UserId,
    pages: Vec<String>,
    pager_map: PagerMap,
) -> anyhow::Result<()> {
    let first_page = pages.first().context("Expected at least one page")?;

    let message = bot
        .send_message(chat_id, first_page.clone())
        .parse_mode(ParseMode::Html)
        .reply_markup(pager_keyboard())
        .await
        .context("Failed to send first page")?;

    let (sender, receiver) = mpsc::unbounded();
    let key = (chat_id, message.id);
    pager_map.insert(key, sender);

    let result = page_loop(bot, chat_id, message.id, owner, &pages, receiver).await;

    pager_map.remove(&key);

    bot.edit_message_reply_markup(chat_id, message.id)
        .await
        .context("Failed to detach pager controls")?;

    result
}

async fn page_loop(
    bot: &AutoSend<Bot>,
    chat_id: ChatId,
    message_id: i32,
    owner: UserId,
    pages: &[String],
    mut receiver: mpsc::UnboundedReceiver<PagerEvent>,
) -> anyhow::Result<()> {
    let mut session = PagerSession::new(owner, pages.len());
    let mut deadline = Instant::now() + PAGER_TIMEOUT;

    loop {
        let activation = tokio::select! {
            event = receiver.next() => match event {
                Some(event) => Some(event),
                None => return Ok(()),
            },
            _ = tokio::time::sleep_until(deadline) => None,
        };

        match session.step(activation.as_ref()) {
            PagerStep::Closed => return Ok(()),
            PagerStep::Ignored => {}
            PagerStep::Unchanged => {
                deadline = Instant::now() + PAGER_TIMEOUT;
            }
            PagerStep::Show(index) => {
                deadline = Instant::now() + PAGER_TIMEOUT;

                bot.edit_message_text(chat_id, message_id, pages[index].clone())
                    .parse_mode(ParseMode::Html)
                    .reply_markup(pager_keyboard())
                    .await
                    .context("Failed to switch page")?;
            }
        }
    }
}

pub async fn handle_callback(
    bot: AutoSend<Bot>,
    query: CallbackQuery,
    pager_map: PagerMap,
) -> anyhow::Result<()> {
    // Answer unconditionally so the client stops showing a spinner.
    bot.answer_callback_query(query.id.clone()).await?;

    let control = match query.data.as_deref().and_then(PagerControl::from_data) {
        Some(control) => control,
        None => return Ok(()),
    };

    let message = match &query.message {
        Some(message) => message,
        None => return Ok(()),
    };

    if let Some(sender) = pager_map.get(&(message.chat.id, message.id)) {
        // The pager may have just timed out; a dropped receiver is fine.
        let _ = sender.unbounded_send(PagerEvent {
            user_id: query.from.id,
            control,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_page() {
        let state = PagerState::new(3);
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn next_clamps_at_last_page() {
        let mut state = PagerState::new(3);

        assert_eq!(state.apply(PagerControl::Next), 1);
        assert_eq!(state.apply(PagerControl::Next), 2);
        assert_eq!(state.apply(PagerControl::Next), 2);
    }

    #[test]
    fn prev_clamps_at_first_page() {
        let mut state = PagerState::new(3);

        assert_eq!(state.apply(PagerControl::Prev), 0);
    }

    #[test]
    fn navigation_from_last_page() {
        let mut state = PagerState::new(3);
        state.apply(PagerControl::Last);
        assert_eq!(state.index(), 2);

        assert_eq!(state.apply(PagerControl::Next), 2);
        assert_eq!(state.apply(PagerControl::Prev), 1);
        assert_eq!(state.apply(PagerControl::First), 0);
    }

    #[test]
    fn single_page_never_moves() {
        let mut state = PagerState::new(1);

        for control in PagerControl::ALL {
            assert_eq!(state.apply(control), 0);
        }
    }

    #[test]
    fn control_data_round_trips() {
        for control in PagerControl::ALL {
            assert_eq!(PagerControl::from_data(control.as_data()), Some(control));
        }
        assert_eq!(PagerControl::from_data("middle"), None);
    }

    const OWNER: UserId = UserId(1);
    const STRANGER: UserId = UserId(2);

    fn press(user_id: UserId, control: PagerControl) -> PagerEvent {
        PagerEvent { user_id, control }
    }

    #[test]
    fn owner_presses_navigate() {
        let mut session = PagerSession::new(OWNER, 3);

        assert_eq!(
            session.step(Some(&press(OWNER, PagerControl::Next))),
            PagerStep::Show(1)
        );
        assert_eq!(
            session.step(Some(&press(OWNER, PagerControl::Last))),
            PagerStep::Show(2)
        );
        // Clamped at the last page, so nothing to redraw.
        assert_eq!(
            session.step(Some(&press(OWNER, PagerControl::Next))),
            PagerStep::Unchanged
        );
    }

    #[test]
    fn timeout_closes_the_session() {
        let mut session = PagerSession::new(OWNER, 3);
        session.step(Some(&press(OWNER, PagerControl::Next)));

        assert_eq!(session.step(None), PagerStep::Closed);
        assert!(session.is_closed());
    }

    #[test]
    fn closed_session_ignores_owner_presses() {
        let mut session = PagerSession::new(OWNER, 3);
        session.step(None);

        assert_eq!(
            session.step(Some(&press(OWNER, PagerControl::Next))),
            PagerStep::Closed
        );
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn stranger_presses_change_nothing() {
        let mut session = PagerSession::new(OWNER, 3);

        // Ignored means the driver leaves its deadline alone.
        assert_eq!(
            session.step(Some(&press(STRANGER, PagerControl::Next))),
            PagerStep::Ignored
        );
        assert_eq!(session.index(), 0);
        assert!(!session.is_closed());

        // The owner can still navigate afterwards.
        assert_eq!(
            session.step(Some(&press(OWNER, PagerControl::Next))),
            PagerStep::Show(1)
        );
    }
}
