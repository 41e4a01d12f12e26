use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::debug;

use crate::mood::Mood;
use crate::ollama::OllamaClient;
use crate::session::{ChatSession, Submission};
use crate::tui::{AppEvent, EventSender};
use crate::ui;

pub struct App {
    pub should_quit: bool,

    // Conversation
    pub session: ChatSession,
    pub input_cursor: usize, // char index into session.pending_input

    // Chat view
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the transcript pane
    pub chat_width: u16,  // inner width, for wrap calculations
    pub chat_area: Option<Rect>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Mood picker state
    pub show_mood_picker: bool,
    pub mood_picker_state: ListState,

    pub ollama: OllamaClient,
    events: EventSender,
}

impl App {
    pub fn new(session: ChatSession, ollama: OllamaClient, events: EventSender) -> Self {
        Self {
            should_quit: false,
            session,
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,
            animation_frame: 0,
            show_mood_picker: false,
            mood_picker_state: ListState::default(),
            ollama,
            events,
        }
    }

    /// Ask the server which models it has; the answer comes back as
    /// `AppEvent::ModelsDiscovered`.
    pub fn discover_models(&self) {
        let ollama = self.ollama.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = ollama.list_models().await;
            let _ = events.send(AppEvent::ModelsDiscovered(result));
        });
    }

    /// Send whatever is in the input box.
    pub fn submit(&mut self) {
        match self.session.submit() {
            Submission::Rejected => return,
            Submission::Canned => debug!("answered with canned reply"),
            Submission::Dispatched(request) => {
                let ollama = self.ollama.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = ollama.generate(&request.model, &request.prompt).await;
                    let _ = events.send(AppEvent::Generated(result));
                });
            }
        }

        self.input_cursor = 0;
        self.scroll_to_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_awaiting_response() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll the transcript so the newest entry (or the thinking line) is visible
    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.total_chat_lines().saturating_sub(visible_height)
    }

    /// Rendered rows of the transcript at the current pane width.
    fn total_chat_lines(&self) -> u16 {
        // Default to 50 columns until the first draw reports the real width
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };

        let rows = ui::transcript_paragraph(&self.session, self.animation_frame).line_count(wrap_width);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    // Mood picker methods
    pub fn open_mood_picker(&mut self) {
        let current_idx = Mood::all()
            .iter()
            .position(|m| *m == self.session.mood())
            .unwrap_or(0);
        self.mood_picker_state.select(Some(current_idx));
        self.show_mood_picker = true;
    }

    pub fn mood_picker_nav_down(&mut self) {
        let len = Mood::all().len();
        let i = self.mood_picker_state.selected().unwrap_or(0);
        self.mood_picker_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn mood_picker_nav_up(&mut self) {
        let i = self.mood_picker_state.selected().unwrap_or(0);
        self.mood_picker_state.select(Some(i.saturating_sub(1)));
    }

    /// Apply the highlighted mood and close the picker.
    pub fn select_mood(&mut self) -> Option<Mood> {
        let mood = self
            .mood_picker_state
            .selected()
            .and_then(|i| Mood::all().get(i).copied())?;
        self.session.set_mood(mood);
        self.show_mood_picker = false;
        Some(mood)
    }
}
