use chrono::{Duration as ChronoDuration, NaiveDate};
use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::config::{ALL_AGENCIES, BID_TYPES, SearchDefaults};
use crate::data::SearchCriteria;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const INVALID_DATE: &str = "날짜 형식이 올바르지 않습니다. (YYYY-MM-DD)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    StartDate,
    EndDate,
    BidType,
    Agency,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::StartDate => FormField::EndDate,
            FormField::EndDate => FormField::BidType,
            FormField::BidType => FormField::Agency,
            FormField::Agency => FormField::StartDate,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::StartDate => FormField::Agency,
            FormField::EndDate => FormField::StartDate,
            FormField::BidType => FormField::EndDate,
            FormField::Agency => FormField::BidType,
        }
    }
}

/// What the form wants the shell to do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Editing,
    Submit,
    Close,
}

/// The search filter bar: two date inputs and two choice lists
#[derive(Debug, Clone)]
pub struct SearchForm {
    start: Input,
    end: Input,
    bid_type: usize,
    /// 0 is "all"; `n` is `agencies[n - 1]`
    agency: usize,
    focus: FormField,
    active: bool,
}

impl SearchForm {
    /// Dates default to the last `default_days` days ending today
    pub fn new(defaults: &SearchDefaults, today: NaiveDate) -> Self {
        let start = ChronoDuration::try_days(defaults.default_days)
            .and_then(|span| today.checked_sub_signed(span))
            .unwrap_or(today);
        let bid_type = BID_TYPES
            .iter()
            .position(|(code, _)| *code == defaults.bid_type)
            .unwrap_or(0);

        Self {
            start: Input::new(start.format(DATE_FORMAT).to_string()),
            end: Input::new(today.format(DATE_FORMAT).to_string()),
            bid_type,
            agency: 0,
            focus: FormField::StartDate,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn open(&mut self) {
        self.active = true;
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn start_input(&self) -> &Input {
        &self.start
    }

    pub fn end_input(&self) -> &Input {
        &self.end
    }

    pub fn bid_type_label(&self) -> &'static str {
        BID_TYPES[self.bid_type].1
    }

    pub fn agency_label<'a>(&self, agencies: &'a [String]) -> &'a str {
        match self.agency_name(agencies) {
            Some(name) => name,
            None => "전체",
        }
    }

    fn agency_name<'a>(&self, agencies: &'a [String]) -> Option<&'a str> {
        match self.agency {
            0 => None,
            n => agencies.get(n - 1).map(String::as_str),
        }
    }

    fn cycle(&mut self, forward: bool, agencies: &[String]) {
        let (slot, len) = match self.focus {
            FormField::BidType => (&mut self.bid_type, BID_TYPES.len()),
            FormField::Agency => (&mut self.agency, agencies.len() + 1),
            _ => return,
        };
        *slot = if forward {
            (*slot + 1) % len
        } else {
            (*slot + len - 1) % len
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent, agencies: &[String]) -> FormOutcome {
        match key.code {
            KeyCode::Esc => {
                self.active = false;
                return FormOutcome::Close;
            }
            KeyCode::Enter => return FormOutcome::Submit,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Left | KeyCode::Up
                if matches!(self.focus, FormField::BidType | FormField::Agency) =>
            {
                self.cycle(false, agencies)
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char(' ')
                if matches!(self.focus, FormField::BidType | FormField::Agency) =>
            {
                self.cycle(true, agencies)
            }
            _ => {
                let event = Event::Key(key);
                match self.focus {
                    FormField::StartDate => {
                        self.start.handle_event(&event);
                    }
                    FormField::EndDate => {
                        self.end.handle_event(&event);
                    }
                    _ => {}
                }
            }
        }
        FormOutcome::Editing
    }

    /// Build request criteria. Malformed dates are rejected with the
    /// message to show; nothing is sent in that case.
    pub fn to_criteria(&self, agencies: &[String]) -> Result<SearchCriteria, &'static str> {
        let start = parse_date(self.start.value()).ok_or(INVALID_DATE)?;
        let end = parse_date(self.end.value()).ok_or(INVALID_DATE)?;

        Ok(SearchCriteria {
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            bid_type: BID_TYPES[self.bid_type].0.to_string(),
            agency_filter: self
                .agency_name(agencies)
                .unwrap_or(ALL_AGENCIES)
                .to_string(),
        })
    }

    /// Close the form after a successful submit
    pub fn close(&mut self) {
        self.active = false;
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}
