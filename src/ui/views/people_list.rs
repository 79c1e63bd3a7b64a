use crate::cache::{FetchPolicy, NormalizedCache};
use crate::movies::types::PeopleList;
use crate::movies::{GatewayClient, MovieQuery};
use crate::ui::ensure_valid_selection;
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::LiveQuery;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// View for the static people dataset
pub struct PeopleListView {
  live: LiveQuery,
  list_state: ListState,
}

impl PeopleListView {
  pub fn new(gateway: &GatewayClient, cache: &NormalizedCache) -> Self {
    Self {
      live: LiveQuery::start(gateway, MovieQuery::People, cache),
      list_state: ListState::default(),
    }
  }
}

impl View for PeopleListView {
  fn handle_key(&mut self, key: KeyEvent, cache: &mut NormalizedCache) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.live.run(cache, FetchPolicy::NetworkOnly),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &NormalizedCache) {
    let people = self
      .live
      .read::<PeopleList>(cache)
      .map(|list| list.people)
      .unwrap_or_default();
    ensure_valid_selection(&mut self.list_state, people.len());

    let block = Block::default()
      .title(format!(" People ({}) {}", people.len(), self.live.status(cache)))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if people.is_empty() {
      let paragraph = Paragraph::new("No people loaded.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = people
      .iter()
      .map(|person| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<4}", person.id), Style::default().fg(Color::Cyan)),
          Span::raw(format!("{:<16}", person.name)),
          Span::styled(format!("{:>3}  ", person.age), Style::default().fg(Color::Yellow)),
          Span::styled(person.gender.clone(), Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    "People".to_string()
  }

  fn tick(&mut self, cache: &mut NormalizedCache) {
    self.live.tick(cache);
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new("r", "refresh"), Shortcut::new(":", "command")]
  }
}
