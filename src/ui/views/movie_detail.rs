use crate::cache::{FetchPolicy, NormalizedCache};
use crate::movies::types::{Movie, MovieDetail};
use crate::movies::{GatewayClient, LocalMutation, MovieQuery};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{liked_marker, rating_color};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::{movie_row, LiveQuery};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph, Wrap};

/// View for one movie and its suggestions
pub struct MovieDetailView {
  id: i32,
  title: String,
  gateway: GatewayClient,
  live: LiveQuery,
  suggestions_state: ListState,
}

impl MovieDetailView {
  pub fn new(id: i32, title: String, gateway: GatewayClient, cache: &NormalizedCache) -> Self {
    let live = LiveQuery::start(&gateway, MovieQuery::Detail { id }, cache);

    Self {
      id,
      title,
      gateway,
      live,
      suggestions_state: ListState::default(),
    }
  }

  fn detail(&self, cache: &NormalizedCache) -> Option<MovieDetail> {
    self.live.read(cache)
  }

  fn render_movie(&self, frame: &mut Frame, area: Rect, movie: &Movie) {
    let mut lines = vec![
      Line::from(vec![
        Span::styled(
          format!("{} ", liked_marker(movie.is_liked)),
          Style::default().fg(Color::Red),
        ),
        Span::styled(movie.title.clone(), Style::default().bold()),
      ]),
      Line::from(vec![
        Span::styled("Rating: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
          format!("{:.1}", movie.rating),
          Style::default().fg(rating_color(movie.rating)),
        ),
        Span::raw("  "),
        Span::styled("Year: ", Style::default().fg(Color::DarkGray)),
        Span::raw(movie.year.map(|y| y.to_string()).unwrap_or_default()),
        Span::raw("  "),
        Span::styled("Language: ", Style::default().fg(Color::DarkGray)),
        Span::raw(movie.language.clone().unwrap_or_default()),
      ]),
    ];

    if !movie.genres.is_empty() {
      lines.push(Line::from(vec![
        Span::styled("Genres: ", Style::default().fg(Color::DarkGray)),
        Span::raw(movie.genres.join(", ")),
      ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::raw(
      movie.description().unwrap_or("No description").to_string(),
    ));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
  }
}

impl View for MovieDetailView {
  fn handle_key(&mut self, key: KeyEvent, cache: &mut NormalizedCache) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.suggestions_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.suggestions_state.select_previous(),
      KeyCode::Char('r') => self.live.run(cache, FetchPolicy::NetworkOnly),
      KeyCode::Char('l') => {
        if let Some(movie) = self.detail(cache).and_then(|d| d.movie) {
          LocalMutation::ToggleLikeMovie {
            id: movie.id,
            is_liked: movie.is_liked,
          }
          .apply(cache);
        }
      }
      KeyCode::Enter => {
        let selected = self.suggestions_state.selected();
        let suggestion = self
          .detail(cache)
          .and_then(|d| selected.and_then(|idx| d.suggestions.into_iter().nth(idx)));
        if let Some(movie) = suggestion {
          return ViewAction::Push(Box::new(MovieDetailView::new(
            movie.id,
            movie.title,
            self.gateway.clone(),
            cache,
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &NormalizedCache) {
    let block = Block::default()
      .title(format!(" {} {}", self.title, self.live.status(cache)))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(detail) = self.detail(cache) else {
      let content = match self.live.error() {
        Some(e) => format!("Error: {}\n\nPress 'r' to retry.", e),
        None => "Loading movie details...".to_string(),
      };
      frame.render_widget(
        Paragraph::new(content).style(Style::default().fg(Color::DarkGray)),
        inner,
      );
      return;
    };

    let Some(movie) = detail.movie else {
      frame.render_widget(
        Paragraph::new(format!("Movie {} not found.", self.id)).style(Style::default().fg(Color::Red)),
        inner,
      );
      return;
    };

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Min(6),    // Movie details
        Constraint::Length(1), // Separator
        Constraint::Length(8), // Suggestions
      ])
      .split(inner);

    self.render_movie(frame, chunks[0], &movie);

    let sep = Paragraph::new(format!(
      "── Suggestions ({}) {}",
      detail.suggestions.len(),
      "─".repeat(usize::from(chunks[1].width).saturating_sub(20))
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, chunks[1]);

    ensure_valid_selection(&mut self.suggestions_state, detail.suggestions.len());
    let list = List::new(detail.suggestions.iter().map(movie_row))
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[2], &mut self.suggestions_state);
  }

  fn breadcrumb_label(&self) -> String {
    self.title.clone()
  }

  fn tick(&mut self, cache: &mut NormalizedCache) {
    self.live.tick(cache);
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("l", "like"),
      Shortcut::new("enter", "open suggestion"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
