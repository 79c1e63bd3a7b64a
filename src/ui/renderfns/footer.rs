use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar: command line when active, otherwise the view breadcrumb
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], command: Option<&str>) {
  if let Some(input) = command {
    let line = Line::from(vec![
      Span::styled(":", Style::default().fg(Color::Yellow)),
      Span::raw(input.to_string()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
    return;
  }

  let mut spans = vec![Span::raw(" ")];
  let last = breadcrumb.len().saturating_sub(1);

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == last {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };
    spans.push(Span::styled(part.clone(), style));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
