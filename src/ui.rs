use crate::app::App;
use crate::choropleth::{Legend, MapMode, MapWidget};
use crate::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Widget},
    Frame,
};

/// Width of the treatment center table on the right
const SIDE_PANEL_WIDTH: u16 = 34;
/// Legend swatches plus border
const LEGEND_HEIGHT: u16 = 3;

struct Areas {
    map: Rect,
    table: Rect,
    legend: Rect,
    status: Rect,
}

fn split(area: Rect) -> Areas {
    let rows = Layout::vertical([
        Constraint::Min(3),                // Map and table
        Constraint::Length(LEGEND_HEIGHT), // Legend
        Constraint::Length(1),             // Status bar
    ])
    .split(area);
    let cols = Layout::horizontal([Constraint::Min(10), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[0]);

    Areas {
        map: cols[0],
        table: cols[1],
        legend: rows[1],
        status: rows[2],
    }
}

fn bordered(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
}

/// Cells the map itself is drawn in, for a terminal of size `area`
pub fn map_inner_area(area: Rect) -> Rect {
    bordered("").inner(split(area).map)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let areas = split(frame.area());

    render_map(frame, app, areas.map);
    render_table(frame, app, areas.table);
    render_legend(frame, app.widget.legend(), areas.legend);
    render_status_bar(frame, app, areas.status);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.widget.mode() {
        MapMode::Treatment => " Treatment Centers ",
        MapMode::Population => " Population ",
    };
    let block = bordered(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (width, height) = (inner.width as usize, inner.height as usize);
    let layers = app
        .renderer
        .render(width, height, &app.viewport, app.widget.selected());
    let labels = app.renderer.labels(
        app.widget.state().regions.iter().map(|r| r.name.as_str()),
        width,
        height,
        &app.viewport,
    );

    frame.render_widget(
        ChoroplethView {
            layers,
            labels,
            widget: &app.widget,
        },
        inner,
    );
}

/// Region fills as cell backgrounds, outlines and labels on top
struct ChoroplethView<'a> {
    layers: MapLayers,
    labels: Vec<(u16, u16, String)>,
    widget: &'a MapWidget,
}

impl Widget for ChoroplethView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (cx, cy) = (col as usize, row as usize);
                let cell = &mut buf[(area.x + col, area.y + row)];

                if let Some(fill) = self.layers.fill_at(cx, cy).and_then(|id| self.widget.fill(id)) {
                    cell.set_bg(fill.color());
                }
                if let Some(ch) = self.layers.outlines.glyph(cx, cy) {
                    cell.set_char(ch).set_fg(Color::DarkGray);
                }
                if let Some(ch) = self.layers.highlight.glyph(cx, cy) {
                    cell.set_char(ch).set_fg(Color::Red);
                }
            }
        }

        let label_style = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
        for (lx, ly, text) in &self.labels {
            if *ly >= area.height {
                continue;
            }
            for (i, ch) in text.chars().enumerate() {
                let x = lx + i as u16;
                if x >= area.width {
                    break;
                }
                buf[(area.x + x, area.y + ly)].set_char(ch).set_style(label_style);
            }
        }
    }
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["Region", "", "Centers"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let selected_style = Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let rows = app.widget.rows().map(|row| {
        let style = if row.selected {
            selected_style
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(row.name.to_string()),
            Cell::from(row.placeholder),
            Cell::from(row.count.to_string()),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(2),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .highlight_symbol("› ")
    .block(bordered(" Treatment Centers "));

    // Cursor drives scrolling as well as the marker
    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_legend(frame: &mut Frame, legend: &Legend, area: Rect) {
    let swatches: Vec<Span> = legend
        .entries
        .iter()
        .map(|entry| {
            Span::styled(
                format!(" {} ", entry.label),
                Style::default().bg(entry.index.color()).fg(Color::Black),
            )
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(swatches)).block(bordered(legend.title()));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (mode, other) = match app.widget.mode() {
        MapMode::Treatment => ("Treatment", "p:population"),
        MapMode::Population => ("Population", "t:treatment"),
    };

    let hovered = app
        .hovered_region()
        .and_then(|id| app.widget.region(id))
        .map(|r| match app.widget.mode() {
            MapMode::Treatment => format!("{} ({})", r.name, r.treatment_centers),
            MapMode::Population => format!("{} (rank {})", r.name, r.population),
        })
        .unwrap_or_default();

    let status = Line::from(vec![
        Span::styled(" Mode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(mode, Style::default().fg(Color::Green)),
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(hovered, Style::default().fg(Color::White)),
        Span::styled(
            format!(" | click:count {other} tab:row enter:count hjkl:pan +/-:zoom r:fit q:quit"),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choropleth::PopulationTable;
    use crate::data::generate_tile_grid;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_map_inner_area() {
        let inner = map_inner_area(Rect::new(0, 0, 120, 40));
        assert_eq!(inner, Rect::new(1, 1, 120 - SIDE_PANEL_WIDTH - 2, 40 - LEGEND_HEIGHT - 1 - 2));
    }

    #[test]
    fn test_render_frame() {
        let mut app = App::new(generate_tile_grid(), PopulationTable::prefectures(), 120, 40).unwrap();
        let conakry = app.widget.region_id("gn-conakry").unwrap();
        app.widget.on_region_click(conakry);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("0 Centers"));
        assert!(text.contains("Conakry"));
        assert!(text.contains("Mode: Treatment"));

        app.widget.switch_to_population_map();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains(">350000"));
        assert!(text.contains("Mode: Population"));
    }

    #[test]
    fn test_fill_colors_follow_counts() {
        let mut app = App::new(generate_tile_grid(), PopulationTable::prefectures(), 120, 40).unwrap();
        let siguiri = app.widget.region_id("gn-siguiri").unwrap();
        for _ in 0..5 {
            app.widget.on_region_click(siguiri);
        }

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let buf = terminal.backend().buffer();

        let red = Color::Rgb(0xff, 0, 0);
        let area = app.map_area();
        let painted = (area.y..area.y + area.height)
            .flat_map(|y| (area.x..area.x + area.width).map(move |x| (x, y)))
            .filter(|&pos| buf[pos].bg == red)
            .count();
        assert!(painted > 0);
    }
}
