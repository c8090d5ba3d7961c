use crate::engine::{Board, Cell, Snapshot};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Colours and glyphs for the board. The engine knows nothing about any of this.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background: Color,
    pub body: Color,
    pub head: Color,
    pub food: Color,
    pub food_symbol: &'static str,
    pub text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0a, 0x19, 0x2f),
            body: Color::Rgb(100, 255, 100),
            head: Color::Rgb(40, 200, 40),
            food: Color::Rgb(255, 100, 100),
            food_symbol: "●",
            text: Color::White,
        }
    }
}

pub struct BoardView<'a> {
    pub board: Board,
    pub snapshot: Snapshot<'a>,
    pub theme: &'a Theme,
}

impl BoardView<'_> {
    fn paint(&self, cell: Cell, area: Rect, buf: &mut Buffer, symbol: &str, fg: Color, bg: Color) {
        let (x, y) = self.board.origin(cell);
        for dx in 0..self.board.cell_size {
            let (col, row) = (area.x + x + dx, area.y + y);
            if col >= area.right() || row >= area.bottom() {
                continue;
            }
            // Wide glyphs occupy the first column only.
            let glyph = if dx == 0 { symbol } else { " " };
            buf[(col, row)].set_symbol(glyph).set_fg(fg).set_bg(bg);
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;

        for cell in self.board.cells() {
            self.paint(cell, area, buf, " ", theme.text, theme.background);
        }

        if let Some(food) = self.snapshot.food {
            self.paint(food, area, buf, theme.food_symbol, theme.food, theme.background);
        }

        for (i, &cell) in self.snapshot.snake.iter().enumerate() {
            let colour = if i == 0 { theme.head } else { theme.body };
            self.paint(cell, area, buf, " ", theme.text, colour);
        }
    }
}
