use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement,
    Table,
};

/// Builder for consistently styled terminal tables
pub struct TableBuilder {
    table: Table,
    rows: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);

        Self { table, rows: 0 }
    }

    /// Set bold table headers
    pub fn headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h.into()).add_attribute(Attribute::Bold))
            .collect();

        self.table.set_header(header_cells);
        self
    }

    /// Add a row whose first cell is highlighted
    pub fn keyed_row<I, S>(&mut self, key: &str, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row_cells = vec![Cell::new(key).fg(Color::Cyan)];
        row_cells.extend(cells.into_iter().map(|cell| Cell::new(cell.into())));

        self.table.add_row(row_cells);
        self.rows += 1;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
